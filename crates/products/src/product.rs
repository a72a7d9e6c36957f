use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicer_core::{AggregateId, DomainError, DomainResult, Entity};

use crate::tax::TaxRule;

/// Product identity token.
///
/// Assigned once per constructed product. Clones share it; separately
/// constructed products never do, even with identical name and price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Closed set of product variants, distinguished only by their tax rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    TaxFree,
    Dairy,
    Other,
    /// Generic excise goods.
    Excise,
    BottleOfWine,
    FuelCanister,
}

impl ProductKind {
    pub fn tax_rule(self) -> TaxRule {
        match self {
            ProductKind::TaxFree => TaxRule::TAX_FREE,
            ProductKind::Dairy => TaxRule::DAIRY,
            ProductKind::Other => TaxRule::STANDARD,
            ProductKind::Excise | ProductKind::BottleOfWine | ProductKind::FuelCanister => {
                TaxRule::EXCISE
            }
        }
    }

    pub fn is_excise(self) -> bool {
        self.tax_rule().has_excise()
    }
}

/// A priced, taxed item. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    kind: ProductKind,
    name: String,
    price: Decimal,
}

impl Product {
    /// Construct a product with a fresh identity token.
    ///
    /// Rejects a blank name. The price is taken as-is (zero is valid).
    pub fn new(kind: ProductKind, name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_argument("product name cannot be blank"));
        }

        Ok(Self {
            id: ProductId::generate(),
            kind,
            name,
            price,
        })
    }

    pub fn tax_free(name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        Self::new(ProductKind::TaxFree, name, price)
    }

    pub fn dairy(name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        Self::new(ProductKind::Dairy, name, price)
    }

    pub fn other(name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        Self::new(ProductKind::Other, name, price)
    }

    pub fn excise_goods(name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        Self::new(ProductKind::Excise, name, price)
    }

    pub fn bottle_of_wine(name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        Self::new(ProductKind::BottleOfWine, name, price)
    }

    pub fn fuel_canister(name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        Self::new(ProductKind::FuelCanister, name, price)
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw price; never includes tax or excise.
    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn tax_rule(&self) -> TaxRule {
        self.kind.tax_rule()
    }

    pub fn tax_percent(&self) -> Decimal {
        self.tax_rule().tax_percent
    }

    /// Fixed per-unit surcharge (zero for non-excise variants).
    pub fn excise(&self) -> Decimal {
        self.tax_rule().excise
    }

    pub fn is_excise(&self) -> bool {
        self.kind.is_excise()
    }

    /// Per-unit tax at the product's rate (excise excluded).
    pub fn tax_amount(&self) -> Decimal {
        self.tax_rule().tax_on(self.price)
    }

    /// Per-unit price including tax and any excise.
    pub fn price_with_tax(&self) -> Decimal {
        self.tax_rule().price_with_tax(self.price)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_is_raw_for_every_kind() {
        let wine = Product::bottle_of_wine("Resling", dec!(5)).unwrap();
        assert_eq!(wine.price(), dec!(5));
        assert!(wine.is_excise());
    }

    #[test]
    fn excise_variants_add_surcharge_after_tax() {
        let wine = Product::bottle_of_wine("Carlo Rossi", dec!(25)).unwrap();
        assert_eq!(wine.price_with_tax(), dec!(36.31));

        let fuel = Product::fuel_canister("Fuel", dec!(50)).unwrap();
        assert_eq!(fuel.price_with_tax(), dec!(67.06));

        let generic = Product::excise_goods("Cigars", dec!(50)).unwrap();
        assert_eq!(generic.price_with_tax(), dec!(67.06));
        assert_eq!(generic.excise(), dec!(5.56));
    }

    #[test]
    fn rates_per_kind() {
        let bread = Product::tax_free("Bread", dec!(5)).unwrap();
        let cheese = Product::dairy("Cheddar", dec!(10)).unwrap();
        let pin = Product::other("Pin", dec!(0.01)).unwrap();

        assert_eq!(bread.tax_percent(), dec!(0));
        assert_eq!(bread.price_with_tax(), dec!(5));
        assert_eq!(bread.excise(), Decimal::ZERO);

        assert_eq!(cheese.tax_percent(), dec!(0.08));
        assert_eq!(cheese.price_with_tax(), dec!(10.80));
        assert_eq!(cheese.tax_amount(), dec!(0.80));

        assert_eq!(pin.tax_percent(), dec!(0.23));
        assert_eq!(pin.price_with_tax(), dec!(0.0123));
        assert!(!pin.is_excise());
    }

    #[test]
    fn excise_constructor_and_accessor_coexist() {
        let cigars = Product::excise_goods("Cigars", dec!(10)).unwrap();
        assert_eq!(cigars.kind(), ProductKind::Excise);
        assert_eq!(cigars.excise(), dec!(5.56));
        assert_eq!(cigars.price_with_tax(), dec!(17.86));
    }

    #[test]
    fn zero_price_is_accepted() {
        let freebie = Product::other("Sticker", Decimal::ZERO).unwrap();
        assert_eq!(freebie.price_with_tax(), Decimal::ZERO);
    }

    #[test]
    fn blank_name_is_rejected() {
        for name in ["", "   "] {
            let err = Product::dairy(name, dec!(1)).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn identity_is_per_construction() {
        let a = Product::tax_free("Kubek", dec!(5)).unwrap();
        let b = Product::tax_free("Kubek", dec!(5)).unwrap();
        let a_again = a.clone();

        assert!(!a.same_identity_as(&b));
        assert_ne!(a, b);
        assert!(a.same_identity_as(&a_again));
    }

    #[test]
    fn identity_survives_serde_round_trip() {
        let wine = Product::bottle_of_wine("Wine", dec!(25)).unwrap();
        let json = serde_json::to_string(&wine).unwrap();
        assert!(json.contains("\"bottle_of_wine\""));

        let back: Product = serde_json::from_str(&json).unwrap();
        assert!(back.same_identity_as(&wine));
        assert_eq!(back.price_with_tax(), dec!(36.31));
    }

    #[test]
    fn displays_as_name() {
        let cheese = Product::dairy("Kozi Serek", dec!(10)).unwrap();
        assert_eq!(cheese.to_string(), "Kozi Serek");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_price() -> impl Strategy<Value = Decimal> {
            (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
        }

        fn arb_kind() -> impl Strategy<Value = ProductKind> {
            prop_oneof![
                Just(ProductKind::TaxFree),
                Just(ProductKind::Dairy),
                Just(ProductKind::Other),
                Just(ProductKind::Excise),
                Just(ProductKind::BottleOfWine),
                Just(ProductKind::FuelCanister),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: price with tax decomposes into price, tax and excise.
            #[test]
            fn price_with_tax_decomposes(kind in arb_kind(), price in arb_price()) {
                let product = Product::new(kind, "Item", price).unwrap();
                prop_assert_eq!(
                    product.price_with_tax(),
                    product.price() + product.tax_amount() + product.excise()
                );
                prop_assert!(product.price_with_tax() >= product.price());
            }
        }
    }
}
