use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use invoicer_core::ValueObject;

/// Standard VAT rate (23%).
pub const STANDARD_TAX_PERCENT: Decimal = dec!(0.23);

/// Reduced VAT rate for dairy (8%).
pub const DAIRY_TAX_PERCENT: Decimal = dec!(0.08);

/// Fixed per-unit excise surcharge.
pub const EXCISE: Decimal = dec!(5.56);

/// How a product is taxed: a rate applied to the price plus a fixed per-unit
/// surcharge added after tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    pub tax_percent: Decimal,
    pub excise: Decimal,
}

impl ValueObject for TaxRule {}

impl TaxRule {
    pub const TAX_FREE: TaxRule = TaxRule::new(Decimal::ZERO, Decimal::ZERO);
    pub const DAIRY: TaxRule = TaxRule::new(DAIRY_TAX_PERCENT, Decimal::ZERO);
    pub const STANDARD: TaxRule = TaxRule::new(STANDARD_TAX_PERCENT, Decimal::ZERO);
    pub const EXCISE: TaxRule = TaxRule::new(STANDARD_TAX_PERCENT, EXCISE);

    pub const fn new(tax_percent: Decimal, excise: Decimal) -> Self {
        Self {
            tax_percent,
            excise,
        }
    }

    /// Tax on one unit. The excise surcharge is not taxed and not included.
    pub fn tax_on(&self, price: Decimal) -> Decimal {
        price * self.tax_percent
    }

    /// `price + price * tax_percent + excise`, exact.
    pub fn price_with_tax(&self, price: Decimal) -> Decimal {
        price + self.tax_on(price) + self.excise
    }

    /// `tax_on`, or `None` if the result does not fit in a `Decimal`.
    pub fn checked_tax_on(&self, price: Decimal) -> Option<Decimal> {
        price.checked_mul(self.tax_percent)
    }

    /// `price_with_tax`, or `None` if the result does not fit in a `Decimal`.
    pub fn checked_price_with_tax(&self, price: Decimal) -> Option<Decimal> {
        price
            .checked_add(self.checked_tax_on(price)?)?
            .checked_add(self.excise)
    }

    pub fn has_excise(&self) -> bool {
        !self.excise.is_zero()
    }
}
