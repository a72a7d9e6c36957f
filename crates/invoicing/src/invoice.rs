use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use invoicer_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use invoicer_products::{Product, ProductId};

use crate::sequence::InvoiceSequence;

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub AggregateId);

impl InvoiceId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One product and its accumulated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product: Product,
    pub quantity: u64,
}

impl InvoiceLine {
    fn units(&self) -> Decimal {
        Decimal::from(self.quantity)
    }

    /// `price × quantity`.
    pub fn net_amount(&self) -> Decimal {
        self.product.price() * self.units()
    }

    /// `price × tax_percent × quantity` (excise excluded).
    pub fn tax_amount(&self) -> Decimal {
        self.product.tax_amount() * self.units()
    }

    /// `price_with_tax × quantity` (excise included once per unit).
    pub fn amount(&self) -> Decimal {
        self.product.price_with_tax() * self.units()
    }
}

/// Command: AddProduct.
///
/// Loosely-typed entry point: the product may be absent and the quantity may be
/// omitted (meaning 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product: Option<Product>,
    pub quantity: Option<i64>,
}

impl AddProduct {
    pub fn one(product: &Product) -> Self {
        Self {
            product: Some(product.clone()),
            quantity: None,
        }
    }

    pub fn many(product: &Product, quantity: i64) -> Self {
        Self {
            product: Some(product.clone()),
            quantity: Some(quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceCommand {
    AddProduct(AddProduct),
}

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product: Product,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceEvent {
    ProductAdded(ProductAdded),
}

impl InvoiceEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InvoiceEvent::ProductAdded(_) => "invoicing.invoice.product_added",
        }
    }
}

/// Aggregate root: Invoice.
///
/// A growing accumulator of lines keyed by product identity, in insertion
/// order. Single owner: every mutation goes through `&mut self`.
#[derive(Debug, Clone)]
pub struct Invoice {
    id: InvoiceId,
    sequence: InvoiceSequence,
    issued_number: u64,
    lines: Vec<InvoiceLine>,
    number_of_products: u64,
    version: u64,
}

impl Invoice {
    /// Open an invoice numbered from the process-wide sequence.
    pub fn new() -> Self {
        Self::with_sequence(InvoiceSequence::global())
    }

    /// Open an invoice numbered from `sequence`.
    pub fn with_sequence(sequence: &InvoiceSequence) -> Self {
        let issued_number = sequence.next();
        let id = InvoiceId::new(AggregateId::new());
        debug!(invoice_id = %id, number = issued_number, "invoice opened");

        Self {
            id,
            sequence: sequence.clone(),
            issued_number,
            lines: Vec::new(),
            number_of_products: 0,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    /// Latest value of the sequence this invoice was numbered from.
    ///
    /// Opening another invoice on the same sequence changes what every
    /// existing invoice reports here. Use `issued_number` for the value
    /// assigned to this invoice.
    pub fn number(&self) -> u64 {
        self.sequence.current()
    }

    /// Number assigned when this invoice was opened.
    pub fn issued_number(&self) -> u64 {
        self.issued_number
    }

    /// Sum of all accepted quantities.
    pub fn number_of_products(&self) -> u64 {
        self.number_of_products
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn line_for(&self, product_id: ProductId) -> Option<&InvoiceLine> {
        self.lines
            .iter()
            .find(|line| line.product.id_typed() == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`.
    pub fn add_product(&mut self, product: &Product) -> DomainResult<()> {
        self.submit(InvoiceCommand::AddProduct(AddProduct::one(product)))
    }

    /// Add `quantity` units of `product`; `quantity` must be positive.
    pub fn add_products(&mut self, product: &Product, quantity: i64) -> DomainResult<()> {
        self.submit(InvoiceCommand::AddProduct(AddProduct::many(product, quantity)))
    }

    fn submit(&mut self, command: InvoiceCommand) -> DomainResult<()> {
        self.execute(&command)
            .map(|_| ())
            .inspect_err(|err| debug!(invoice_id = %self.id, error = %err, "add rejected"))
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::net_amount).sum()
    }

    pub fn tax(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::tax_amount).sum()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::amount).sum()
    }

    /// Header, one `"{name} {quantity} {amount}"` line per product, footer.
    pub fn print_list_of_products(&self) -> String {
        self.to_string()
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for Invoice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Number: {}", self.number())?;
        for line in &self.lines {
            writeln!(
                f,
                "{} {} {}",
                line.product.name(),
                line.quantity,
                line.amount()
            )?;
        }
        writeln!(f, "Amount of products: {}", self.number_of_products)
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Invoice {
    type Command = InvoiceCommand;
    type Event = InvoiceEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            // Lines are never empty; a zero-quantity event carries no change.
            InvoiceEvent::ProductAdded(e) if e.quantity == 0 => {}
            InvoiceEvent::ProductAdded(e) => {
                let product_id = e.product.id_typed();
                match self
                    .lines
                    .iter_mut()
                    .find(|line| line.product.id_typed() == product_id)
                {
                    Some(line) => line.quantity = line.quantity.saturating_add(e.quantity),
                    None => self.lines.push(InvoiceLine {
                        product: e.product.clone(),
                        quantity: e.quantity,
                    }),
                }
                self.number_of_products = self.number_of_products.saturating_add(e.quantity);
                debug!(
                    invoice_id = %self.id,
                    product = %e.product,
                    quantity = e.quantity,
                    "product added"
                );
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvoiceCommand::AddProduct(cmd) => self.handle_add_product(cmd),
        }
    }
}

/// Running sums, accumulated in line order exactly like `subtotal`, `tax`
/// and `total`.
#[derive(Default)]
struct CheckedTotals {
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl CheckedTotals {
    fn add_line(&mut self, product: &Product, quantity: u64) -> Option<()> {
        let rule = product.tax_rule();
        let units = Decimal::from(quantity);
        let net = product.price().checked_mul(units)?;
        let tax = rule.checked_tax_on(product.price())?.checked_mul(units)?;
        let gross = rule
            .checked_price_with_tax(product.price())?
            .checked_mul(units)?;

        self.subtotal = self.subtotal.checked_add(net)?;
        self.tax = self.tax.checked_add(tax)?;
        self.total = self.total.checked_add(gross)?;
        Some(())
    }
}

impl Invoice {
    /// Every amount the invoice reports must stay representable after the add.
    fn ensure_amounts_fit(&self, product: &Product, quantity: u64) -> DomainResult<()> {
        let overflow = || DomainError::invariant("invoice amount overflow");
        let product_id = product.id_typed();
        let mut totals = CheckedTotals::default();
        let mut merged = false;

        for line in &self.lines {
            let line_quantity = if line.product.id_typed() == product_id {
                merged = true;
                line.quantity + quantity
            } else {
                line.quantity
            };
            totals
                .add_line(&line.product, line_quantity)
                .ok_or_else(overflow)?;
        }
        if !merged {
            totals.add_line(product, quantity).ok_or_else(overflow)?;
        }
        Ok(())
    }

    fn handle_add_product(&self, cmd: &AddProduct) -> DomainResult<Vec<InvoiceEvent>> {
        let product = cmd
            .product
            .as_ref()
            .ok_or_else(|| DomainError::invalid_argument("product cannot be absent"))?;

        let quantity = cmd.quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "quantity must be positive (got {quantity})"
            )));
        }
        let quantity = quantity as u64;

        // Line quantities never exceed the running sum, so this bounds both.
        self.number_of_products
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invariant("number of products overflow"))?;
        self.ensure_amounts_fit(product, quantity)?;

        Ok(vec![InvoiceEvent::ProductAdded(ProductAdded {
            product: product.clone(),
            quantity,
        })])
    }
}
