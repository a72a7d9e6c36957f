//! Products domain module.
//!
//! Priced items and the tax rules attached to them, implemented purely as
//! deterministic domain logic (no IO, no storage). All amounts are exact
//! decimals.

pub mod product;
pub mod tax;

pub use product::{Product, ProductId, ProductKind};
pub use tax::{DAIRY_TAX_PERCENT, EXCISE, STANDARD_TAX_PERCENT, TaxRule};
