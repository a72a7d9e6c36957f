//! Invoicing domain module.
//!
//! An invoice accumulates product lines and derives subtotal, tax and total
//! from them. Pure domain logic (no IO, no storage); numbering comes from an
//! injected [`InvoiceSequence`].

pub mod invoice;
pub mod sequence;

pub use invoice::{
    AddProduct, Invoice, InvoiceCommand, InvoiceEvent, InvoiceId, InvoiceLine, ProductAdded,
};
pub use sequence::InvoiceSequence;
