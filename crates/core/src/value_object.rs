//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. Tax rules are the canonical example here: two rules with the
//! same rate and surcharge are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct TaxRule {
///     tax_percent: Decimal,
///     excise: Decimal,
/// }
///
/// impl ValueObject for TaxRule {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
