//! Invoice number sequence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared counter that hands out invoice numbers.
///
/// Clones share the same counter. Invoices keep a handle to the sequence they
/// were numbered from, so `Invoice::number` always reflects the latest value.
#[derive(Debug, Clone, Default)]
pub struct InvoiceSequence {
    counter: Arc<AtomicU64>,
}

impl InvoiceSequence {
    /// A fresh sequence; the first `next()` returns 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence whose next number is `last + 1`.
    pub fn starting_at(last: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(last)),
        }
    }

    /// The process-wide default sequence.
    pub fn global() -> &'static InvoiceSequence {
        static GLOBAL: OnceLock<InvoiceSequence> = OnceLock::new();
        GLOBAL.get_or_init(InvoiceSequence::new)
    }

    /// Advance and return the new value.
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest value handed out (0 before the first `next()`).
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Whether both handles draw from the same counter.
    pub fn shares_counter_with(&self, other: &InvoiceSequence) -> bool {
        Arc::ptr_eq(&self.counter, &other.counter)
    }
}
