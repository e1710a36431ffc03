//! Cooperative cancellation for abandoned requests.
//!
//! The core has no mid-flight interrupt for a blocking provider call; instead
//! the orchestrator checks the token at every provider-call boundary and the
//! structuring loops check it per line, so an abandoned request stops at the
//! next suspension point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation handle shared between the caller and the pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
