//! Cooperative cancellation shared between a supervisor and the transfer loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot cancellation flag.
///
/// Clones share the same flag. Workers poll [`CancellationToken::is_cancelled`] before each
/// unit of work; signalling never blocks.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
  cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
  /// Create a token in the not-yet-signalled state.
  pub fn new() -> Self {
    Self::default()
  }

  /// Signal cancellation. Idempotent.
  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
  }

  /// Whether cancellation has been signalled.
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }
}
