//! Decode options and cooperative cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default bound on node nesting
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Shared flag that stops a running decode at the next node record.
///
/// Clones share the same flag, so one clone can be handed to another
/// thread while the decode holds the other.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a flag that is not set
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Options controlling how a container is decoded
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Maximum nesting of intermediate nodes
    pub max_depth: usize,
    /// Reject leaves whose two size fields disagree
    pub strict_sizes: bool,
    /// Checked once per node record
    pub cancel: Option<CancelFlag>,
}

impl DecodeOptions {
    /// Default options: depth bounded by [`DEFAULT_MAX_DEPTH`], strict sizes
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_sizes: true,
            cancel: None,
        }
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Accept leaves with mismatched size fields, trusting the allocated size
    pub fn with_strict_sizes(mut self, strict: bool) -> Self {
        self.strict_sizes = strict;
        self
    }

    /// Attach a cancellation flag
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.strict_sizes);
        assert!(!options.is_cancelled());
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let options = DecodeOptions::new().with_cancel(flag.clone());
        assert!(!options.is_cancelled());

        let handle = std::thread::spawn(move || flag.cancel());
        handle.join().expect("cancel thread should finish");
        assert!(options.is_cancelled());
    }
}
