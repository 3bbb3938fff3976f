// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deprecation sink trait definition.
//!
//! When a variable is resolved through one of its deprecated aliases, the engine emits
//! a [`DeprecationNotice`]. Notices are advisory: they never interrupt resolution. The
//! sink that receives them is passed into each build, so tests can capture notices
//! without touching any process-wide state.

use crate::domain::DeprecationNotice;

/// Receiver for deprecation notices.
///
/// Any `Fn(&DeprecationNotice) + Send + Sync` closure is a sink.
///
/// # Examples
///
/// ```rust
/// use envspec::domain::DeprecationNotice;
/// use envspec::ports::DeprecationSink;
///
/// struct Stderr;
///
/// impl DeprecationSink for Stderr {
///     fn notice(&self, notice: &DeprecationNotice) {
///         eprintln!("{}", notice);
///     }
/// }
///
/// let closure_sink = |notice: &DeprecationNotice| eprintln!("{}", notice);
/// fn takes_sink(_sink: &dyn DeprecationSink) {}
/// takes_sink(&Stderr);
/// takes_sink(&closure_sink);
/// ```
pub trait DeprecationSink: Send + Sync {
    /// Handles one notice. Implementations must not block for long.
    fn notice(&self, notice: &DeprecationNotice);
}

impl<F> DeprecationSink for F
where
    F: Fn(&DeprecationNotice) + Send + Sync,
{
    fn notice(&self, notice: &DeprecationNotice) {
        self(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_sink() {
        let count = AtomicUsize::new(0);
        let sink = |_: &DeprecationNotice| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        let notice = DeprecationNotice::new("OLD_FOO", "FOO", None, None);
        sink.notice(&notice);
        sink.notice(&notice);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn DeprecationSink>>();
    }
}
