// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deprecation sink adapters.

use crate::domain::DeprecationNotice;
use crate::ports::DeprecationSink;
use std::sync::Mutex;

/// Reports notices as `tracing` warnings. This is the sink used by [`Spec::build`].
///
/// [`Spec::build`]: crate::domain::Spec::build
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DeprecationSink for TracingSink {
    fn notice(&self, notice: &DeprecationNotice) {
        tracing::warn!(
            alias = %notice.alias,
            replacement = %notice.replacement,
            "{}",
            notice
        );
    }
}

/// Records every notice it receives.
///
/// # Examples
///
/// ```rust
/// use envspec::adapters::CollectingSink;
/// use envspec::domain::DeprecationNotice;
/// use envspec::ports::DeprecationSink;
///
/// let sink = CollectingSink::new();
/// sink.notice(&DeprecationNotice::new("OLD", "NEW", None, None));
/// assert_eq!(sink.messages(), vec!["OLD has been deprecated. Use NEW instead"]);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    notices: Mutex<Vec<DeprecationNotice>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The notices received so far, oldest first.
    pub fn notices(&self) -> Vec<DeprecationNotice> {
        match self.notices.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The rendered messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.notices().iter().map(ToString::to_string).collect()
    }
}

impl DeprecationSink for CollectingSink {
    fn notice(&self, notice: &DeprecationNotice) {
        let mut guard = match self.notices.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(notice.clone());
    }
}
