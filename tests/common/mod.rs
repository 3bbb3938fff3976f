// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helper utilities shared by the integration tests.

use envspec::adapters::MapSource;
use envspec::domain::{ConfigError, EnvKey, Result};
use envspec::ports::EnvSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber once per test binary.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    });
}

/// Builds an in-memory source from key/value pairs.
#[allow(dead_code)]
pub fn env(pairs: &[(&str, &str)]) -> MapSource {
    pairs.iter().copied().collect()
}

/// A source that fails every lookup.
#[allow(dead_code)]
pub struct FailingSource;

impl EnvSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn get(&self, _key: &EnvKey) -> Result<Option<String>> {
        Err(ConfigError::SourceError {
            source_name: "failing".to_string(),
            message: "Mock read failure".to_string(),
            source: None,
        })
    }
}

/// A source that records how many lookups it served.
#[allow(dead_code)]
pub struct CountingSource {
    inner: MapSource,
    lookups: AtomicUsize,
}

#[allow(dead_code)]
impl CountingSource {
    pub fn new(inner: MapSource) -> Self {
        CountingSource {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl EnvSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn get(&self, key: &EnvKey) -> Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }
}
