// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory source adapter.
//!
//! [`MapSource`] serves a fixed set of values. Tests and embedding applications pass it
//! instead of the process environment.

use crate::domain::{EnvKey, Result};
use crate::ports::EnvSource;
use std::collections::HashMap;

/// Source backed by an in-memory map.
///
/// # Examples
///
/// ```rust
/// use envspec::adapters::MapSource;
/// use envspec::ports::EnvSource;
///
/// let source = MapSource::new()
///     .with("MYAPP_PORT", "8080")
///     .with("MYAPP_DEBUG", "yes");
///
/// assert_eq!(source.get_str("MYAPP_PORT").unwrap().as_deref(), Some("8080"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source with pre-populated values.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        MapSource { values }
    }

    /// Adds a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapSource {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    fn get(&self, key: &EnvKey) -> Result<Option<String>> {
        Ok(self.values.get(key.as_str()).cloned())
    }
}
