// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment source trait definition.
//!
//! This module defines the `EnvSource` trait, the port through which the resolution
//! engine reads raw strings. The process environment is the default source; tests and
//! embedding applications usually pass an in-memory map instead.

use crate::domain::{EnvKey, Result};
use std::collections::{BTreeMap, HashMap};

/// A read-only, string-keyed, string-valued lookup.
///
/// The resolution engine never mutates a source and queries it only with fully
/// normalized keys (see [`EnvKey`]).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that one source can serve builds running
/// on several threads.
///
/// # Examples
///
/// ```rust
/// use envspec::ports::EnvSource;
/// use envspec::domain::{EnvKey, Result};
///
/// struct Fixed;
///
/// impl EnvSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn get(&self, key: &EnvKey) -> Result<Option<String>> {
///         Ok((key.as_str() == "PORT").then(|| "8080".to_string()))
///     }
/// }
///
/// let source = Fixed;
/// assert_eq!(source.get_str("PORT").unwrap().as_deref(), Some("8080"));
/// assert_eq!(source.get_str("HOST").unwrap(), None);
/// ```
pub trait EnvSource: Send + Sync {
    /// Returns the name of this source, used in logs and error messages.
    fn name(&self) -> &str;

    /// Looks up the raw value stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The key is set
    /// * `Ok(None)` - The key is not set
    /// * `Err(ConfigError)` - The source could not be read
    fn get(&self, key: &EnvKey) -> Result<Option<String>>;

    /// Looks up a key given as a string slice.
    ///
    /// This is a convenience method equivalent to `get(&EnvKey::from(key))`.
    fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get(&EnvKey::from(key))
    }
}

impl EnvSource for HashMap<String, String> {
    fn name(&self) -> &str {
        "map"
    }

    fn get(&self, key: &EnvKey) -> Result<Option<String>> {
        Ok(HashMap::get(self, key.as_str()).cloned())
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn name(&self) -> &str {
        "map"
    }

    fn get(&self, key: &EnvKey) -> Result<Option<String>> {
        Ok(BTreeMap::get(self, key.as_str()).cloned())
    }
}
