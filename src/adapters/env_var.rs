// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! [`ProcessEnv`] reads the process environment on every lookup, so values set after
//! a build are seen by the next build.

use crate::domain::{ConfigError, EnvKey, Result};
use crate::ports::EnvSource;
use std::env;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Source backed by the process environment.
///
/// A variable that is set but is not valid UTF-8, or is longer than 1 MiB, is a
/// [`ConfigError::SourceError`]; only an unset variable reads as absent.
///
/// # Examples
///
/// ```rust
/// use envspec::adapters::ProcessEnv;
/// use envspec::ports::EnvSource;
///
/// let source = ProcessEnv::new();
/// assert_eq!(source.name(), "env");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Creates a process environment source.
    pub fn new() -> Self {
        ProcessEnv
    }

    fn unreadable(&self, key: &EnvKey, reason: String) -> ConfigError {
        ConfigError::SourceError {
            source_name: self.name().to_string(),
            message: format!("cannot read {}: {}", key, reason),
            source: None,
        }
    }
}

impl EnvSource for ProcessEnv {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &EnvKey) -> Result<Option<String>> {
        let Some(raw) = env::var_os(key.as_str()) else {
            return Ok(None);
        };
        match raw.into_string() {
            Ok(value) if value.len() <= MAX_ENV_VALUE_LEN => Ok(Some(value)),
            Ok(value) => {
                tracing::debug!(
                    key = %key,
                    value_len = value.len(),
                    max = MAX_ENV_VALUE_LEN,
                    "Rejecting oversized environment variable"
                );
                Err(self.unreadable(
                    key,
                    format!(
                        "value is {} bytes, larger than the {} byte limit",
                        value.len(),
                        MAX_ENV_VALUE_LEN
                    ),
                ))
            }
            Err(_) => {
                tracing::debug!(
                    key = %key,
                    "Rejecting environment variable that is not valid UTF-8"
                );
                Err(self.unreadable(key, "value is not valid UTF-8".to_string()))
            }
        }
    }
}
