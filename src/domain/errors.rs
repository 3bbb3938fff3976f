// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the envspec crate.
//!
//! This module defines the errors raised while declaring specifications, composing
//! them, and resolving configuration instances. All errors use `thiserror` for proper
//! error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// A boxed error returned by user-supplied parsers, mappers, validators and derivations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for envspec operations.
///
/// Resolution errors (`MissingValue`, `TypeMismatch`, `TypeConversionError`,
/// `ValidationError`) abort the whole `build` call. Composition errors (`Clash`,
/// `NamespaceClash`) and `Declaration` errors are raised while the specification is
/// being put together, before any instance exists.
///
/// # Examples
///
/// ```
/// use envspec::domain::errors::ConfigError;
///
/// fn lookup() -> Result<String, ConfigError> {
///     Err(ConfigError::MissingValue {
///         name: "port".to_string(),
///         key: "MYAPP_PORT".to_string(),
///     })
/// }
///
/// assert!(lookup().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required variable is absent from the source and declares no default.
    #[error("Environment variable {key} is not set (declared as '{name}')")]
    MissingValue {
        /// The variable's declared (un-normalized) name
        name: String,
        /// The fully-qualified environment key that was looked up
        key: String,
    },

    /// A parser, mapper, derivation or declared default produced a value whose kind
    /// differs from the declared one.
    #[error("Type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The variable name, environment key or member name involved
        name: String,
        /// The declared kind
        expected: String,
        /// A description of what was produced instead
        found: String,
    },

    /// The raw string could not be converted to the declared kind.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: BoxError,
    },

    /// A validator rejected a resolved value.
    #[error("Invalid value for environment variable {key}: {source}")]
    ValidationError {
        /// The fully-qualified environment key
        key: String,
        /// The reason given by the validator
        source: BoxError,
    },

    /// Including a specification would overwrite existing members.
    #[error("Configuration clashes detected: {}", names.join(", "))]
    Clash {
        /// Every colliding member name, sorted
        names: Vec<String>,
    },

    /// Including a specification under a namespace that is already in use.
    #[error("Namespace already in use: {namespace}")]
    NamespaceClash {
        /// The namespace that was requested
        namespace: String,
    },

    /// A specification was declared inconsistently.
    #[error("Invalid declaration: {message}")]
    Declaration {
        /// What is wrong with the declaration
        message: String,
    },

    /// A configuration instance has no member with the requested name.
    #[error("Unknown configuration member: {name}")]
    UnknownMember {
        /// The requested member name
        name: String,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "int".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a Declaration error.
    pub fn declaration(message: impl Into<String>) -> Self {
        ConfigError::Declaration {
            message: message.into(),
        }
    }
}

/// A specialized Result type for envspec operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
