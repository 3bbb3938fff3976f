// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and resolution logic.
//!
//! This module holds the declaration model (variables, derived members,
//! specifications), the value model, built-in coercion and the configuration instance.
//! It is independent of where raw strings come from and where deprecation notices go;
//! those concerns are reached through the [`ports`](crate::ports) traits.

pub mod coerce;
pub mod config;
pub mod derived;
pub mod env_key;
pub mod errors;
pub mod spec;
pub mod validators;
pub mod value;
pub mod variable;

// Re-export commonly used types
pub use config::{Config, Field};
pub use derived::DerivedVariable;
pub use env_key::EnvKey;
pub use errors::{BoxError, ConfigError, Result};
pub use spec::{Member, Spec, SpecBuilder};
pub use value::{CustomKind, FromValue, Value, ValueKind};
pub use variable::{Deprecation, DeprecationNotice, EnvVariable};
