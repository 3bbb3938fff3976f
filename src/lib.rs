// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative, typed configuration from environment variables.
//!
//! A [`Spec`](domain::Spec) declares the variables an application reads, their kinds,
//! defaults, deprecated aliases and validators, plus members derived from them and
//! nested specifications under their own namespace prefixes. Building a spec against
//! a source produces a [`Config`](domain::Config) instance in one pass, with no
//! reloading afterwards.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Declarations, values, coercion and errors (`Spec`, `EnvVariable`,
//!   `Value`, `ConfigError`)
//! - **Ports**: Trait definitions for the outside world (`EnvSource`, `DeprecationSink`)
//! - **Adapters**: The process environment, in-memory maps, tracing and collecting sinks
//! - **Service**: The two-phase resolution engine and the help introspector
//!
//! # Features
//!
//! - **Namespacing**: Prefixes nest, so `db.host` inside `myapp` reads `MYAPP_DB_HOST`
//! - **Type Safety**: Values are checked against their declared kind
//! - **Derived Values**: Members computed from the resolved instance
//! - **Deprecations**: Old names are still read, with a notice to a pluggable sink
//! - **Composition**: `include` merges one spec into another
//! - **Introspection**: Help rows for documentation generators
//!
//! # Feature Flags
//!
//! - `env`: Enable the process environment source and `Spec::from_env` (default)
//!
//! # Quick Start
//!
//! ```rust
//! use envspec::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let spec = Spec::builder()
//!     .prefix("myapp")
//!     .var("debug", EnvVariable::new(ValueKind::Bool, "debug").default(false))
//!     .var(
//!         "port",
//!         EnvVariable::new(ValueKind::Int, "port")
//!             .default(3000)
//!             .validator(validators::range(1, 65535)),
//!     )
//!     .section("db", |db| {
//!         db.var("url", EnvVariable::new(ValueKind::Str, "url").deprecated("uri"))
//!     })
//!     .derived(
//!         "verbose_port",
//!         DerivedVariable::new(ValueKind::Bool, |c| {
//!             Ok(Value::Bool(c.get_bool("debug")? && c.get_int("port")? != 3000))
//!         }),
//!     )
//!     .build()?;
//!
//! let source = MapSource::new()
//!     .with("MYAPP_DEBUG", "yes")
//!     .with("MYAPP_PORT", "8080")
//!     .with("MYAPP_DB_URL", "postgres://localhost/app");
//!
//! let config = spec.build(&source)?;
//! assert!(config.get_bool("debug")?);
//! assert_eq!(config.get_int("port")?, 8080);
//! assert_eq!(config.section("db")?.get_str("url")?, "postgres://localhost/app");
//! assert!(config.get_bool("verbose_port")?);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::validators;
    pub use crate::domain::{
        Config, ConfigError, CustomKind, Deprecation, DeprecationNotice, DerivedVariable,
        EnvVariable, Result, Spec, SpecBuilder, Value, ValueKind,
    };
    pub use crate::ports::{DeprecationSink, EnvSource};
    pub use crate::service::HelpRow;

    pub use crate::adapters::{CollectingSink, MapSource, TracingSink};
    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::ProcessEnv;
}
