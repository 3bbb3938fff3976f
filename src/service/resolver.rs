// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resolution engine.
//!
//! A build walks a [`Spec`] twice. The first pass resolves variables and builds nested
//! specifications, in declaration order. The second pass runs derived members, again
//! in declaration order, against the instance populated so far. Nested specifications
//! finish both of their passes before the parent's second pass starts.

use crate::adapters::TracingSink;
use crate::domain::env_key::combine;
use crate::domain::{Config, Field, Member, Result, Spec};
use crate::ports::{DeprecationSink, EnvSource};

/// Builds configuration instances from a source.
///
/// # Examples
///
/// ```rust
/// use envspec::prelude::*;
/// use envspec::service::Resolver;
///
/// let spec = Spec::builder()
///     .prefix("app")
///     .var("name", EnvVariable::new(ValueKind::Str, "name"))
///     .build()
///     .unwrap();
///
/// let source = MapSource::new().with("APP_NAME", "demo");
/// let sink = CollectingSink::new();
/// let config = Resolver::new(&source, &sink).build(&spec, "").unwrap();
/// assert_eq!(config.get_str("name").unwrap(), "demo");
/// ```
pub struct Resolver<'a> {
    source: &'a dyn EnvSource,
    sink: &'a dyn DeprecationSink,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver reading from `source` and reporting deprecations to `sink`.
    pub fn new(source: &'a dyn EnvSource, sink: &'a dyn DeprecationSink) -> Self {
        Resolver { source, sink }
    }

    /// Builds an instance of `spec` nested under `parent_prefix` (empty at the root).
    ///
    /// The first failure aborts the build.
    pub fn build(&self, spec: &Spec, parent_prefix: &str) -> Result<Config> {
        let prefix = combine(parent_prefix, spec.prefix());
        tracing::debug!(
            source = self.source.name(),
            prefix = %prefix,
            "Building configuration"
        );

        let mut config = Config::new(spec.clone(), prefix.clone());
        let mut derived = Vec::new();

        for (name, member) in spec.members() {
            match member {
                Member::Variable(variable) => {
                    let value =
                        variable.resolve(self.source, &prefix, spec.truthy(), self.sink)?;
                    tracing::trace!(member = name, "Bound variable");
                    config.bind(name, Field::Value(value));
                }
                Member::Nested(nested) => {
                    let section = self.build(nested, &prefix)?;
                    config.bind(name, Field::Section(section));
                }
                Member::Derived(derivation) => derived.push((name, derivation)),
            }
        }

        for (name, derivation) in derived {
            let value = derivation.resolve(name, &config)?;
            tracing::trace!(member = name, "Bound derived member");
            config.bind(name, Field::Value(value));
        }

        tracing::debug!(
            prefix = %prefix,
            members = config.keys().count(),
            "Configuration built"
        );
        Ok(config)
    }
}

impl Spec {
    /// Builds an instance from `source`, reporting deprecations as `tracing` warnings.
    pub fn build(&self, source: &dyn EnvSource) -> Result<Config> {
        self.build_with(source, &TracingSink)
    }

    /// Builds an instance from `source`, reporting deprecations to `sink`.
    pub fn build_with(
        &self,
        source: &dyn EnvSource,
        sink: &dyn DeprecationSink,
    ) -> Result<Config> {
        Resolver::new(source, sink).build(self, "")
    }

    /// Builds an instance from the process environment.
    #[cfg(feature = "env")]
    pub fn from_env(&self) -> Result<Config> {
        self.build(&crate::adapters::ProcessEnv)
    }
}
