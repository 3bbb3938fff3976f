// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variable descriptors.
//!
//! An [`EnvVariable`] binds a member of a specification to one environment key. It
//! declares the kind of the resolved value and, optionally, a custom parser, a
//! collection mapper, a default, deprecated aliases, a validator and help metadata.

use crate::domain::coerce::{coerce, ItemMapFn, Mapper, PairMapFn};
use crate::domain::env_key::EnvKey;
use crate::domain::errors::{BoxError, ConfigError, Result};
use crate::domain::value::{Value, ValueKind};
use crate::ports::{DeprecationSink, EnvSource};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Turns a raw string into a value, replacing built-in coercion.
pub type ParseFn = Arc<dyn Fn(&str) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Checks a resolved value. The error becomes the reason of a `ValidationError`.
pub type ValidateFn = Arc<dyn Fn(&Value) -> std::result::Result<(), BoxError> + Send + Sync>;

/// An older name a variable may still be read from.
///
/// # Examples
///
/// ```
/// use envspec::domain::Deprecation;
///
/// let alias = Deprecation::new("old.foo").since("0.1").removed_in("1.0");
/// assert_eq!(alias.name(), "old.foo");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deprecation {
    name: String,
    deprecated_in: Option<String>,
    removed_in: Option<String>,
}

impl Deprecation {
    /// Declares an alias with no version information.
    pub fn new(name: impl Into<String>) -> Self {
        Deprecation {
            name: name.into(),
            deprecated_in: None,
            removed_in: None,
        }
    }

    /// Records the version in which the alias was deprecated.
    pub fn since(mut self, version: impl Into<String>) -> Self {
        self.deprecated_in = Some(version.into());
        self
    }

    /// Records the version in which the alias will be removed.
    pub fn removed_in(mut self, version: impl Into<String>) -> Self {
        self.removed_in = Some(version.into());
        self
    }

    /// The alias name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version the alias was deprecated in, if known.
    pub fn deprecated_in(&self) -> Option<&str> {
        self.deprecated_in.as_deref()
    }

    /// The version the alias will be removed in, if known.
    pub fn removed_in_version(&self) -> Option<&str> {
        self.removed_in.as_deref()
    }
}

/// Emitted when a variable was read through a deprecated alias.
///
/// # Examples
///
/// ```
/// use envspec::domain::DeprecationNotice;
///
/// let notice = DeprecationNotice::new("OLD_FOO", "FOO", Some("0.1"), Some("1.0"));
/// assert_eq!(
///     notice.to_string(),
///     "OLD_FOO has been deprecated in version 0.1 and will be removed in version 1.0. Use FOO instead"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeprecationNotice {
    /// The full environment key of the alias that was found
    pub alias: String,
    /// The full environment key that should be used instead
    pub replacement: String,
    /// The version the alias was deprecated in
    pub deprecated_in: Option<String>,
    /// The version the alias will be removed in
    pub removed_in: Option<String>,
}

impl DeprecationNotice {
    /// Creates a notice.
    pub fn new(
        alias: impl Into<String>,
        replacement: impl Into<String>,
        deprecated_in: Option<&str>,
        removed_in: Option<&str>,
    ) -> Self {
        DeprecationNotice {
            alias: alias.into(),
            replacement: replacement.into(),
            deprecated_in: deprecated_in.map(str::to_string),
            removed_in: removed_in.map(str::to_string),
        }
    }
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has been deprecated", self.alias)?;
        if let Some(version) = &self.deprecated_in {
            write!(f, " in version {}", version)?;
        }
        if let Some(version) = &self.removed_in {
            write!(f, " and will be removed in version {}", version)?;
        }
        write!(f, ". Use {} instead", self.replacement)
    }
}

/// A variable bound to an environment key.
///
/// # Examples
///
/// ```
/// use envspec::domain::{EnvVariable, ValueKind};
///
/// let port = EnvVariable::new(ValueKind::Int, "port")
///     .default(3000)
///     .help("The port of the service");
/// assert_eq!(port.name(), "port");
/// ```
#[derive(Clone)]
pub struct EnvVariable {
    kind: ValueKind,
    name: String,
    parser: Option<ParseFn>,
    mapper: Option<Mapper>,
    default: Option<Value>,
    deprecations: Vec<Deprecation>,
    validator: Option<ValidateFn>,
    help: Option<String>,
    help_type: Option<String>,
}

impl EnvVariable {
    /// Declares a variable of `kind` read from `name` (dotted or lower-case allowed).
    pub fn new(kind: ValueKind, name: impl Into<String>) -> Self {
        EnvVariable {
            kind,
            name: name.into(),
            parser: None,
            mapper: None,
            default: None,
            deprecations: Vec::new(),
            validator: None,
            help: None,
            help_type: None,
        }
    }

    /// Replaces built-in coercion with a custom parser.
    ///
    /// The parser's result must be exactly of the declared kind.
    pub fn parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Maps each element of a sequence or set kind.
    pub fn map<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        let mapper: ItemMapFn = Arc::new(mapper);
        self.mapper = Some(Mapper::Item(mapper));
        self
    }

    /// Maps each `key:value` pair of a mapping kind.
    pub fn map_pairs<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str, &str) -> std::result::Result<(Value, Value), BoxError>
            + Send
            + Sync
            + 'static,
    {
        let mapper: PairMapFn = Arc::new(mapper);
        self.mapper = Some(Mapper::Pair(mapper));
        self
    }

    /// Declares the value used when the key is not set.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Adds a deprecated alias without version information.
    pub fn deprecated(self, alias: impl Into<String>) -> Self {
        self.deprecation(Deprecation::new(alias))
    }

    /// Adds a deprecated alias. Aliases are consulted in the order they were added.
    pub fn deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecations.push(deprecation);
        self
    }

    /// Declares a validator, run on every value read from the source.
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the help text shown by the introspector.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Overrides the type label shown by the introspector.
    pub fn help_type(mut self, label: impl Into<String>) -> Self {
        self.help_type = Some(label.into());
        self
    }

    /// The declared kind.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// The declared (un-normalized) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The deprecated aliases in declaration order.
    pub fn deprecations(&self) -> &[Deprecation] {
        &self.deprecations
    }

    /// The help text, if any.
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The help type label, if any.
    pub fn help_type_label(&self) -> Option<&str> {
        self.help_type.as_deref()
    }

    /// Checks the declaration itself: the default must be of the declared kind, and a
    /// mapper must fit the collection kind it is attached to.
    pub fn check(&self) -> Result<()> {
        if let Some(default) = &self.default {
            if !self.kind.accepts(default) {
                return Err(ConfigError::TypeMismatch {
                    name: self.name.clone(),
                    expected: self.kind.to_string(),
                    found: describe(default),
                });
            }
        }

        match (&self.mapper, self.kind.unwrapped()) {
            (None, _) => Ok(()),
            (Some(Mapper::Item(_)), ValueKind::Sequence(_) | ValueKind::Set(_)) => Ok(()),
            (Some(Mapper::Pair(_)), ValueKind::Mapping(_, _)) => Ok(()),
            (Some(Mapper::Item(_)), kind) => Err(ConfigError::declaration(format!(
                "variable '{}': an item mapper needs a sequence or set kind, not {}",
                self.name, kind
            ))),
            (Some(Mapper::Pair(_)), kind) => Err(ConfigError::declaration(format!(
                "variable '{}': a pair mapper needs a mapping kind, not {}",
                self.name, kind
            ))),
        }
    }

    /// The fully-qualified key under `prefix`.
    pub fn key(&self, prefix: &str) -> EnvKey {
        EnvKey::join(prefix, &self.name)
    }

    /// Resolves the variable against `source` under the effective `prefix`.
    ///
    /// Lookup order is the canonical key, then each deprecated alias in declaration
    /// order (the first one found wins and produces a notice), then the default.
    /// Defaults are returned as declared, without parsing or validation.
    pub fn resolve(
        &self,
        source: &dyn EnvSource,
        prefix: &str,
        truthy: &BTreeSet<String>,
        sink: &dyn DeprecationSink,
    ) -> Result<Value> {
        let key = self.key(prefix);
        let mut raw = source.get(&key)?;

        if raw.is_none() {
            for deprecation in &self.deprecations {
                let alias_key = EnvKey::join(prefix, deprecation.name());
                if let Some(value) = source.get(&alias_key)? {
                    sink.notice(&DeprecationNotice::new(
                        alias_key.as_str(),
                        key.as_str(),
                        deprecation.deprecated_in(),
                        deprecation.removed_in_version(),
                    ));
                    raw = Some(value);
                    break;
                }
            }
        }

        let raw = match raw {
            Some(raw) => raw,
            None => {
                return match &self.default {
                    Some(default) => {
                        tracing::trace!(key = %key, "Using declared default");
                        Ok(default.clone())
                    }
                    None => Err(ConfigError::MissingValue {
                        name: self.name.clone(),
                        key: key.into_string(),
                    }),
                };
            }
        };

        let value = match &self.parser {
            Some(parser) => parser(&raw).map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: self.kind.to_string(),
                source: e,
            })?,
            None => coerce(&self.kind, &raw, &key, self.mapper.as_ref(), truthy)?,
        };

        if !self.kind.accepts(&value) {
            return Err(ConfigError::TypeMismatch {
                name: key.into_string(),
                expected: self.kind.to_string(),
                found: describe(&value),
            });
        }

        if let Some(validator) = &self.validator {
            validator(&value).map_err(|e| ConfigError::ValidationError {
                key: key.to_string(),
                source: e,
            })?;
        }

        tracing::trace!(key = %key, "Resolved variable from source");
        Ok(value)
    }
}

impl fmt::Debug for EnvVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVariable")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("default", &self.default)
            .field("deprecations", &self.deprecations)
            .field("has_parser", &self.parser.is_some())
            .field("mapper", &self.mapper)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

pub(crate) fn describe(value: &Value) -> String {
    format!("{} `{}`", value.type_name(), value)
}
