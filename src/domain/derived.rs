// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived descriptors: members computed from an already-resolved instance.

use crate::domain::config::Config;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::value::{Value, ValueKind};
use crate::domain::variable::describe;
use std::fmt;
use std::sync::Arc;

/// Computes a value from the instance populated so far.
pub type DeriveFn = Arc<dyn Fn(&Config) -> Result<Value> + Send + Sync>;

/// A member whose value is a function of other members.
///
/// Derived members run after every variable and nested specification of their
/// specification has resolved, in declaration order. A derivation may read any
/// derived member declared before it, never one declared after it.
///
/// # Examples
///
/// ```
/// use envspec::domain::{DerivedVariable, Value, ValueKind};
///
/// let double = DerivedVariable::new(ValueKind::Int, |config| {
///     Ok(Value::Int(config.get_int("port")? * 2))
/// });
/// assert_eq!(double.kind(), &ValueKind::Int);
/// ```
#[derive(Clone)]
pub struct DerivedVariable {
    kind: ValueKind,
    derivation: DeriveFn,
}

impl DerivedVariable {
    /// Declares a derived member of `kind`.
    pub fn new<F>(kind: ValueKind, derivation: F) -> Self
    where
        F: Fn(&Config) -> Result<Value> + Send + Sync + 'static,
    {
        DerivedVariable {
            kind,
            derivation: Arc::new(derivation),
        }
    }

    /// The declared kind.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Runs the derivation against `config` and checks the result's kind.
    pub fn resolve(&self, name: &str, config: &Config) -> Result<Value> {
        let value = (self.derivation)(config)?;
        if !self.kind.accepts(&value) {
            return Err(ConfigError::TypeMismatch {
                name: name.to_string(),
                expected: self.kind.to_string(),
                found: describe(&value),
            });
        }
        Ok(value)
    }
}

impl fmt::Debug for DerivedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedVariable")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
