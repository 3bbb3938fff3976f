// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration instances.
//!
//! A [`Config`] is what a build produces: every member of its [`Spec`] bound to a
//! resolved value or, for nested specifications, to a nested `Config` it owns.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::spec::Spec;
use crate::domain::value::{FromValue, Value};
use crate::domain::variable::describe;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A bound member of a configuration instance.
#[derive(Clone, Debug)]
pub enum Field {
    /// A resolved or derived value.
    Value(Value),
    /// A nested instance.
    Section(Config),
}

/// A populated configuration instance.
///
/// # Examples
///
/// ```
/// use envspec::prelude::*;
/// use std::collections::HashMap;
///
/// let spec = Spec::builder()
///     .prefix("myapp")
///     .var("port", EnvVariable::new(ValueKind::Int, "port").default(3000))
///     .build()
///     .unwrap();
///
/// let mut env = HashMap::new();
/// env.insert("MYAPP_PORT".to_string(), "8080".to_string());
///
/// let config = spec.build(&env).unwrap();
/// assert_eq!(config.get_int("port").unwrap(), 8080);
/// assert_eq!(config.prefix(), "MYAPP_");
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    spec: Spec,
    prefix: String,
    fields: Vec<(String, Field)>,
}

impl Config {
    pub(crate) fn new(spec: Spec, prefix: String) -> Self {
        Config {
            spec,
            prefix,
            fields: Vec::new(),
        }
    }

    pub(crate) fn bind(&mut self, name: &str, field: Field) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name.to_string(), field)),
        }
    }

    /// The specification this instance was built from.
    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    /// The effective prefix, normalized and ending in `_` unless empty.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The bound member names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns true if a member with this name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Looks up a bound member.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    /// The value bound to `name`.
    pub fn value(&self, name: &str) -> Result<&Value> {
        match self.field(name) {
            Some(Field::Value(value)) => Ok(value),
            _ => Err(unknown(name)),
        }
    }

    /// The nested instance bound to `name`.
    pub fn section(&self, name: &str) -> Result<&Config> {
        match self.field(name) {
            Some(Field::Section(config)) => Ok(config),
            _ => Err(unknown(name)),
        }
    }

    /// The value bound to `name`, converted to `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use envspec::prelude::*;
    /// use std::collections::HashMap;
    ///
    /// let spec = Spec::builder()
    ///     .var("hosts", EnvVariable::new(ValueKind::sequence(ValueKind::Str), "hosts"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut env = HashMap::new();
    /// env.insert("HOSTS".to_string(), "a,b".to_string());
    ///
    /// let config = spec.build(&env).unwrap();
    /// let hosts: Vec<String> = config.get("hosts").unwrap();
    /// assert_eq!(hosts, vec!["a", "b"]);
    /// ```
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?;
        T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            found: describe(value),
        })
    }

    /// The boolean bound to `name`.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get(name)
    }

    /// The integer bound to `name`.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        self.get(name)
    }

    /// The float bound to `name`.
    pub fn get_float(&self, name: &str) -> Result<f64> {
        self.get(name)
    }

    /// The string bound to `name`.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        let value = self.value(name)?;
        value.as_str().ok_or_else(|| ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: "str".to_string(),
            found: describe(value),
        })
    }

    /// Overwrites or adds a value. The engine never revisits fields after a build.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.bind(name, Field::Value(value.into()));
    }
}

fn unknown(name: &str) -> ConfigError {
    ConfigError::UnknownMember {
        name: name.to_string(),
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Field::Value(value) => value.serialize(serializer),
            Field::Section(config) => config.serialize(serializer),
        }
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}
