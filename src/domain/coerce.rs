// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in coercion of raw strings into typed values.
//!
//! Collections are written as comma-separated lists (`1,2,3`); mappings as
//! comma-separated `key:value` pairs (`a:1,b:2`), each split on the first `:`.
//! Booleans are true when the lower-cased raw string belongs to the truthy set and
//! false otherwise, so a boolean never fails to coerce. Numbers ignore surrounding
//! whitespace.

use crate::domain::env_key::EnvKey;
use crate::domain::errors::{BoxError, ConfigError, Result};
use crate::domain::value::{Value, ValueKind};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Maps one collection element to a value.
pub type ItemMapFn = Arc<dyn Fn(&str) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Maps one `key:value` pair to a key and a value.
pub type PairMapFn =
    Arc<dyn Fn(&str, &str) -> std::result::Result<(Value, Value), BoxError> + Send + Sync>;

/// Per-element conversion for collection kinds.
#[derive(Clone)]
pub enum Mapper {
    /// Applied to each element of a sequence or set.
    Item(ItemMapFn),
    /// Applied to each pair of a mapping.
    Pair(PairMapFn),
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mapper::Item(_) => f.write_str("Mapper::Item(..)"),
            Mapper::Pair(_) => f.write_str("Mapper::Pair(..)"),
        }
    }
}

/// The strings that coerce to `true` unless a specification overrides them.
pub static DEFAULT_TRUTHY: Lazy<BTreeSet<String>> = Lazy::new(|| {
    ["1", "true", "yes", "on"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

/// Coerces `raw` into a value of `kind`.
///
/// `key` is only used for error reporting. The result is not checked against `kind`;
/// mapper output in particular may disagree with it and is checked by the caller.
///
/// # Examples
///
/// ```
/// use envspec::domain::coerce::{coerce, DEFAULT_TRUTHY};
/// use envspec::domain::{EnvKey, Value, ValueKind};
///
/// let key = EnvKey::from("FOO");
/// let kind = ValueKind::sequence(ValueKind::Int);
/// let value = coerce(&kind, "1,2,3", &key, None, &DEFAULT_TRUTHY).unwrap();
/// assert_eq!(value, Value::from(vec![1, 2, 3]));
/// ```
pub fn coerce(
    kind: &ValueKind,
    raw: &str,
    key: &EnvKey,
    mapper: Option<&Mapper>,
    truthy: &BTreeSet<String>,
) -> Result<Value> {
    match kind {
        ValueKind::Bool => Ok(Value::Bool(truthy.contains(&raw.to_lowercase()))),
        ValueKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
        ValueKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e)),
        ValueKind::Str => Ok(Value::Str(raw.to_string())),
        ValueKind::Optional(inner) => coerce(inner, raw, key, mapper, truthy),
        ValueKind::Sequence(inner) => {
            let items = split_items(inner, raw, key, mapper, truthy)?;
            Ok(Value::List(items))
        }
        ValueKind::Set(inner) => {
            let items = split_items(inner, raw, key, mapper, truthy)?;
            Ok(Value::Set(items.into_iter().collect()))
        }
        ValueKind::Mapping(k, v) => {
            let mut entries = BTreeMap::new();
            for pair in raw.split(',') {
                let (raw_key, raw_value) =
                    pair.split_once(':')
                        .ok_or_else(|| ConfigError::TypeConversionError {
                            key: key.to_string(),
                            target_type: kind.to_string(),
                            source: format!("expected 'key:value', found '{}'", pair).into(),
                        })?;
                let (entry_key, entry_value) = match mapper {
                    Some(Mapper::Pair(map)) => {
                        map(raw_key, raw_value).map_err(|e| conversion_error(kind, key, e))?
                    }
                    _ => (
                        coerce(k, raw_key, key, None, truthy)?,
                        coerce(v, raw_value, key, None, truthy)?,
                    ),
                };
                entries.insert(entry_key, entry_value);
            }
            Ok(Value::Map(entries))
        }
        ValueKind::Custom(custom) => match custom.parse_fn() {
            Some(parse) => parse(raw).map_err(|e| conversion_error(kind, key, e)),
            None => Err(ConfigError::TypeMismatch {
                name: key.to_string(),
                expected: kind.to_string(),
                found: "a raw string with no built-in constructor (declare a parser)"
                    .to_string(),
            }),
        },
    }
}

fn split_items(
    inner: &ValueKind,
    raw: &str,
    key: &EnvKey,
    mapper: Option<&Mapper>,
    truthy: &BTreeSet<String>,
) -> Result<Vec<Value>> {
    raw.split(',')
        .map(|item| match mapper {
            Some(Mapper::Item(map)) => map(item).map_err(|e| conversion_error(inner, key, e)),
            _ => coerce(inner, item, key, None, truthy),
        })
        .collect()
}

fn conversion_error(kind: &ValueKind, key: &EnvKey, source: BoxError) -> ConfigError {
    ConfigError::TypeConversionError {
        key: key.to_string(),
        target_type: kind.to_string(),
        source,
    }
}
