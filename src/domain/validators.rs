// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ready-made validators for [`EnvVariable::validator`](crate::domain::EnvVariable::validator).

use crate::domain::errors::BoxError;
use crate::domain::value::Value;
use std::cmp::Ordering;

/// Accepts only one of `values`.
///
/// # Examples
///
/// ```
/// use envspec::domain::{validators, EnvVariable, ValueKind};
///
/// let level = EnvVariable::new(ValueKind::Str, "log.level")
///     .validator(validators::choice(["debug", "info", "warn"]));
/// ```
pub fn choice<I, T>(values: I) -> impl Fn(&Value) -> Result<(), BoxError> + Send + Sync + 'static
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    let allowed: Vec<Value> = values.into_iter().map(Into::into).collect();
    move |value: &Value| {
        if allowed.contains(value) {
            return Ok(());
        }
        let listed = allowed
            .iter()
            .map(quoted)
            .collect::<Vec<_>>()
            .join(", ");
        Err(format!("value must be one of [{}]", listed).into())
    }
}

/// Accepts a value within `[lower, upper]`, bounds included.
///
/// An `Int` meets a `Float` numerically, so `range(0, 100)` also bounds a float
/// variable. Any other pair is compared with the total order of [`Value`].
///
/// # Examples
///
/// ```
/// use envspec::domain::{validators, Value};
///
/// let check = validators::range(0, 100);
/// assert!(check(&Value::Float(50.0)).is_ok());
/// assert!(check(&Value::Float(100.5)).is_err());
/// ```
pub fn range(
    lower: impl Into<Value>,
    upper: impl Into<Value>,
) -> impl Fn(&Value) -> Result<(), BoxError> + Send + Sync + 'static {
    let lower = lower.into();
    let upper = upper.into();
    move |value: &Value| {
        if numeric_cmp(&lower, value).is_le() && numeric_cmp(value, &upper).is_le() {
            Ok(())
        } else {
            Err(format!("value must be in range [{}, {}]", lower, upper).into())
        }
    }
}

fn numeric_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) => (*x as f64).total_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.total_cmp(&(*y as f64)),
        _ => a.cmp(b),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
