// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed configuration values and their declared kinds.
//!
//! This module provides [`Value`], the resolved form of every configuration member,
//! and [`ValueKind`], the closed set of kinds a member can be declared with. Kind
//! checks are exact: an `Int` never satisfies a `Float` declaration, a `Bool` never
//! satisfies an `Int` one, and a custom value only satisfies the custom kind with the
//! very same Rust type.

use crate::domain::errors::BoxError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Built-in constructor for a custom kind.
pub type CustomParseFn = fn(&str) -> Result<Value, BoxError>;

/// Declaration of an application-defined type.
///
/// A custom kind is identified by its `TypeId`. It may carry a built-in constructor
/// (derived from `FromStr`); without one, a variable of this kind needs a parser.
///
/// # Examples
///
/// ```
/// use envspec::domain::value::{CustomKind, Value, ValueKind};
/// use std::net::IpAddr;
///
/// let kind = ValueKind::Custom(CustomKind::parsed::<IpAddr>());
/// let value = Value::custom("127.0.0.1".parse::<IpAddr>().unwrap());
/// assert!(kind.accepts(&value));
/// ```
#[derive(Clone, Copy)]
pub struct CustomKind {
    name: &'static str,
    type_id: TypeId,
    parse: Option<CustomParseFn>,
}

impl CustomKind {
    /// Declares a custom kind without a built-in constructor.
    pub fn of<T: Any>() -> Self {
        CustomKind {
            name: short_type_name::<T>(),
            type_id: TypeId::of::<T>(),
            parse: None,
        }
    }

    /// Declares a custom kind whose values are built with `FromStr`.
    pub fn parsed<T>() -> Self
    where
        T: FromStr + Any + fmt::Debug + Send + Sync,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        CustomKind {
            name: short_type_name::<T>(),
            type_id: TypeId::of::<T>(),
            parse: Some(parse_custom::<T>),
        }
    }

    /// Returns the short type name used in messages and help output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the built-in constructor, if one was declared.
    pub fn parse_fn(&self) -> Option<CustomParseFn> {
        self.parse
    }
}

impl PartialEq for CustomKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CustomKind {}

impl fmt::Debug for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomKind").field(&self.name).finish()
    }
}

fn parse_custom<T>(raw: &str) -> Result<Value, BoxError>
where
    T: FromStr + Any + fmt::Debug + Send + Sync,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(Value::custom(raw.parse::<T>()?))
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Strip the module path but keep generic arguments intact.
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// The declared kind of a configuration member.
///
/// # Examples
///
/// ```
/// use envspec::domain::value::{Value, ValueKind};
///
/// let kind = ValueKind::optional(ValueKind::Str);
/// assert!(kind.accepts(&Value::Null));
/// assert!(kind.accepts(&Value::from("hello")));
/// assert!(!kind.accepts(&Value::from(1)));
/// assert_eq!(kind.to_string(), "Optional[str]");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// A boolean.
    Bool,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit float.
    Float,
    /// A string.
    Str,
    /// Either `Null` or the inner kind.
    Optional(Box<ValueKind>),
    /// An ordered sequence of the inner kind.
    Sequence(Box<ValueKind>),
    /// A set of the inner kind.
    Set(Box<ValueKind>),
    /// A mapping from the first kind to the second.
    ///
    /// Resolved mappings are [`Value::Map`]s, which keep their entries sorted by key.
    /// The order pairs appear in the raw string is not kept, so iteration and rendered
    /// defaults list keys in ascending order.
    Mapping(Box<ValueKind>, Box<ValueKind>),
    /// An application-defined type.
    Custom(CustomKind),
}

impl ValueKind {
    /// `Optional[inner]`.
    pub fn optional(inner: ValueKind) -> Self {
        ValueKind::Optional(Box::new(inner))
    }

    /// `list[inner]`.
    pub fn sequence(inner: ValueKind) -> Self {
        ValueKind::Sequence(Box::new(inner))
    }

    /// `set[inner]`.
    pub fn set(inner: ValueKind) -> Self {
        ValueKind::Set(Box::new(inner))
    }

    /// `dict[key, value]`.
    pub fn mapping(key: ValueKind, value: ValueKind) -> Self {
        ValueKind::Mapping(Box::new(key), Box::new(value))
    }

    /// A custom kind for `T` without a built-in constructor.
    pub fn custom<T: Any>() -> Self {
        ValueKind::Custom(CustomKind::of::<T>())
    }

    /// Returns true if `value` is exactly of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueKind::Bool, Value::Bool(_)) => true,
            (ValueKind::Int, Value::Int(_)) => true,
            (ValueKind::Float, Value::Float(_)) => true,
            (ValueKind::Str, Value::Str(_)) => true,
            (ValueKind::Optional(_), Value::Null) => true,
            (ValueKind::Optional(inner), v) => inner.accepts(v),
            (ValueKind::Sequence(inner), Value::List(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (ValueKind::Set(inner), Value::Set(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (ValueKind::Mapping(k, v), Value::Map(entries)) => entries
                .iter()
                .all(|(key, value)| k.accepts(key) && v.accepts(value)),
            (ValueKind::Custom(kind), Value::Custom(custom)) => {
                kind.type_id == custom.type_id()
            }
            _ => false,
        }
    }

    /// Returns true for kinds that are built by splitting the raw string on `,`.
    pub fn is_collection(&self) -> bool {
        match self {
            ValueKind::Sequence(_) | ValueKind::Set(_) | ValueKind::Mapping(_, _) => true,
            ValueKind::Optional(inner) => inner.is_collection(),
            _ => false,
        }
    }

    /// Strips any `Optional` wrappers.
    pub fn unwrapped(&self) -> &ValueKind {
        match self {
            ValueKind::Optional(inner) => inner.unwrapped(),
            other => other,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Int => f.write_str("int"),
            ValueKind::Float => f.write_str("float"),
            ValueKind::Str => f.write_str("str"),
            ValueKind::Optional(inner) => write!(f, "Optional[{}]", inner),
            ValueKind::Sequence(inner) => write!(f, "list[{}]", inner),
            ValueKind::Set(inner) => write!(f, "set[{}]", inner),
            ValueKind::Mapping(k, v) => write!(f, "dict[{}, {}]", k, v),
            ValueKind::Custom(kind) => f.write_str(kind.name),
        }
    }
}

trait CustomData: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> CustomData for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value of an application-defined type.
#[derive(Clone)]
pub struct CustomValue {
    name: &'static str,
    inner: Arc<dyn CustomData>,
}

impl CustomValue {
    /// Returns the short type name of the wrapped value.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the wrapped value.
    pub fn type_id(&self) -> TypeId {
        self.data().type_id()
    }

    /// Downcasts to the concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data().downcast_ref::<T>()
    }

    // Dereference first so the call does not resolve to the blanket impl on the `Arc`.
    fn data(&self) -> &dyn Any {
        (*self.inner).as_any()
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

/// A resolved configuration value.
///
/// Values are totally ordered so they can be stored in sets and used as mapping keys.
/// Floats compare with `total_cmp`; custom values compare by type name and then by
/// identity.
///
/// # Examples
///
/// ```
/// use envspec::domain::value::Value;
///
/// let value = Value::from(vec![1, 2, 3]);
/// assert_eq!(value.to_string(), "[1, 2, 3]");
/// assert_eq!(Value::from("a").to_string(), "a");
/// ```
#[derive(Clone, Debug)]
pub enum Value {
    /// The absence of a value, only valid for `Optional` kinds.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered sequence.
    List(Vec<Value>),
    /// A set.
    Set(BTreeSet<Value>),
    /// A mapping, iterated in ascending key order regardless of insertion order.
    Map(BTreeMap<Value, Value>),
    /// An application-defined value.
    Custom(CustomValue),
}

impl Value {
    /// Wraps an application-defined value.
    pub fn custom<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
        Value::Custom(CustomValue {
            name: short_type_name::<T>(),
            inner: Arc::new(value),
        })
    }

    /// A short description of the value's runtime kind, used in mismatch errors.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Set(_) => "set".to_string(),
            Value::Map(_) => "dict".to_string(),
            Value::Custom(custom) => custom.name.to_string(),
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcasts a custom value to its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.downcast_ref::<T>(),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::List(_) => 5,
            Value::Set(_) => 6,
            Value::Map(_) => 7,
            Value::Custom(_) => 8,
        }
    }

    // Strings nested in collections are quoted so `['a', 'b']` reads unambiguously.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Custom(a), Value::Custom(b)) => a
                .name
                .cmp(b.name)
                .then_with(|| a.address().cmp(&b.address())),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("}")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.fmt_nested(f)?;
                    f.write_str(": ")?;
                    v.fmt_nested(f)?;
                }
                f.write_str("}")
            }
            Value::Custom(custom) => write!(f, "{:?}", custom),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Custom(custom) => serializer.serialize_str(&format!("{:?}", custom)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(items: BTreeSet<T>) -> Self {
        Value::Set(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(entries: BTreeMap<K, V>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Conversion from a resolved [`Value`] into a plain Rust type.
///
/// Returns `None` when the value is not of the matching kind.
pub trait FromValue: Sized {
    /// Converts the value, if its kind matches.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| i32::try_from(n).ok())
    }
}

impl FromValue for u16 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| u16::try_from(n).ok())
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| u32::try_from(n).ok())
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| u64::try_from(n).ok())
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Set(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}
