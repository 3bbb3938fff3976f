// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment key computation.
//!
//! Variable names and specification prefixes may be written in a dotted, lower-case
//! form (`"service.port"`). Before a lookup they are normalized to the conventional
//! environment form (`SERVICE_PORT`) and joined with the effective prefix inherited
//! from every enclosing specification.

use std::fmt;

/// Normalizes a name or prefix fragment.
///
/// The input is upper-cased, every `.` becomes `_`, and trailing underscores are
/// stripped.
///
/// # Examples
///
/// ```
/// use envspec::domain::env_key::normalize;
///
/// assert_eq!(normalize("foo.bar"), "FOO_BAR");
/// assert_eq!(normalize("test.me."), "TEST_ME");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(name: &str) -> String {
    name.to_uppercase()
        .replace('.', "_")
        .trim_end_matches('_')
        .to_string()
}

/// Combines a parent's effective prefix with a specification's own prefix.
///
/// The result is either empty or ends with `_`, so it can be concatenated directly
/// with a normalized variable name. A nested spec without a prefix still adds its own
/// separator, so `MYAPP_` becomes `MYAPP__`.
///
/// # Examples
///
/// ```
/// use envspec::domain::env_key::combine;
///
/// assert_eq!(combine("", "myapp"), "MYAPP_");
/// assert_eq!(combine("MYAPP_", "service"), "MYAPP_SERVICE_");
/// assert_eq!(combine("MYAPP_", ""), "MYAPP__");
/// assert_eq!(combine("", ""), "");
/// ```
pub fn combine(parent: &str, own: &str) -> String {
    let mut full = format!("{}{}", parent, normalize(own));
    if !full.is_empty() {
        full.push('_');
    }
    full
}

/// A fully-qualified environment key.
///
/// `EnvKey` is what sources are queried with. It is always built from an effective
/// prefix and a normalized name, so two declarations that differ only in dots or
/// case map to the same key.
///
/// # Examples
///
/// ```
/// use envspec::domain::env_key::EnvKey;
///
/// let key = EnvKey::join("MYAPP_SERVICE_", "port");
/// assert_eq!(key.as_str(), "MYAPP_SERVICE_PORT");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvKey(String);

impl EnvKey {
    /// Joins an effective prefix (as returned by [`combine`]) with a variable name.
    pub fn join(prefix: &str, name: &str) -> Self {
        EnvKey(format!("{}{}", prefix, normalize(name)))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `EnvKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for EnvKey {
    fn from(s: &str) -> Self {
        EnvKey(s.to_string())
    }
}

impl From<String> for EnvKey {
    fn from(s: String) -> Self {
        EnvKey(s)
    }
}

impl From<EnvKey> for String {
    fn from(key: EnvKey) -> Self {
        key.0
    }
}

impl AsRef<str> for EnvKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
