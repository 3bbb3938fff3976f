// SPDX-License-Identifier: MIT OR Apache-2.0

//! Specifications: the declared schema a configuration instance is built from.
//!
//! A [`Spec`] is an ordered set of named members (variables, derived members and
//! nested specifications) with an optional namespace prefix. Specs are declared once
//! with a [`SpecBuilder`] and are then shared, read-only, by every build. The only
//! mutation is [`Spec::include`], which copies on write.

use crate::domain::coerce::DEFAULT_TRUTHY;
use crate::domain::derived::DerivedVariable;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::variable::EnvVariable;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One declared member of a specification.
#[derive(Clone, Debug)]
pub enum Member {
    /// A variable read from the source.
    Variable(EnvVariable),
    /// A member computed after all variables are resolved.
    Derived(DerivedVariable),
    /// An embedded specification, built into a nested instance.
    Nested(Spec),
}

#[derive(Clone, Debug)]
struct SpecInner {
    prefix: String,
    item_name: Option<String>,
    truthy: Option<BTreeSet<String>>,
    members: Vec<(String, Member)>,
}

/// A shared, immutable configuration schema.
///
/// Cloning a `Spec` is cheap; clones share the same declaration.
///
/// # Examples
///
/// ```
/// use envspec::prelude::*;
///
/// let spec = Spec::builder()
///     .prefix("myapp")
///     .var("debug", EnvVariable::new(ValueKind::Bool, "debug").default(false))
///     .var("port", EnvVariable::new(ValueKind::Int, "port").default(3000))
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.prefix(), "myapp");
/// assert_eq!(spec.names().collect::<Vec<_>>(), vec!["debug", "port"]);
/// ```
#[derive(Clone, Debug)]
pub struct Spec {
    inner: Arc<SpecInner>,
}

impl Spec {
    /// Starts a new declaration.
    pub fn builder() -> SpecBuilder {
        SpecBuilder::default()
    }

    /// The raw namespace prefix, possibly dotted or empty.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    /// The field name used when this spec is embedded with [`SpecBuilder::item`].
    pub fn item_name(&self) -> Option<&str> {
        self.inner.item_name.as_deref()
    }

    /// The lower-case strings that coerce to `true` for boolean variables.
    pub fn truthy(&self) -> &BTreeSet<String> {
        self.inner.truthy.as_ref().unwrap_or(&*DEFAULT_TRUTHY)
    }

    /// The members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.inner
            .members
            .iter()
            .map(|(name, member)| (name.as_str(), member))
    }

    /// The member names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.members.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.inner
            .members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, member)| member)
    }

    /// Looks up a variable member by name.
    pub fn variable(&self, name: &str) -> Option<&EnvVariable> {
        match self.member(name) {
            Some(Member::Variable(var)) => Some(var),
            _ => None,
        }
    }

    /// Looks up a nested specification by name.
    pub fn nested(&self, name: &str) -> Option<&Spec> {
        match self.member(name) {
            Some(Member::Nested(spec)) => Some(spec),
            _ => None,
        }
    }

    /// Merges the members declared directly on `source` into this spec.
    ///
    /// With a `namespace`, `source` is also embedded as a nested member under that
    /// name; an existing member of that name is an error unless `overwrite` is set.
    /// Without `overwrite`, any member name already present fails the whole call with
    /// [`ConfigError::Clash`] and nothing is changed.
    ///
    /// Instances built from this spec before the call keep the old schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use envspec::prelude::*;
    ///
    /// let database = Spec::builder()
    ///     .prefix("db")
    ///     .var("host", EnvVariable::new(ValueKind::Str, "host").default("localhost"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut app = Spec::builder().build().unwrap();
    /// app.include(&database, Some("database"), false).unwrap();
    ///
    /// assert!(app.variable("host").is_some());
    /// assert!(app.nested("database").is_some());
    /// assert!(app.include(&database, None, false).is_err());
    /// ```
    pub fn include(
        &mut self,
        source: &Spec,
        namespace: Option<&str>,
        overwrite: bool,
    ) -> Result<()> {
        if let Some(namespace) = namespace {
            if !overwrite && self.member(namespace).is_some() {
                return Err(ConfigError::NamespaceClash {
                    namespace: namespace.to_string(),
                });
            }
        }

        if !overwrite {
            let existing: BTreeSet<&str> = self.names().collect();
            let clashes: BTreeSet<&str> = source
                .names()
                .filter(|name| existing.contains(name))
                .collect();
            if !clashes.is_empty() {
                return Err(ConfigError::Clash {
                    names: clashes.into_iter().map(str::to_string).collect(),
                });
            }
        }

        let inner = Arc::make_mut(&mut self.inner);
        if let Some(namespace) = namespace {
            let embedded = Member::Nested(source.clone());
            upsert(&mut inner.members, namespace.to_string(), embedded);
        }
        for (name, member) in source.members() {
            upsert(&mut inner.members, name.to_string(), member.clone());
        }

        tracing::debug!(
            prefix = %inner.prefix,
            included = %source.prefix(),
            namespace = ?namespace,
            "Included specification"
        );
        Ok(())
    }
}

fn upsert(members: &mut Vec<(String, Member)>, name: String, member: Member) {
    match members.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = member,
        None => members.push((name, member)),
    }
}

/// Builder for [`Spec`].
///
/// Declaration problems (a bad default, a mapper on the wrong kind, an implicit item
/// without an item name) are collected and reported by [`SpecBuilder::build`].
#[derive(Default)]
pub struct SpecBuilder {
    prefix: String,
    item_name: Option<String>,
    truthy: Option<BTreeSet<String>>,
    members: Vec<(String, Member)>,
    problems: Vec<ConfigError>,
}

impl SpecBuilder {
    /// Sets the namespace prefix. Dots become underscores when keys are computed.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the field name used when the spec is embedded with [`SpecBuilder::item`].
    pub fn item_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self
    }

    /// Replaces the set of strings that coerce to `true`. Matching is case-insensitive.
    pub fn truthy<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.truthy = Some(
            values
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        );
        self
    }

    /// Declares a variable member.
    pub fn var(mut self, name: impl Into<String>, variable: EnvVariable) -> Self {
        if let Err(e) = variable.check() {
            self.problems.push(e);
        }
        upsert(&mut self.members, name.into(), Member::Variable(variable));
        self
    }

    /// Declares a derived member.
    pub fn derived(mut self, name: impl Into<String>, derived: DerivedVariable) -> Self {
        upsert(&mut self.members, name.into(), Member::Derived(derived));
        self
    }

    /// Embeds `spec` under the field `name`.
    pub fn nested(mut self, name: impl Into<String>, spec: Spec) -> Self {
        upsert(&mut self.members, name.into(), Member::Nested(spec));
        self
    }

    /// Embeds `spec` under its own item name.
    pub fn item(mut self, spec: Spec) -> Self {
        match spec.item_name() {
            Some(name) => {
                let name = name.to_string();
                upsert(&mut self.members, name, Member::Nested(spec));
            }
            None => self.problems.push(ConfigError::declaration(format!(
                "specification with prefix '{}' has no item name to embed it under",
                spec.prefix()
            ))),
        }
        self
    }

    /// Declares a nested spec whose prefix and field name are both `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use envspec::prelude::*;
    ///
    /// let spec = Spec::builder()
    ///     .prefix("myapp")
    ///     .section("service", |s| {
    ///         s.var("port", EnvVariable::new(ValueKind::Int, "port").default(8080))
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(spec.nested("service").unwrap().prefix(), "service");
    /// ```
    pub fn section<F>(mut self, name: &str, declare: F) -> Self
    where
        F: FnOnce(SpecBuilder) -> SpecBuilder,
    {
        let builder = declare(Spec::builder().prefix(name).item_name(name));
        match builder.build() {
            Ok(spec) => upsert(&mut self.members, name.to_string(), Member::Nested(spec)),
            Err(e) => self.problems.push(e),
        }
        self
    }

    /// Finishes the declaration, failing on the first declaration problem.
    pub fn build(self) -> Result<Spec> {
        if let Some(problem) = self.problems.into_iter().next() {
            return Err(problem);
        }
        Ok(Spec {
            inner: Arc::new(SpecInner {
                prefix: self.prefix,
                item_name: self.item_name,
                truthy: self.truthy,
                members: self.members,
            }),
        })
    }
}
