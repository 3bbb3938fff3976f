// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only introspection for documentation generators.

use crate::domain::env_key::combine;
use crate::domain::{EnvVariable, Member, Spec};
use serde::Serialize;

/// One documented variable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HelpRow {
    /// The fully-qualified environment key
    pub name: String,
    /// The help type label, or the declared kind
    pub type_label: String,
    /// The rendered default, empty when there is none
    pub default: String,
    /// The help text, ending with a period unless empty
    pub description: String,
}

impl HelpRow {
    fn from_variable(variable: &EnvVariable, prefix: &str) -> Self {
        HelpRow {
            name: variable.key(prefix).into_string(),
            type_label: variable
                .help_type_label()
                .map(str::to_string)
                .unwrap_or_else(|| variable.kind().to_string()),
            default: variable
                .default_value()
                .map(ToString::to_string)
                .unwrap_or_default(),
            description: sentence(variable.help_text().unwrap_or_default()),
        }
    }
}

/// Lists the variables of `spec`, sorted by key, followed (if `recursive`) by the rows
/// of each nested specification in declaration order. Derived members are skipped.
///
/// # Examples
///
/// ```rust
/// use envspec::prelude::*;
/// use envspec::service::help_rows;
///
/// let spec = Spec::builder()
///     .prefix("myapp")
///     .var("port", EnvVariable::new(ValueKind::Int, "port").default(3000).help("Listen port"))
///     .var("host", EnvVariable::new(ValueKind::Str, "host").help_type("hostname"))
///     .build()
///     .unwrap();
///
/// let rows = help_rows(&spec, false);
/// assert_eq!(rows[0].name, "MYAPP_HOST");
/// assert_eq!(rows[0].type_label, "hostname");
/// assert_eq!(rows[1].default, "3000");
/// assert_eq!(rows[1].description, "Listen port.");
/// ```
pub fn help_rows(spec: &Spec, recursive: bool) -> Vec<HelpRow> {
    let mut rows = Vec::new();
    collect(spec, "", recursive, &mut rows);
    rows
}

fn collect(spec: &Spec, parent_prefix: &str, recursive: bool, rows: &mut Vec<HelpRow>) {
    let prefix = combine(parent_prefix, spec.prefix());

    let mut own: Vec<HelpRow> = spec
        .members()
        .filter_map(|(_, member)| match member {
            Member::Variable(variable) => Some(HelpRow::from_variable(variable, &prefix)),
            _ => None,
        })
        .collect();
    own.sort_by(|a, b| a.name.cmp(&b.name));
    rows.extend(own);

    if recursive {
        for (_, member) in spec.members() {
            if let Member::Nested(nested) = member {
                collect(nested, &prefix, recursive, rows);
            }
        }
    }
}

fn sentence(text: &str) -> String {
    let text = text.trim_end();
    if text.is_empty() || text.ends_with('.') {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

impl Spec {
    /// Shorthand for [`help_rows`].
    pub fn help_rows(&self, recursive: bool) -> Vec<HelpRow> {
        help_rows(self, recursive)
    }
}
