// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: the resolution engine and the introspector.
//!
//! Both operate on [`Spec`](crate::domain::Spec)s and add the `build`, `build_with`,
//! `from_env` and `help_rows` methods to them.

pub mod help;
pub mod resolver;

// Re-export commonly used types
pub use help::{help_rows, HelpRow};
pub use resolver::Resolver;
