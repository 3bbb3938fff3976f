// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the interfaces the resolution engine talks to: where raw
//! strings come from, and where deprecation notices go. They are implemented by
//! adapters in the adapters layer.

pub mod sink;
pub mod source;

// Re-export commonly used types
pub use sink::DeprecationSink;
pub use source::EnvSource;
