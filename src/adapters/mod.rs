// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing source and sink implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: where raw strings are read from, and where deprecation notices go.

#[cfg(feature = "env")]
pub mod env_var;
pub mod map_source;
pub mod sinks;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use env_var::ProcessEnv;
pub use map_source::MapSource;
pub use sinks::{CollectingSink, TracingSink};
