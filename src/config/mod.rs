//! Configuration for fct-provision.
//!
//! This module defines the Config struct that represents `fct.yaml`, the
//! enumerated branch and category values, and the template's example
//! selector. It supports forward-compatible YAML parsing (unknown fields are
//! ignored), defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::{Config, DEFAULT_CONFIG_FILE};
pub use operations::ConfigOverrides;
pub use types::{Branch, Category, ExampleSelection};
