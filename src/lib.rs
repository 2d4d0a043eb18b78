//! langbase: the Unicode and process-lifecycle core of a language runtime's
//! base library.
//!
//! The work lives in three member crates, re-exported here:
//!
//! - [`names`]: code point <-> character name tables
//! - [`casing`]: conditional special casing
//! - [`shutdown`]: ordered shutdown hooks
//!
//! This crate adds configuration, logging, the CLI, and the [`Runtime`]
//! facade that wires the three together.

pub mod cli;
pub mod config;
pub mod debug;
pub mod runtime;

pub use config::{Config, ConfigError, LogLevel};
pub use runtime::Runtime;

pub use langbase_casing as casing;
pub use langbase_names as names;
pub use langbase_shutdown as shutdown;
