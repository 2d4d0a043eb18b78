//! Typed error types for langbase-names.
//!
//! Table construction is all-or-nothing: any of these errors means no table
//! was built. Lookup misses are never errors; they are `None`.

use thiserror::Error;

/// Failure to build, encode, or load a [`crate::NameTable`].
#[derive(Debug, Error)]
pub enum NameTableError {
    // -----------------------------------------------------------------------
    // Resource loading
    // -----------------------------------------------------------------------
    /// The compressed resource could not be inflated.
    #[error("name resource inflate failed: {0}")]
    Inflate(#[source] std::io::Error),

    /// An external resource file could not be read.
    #[error("name resource read failed for '{path}': {source}")]
    Read {
        /// Path of the resource file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    // -----------------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------------
    /// The resource ended before a section it declared.
    #[error("name resource truncated: {0}")]
    Truncated(String),

    /// The resource is internally inconsistent.
    #[error("malformed name resource: {0}")]
    Malformed(String),

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------
    /// An entry handed to the encoder cannot be represented.
    #[error("cannot encode name for U+{code_point:04X}: {reason}")]
    InvalidEntry {
        /// Code point of the offending entry.
        code_point: u32,
        /// Why it was rejected.
        reason: String,
    },

    /// The encoder could not write its output.
    #[error("name resource encode failed: {0}")]
    Encode(#[source] std::io::Error),
}
