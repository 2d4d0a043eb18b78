//! Unicode character name tables for the langbase runtime library.
//!
//! This crate provides:
//!
//! - `table`: the compact, immutable code point <-> name index
//! - `cache`: lazily built, explicitly shared tables with eviction
//! - `names`: user-facing lookups with input normalisation and derived names
//! - `derived`: algorithmic Hangul and ideograph names
//! - `encode`: the offline encoder for the packed resource format

pub mod cache;
pub mod derived;
pub mod encode;
mod error;
pub mod names;
pub mod table;

pub use cache::{EMBEDDED_RESOURCE, NameSource, NameTableCache};
pub use error::NameTableError;
pub use names::CharacterNames;
pub use table::{MAX_CODE_POINT, NameTable};
