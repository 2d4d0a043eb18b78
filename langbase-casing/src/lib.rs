//! Conditional special casing for the langbase runtime library.
//!
//! This crate provides:
//!
//! - `rules`: the ordered SpecialCasing rule table
//! - `engine`: rule selection and string conversion
//! - `classifier`: general category and combining class lookups
//! - `boundary`: the word-boundary oracle used by final sigma
//! - `locale`: language-subtag locales

pub mod boundary;
pub mod classifier;
pub mod engine;
pub mod locale;
pub mod rules;

pub use boundary::{UnicodeWordBoundaries, WordBoundaryOracle};
pub use classifier::{CanonicalCombiningClass, CodePointClassifier, IcuClassifier};
pub use engine::{CaseMapping, ConditionalCasing};
pub use locale::Locale;
pub use rules::{CasingRule, Condition, RuleTable};
