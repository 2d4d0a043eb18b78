//! Minimal locale identifiers.
//!
//! Case mapping only ever consults the language subtag, so that is all a
//! [`Locale`] keeps.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A locale reduced to its lowercased language subtag.
///
/// The root locale has an empty language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
}

impl Locale {
    /// The language-neutral root locale.
    pub const ROOT: Locale = Locale {
        language: String::new(),
    };

    /// Parse a tag such as `tr`, `tr-TR`, `az_Latn_AZ`, or `und`.
    ///
    /// Anything that is not a 2-8 letter language subtag yields the root
    /// locale.
    pub fn new(tag: &str) -> Self {
        let language = tag.trim().split(['-', '_']).next().unwrap_or_default();
        let valid = (2..=8).contains(&language.len())
            && language.bytes().all(|b| b.is_ascii_alphabetic())
            && !language.eq_ignore_ascii_case("und");
        if valid {
            Self {
                language: language.to_ascii_lowercase(),
            }
        } else {
            Self::ROOT
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }
}

impl FromStr for Locale {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "und")
        } else {
            write!(f, "{}", self.language)
        }
    }
}
