//! Character name lookups as a runtime exposes them to user code.
//!
//! [`CharacterNames`] layers input normalisation and derived names over a
//! shared [`NameTable`].

use crate::cache::NameTableCache;
use crate::derived;
use crate::error::NameTableError;
use crate::table::{MAX_CODE_POINT, NameTable};
use std::borrow::Cow;
use std::sync::Arc;

/// User-facing name lookups over a shared table.
#[derive(Debug, Clone)]
pub struct CharacterNames {
    table: Arc<NameTable>,
}

impl CharacterNames {
    pub fn new(table: Arc<NameTable>) -> Self {
        Self { table }
    }

    /// Names backed by whatever table `cache` currently holds.
    pub fn from_cache(cache: &NameTableCache) -> Result<Self, NameTableError> {
        Ok(Self::new(cache.get()?))
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    /// Name of `code_point`: the stored name, else a derived one.
    ///
    /// Returns `None` for code points with neither, including surrogates,
    /// private use, unassigned values, and values outside the Unicode code
    /// space. No block-name fallback is synthesized.
    pub fn name_of(&self, code_point: u32) -> Option<Cow<'_, str>> {
        if code_point > MAX_CODE_POINT {
            return None;
        }
        if let Some(name) = self.table.name_of(code_point) {
            return Some(Cow::Borrowed(name));
        }
        derived::derived_name(code_point).map(Cow::Owned)
    }

    /// Code point named `name`.
    ///
    /// Leading and trailing control characters and spaces are ignored and
    /// the name is matched case-insensitively.
    pub fn code_point_of(&self, name: &str) -> Option<u32> {
        let normalized = name.trim_matches(|c: char| c <= ' ').to_uppercase();
        if normalized.is_empty() {
            return None;
        }
        self.table
            .code_point_of(&normalized)
            .or_else(|| derived::parse_derived_name(&normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_raw;

    fn names() -> CharacterNames {
        let raw = encode_raw([
            (0x41, "LATIN CAPITAL LETTER A"),
            (0x3A3, "GREEK CAPITAL LETTER SIGMA"),
        ])
        .expect("encode");
        CharacterNames::new(Arc::new(NameTable::from_raw(&raw).expect("decode")))
    }

    #[test]
    fn test_normalizes_queries() {
        let names = names();
        assert_eq!(names.code_point_of("latin capital letter a"), Some(0x41));
        assert_eq!(names.code_point_of("  Greek Capital Letter Sigma\t\n"), Some(0x3A3));
        assert_eq!(names.code_point_of("   "), None);
        assert_eq!(names.code_point_of("LATIN CAPITAL  LETTER A"), None);
    }

    #[test]
    fn test_falls_back_to_derived_names() {
        let names = names();
        assert_eq!(
            names.name_of(0xAC00),
            Some(Cow::Owned("HANGUL SYLLABLE GA".to_string()))
        );
        assert_eq!(names.code_point_of("hangul syllable ga"), Some(0xAC00));
        assert_eq!(names.code_point_of("cjk unified ideograph-4e00"), Some(0x4E00));
    }

    #[test]
    fn test_stored_names_are_borrowed() {
        let names = names();
        assert!(matches!(names.name_of(0x41), Some(Cow::Borrowed("LATIN CAPITAL LETTER A"))));
        assert_eq!(names.name_of(0x42), None);
        assert_eq!(names.name_of(0x110000), None);
    }
}
