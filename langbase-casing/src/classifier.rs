//! Code point classification consumed by the casing engine.

use icu_properties::CodePointMapData;

pub use icu_properties::props::{CanonicalCombiningClass, GeneralCategory};

/// Letters whose dot is dropped when an accent is placed above them.
const SOFT_DOTTED: [char; 10] = [
    '\u{0069}', // LATIN SMALL LETTER I
    '\u{006A}', // LATIN SMALL LETTER J
    '\u{012F}', // LATIN SMALL LETTER I WITH OGONEK
    '\u{0268}', // LATIN SMALL LETTER I WITH STROKE
    '\u{0456}', // CYRILLIC SMALL LETTER BYELORUSSIAN-UKRAINIAN I
    '\u{0458}', // CYRILLIC SMALL LETTER JE
    '\u{1D62}', // LATIN SUBSCRIPT SMALL LETTER I
    '\u{1E2D}', // LATIN SMALL LETTER I WITH TILDE BELOW
    '\u{1ECB}', // LATIN SMALL LETTER I WITH DOT BELOW
    '\u{2071}', // SUPERSCRIPT LATIN SMALL LETTER I
];

/// Other_Lowercase / Other_Uppercase ranges counted as cased.
const OTHER_CASED: [(char, char); 8] = [
    ('\u{02B0}', '\u{02B8}'), // MODIFIER LETTER SMALL H..MODIFIER LETTER SMALL Y
    ('\u{02C0}', '\u{02C1}'), // MODIFIER LETTER GLOTTAL STOP..MODIFIER LETTER REVERSED GLOTTAL STOP
    ('\u{02E0}', '\u{02E4}'), // MODIFIER LETTER SMALL GAMMA..MODIFIER LETTER SMALL REVERSED GLOTTAL STOP
    ('\u{0345}', '\u{0345}'), // COMBINING GREEK YPOGEGRAMMENI
    ('\u{037A}', '\u{037A}'), // GREEK YPOGEGRAMMENI
    ('\u{1D2C}', '\u{1D61}'), // MODIFIER LETTER CAPITAL A..MODIFIER LETTER SMALL CHI
    ('\u{2160}', '\u{217F}'), // ROMAN NUMERAL ONE..SMALL ROMAN NUMERAL ONE THOUSAND
    ('\u{24B6}', '\u{24E9}'), // CIRCLED LATIN CAPITAL LETTER A..CIRCLED LATIN SMALL LETTER Z
];

/// Character properties the casing engine needs.
pub trait CodePointClassifier: Send + Sync {
    fn general_category(&self, c: char) -> GeneralCategory;

    /// Canonical combining class: `NotReordered` for starters, `Above` for
    /// marks rendered above the base.
    fn combining_class(&self, c: char) -> CanonicalCombiningClass;

    /// Whether `c` takes part in case distinctions: a cased letter category
    /// or one of the fixed extra ranges.
    fn is_cased(&self, c: char) -> bool {
        matches!(
            self.general_category(c),
            GeneralCategory::LowercaseLetter
                | GeneralCategory::UppercaseLetter
                | GeneralCategory::TitlecaseLetter
        ) || OTHER_CASED
            .iter()
            .any(|&(start, end)| (start..=end).contains(&c))
    }

    fn is_soft_dotted(&self, c: char) -> bool {
        SOFT_DOTTED.contains(&c)
    }
}

/// Classifier backed by ICU4X compiled property data.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcuClassifier;

impl CodePointClassifier for IcuClassifier {
    fn general_category(&self, c: char) -> GeneralCategory {
        CodePointMapData::<GeneralCategory>::new().get(c)
    }

    fn combining_class(&self, c: char) -> CanonicalCombiningClass {
        CodePointMapData::<CanonicalCombiningClass>::new().get(c)
    }
}
