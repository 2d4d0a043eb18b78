//! Conditional case mapping at a position in a text.
//!
//! For the character at a byte offset, the engine walks the rules keyed by
//! that character in declaration order. Rules limited to another language
//! are skipped. Each remaining rule whose context condition holds becomes
//! the current selection; a language-specific selection ends the walk
//! immediately, while a language-neutral one can still be replaced by any
//! later match. When nothing is selected the caller applies the ordinary,
//! unconditional case mapping.

use crate::boundary::{UnicodeWordBoundaries, WordBoundaryOracle};
use crate::classifier::{CanonicalCombiningClass, CodePointClassifier, IcuClassifier};
use crate::locale::Locale;
use crate::rules::{CasingRule, Condition, RuleTable};
use std::cell::OnceCell;
use std::sync::Arc;

/// Result of a conditional lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMapping {
    /// Replace with exactly one character.
    Char(char),
    /// Replace with this sequence (possibly empty, never exactly one).
    Chars(&'static [char]),
    /// No conditional rule applies; use the default mapping.
    Default,
}

impl CaseMapping {
    fn from_replacement(replacement: &'static [char]) -> Self {
        match replacement {
            [single] => CaseMapping::Char(*single),
            other => CaseMapping::Chars(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lower,
    Upper,
}

/// Locale- and context-sensitive case mapping engine.
///
/// Immutable once built; share it freely across threads.
#[derive(Debug)]
pub struct ConditionalCasing<C = IcuClassifier, W = UnicodeWordBoundaries> {
    rules: Arc<RuleTable>,
    classifier: C,
    boundaries: W,
}

impl ConditionalCasing {
    /// Engine over the standard table with the default collaborators.
    pub fn new() -> Self {
        Self::with_parts(RuleTable::standard(), IcuClassifier, UnicodeWordBoundaries)
    }
}

impl Default for ConditionalCasing {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CodePointClassifier, W: WordBoundaryOracle> ConditionalCasing<C, W> {
    pub fn with_parts(rules: Arc<RuleTable>, classifier: C, boundaries: W) -> Self {
        Self {
            rules,
            classifier,
            boundaries,
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Conditional lowercase of the character starting at byte `index`.
    ///
    /// An `index` past the end of `text` or inside a character yields
    /// [`CaseMapping::Default`].
    pub fn lowercase_at(&self, text: &str, index: usize, locale: &Locale) -> CaseMapping {
        self.lookup(text, index, locale, Direction::Lower)
    }

    /// Conditional uppercase of the character starting at byte `index`.
    pub fn uppercase_at(&self, text: &str, index: usize, locale: &Locale) -> CaseMapping {
        self.lookup(text, index, locale, Direction::Upper)
    }

    /// Lowercase of the character at `index`, falling back to the
    /// unconditional full mapping. Empty if `index` is not a char start.
    pub fn to_lowercase_chars(&self, text: &str, index: usize, locale: &Locale) -> Vec<char> {
        let Some(c) = char_at(text, index) else {
            return Vec::new();
        };
        match self.lowercase_at(text, index, locale) {
            CaseMapping::Char(mapped) => vec![mapped],
            CaseMapping::Chars(mapped) => mapped.to_vec(),
            CaseMapping::Default => c.to_lowercase().collect(),
        }
    }

    /// Uppercase counterpart of [`Self::to_lowercase_chars`].
    pub fn to_uppercase_chars(&self, text: &str, index: usize, locale: &Locale) -> Vec<char> {
        let Some(c) = char_at(text, index) else {
            return Vec::new();
        };
        match self.uppercase_at(text, index, locale) {
            CaseMapping::Char(mapped) => vec![mapped],
            CaseMapping::Chars(mapped) => mapped.to_vec(),
            CaseMapping::Default => c.to_uppercase().collect(),
        }
    }

    /// Lowercase a whole string under `locale`.
    pub fn to_lowercase(&self, text: &str, locale: &Locale) -> String {
        self.convert(text, locale, Direction::Lower)
    }

    /// Uppercase a whole string under `locale`.
    pub fn to_uppercase(&self, text: &str, locale: &Locale) -> String {
        self.convert(text, locale, Direction::Upper)
    }

    fn convert(&self, text: &str, locale: &Locale, direction: Direction) -> String {
        let context = Context::new(text, locale);
        let mut out = String::with_capacity(text.len());
        for (index, c) in text.char_indices() {
            match self.select(&context, index, direction) {
                CaseMapping::Char(mapped) => out.push(mapped),
                CaseMapping::Chars(mapped) => out.extend(mapped.iter()),
                CaseMapping::Default => match direction {
                    Direction::Lower => out.extend(c.to_lowercase()),
                    Direction::Upper => out.extend(c.to_uppercase()),
                },
            }
        }
        out
    }

    fn lookup(
        &self,
        text: &str,
        index: usize,
        locale: &Locale,
        direction: Direction,
    ) -> CaseMapping {
        self.select(&Context::new(text, locale), index, direction)
    }

    fn select(&self, context: &Context<'_>, index: usize, direction: Direction) -> CaseMapping {
        let Some(c) = char_at(context.text, index) else {
            return CaseMapping::Default;
        };

        let mut selected: Option<&CasingRule> = None;
        for rule in self.rules.rules_for(c) {
            if rule
                .language
                .is_some_and(|lang| lang != context.locale.language())
            {
                continue;
            }
            if !self.condition_met(context, index, rule.condition) {
                continue;
            }
            selected = Some(rule);
            if rule.language.is_some() {
                break;
            }
        }

        match selected {
            Some(rule) => CaseMapping::from_replacement(match direction {
                Direction::Lower => rule.lower,
                Direction::Upper => rule.upper,
            }),
            None => CaseMapping::Default,
        }
    }

    fn condition_met(&self, context: &Context<'_>, index: usize, condition: Condition) -> bool {
        let text = context.text;
        match condition {
            Condition::None => true,
            Condition::FinalCased => self.is_final_cased(context, index),
            Condition::AfterSoftDotted => self.is_after_soft_dotted(text, index),
            Condition::MoreAbove => self.is_more_above(text, index),
            Condition::AfterI => self.is_after_i(text, index),
            Condition::NotBeforeDot => !self.is_before_dot(text, index),
        }
    }

    fn is_starter_or_above(&self, c: char) -> bool {
        let class = self.classifier.combining_class(c);
        class == CanonicalCombiningClass::NotReordered || class == CanonicalCombiningClass::Above
    }

    fn is_word_boundary(&self, context: &Context<'_>, offset: usize) -> bool {
        context
            .boundaries
            .get_or_init(|| self.boundaries.boundaries(context.text, context.locale))
            .binary_search(&offset)
            .is_ok()
    }

    /// A cased char precedes `index` within its word and none follows.
    fn is_final_cased(&self, context: &Context<'_>, index: usize) -> bool {
        let text = context.text;
        let mut i = index;
        while !self.is_word_boundary(context, i) {
            let Some(c) = text[..i].chars().next_back() else {
                return false;
            };
            if self.classifier.is_cased(c) {
                return !self.has_cased_after(context, index);
            }
            i -= c.len_utf8();
        }
        false
    }

    fn has_cased_after(&self, context: &Context<'_>, index: usize) -> bool {
        let text = context.text;
        let mut i = index + char_at(text, index).map_or(0, char::len_utf8);
        while i < text.len() && !self.is_word_boundary(context, i) {
            let Some(c) = text[i..].chars().next() else {
                break;
            };
            if self.classifier.is_cased(c) {
                return true;
            }
            i += c.len_utf8();
        }
        false
    }

    fn is_after_soft_dotted(&self, text: &str, index: usize) -> bool {
        for c in text[..index].chars().rev() {
            if self.classifier.is_soft_dotted(c) {
                return true;
            }
            if self.is_starter_or_above(c) {
                return false;
            }
        }
        false
    }

    fn is_more_above(&self, text: &str, index: usize) -> bool {
        for c in following(text, index).chars() {
            let class = self.classifier.combining_class(c);
            if class == CanonicalCombiningClass::Above {
                return true;
            }
            if class == CanonicalCombiningClass::NotReordered {
                return false;
            }
        }
        false
    }

    fn is_after_i(&self, text: &str, index: usize) -> bool {
        for c in text[..index].chars().rev() {
            if c == 'I' {
                return true;
            }
            if self.is_starter_or_above(c) {
                return false;
            }
        }
        false
    }

    fn is_before_dot(&self, text: &str, index: usize) -> bool {
        for c in following(text, index).chars() {
            if c == '\u{0307}' {
                return true;
            }
            if self.is_starter_or_above(c) {
                return false;
            }
        }
        false
    }
}

/// One text under conversion. Word boundaries are resolved on the first
/// final-sigma check and reused for the rest of the text.
struct Context<'a> {
    text: &'a str,
    locale: &'a Locale,
    boundaries: OnceCell<Vec<usize>>,
}

impl<'a> Context<'a> {
    fn new(text: &'a str, locale: &'a Locale) -> Self {
        Self {
            text,
            locale,
            boundaries: OnceCell::new(),
        }
    }
}

/// The character starting at byte `index`, if `index` is a char start.
fn char_at(text: &str, index: usize) -> Option<char> {
    text.get(index..)?.chars().next()
}

/// Text after the character starting at `index`.
fn following(text: &str, index: usize) -> &str {
    let start = index + char_at(text, index).map_or(0, char::len_utf8);
    text.get(start..).unwrap_or_default()
}
