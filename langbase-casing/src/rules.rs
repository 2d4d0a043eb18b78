//! Conditional special-casing rules.
//!
//! The standard table is the conditional part of SpecialCasing: mappings
//! that depend on the surrounding text, the locale's language, or both.
//! Declaration order matters; see [`crate::ConditionalCasing`] for how a
//! rule is chosen.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Context a rule requires around the mapped character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Always applies.
    None,
    /// Preceded by a cased letter and not followed by one, within a word.
    FinalCased,
    /// Preceded by a soft-dotted letter with no intervening class 0/230 char.
    AfterSoftDotted,
    /// Followed by a class 230 mark with no intervening class 0 char.
    MoreAbove,
    /// Preceded by `I` with no intervening class 0/230 char.
    AfterI,
    /// Not followed by U+0307 before the next class 0/230 char.
    NotBeforeDot,
}

/// One conditional mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasingRule {
    pub code_point: char,
    pub lower: &'static [char],
    pub upper: &'static [char],
    /// Language subtag the rule is limited to; `None` applies everywhere.
    pub language: Option<&'static str>,
    pub condition: Condition,
}

impl CasingRule {
    pub const fn new(
        code_point: char,
        lower: &'static [char],
        upper: &'static [char],
        language: Option<&'static str>,
        condition: Condition,
    ) -> Self {
        Self {
            code_point,
            lower,
            upper,
            language,
            condition,
        }
    }
}

#[rustfmt::skip]
const STANDARD_RULES: [CasingRule; 17] = [
    // Final sigma
    CasingRule::new('\u{03A3}', &['\u{03C2}'], &['\u{03A3}'], None, Condition::FinalCased), // GREEK CAPITAL LETTER SIGMA
    CasingRule::new('\u{0130}', &['\u{0069}', '\u{0307}'], &['\u{0130}'], None, Condition::None), // LATIN CAPITAL LETTER I WITH DOT ABOVE

    // Lithuanian
    CasingRule::new('\u{0307}', &['\u{0307}'], &[], Some("lt"), Condition::AfterSoftDotted), // COMBINING DOT ABOVE
    CasingRule::new('\u{0049}', &['\u{0069}', '\u{0307}'], &['\u{0049}'], Some("lt"), Condition::MoreAbove), // LATIN CAPITAL LETTER I
    CasingRule::new('\u{004A}', &['\u{006A}', '\u{0307}'], &['\u{004A}'], Some("lt"), Condition::MoreAbove), // LATIN CAPITAL LETTER J
    CasingRule::new('\u{012E}', &['\u{012F}', '\u{0307}'], &['\u{012E}'], Some("lt"), Condition::MoreAbove), // LATIN CAPITAL LETTER I WITH OGONEK
    CasingRule::new('\u{00CC}', &['\u{0069}', '\u{0307}', '\u{0300}'], &['\u{00CC}'], Some("lt"), Condition::None), // LATIN CAPITAL LETTER I WITH GRAVE
    CasingRule::new('\u{00CD}', &['\u{0069}', '\u{0307}', '\u{0301}'], &['\u{00CD}'], Some("lt"), Condition::None), // LATIN CAPITAL LETTER I WITH ACUTE
    CasingRule::new('\u{0128}', &['\u{0069}', '\u{0307}', '\u{0303}'], &['\u{0128}'], Some("lt"), Condition::None), // LATIN CAPITAL LETTER I WITH TILDE

    // Turkish and Azeri
    CasingRule::new('\u{0130}', &['\u{0069}'], &['\u{0130}'], Some("tr"), Condition::None), // LATIN CAPITAL LETTER I WITH DOT ABOVE
    CasingRule::new('\u{0130}', &['\u{0069}'], &['\u{0130}'], Some("az"), Condition::None), // LATIN CAPITAL LETTER I WITH DOT ABOVE
    CasingRule::new('\u{0307}', &[], &['\u{0307}'], Some("tr"), Condition::AfterI), // COMBINING DOT ABOVE
    CasingRule::new('\u{0307}', &[], &['\u{0307}'], Some("az"), Condition::AfterI), // COMBINING DOT ABOVE
    CasingRule::new('\u{0049}', &['\u{0131}'], &['\u{0049}'], Some("tr"), Condition::NotBeforeDot), // LATIN CAPITAL LETTER I
    CasingRule::new('\u{0049}', &['\u{0131}'], &['\u{0049}'], Some("az"), Condition::NotBeforeDot), // LATIN CAPITAL LETTER I
    CasingRule::new('\u{0069}', &['\u{0069}'], &['\u{0130}'], Some("tr"), Condition::None), // LATIN SMALL LETTER I
    CasingRule::new('\u{0069}', &['\u{0069}'], &['\u{0130}'], Some("az"), Condition::None), // LATIN SMALL LETTER I
];

static STANDARD: LazyLock<Arc<RuleTable>> = LazyLock::new(|| {
    let table = RuleTable::new(STANDARD_RULES.to_vec());
    log::debug!(
        "Indexed {} conditional casing rules over {} code points",
        table.rules.len(),
        table.by_code_point.len()
    );
    Arc::new(table)
});

/// Ordered rules with an index from source character to rule positions.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<CasingRule>,
    by_code_point: HashMap<char, Vec<usize>>,
}

impl RuleTable {
    pub fn new(rules: Vec<CasingRule>) -> Self {
        let mut by_code_point: HashMap<char, Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            by_code_point
                .entry(rule.code_point)
                .or_default()
                .push(position);
        }
        Self {
            rules,
            by_code_point,
        }
    }

    /// The shared SpecialCasing table, indexed once per process.
    pub fn standard() -> Arc<RuleTable> {
        Arc::clone(&STANDARD)
    }

    pub fn rules(&self) -> &[CasingRule] {
        &self.rules
    }

    /// Rules for `c` in declaration order.
    pub fn rules_for(&self, c: char) -> impl Iterator<Item = &CasingRule> + '_ {
        self.by_code_point
            .get(&c)
            .into_iter()
            .flatten()
            .map(|&position| &self.rules[position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_keeps_declaration_order() {
        let table = RuleTable::standard();
        let languages: Vec<Option<&str>> =
            table.rules_for('\u{0130}').map(|r| r.language).collect();
        assert_eq!(languages, vec![None, Some("tr"), Some("az")]);

        let conditions: Vec<Condition> = table.rules_for('I').map(|r| r.condition).collect();
        assert_eq!(
            conditions,
            vec![Condition::MoreAbove, Condition::NotBeforeDot, Condition::NotBeforeDot]
        );
    }

    #[test]
    fn test_unmapped_char_has_no_rules() {
        assert_eq!(RuleTable::standard().rules_for('a').count(), 0);
    }

    #[test]
    fn test_standard_is_shared() {
        assert!(Arc::ptr_eq(&RuleTable::standard(), &RuleTable::standard()));
        assert_eq!(RuleTable::standard().rules().len(), 17);
    }
}
