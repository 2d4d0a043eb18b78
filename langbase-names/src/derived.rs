//! Algorithmically derived character names.
//!
//! Hangul syllables and the large ideograph ranges are not stored in the
//! name resource. Their names follow Unicode rules NR1 (Hangul) and NR2
//! (prefix plus hexadecimal code point).

const HANGUL_BASE: u32 = 0xAC00;
const HANGUL_V_COUNT: u32 = 21;
const HANGUL_T_COUNT: u32 = 28;
const HANGUL_N_COUNT: u32 = HANGUL_V_COUNT * HANGUL_T_COUNT;
const HANGUL_S_COUNT: u32 = 19 * HANGUL_N_COUNT;
const HANGUL_PREFIX: &str = "HANGUL SYLLABLE ";

const JAMO_L: [&str; 19] = [
    "G", "GG", "N", "D", "DD", "R", "M", "B", "BB", "S", "SS", "", "J", "JJ", "C", "K", "T", "P",
    "H",
];

const JAMO_V: [&str; 21] = [
    "A", "AE", "YA", "YAE", "EO", "E", "YEO", "YE", "O", "WA", "WAE", "OE", "YO", "U", "WEO", "WE",
    "WI", "YU", "EU", "YI", "I",
];

const JAMO_T: [&str; 28] = [
    "", "G", "GG", "GS", "N", "NJ", "NH", "D", "L", "LG", "LM", "LB", "LS", "LT", "LP", "LH", "M",
    "B", "BS", "S", "SS", "NG", "J", "C", "K", "T", "P", "H",
];

/// Ranges named `PREFIX` + uppercase hex code point.
const PREFIXED_RANGES: &[(u32, u32, &str)] = &[
    (0x3400, 0x4DBF, "CJK UNIFIED IDEOGRAPH-"),
    (0x4E00, 0x9FFF, "CJK UNIFIED IDEOGRAPH-"),
    (0x17000, 0x187F7, "TANGUT IDEOGRAPH-"),
    (0x18B00, 0x18CD5, "KHITAN SMALL SCRIPT CHARACTER-"),
    (0x18D00, 0x18D08, "TANGUT IDEOGRAPH-"),
    (0x1B170, 0x1B2FB, "NUSHU CHARACTER-"),
    (0x20000, 0x2A6DF, "CJK UNIFIED IDEOGRAPH-"),
    (0x2A700, 0x2B738, "CJK UNIFIED IDEOGRAPH-"),
    (0x2B740, 0x2B81D, "CJK UNIFIED IDEOGRAPH-"),
    (0x2B820, 0x2CEA1, "CJK UNIFIED IDEOGRAPH-"),
    (0x2CEB0, 0x2EBE0, "CJK UNIFIED IDEOGRAPH-"),
    (0x30000, 0x3134A, "CJK UNIFIED IDEOGRAPH-"),
];

/// Derived name of `code_point`, if it falls in a derived range.
pub fn derived_name(code_point: u32) -> Option<String> {
    if (HANGUL_BASE..HANGUL_BASE + HANGUL_S_COUNT).contains(&code_point) {
        let s = code_point - HANGUL_BASE;
        let l = (s / HANGUL_N_COUNT) as usize;
        let v = ((s % HANGUL_N_COUNT) / HANGUL_T_COUNT) as usize;
        let t = (s % HANGUL_T_COUNT) as usize;
        return Some(format!("{HANGUL_PREFIX}{}{}{}", JAMO_L[l], JAMO_V[v], JAMO_T[t]));
    }

    PREFIXED_RANGES
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&code_point))
        .map(|(_, _, prefix)| format!("{prefix}{code_point:04X}"))
}

/// Code point with derived name `name`. `name` must already be upper-case.
pub fn parse_derived_name(name: &str) -> Option<u32> {
    if let Some(syllable) = name.strip_prefix(HANGUL_PREFIX) {
        return parse_hangul(syllable);
    }

    PREFIXED_RANGES.iter().find_map(|(start, end, prefix)| {
        let hex = name.strip_prefix(prefix)?;
        let code_point = u32::from_str_radix(hex, 16).ok()?;
        // Reject non-canonical spellings such as leading zeros or "+".
        let canonical = format!("{code_point:04X}");
        ((*start..=*end).contains(&code_point) && canonical == hex).then_some(code_point)
    })
}

fn parse_hangul(syllable: &str) -> Option<u32> {
    if syllable.is_empty() {
        return None;
    }
    for (l, lead) in JAMO_L.iter().enumerate() {
        let Some(rest) = syllable.strip_prefix(lead) else {
            continue;
        };
        for (v, vowel) in JAMO_V.iter().enumerate() {
            let Some(tail) = rest.strip_prefix(vowel) else {
                continue;
            };
            if let Some(t) = JAMO_T.iter().position(|trail| *trail == tail) {
                return Some(
                    HANGUL_BASE
                        + (l as u32) * HANGUL_N_COUNT
                        + (v as u32) * HANGUL_T_COUNT
                        + t as u32,
                );
            }
        }
    }
    None
}
