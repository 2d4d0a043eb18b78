//! Word-boundary oracle consumed by the final-sigma context.

use crate::locale::Locale;
use unicode_segmentation::UnicodeSegmentation;

/// Answers whether a byte offset in a text is a word boundary.
pub trait WordBoundaryOracle: Send + Sync {
    /// `offset` is a byte offset into `text`. The start and end of the text
    /// are always boundaries.
    fn is_boundary(&self, text: &str, offset: usize, locale: &Locale) -> bool;

    /// Every boundary offset of `text` in ascending order, including `0`
    /// and `text.len()`. Whole-string conversions resolve boundaries once
    /// through this and search the result.
    fn boundaries(&self, text: &str, locale: &Locale) -> Vec<usize> {
        text.char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .filter(|&offset| self.is_boundary(text, offset, locale))
            .collect()
    }
}

/// UAX #29 default word boundaries. Locale-independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordBoundaries;

impl WordBoundaryOracle for UnicodeWordBoundaries {
    fn is_boundary(&self, text: &str, offset: usize, _locale: &Locale) -> bool {
        if offset == 0 || offset >= text.len() {
            return true;
        }
        text.split_word_bound_indices()
            .map(|(start, _)| start)
            .take_while(|&start| start <= offset)
            .any(|start| start == offset)
    }

    fn boundaries(&self, text: &str, _locale: &Locale) -> Vec<usize> {
        let mut offsets: Vec<usize> = text
            .split_word_bound_indices()
            .map(|(start, _)| start)
            .collect();
        offsets.push(text.len());
        offsets
    }
}
