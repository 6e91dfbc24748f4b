//! Per-line text normalization.
//!
//! Builds the comparison key every matching stage works on, without touching
//! the raw text that ends up as content. The key is:
//!
//! - NFKC-folded character by character, which turns Arabic presentation
//!   forms and ligatures (common in PDF extractions) back into base letters
//! - stripped of harakat, tatweel, Quranic annotation marks and bidi controls
//! - folded for spelling variants (`أ إ آ ٱ` → `ا`, `ى` → `ي`, `ة` → `ه`)
//! - ASCII for Arabic-Indic and extended Arabic-Indic digits
//! - lowercased, with whitespace runs collapsed to one space and trimmed
//!
//! Every key byte remembers the raw byte offset it came from, so a match on
//! the key can be cut back out of the original line.

use unicode_normalization::UnicodeNormalization;

use crate::types::Line;

/// Normalize one line.
#[must_use]
pub fn normalize_line(index: u32, raw: &str) -> Line {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    let (normalized_key, key_offsets) = build_key(raw);
    Line {
        index,
        raw: raw.to_string(),
        normalized_key,
        key_offsets,
    }
}

/// Split a document into normalized lines, numbered from 1.
///
/// Blank lines are kept so that line numbers stay equal to the source's.
#[must_use]
pub fn normalize_document(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .map(|(i, raw)| normalize_line(u32::try_from(i + 1).unwrap_or(u32::MAX), raw))
        .collect()
}

/// Comparison key for arbitrary text, e.g. a pattern surface form.
///
/// # Examples
/// ```
/// use statute_structure::normalize::comparison_key;
///
/// assert_eq!(comparison_key("  المادَّة   الأولى "), "الماده الاولي");
/// assert_eq!(comparison_key("Article ٣"), "article 3");
/// ```
#[must_use]
pub fn comparison_key(text: &str) -> String {
    build_key(text).0
}

/// Whether `text` holds anything besides whitespace and bidi controls.
///
/// A line of tatweel or a lone diacritic has an empty comparison key but
/// still counts as text here.
#[must_use]
pub fn has_visible_text(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace() && !is_bidi_control(c))
}

/// Whether `c` is a bidi formatting or zero-width control character.
#[must_use]
pub fn is_bidi_control(c: char) -> bool {
    matches!(
        c,
        '\u{061C}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}

/// Arabic combining marks and tatweel that carry no identity for matching.
fn is_arabic_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}' | '\u{06D6}'..='\u{06ED}'
    )
}

fn fold_char(c: char) -> Option<char> {
    if is_arabic_mark(c) || is_bidi_control(c) {
        return None;
    }
    let folded = match c {
        'آ' | 'أ' | 'إ' | 'ٱ' => 'ا',
        'ى' => 'ي',
        'ة' => 'ه',
        '\u{0660}'..='\u{0669}' => ascii_digit(u32::from(c) - 0x0660),
        '\u{06F0}'..='\u{06F9}' => ascii_digit(u32::from(c) - 0x06F0),
        other => other,
    };
    Some(folded)
}

fn ascii_digit(value: u32) -> char {
    char::from_digit(value, 10).unwrap_or('0')
}

/// Key plus offset table (`key.len() + 1` entries).
fn build_key(raw: &str) -> (String, Vec<usize>) {
    let mut key = String::with_capacity(raw.len());
    let mut offsets: Vec<usize> = Vec::with_capacity(raw.len() + 1);
    let mut pending_space: Option<usize> = None;

    let push = |key: &mut String, offsets: &mut Vec<usize>, c: char, at: usize| {
        key.push(c);
        offsets.extend(std::iter::repeat(at).take(c.len_utf8()));
    };

    for (pos, ch) in raw.char_indices() {
        for decomposed in std::iter::once(ch).nfkc() {
            if decomposed.is_whitespace() {
                if !key.is_empty() && pending_space.is_none() {
                    pending_space = Some(pos);
                }
                continue;
            }
            let Some(folded) = fold_char(decomposed) else {
                continue;
            };
            for lower in folded.to_lowercase() {
                if let Some(space_at) = pending_space.take() {
                    push(&mut key, &mut offsets, ' ', space_at);
                }
                push(&mut key, &mut offsets, lower, pos);
            }
        }
    }

    offsets.push(raw.len());
    (key, offsets)
}
