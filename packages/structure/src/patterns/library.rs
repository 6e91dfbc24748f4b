//! The pattern library: ordinal definitions plus marker matching.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::ordinals::{canonical_text, surface_forms, MAX_WORD_ORDINAL};
use super::vocabulary::{
    default_keywords, Vocabulary, FILLERS, REFERENCE_CONTINUATIONS, SUFFIXES,
};
use crate::config::DEFAULT_MAX_ORDINAL;
use crate::error::{Result, StructureError};
use crate::normalize::{comparison_key, is_bidi_control};
use crate::types::{HeaderKind, Line};

/// Dotted (or underscored) leaders followed by a page number.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEADER_PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\.{2,}|…+|_{2,}|·{2,}|-{3,})\s*\d{1,4}$").expect("valid regex")
});

/// Page number separated from the title by a tab or a wide gap in the raw text.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SPACED_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S(?:\t|\s{2,})\d{1,4}\s*$").expect("valid regex"));

/// Characters skipped between an ordinal and the title.
const TITLE_SEPARATORS: [char; 13] = [
    ' ', ':', '：', '-', '–', '—', '.', '،', ',', ')', ']', '؛', ';',
];

/// One ordinal of one kind, with every surface form it can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternDefinition {
    pub kind: HeaderKind,

    /// Canonical spelling of the ordinal.
    pub ordinal_text: String,

    pub ordinal_value: u16,

    /// Surface forms as written (not normalized).
    pub surface_variants: Vec<String>,
}

/// A successful marker match on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderMatch<'lib> {
    pub definition: &'lib PatternDefinition,

    /// Ordinal as it appears in the source, suffix included.
    pub number: String,

    /// Normalized suffix ("مكرر", "bis"), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Residual text after the marker.
    pub title: String,

    /// Whether the line ends in a page reference.
    pub has_page_number: bool,

    /// Other kinds that matched the same line and lost on precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_with: Vec<HeaderKind>,
}

impl HeaderMatch<'_> {
    #[must_use]
    pub fn kind(&self) -> HeaderKind {
        self.definition.kind
    }

    #[must_use]
    pub fn ordinal_value(&self) -> u16 {
        self.definition.ordinal_value
    }

    /// Whether `other` names the same ordinal of the same kind.
    #[must_use]
    pub fn same_ordinal(&self, other: &HeaderMatch<'_>) -> bool {
        self.kind() == other.kind()
            && self.ordinal_value() == other.ordinal_value()
            && self.suffix == other.suffix
    }
}

/// Patterns for one kind.
#[derive(Debug, Clone)]
struct KindPatterns {
    /// Normalized keywords, longest first.
    keywords: Vec<String>,

    /// Definitions indexed by `ordinal_value - 1`.
    definitions: Vec<PatternDefinition>,

    /// Normalized word variants with their definition index, longest first.
    words: Vec<(String, usize)>,
}

impl KindPatterns {
    fn new(kind: HeaderKind, extra_keywords: &[String], max_ordinal: u16) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for keyword in default_keywords(kind)
            .iter()
            .map(|k| (*k).to_string())
            .chain(extra_keywords.iter().cloned())
        {
            let key = comparison_key(&keyword);
            let reversed: String = key.chars().rev().collect();
            keywords.push(key.clone());
            if key.chars().any(is_arabic_letter) {
                keywords.push(reversed);
            }
        }
        dedup_longest_first(&mut keywords);

        let mut definitions = Vec::with_capacity(usize::from(max_ordinal));
        let mut words: Vec<(String, usize)> = Vec::new();
        let mut seen_words: HashSet<String> = HashSet::new();

        for value in 1..=max_ordinal {
            let surface_variants = surface_forms(value);
            let index = definitions.len();
            if value <= MAX_WORD_ORDINAL {
                for variant in &surface_variants {
                    if variant.chars().all(|c| c.is_ascii_digit()) {
                        continue;
                    }
                    let key = comparison_key(variant);
                    // First value to claim a spelling keeps it
                    if seen_words.insert(key.clone()) {
                        words.push((key, index));
                    }
                }
            }
            definitions.push(PatternDefinition {
                kind,
                ordinal_text: canonical_text(kind, value),
                ordinal_value: value,
                surface_variants,
            });
        }

        // Longest first so "الثاني عشر" is tried before "الثاني"; ties broken
        // by text for a stable order.
        words.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });

        Self {
            keywords,
            definitions,
            words,
        }
    }

    fn definition(&self, value: u32) -> Option<&PatternDefinition> {
        let index = usize::try_from(value).ok()?.checked_sub(1)?;
        self.definitions.get(index)
    }

    /// Match this kind's grammar at the start of `line`.
    fn match_line<'lib>(&'lib self, line: &Line) -> Option<HeaderMatch<'lib>> {
        let key = line.normalized_key.as_str();

        let keyword = self
            .keywords
            .iter()
            .find(|kw| key.starts_with(kw.as_str()) && keyword_boundary(key, kw.len()))?;
        let mut pos = skip_spaces(key, keyword.len());

        for filler in FILLERS {
            let end = pos + filler.len();
            if key[pos..].starts_with(filler) && word_boundary(key, end) {
                pos = skip_spaces(key, end);
                break;
            }
        }

        let (definition, ordinal_start, ordinal_end) = self.match_ordinal(key, pos)?;
        let mut number_end = ordinal_end;
        let mut after = ordinal_end;

        // Closing bracket of "(12)" belongs to neither number nor title
        let rest = skip_spaces(key, after);
        if key[rest..].starts_with(')') || key[rest..].starts_with(']') {
            after = rest + 1;
        }

        let mut suffix = None;
        let suffix_start = skip_spaces(key, after);
        for candidate in SUFFIXES {
            let end = suffix_start + candidate.len();
            if key[suffix_start..].starts_with(candidate) && word_boundary(key, end) {
                suffix = Some(candidate.to_string());
                number_end = end;
                after = end;
                break;
            }
        }

        let tail = key[after..].trim();
        let title_start = after
            + key[after..]
                .char_indices()
                .find(|(_, c)| !TITLE_SEPARATORS.contains(c))
                .map_or(key.len() - after, |(i, _)| i);
        let skipped_separator = key[after..title_start].trim().chars().next().is_some();

        if !skipped_separator {
            let first_word = key[title_start..].split(' ').next().unwrap_or("");
            if REFERENCE_CONTINUATIONS.contains(&first_word) {
                return None;
            }
        }

        let title = line
            .raw_tail(title_start)
            .trim_matches(|c: char| is_bidi_control(c) || c.is_whitespace())
            .to_string();
        let has_page_number = is_page_reference(tail, &line.raw);

        Some(HeaderMatch {
            definition,
            number: line.raw_span(ordinal_start, number_end).to_string(),
            suffix,
            title,
            has_page_number,
            ambiguous_with: Vec::new(),
        })
    }

    /// Returns the definition and the key span of the ordinal itself.
    fn match_ordinal(&self, key: &str, pos: usize) -> Option<(&PatternDefinition, usize, usize)> {
        let mut start = pos;
        if key[start..].starts_with('(') || key[start..].starts_with('[') {
            start = skip_spaces(key, start + 1);
        }

        let digits = key[start..]
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, c)| i + c.len_utf8());
        if let Some(len) = digits {
            let end = start + len;
            if !word_boundary(key, end) {
                return None;
            }
            // Beyond the registered range: not a header
            let value: u32 = key[start..end].parse().ok()?;
            return self.definition(value).map(|d| (d, start, end));
        }

        self.words.iter().find_map(|(word, index)| {
            let end = start + word.len();
            (key[start..].starts_with(word.as_str()) && word_boundary(key, end))
                .then(|| (&self.definitions[*index], start, end))
        })
    }
}

/// Immutable catalog of heading patterns.
///
/// Built once and shared by reference across parses; it holds no interior
/// mutability, so concurrent reads need no synchronization.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    kinds: Vec<KindPatterns>,
    max_ordinal: u16,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ORDINAL)
    }
}

impl PatternLibrary {
    /// Library with the built-in vocabulary and ordinals `1..=max_ordinal`.
    #[must_use]
    pub fn new(max_ordinal: u16) -> Self {
        Self::build(&Vocabulary::default(), max_ordinal)
    }

    /// Library with additional caller-supplied keywords.
    ///
    /// # Errors
    /// Returns `StructureError::InvalidVocabulary` for blank keywords and
    /// `StructureError::InvalidConfig` for a zero `max_ordinal`.
    pub fn with_vocabulary(vocabulary: &Vocabulary, max_ordinal: u16) -> Result<Self> {
        if max_ordinal == 0 {
            return Err(StructureError::InvalidConfig(
                "max_ordinal must be at least 1".to_string(),
            ));
        }
        vocabulary.validate()?;
        Ok(Self::build(vocabulary, max_ordinal))
    }

    fn build(vocabulary: &Vocabulary, max_ordinal: u16) -> Self {
        let kinds = HeaderKind::ALL
            .iter()
            .map(|kind| KindPatterns::new(*kind, vocabulary.keywords(*kind), max_ordinal))
            .collect();
        Self { kinds, max_ordinal }
    }

    /// Highest registered ordinal value.
    #[must_use]
    pub fn max_ordinal(&self) -> u16 {
        self.max_ordinal
    }

    fn kind(&self, kind: HeaderKind) -> &KindPatterns {
        // `kinds` is built from `HeaderKind::ALL`, in that order
        &self.kinds[kind as usize]
    }

    /// All definitions of a kind, ordered by value.
    #[must_use]
    pub fn definitions(&self, kind: HeaderKind) -> &[PatternDefinition] {
        &self.kind(kind).definitions
    }

    /// Definition of `kind` with `value`, if registered.
    #[must_use]
    pub fn definition(&self, kind: HeaderKind, value: u16) -> Option<&PatternDefinition> {
        self.kind(kind).definition(u32::from(value))
    }

    /// Normalized keywords of a kind in the order they are tried.
    #[must_use]
    pub fn keywords(&self, kind: HeaderKind) -> &[String] {
        &self.kind(kind).keywords
    }

    /// Best match for a line across all kinds.
    ///
    /// Kinds are tried in precedence order (Branch, Chapter, Article). When
    /// more than one matches, the first wins and the others are listed in
    /// `ambiguous_with`.
    #[must_use]
    pub fn match_line(&self, line: &Line) -> Option<HeaderMatch<'_>> {
        if line.is_blank() {
            return None;
        }
        let mut matches = self.kinds.iter().filter_map(|k| k.match_line(line));
        let mut best = matches.next()?;
        best.ambiguous_with = matches.map(|m| m.kind()).collect();
        Some(best)
    }
}

fn is_arabic_letter(c: char) -> bool {
    ('\u{0621}'..='\u{064A}').contains(&c)
}

/// Keyword end: anything but a letter may follow ("المادة12" is fine).
fn keyword_boundary(key: &str, pos: usize) -> bool {
    key[pos..].chars().next().map_or(true, |c| !c.is_alphabetic())
}

/// Word end: neither a letter nor a digit may follow.
fn word_boundary(key: &str, pos: usize) -> bool {
    key.get(pos..)
        .and_then(|rest| rest.chars().next())
        .map_or(key.len() == pos, |c| !c.is_alphanumeric())
}

fn skip_spaces(key: &str, pos: usize) -> usize {
    pos + key[pos..].len() - key[pos..].trim_start_matches(' ').len()
}

fn dedup_longest_first(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| !item.is_empty() && seen.insert(item.clone()));
    items.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
}

/// Whether a line ends in a page reference.
///
/// `tail` is the normalized text to inspect (after the ordinal for heading
/// lines, the whole key otherwise), `raw` the source line. Recognises dotted
/// leaders before a number, a bare number, and a number set off by a tab or
/// a wide gap.
///
/// # Examples
/// ```
/// use statute_structure::patterns::is_page_reference;
///
/// assert!(is_page_reference("مقدمه ........ 3", "مقدمة ........ 3"));
/// assert!(!is_page_reference("تسري احكام هذا القانون", "تسري أحكام هذا القانون"));
/// ```
#[must_use]
pub fn is_page_reference(tail: &str, raw: &str) -> bool {
    let tail = tail.trim_start_matches(TITLE_SEPARATORS);
    if !tail.is_empty() && tail.len() <= 4 && tail.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    LEADER_PAGE_NUMBER.is_match(tail) || (!tail.is_empty() && SPACED_PAGE_NUMBER.is_match(raw))
}
