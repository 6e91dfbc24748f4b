//! Core data types shared by the parsing stages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::patterns::HeaderMatch;

/// Structural level a heading announces.
///
/// The declaration order is also the precedence order used when a line
/// matches more than one kind: Branch wins over Chapter, Chapter over Article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderKind {
    /// Top-level division (الباب, Part, Book).
    Branch,

    /// Second-level division (الفصل).
    Chapter,

    /// Leaf provision (المادة).
    Article,
}

impl HeaderKind {
    /// All kinds in precedence order.
    pub const ALL: [Self; 3] = [Self::Branch, Self::Chapter, Self::Article];

    /// Lowercase name used in output and diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Chapter => "chapter",
            Self::Article => "article",
        }
    }

    /// Element type assigned to a header line of this kind.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Branch => ElementType::BranchHeader,
            Self::Chapter => ElementType::ChapterHeader,
            Self::Article => ElementType::ArticleHeader,
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    BranchHeader,
    ChapterHeader,
    ArticleHeader,
    Body,
    /// Inside the detected table of contents.
    Ignored,
}

impl ElementType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BranchHeader => "branch_header",
            Self::ChapterHeader => "chapter_header",
            Self::ArticleHeader => "article_header",
            Self::Body => "body",
            Self::Ignored => "ignored",
        }
    }

    /// Header kind for header element types.
    #[must_use]
    pub fn header_kind(&self) -> Option<HeaderKind> {
        match self {
            Self::BranchHeader => Some(HeaderKind::Branch),
            Self::ChapterHeader => Some(HeaderKind::Chapter),
            Self::ArticleHeader => Some(HeaderKind::Article),
            Self::Body | Self::Ignored => None,
        }
    }
}

/// One input line with its comparison key.
///
/// `raw` is the source text exactly as received (minus the line terminator).
/// `normalized_key` is only ever used for matching; stored content always
/// comes from `raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// 1-based line number in the input.
    pub index: u32,

    /// Source text.
    pub raw: String,

    /// Diacritic- and whitespace-insensitive comparison key.
    pub normalized_key: String,

    /// Raw byte offset for every key byte, plus one trailing entry equal to
    /// `raw.len()`.
    #[serde(skip)]
    pub(crate) key_offsets: Vec<usize>,
}

impl Line {
    /// Trimmed source text, used as content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.raw.trim()
    }

    /// Whether the line carries no text at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.normalized_key.is_empty()
    }

    /// Whether the source line shows anything, even if only tatweel or
    /// diacritics that the comparison key drops.
    #[must_use]
    pub fn has_text(&self) -> bool {
        crate::normalize::has_visible_text(&self.raw)
    }

    /// Raw text covered by the key byte range `start..end`, trimmed.
    ///
    /// Characters dropped from the key (diacritics, bidi marks) that sit
    /// between `start` and `end` are included.
    #[must_use]
    pub fn raw_span(&self, start: usize, end: usize) -> &str {
        let from = self.raw_offset(start);
        let to = self.raw_offset(end).max(from);
        self.raw[from..to].trim()
    }

    /// Raw text from key byte `start` to the end of the line, trimmed.
    #[must_use]
    pub fn raw_tail(&self, start: usize) -> &str {
        self.raw[self.raw_offset(start)..].trim()
    }

    fn raw_offset(&self, key_pos: usize) -> usize {
        self.key_offsets
            .get(key_pos)
            .copied()
            .unwrap_or(self.raw.len())
    }
}

/// A line after classification.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedLine<'lib> {
    pub line: Line,
    pub element_type: ElementType,
    /// Present for header lines only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<HeaderMatch<'lib>>,
}

/// How a table of contents was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionBasis {
    /// Dense run of page-numbered heading lines.
    Density,

    /// A "contents" title line introduced the listing.
    ExplicitTitle,
}

/// Confidence in the end boundary of a detected TOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TocBoundary {
    /// The real first heading was found after the listing.
    Refined,

    /// Refinement found nothing within its lookahead; the candidate end stands.
    Coarse,
}

/// Inclusive range of 1-based line numbers excluded as table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocRange {
    pub start_line: u32,
    pub end_line: u32,
    pub detection_basis: DetectionBasis,
    pub boundary: TocBoundary,
}

impl TocRange {
    /// Whether the 1-based line `index` is excluded.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        (self.start_line..=self.end_line).contains(&index)
    }

    /// Number of lines covered.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end_line - self.start_line + 1
    }

    /// A range is never empty; provided for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.boundary == TocBoundary::Coarse
    }
}

/// Category of a non-fatal condition met during a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A line matched markers of more than one kind.
    AmbiguousMatch,

    /// Body text before the first heading was dropped.
    OrphanedBody,

    /// No heading matched; the document was wrapped as a single article.
    NoStructureDetected,

    /// TOC refinement found no clean end boundary.
    TocBoundaryNotFound,

    /// Two siblings of the same kind carry the same ordinal.
    DuplicateOrdinal,

    /// A second, disjoint TOC candidate was not used.
    DiscardedTocCandidate,
}

/// A warning attached to the parse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// 1-based line the condition refers to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Document-level metadata, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,

    /// Any other caller-provided fields.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl DocumentMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_kind_precedence_order() {
        assert!(HeaderKind::Branch < HeaderKind::Chapter);
        assert!(HeaderKind::Chapter < HeaderKind::Article);
        assert_eq!(HeaderKind::ALL[0], HeaderKind::Branch);
    }

    #[test]
    fn test_element_type_header_kind() {
        assert_eq!(
            ElementType::ChapterHeader.header_kind(),
            Some(HeaderKind::Chapter)
        );
        assert_eq!(ElementType::Body.header_kind(), None);
        assert_eq!(HeaderKind::Article.element_type(), ElementType::ArticleHeader);
    }

    #[test]
    fn test_toc_range_contains() {
        let range = TocRange {
            start_line: 3,
            end_line: 7,
            detection_basis: DetectionBasis::Density,
            boundary: TocBoundary::Refined,
        };
        assert!(!range.contains(2));
        assert!(range.contains(3));
        assert!(range.contains(7));
        assert!(!range.contains(8));
        assert_eq!(range.len(), 5);
        assert!(!range.is_low_confidence());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(DiagnosticKind::OrphanedBody, Some(4), "dropped");
        assert_eq!(diag.to_string(), "line 4: dropped");
    }

    #[test]
    fn test_metadata_serialization_flattens_extra() {
        let metadata = DocumentMetadata::new("قانون العمل")
            .with_jurisdiction("KW")
            .with_field("year", "2010");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["name"], "قانون العمل");
        assert_eq!(json["jurisdiction"], "KW");
        assert_eq!(json["year"], "2010");
    }

    #[test]
    fn test_element_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ElementType::ArticleHeader).unwrap(),
            "\"article_header\""
        );
    }
}
