//! The parse pipeline: normalize, detect TOC, classify, build, flatten.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classify::LineClassifier;
use crate::config::ParserConfig;
use crate::error::{Result, StructureError};
use crate::hierarchy::{HierarchyBuilder, SectionNode};
use crate::mapper::{Chunk, FlatArticle, PersistenceMapper};
use crate::normalize::normalize_document;
use crate::patterns::PatternLibrary;
use crate::toc::TocDetector;
use crate::types::{Diagnostic, DocumentMetadata, ElementType, Line, TocRange};

/// Line and node counts for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_lines: usize,
    pub blank_lines: usize,
    /// Lines inside the table of contents.
    pub ignored_lines: usize,
    pub branch_headers: usize,
    pub chapter_headers: usize,
    pub article_headers: usize,
    pub orphaned_lines: usize,
}

/// Everything a parse produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub metadata: DocumentMetadata,
    pub tree: Vec<SectionNode>,
    pub articles: Vec<FlatArticle>,
    pub chunks: Vec<Chunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc: Option<TocRange>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ParseStats,
}

/// Reusable parser.
///
/// Holds no per-document state, so one instance (or clones sharing the same
/// library) can parse many documents, concurrently if needed.
#[derive(Debug, Clone)]
pub struct StructureParser {
    library: Arc<PatternLibrary>,
    config: ParserConfig,
}

impl Default for StructureParser {
    fn default() -> Self {
        let config = ParserConfig::default();
        Self::new(Arc::new(PatternLibrary::new(config.max_ordinal)), config)
    }
}

impl StructureParser {
    #[must_use]
    pub fn new(library: Arc<PatternLibrary>, config: ParserConfig) -> Self {
        Self { library, config }
    }

    #[must_use]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse text without metadata.
    ///
    /// # Errors
    /// Returns `StructureError::EmptyInput` if the text holds nothing but
    /// whitespace and bidi controls.
    pub fn parse_text(&self, text: &str) -> Result<ParsedDocument> {
        self.parse(text, DocumentMetadata::default())
    }

    /// Reconstruct the structure of one document.
    ///
    /// The metadata is returned untouched alongside the result. Anything
    /// short of empty input yields a result; degraded conditions are listed
    /// in `diagnostics`.
    ///
    /// # Errors
    /// Returns `StructureError::EmptyInput` if the text holds nothing but
    /// whitespace and bidi controls.
    pub fn parse(&self, text: &str, metadata: DocumentMetadata) -> Result<ParsedDocument> {
        let lines = normalize_document(text);
        if !lines.iter().any(Line::has_text) {
            return Err(StructureError::EmptyInput);
        }
        let mut stats = ParseStats {
            total_lines: lines.len(),
            blank_lines: lines.iter().filter(|line| line.is_blank()).count(),
            ..ParseStats::default()
        };
        tracing::debug!(
            lines = stats.total_lines,
            name = metadata.name.as_deref().unwrap_or(""),
            "Parsing document"
        );

        let detection = TocDetector::new(&self.library, &self.config).detect(&lines);
        let mut diagnostics = detection.diagnostics;

        let classification = LineClassifier::new(&self.library, detection.range).classify(lines);
        diagnostics.extend(classification.diagnostics);

        for classified in &classification.lines {
            match classified.element_type {
                ElementType::BranchHeader => stats.branch_headers += 1,
                ElementType::ChapterHeader => stats.chapter_headers += 1,
                ElementType::ArticleHeader => stats.article_headers += 1,
                ElementType::Ignored => stats.ignored_lines += 1,
                ElementType::Body => {}
            }
        }

        let hierarchy = HierarchyBuilder::build(&classification.lines);
        diagnostics.extend(hierarchy.diagnostics);
        stats.orphaned_lines = hierarchy.orphaned_lines;

        let (articles, chunks) = PersistenceMapper::map(&hierarchy.roots);

        tracing::info!(
            branches = stats.branch_headers,
            chapters = stats.chapter_headers,
            articles = articles.len(),
            ignored = stats.ignored_lines,
            diagnostics = diagnostics.len(),
            "Parsed document structure"
        );

        Ok(ParsedDocument {
            metadata,
            tree: hierarchy.roots,
            articles,
            chunks,
            toc: detection.range,
            diagnostics,
            stats,
        })
    }
}
