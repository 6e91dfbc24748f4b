//! State machine turning classified lines into a tree.

use std::collections::HashMap;

use super::arena::{NodeId, SectionArena};
use super::node::SectionNode;
use crate::normalize::has_visible_text;
use crate::patterns::HeaderMatch;
use crate::types::{ClassifiedLine, Diagnostic, DiagnosticKind, ElementType, HeaderKind};

/// Result of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    /// Root-level nodes in document order.
    pub roots: Vec<SectionNode>,
    pub diagnostics: Vec<Diagnostic>,
    /// Non-blank body lines dropped for appearing before any heading.
    pub orphaned_lines: usize,
}

/// Ordinal identity among one parent's children.
type OrdinalKey = (Option<NodeId>, HeaderKind, u16, Option<String>);

/// Reduces the classified line stream into the Branch → Chapter → Article
/// tree.
///
/// Keeps one open slot per level. A heading closes every open node at its
/// own level and below, then opens a new node under the nearest open
/// ancestor. Body text goes to the deepest open node.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    arena: SectionArena,
    branch: Option<NodeId>,
    chapter: Option<NodeId>,
    article: Option<NodeId>,
    seen: HashMap<OrdinalKey, u32>,
    diagnostics: Vec<Diagnostic>,
    orphans: Vec<u32>,
    /// Every non-ignored body line, verbatim, for the flat-document fallback.
    raw_body: Vec<String>,
}

impl HierarchyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree for a whole document.
    #[must_use]
    pub fn build(lines: &[ClassifiedLine<'_>]) -> Hierarchy {
        let mut builder = Self::new();
        for line in lines {
            builder.push(line);
        }
        builder.finish()
    }

    /// Feed one classified line.
    pub fn push(&mut self, classified: &ClassifiedLine<'_>) {
        let line = &classified.line;
        match (classified.element_type, &classified.matched_pattern) {
            (ElementType::Ignored, _) => {}
            (ElementType::Body, _) | (_, None) => {
                self.raw_body.push(line.raw.clone());
                if line.is_blank() {
                    return;
                }
                let text = line.text().to_string();
                match self.article.or(self.chapter).or(self.branch) {
                    Some(open) => self.arena.push_content(open, text),
                    None => self.orphans.push(line.index),
                }
            }
            (ElementType::BranchHeader, Some(m)) => {
                self.article = None;
                self.chapter = None;
                self.branch = Some(self.open(None, m, line.index));
            }
            (ElementType::ChapterHeader, Some(m)) => {
                self.article = None;
                self.chapter = Some(self.open(self.branch, m, line.index));
            }
            (ElementType::ArticleHeader, Some(m)) => {
                let parent = self.chapter.or(self.branch);
                self.article = Some(self.open(parent, m, line.index));
            }
        }
    }

    fn open(&mut self, parent: Option<NodeId>, m: &HeaderMatch<'_>, line: u32) -> NodeId {
        let key = (parent, m.kind(), m.ordinal_value(), m.suffix.clone());
        if let Some(first) = self.seen.get(&key) {
            tracing::debug!(line, first, kind = %m.kind(), number = %m.number, "Duplicate ordinal");
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateOrdinal,
                Some(line),
                format!(
                    "{} '{}' repeats the ordinal first seen on line {first}; both kept",
                    m.kind(),
                    m.number
                ),
            ));
        } else {
            self.seen.insert(key, line);
        }
        self.arena.insert(parent, m.kind(), &m.number, &m.title)
    }

    /// Close all open nodes and produce the tree.
    ///
    /// A document without any heading becomes a single article wrapped in a
    /// synthetic branch and chapter. Its content is the source text as given,
    /// blank lines and indentation included, minus leading and trailing
    /// blank lines.
    #[must_use]
    pub fn finish(mut self) -> Hierarchy {
        if self.arena.is_empty() {
            return self.flat_fallback();
        }

        let orphaned_lines = self.orphans.len();
        if let Some(first) = self.orphans.first() {
            tracing::debug!(count = orphaned_lines, "Dropped body text before first heading");
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::OrphanedBody,
                Some(*first),
                format!("{orphaned_lines} line(s) of text before the first heading were dropped"),
            ));
        }

        Hierarchy {
            roots: self.arena.into_tree(),
            diagnostics: self.diagnostics,
            orphaned_lines,
        }
    }

    fn flat_fallback(mut self) -> Hierarchy {
        let mut arena = SectionArena::new();
        let branch = arena.insert(None, HeaderKind::Branch, "", "");
        arena.mark_synthetic(branch);
        let chapter = arena.insert(Some(branch), HeaderKind::Chapter, "", "");
        arena.mark_synthetic(chapter);
        let article = arena.insert(Some(chapter), HeaderKind::Article, "", "");

        let first = self.raw_body.iter().position(|raw| has_visible_text(raw));
        let last = self.raw_body.iter().rposition(|raw| has_visible_text(raw));
        if let (Some(first), Some(last)) = (first, last) {
            for raw in self.raw_body.drain(first..=last) {
                arena.push_content(article, raw);
            }
        }

        tracing::warn!("No headings detected, document wrapped as a single article");
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::NoStructureDetected,
            None,
            "no heading matched; the whole text was kept as one article",
        ));

        Hierarchy {
            roots: arena.into_tree(),
            diagnostics: self.diagnostics,
            orphaned_lines: 0,
        }
    }
}
