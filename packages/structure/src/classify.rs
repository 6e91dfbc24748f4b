//! Per-line element classification.

use crate::patterns::PatternLibrary;
use crate::types::{ClassifiedLine, Diagnostic, DiagnosticKind, ElementType, Line, TocRange};

/// Output of a classification pass.
#[derive(Debug, Clone)]
pub struct Classification<'lib> {
    /// One entry per input line, in input order.
    pub lines: Vec<ClassifiedLine<'lib>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Maps each line to an element type.
///
/// Stateless per line: the result for one line never depends on another.
pub struct LineClassifier<'lib> {
    library: &'lib PatternLibrary,
    toc: Option<TocRange>,
}

impl<'lib> LineClassifier<'lib> {
    #[must_use]
    pub fn new(library: &'lib PatternLibrary, toc: Option<TocRange>) -> Self {
        Self { library, toc }
    }

    /// Classify a single line.
    ///
    /// Lines inside the table of contents are `Ignored` without any
    /// pattern lookup.
    #[must_use]
    pub fn classify_line(&self, line: Line) -> ClassifiedLine<'lib> {
        if self.toc.is_some_and(|toc| toc.contains(line.index)) {
            return ClassifiedLine {
                line,
                element_type: ElementType::Ignored,
                matched_pattern: None,
            };
        }

        match self.library.match_line(&line) {
            Some(m) => ClassifiedLine {
                element_type: m.kind().element_type(),
                matched_pattern: Some(m),
                line,
            },
            None => ClassifiedLine {
                line,
                element_type: ElementType::Body,
                matched_pattern: None,
            },
        }
    }

    /// Classify every line, reporting ambiguous matches.
    #[must_use]
    pub fn classify(&self, lines: Vec<Line>) -> Classification<'lib> {
        let mut diagnostics = Vec::new();
        let lines: Vec<ClassifiedLine<'lib>> = lines
            .into_iter()
            .map(|line| self.classify_line(line))
            .inspect(|classified| {
                if let Some(m) = &classified.matched_pattern {
                    if !m.ambiguous_with.is_empty() {
                        let others: Vec<&str> =
                            m.ambiguous_with.iter().map(|k| k.as_str()).collect();
                        tracing::debug!(
                            line = classified.line.index,
                            kind = %m.kind(),
                            others = ?others,
                            "Ambiguous heading resolved by precedence"
                        );
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::AmbiguousMatch,
                            Some(classified.line.index),
                            format!(
                                "heading also matches {}; classified as {}",
                                others.join(", "),
                                m.kind()
                            ),
                        ));
                    }
                }
            })
            .collect();

        Classification { lines, diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_document;
    use crate::patterns::Vocabulary;
    use crate::types::{DetectionBasis, HeaderKind, TocBoundary};

    #[test]
    fn test_one_entry_per_line_in_order() {
        let library = PatternLibrary::new(50);
        let lines = normalize_document("الباب الأول\n\nنص\nالمادة 3: تعريفات");
        let classification = LineClassifier::new(&library, None).classify(lines);

        let types: Vec<ElementType> = classification
            .lines
            .iter()
            .map(|c| c.element_type)
            .collect();
        assert_eq!(
            types,
            vec![
                ElementType::BranchHeader,
                ElementType::Body,
                ElementType::Body,
                ElementType::ArticleHeader,
            ]
        );
        let indices: Vec<u32> = classification.lines.iter().map(|c| c.line.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert!(classification.diagnostics.is_empty());
    }

    #[test]
    fn test_toc_lines_are_ignored() {
        let library = PatternLibrary::new(50);
        let toc = TocRange {
            start_line: 1,
            end_line: 2,
            detection_basis: DetectionBasis::Density,
            boundary: TocBoundary::Refined,
        };
        let lines = normalize_document("الباب الأول ..... 3\nنص\nالباب الأول");
        let classification = LineClassifier::new(&library, Some(toc)).classify(lines);

        assert_eq!(classification.lines[0].element_type, ElementType::Ignored);
        assert!(classification.lines[0].matched_pattern.is_none());
        assert_eq!(classification.lines[1].element_type, ElementType::Ignored);
        assert_eq!(
            classification.lines[2].element_type,
            ElementType::BranchHeader
        );
    }

    #[test]
    fn test_ambiguous_match_reported() {
        let vocabulary = Vocabulary::default().with_keyword(HeaderKind::Chapter, "الباب");
        let library = PatternLibrary::with_vocabulary(&vocabulary, 20).unwrap();
        let lines = normalize_document("الباب الأول");
        let classification = LineClassifier::new(&library, None).classify(lines);

        assert_eq!(
            classification.lines[0].element_type,
            ElementType::BranchHeader
        );
        assert_eq!(classification.diagnostics.len(), 1);
        assert_eq!(
            classification.diagnostics[0].kind,
            DiagnosticKind::AmbiguousMatch
        );
        assert_eq!(classification.diagnostics[0].line, Some(1));
    }
}
