//! Table of contents detection.
//!
//! A front-matter listing repeats the document's headings, usually with page
//! numbers, and matches the same patterns as the real headings. It is found by
//! its repetition signature rather than by a marker: many heading lines close
//! together, most of them ending in a page number. An explicit "contents"
//! title, when present, extends the range upwards.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::ParserConfig;
use crate::normalize::comparison_key;
use crate::patterns::{is_page_reference, PatternLibrary};
use crate::types::{
    DetectionBasis, Diagnostic, DiagnosticKind, HeaderKind, Line, TocBoundary, TocRange,
};

/// Titles that announce a table of contents, as comparison keys.
static TOC_TITLES: LazyLock<Vec<String>> = LazyLock::new(|| {
    [
        "فهرس",
        "الفهرس",
        "فهرس المحتويات",
        "المحتويات",
        "جدول المحتويات",
        "قائمة المحتويات",
        "table of contents",
        "contents",
    ]
    .iter()
    .map(|title| comparison_key(title))
    .collect()
});

/// Whether a normalized line is a table of contents title.
#[must_use]
pub fn is_toc_title(key: &str) -> bool {
    let key = key.trim_end_matches([':', '：', ' ', '-']);
    TOC_TITLES.iter().any(|title| title == key)
}

/// Outcome of a detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocDetection {
    pub range: Option<TocRange>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A heading-like line seen during the pre-scan.
#[derive(Debug, Clone, Copy)]
struct TocEntry {
    /// Position in the line slice (0-based).
    position: usize,
    kind: HeaderKind,
    value: u16,
    paged: bool,
}

/// Span of line positions, inclusive.
type Span = (usize, usize);

/// Detector for a single front-matter listing.
pub struct TocDetector<'lib> {
    library: &'lib PatternLibrary,
    min_entries: usize,
    window_lines: usize,
    boundary_lookahead: usize,
    title_lookahead: usize,
}

impl<'lib> TocDetector<'lib> {
    /// Create a detector with the thresholds from `config`.
    #[must_use]
    pub fn new(library: &'lib PatternLibrary, config: &ParserConfig) -> Self {
        Self {
            library,
            min_entries: config.toc_min_entries,
            window_lines: config.toc_window_lines,
            boundary_lookahead: config.toc_boundary_lookahead,
            title_lookahead: config.toc_title_lookahead,
        }
    }

    /// Scan the whole document once and return at most one range.
    #[must_use]
    pub fn detect(&self, lines: &[Line]) -> TocDetection {
        let mut detection = TocDetection::default();
        let entries = self.scan_entries(lines);

        let (listing, discarded) = Self::join_segments(&entries, self.density_groups(&entries));
        for discarded in &discarded {
            detection.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DiscardedTocCandidate,
                Some(lines[discarded.0].index),
                format!(
                    "second heading listing at lines {}-{} left in place; only the first is excluded",
                    lines[discarded.0].index, lines[discarded.1].index
                ),
            ));
        }

        let title = lines.iter().position(|line| is_toc_title(&line.normalized_key));

        let (span, basis) = match (listing, title) {
            (Some((start, end)), Some(title))
                if title <= start && start - title <= self.title_lookahead =>
            {
                ((title, end), DetectionBasis::ExplicitTitle)
            }
            (Some(span), _) => (span, DetectionBasis::Density),
            (None, Some(title)) => match self.listing_after_title(lines, title) {
                Some(end) => ((title, end), DetectionBasis::ExplicitTitle),
                None => return detection,
            },
            (None, None) => return detection,
        };

        let (end, boundary) = match self.refine_end(lines, &entries, span) {
            Some(end) => (end, TocBoundary::Refined),
            None => {
                tracing::warn!(
                    start_line = lines[span.0].index,
                    end_line = lines[span.1].index,
                    lookahead = self.boundary_lookahead,
                    "Table of contents end boundary not found, using coarse range"
                );
                detection.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::TocBoundaryNotFound,
                    Some(lines[span.1].index),
                    format!(
                        "no body heading found within {} lines after the table of contents; \
                         coarse end kept",
                        self.boundary_lookahead
                    ),
                ));
                (span.1, TocBoundary::Coarse)
            }
        };

        let range = TocRange {
            start_line: lines[span.0].index,
            end_line: lines[end].index,
            detection_basis: basis,
            boundary,
        };
        tracing::debug!(
            start_line = range.start_line,
            end_line = range.end_line,
            basis = ?range.detection_basis,
            boundary = ?range.boundary,
            "Detected table of contents"
        );
        detection.range = Some(range);
        detection
    }

    fn scan_entries(&self, lines: &[Line]) -> Vec<TocEntry> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(position, line)| {
                self.library.match_line(line).map(|m| TocEntry {
                    position,
                    kind: m.kind(),
                    value: m.ordinal_value(),
                    paged: m.has_page_number,
                })
            })
            .collect()
    }

    /// Dense, mostly page-numbered windows, merged into disjoint groups in
    /// document order.
    fn density_groups(&self, entries: &[TocEntry]) -> Vec<Span> {
        let mut candidates: Vec<Span> = Vec::new();

        for (i, first) in entries.iter().enumerate() {
            let window: Vec<&TocEntry> = entries[i..]
                .iter()
                .take_while(|e| e.position - first.position < self.window_lines)
                .collect();

            // Bounded by page-numbered entries so real headings right after
            // the listing neither join the span nor dilute the majority
            let Some(start) = window.iter().position(|e| e.paged) else {
                continue;
            };
            let Some(end) = window.iter().rposition(|e| e.paged) else {
                continue;
            };
            let span = &window[start..=end];
            let paged = span.iter().filter(|e| e.paged).count();
            if span.len() >= self.min_entries && paged * 2 > span.len() {
                candidates.push((span[0].position, span[span.len() - 1].position));
            }
        }

        let mut groups: Vec<Span> = Vec::new();
        for (start, end) in candidates {
            match groups.last_mut() {
                Some(group) if start <= group.1 + 1 => group.1 = group.1.max(end),
                _ => groups.push((start, end)),
            }
        }
        groups
    }

    /// A listing broken over several pages shows up as several groups. Later
    /// groups join the first while no unpaged heading sits between them;
    /// whatever is left after the body has started is returned separately.
    fn join_segments(entries: &[TocEntry], groups: Vec<Span>) -> (Option<Span>, Vec<Span>) {
        let mut groups = groups.into_iter();
        let Some(mut listing) = groups.next() else {
            return (None, Vec::new());
        };

        let mut discarded = Vec::new();
        for group in groups {
            let body_between = entries
                .iter()
                .any(|e| !e.paged && e.position > listing.1 && e.position < group.0);
            if discarded.is_empty() && !body_between {
                listing.1 = group.1;
            } else {
                discarded.push(group);
            }
        }
        (Some(listing), discarded)
    }

    /// Without a dense run, a title still opens a listing: blank, heading or
    /// page-numbered lines following it, up to the last page-numbered one.
    fn listing_after_title(&self, lines: &[Line], title: usize) -> Option<usize> {
        let mut last_paged = None;
        for (position, line) in lines.iter().enumerate().skip(title + 1) {
            if line.is_blank() {
                continue;
            }
            let paged = match self.library.match_line(line) {
                Some(m) => m.has_page_number,
                None if is_page_reference(&line.normalized_key, &line.raw) => true,
                None => break,
            };
            if paged {
                last_paged = Some(position);
            }
        }
        last_paged
    }

    /// Look past the coarse end for the first heading that cannot belong to
    /// the listing; the listing ends just before it.
    ///
    /// An unpaged heading continues the listing only while it keeps counting
    /// up a kind the listing already uses. A kind the listing never names, or
    /// a value it already reached, starts the body.
    fn refine_end(&self, lines: &[Line], entries: &[TocEntry], span: Span) -> Option<usize> {
        let mut highest: BTreeMap<HeaderKind, u16> = BTreeMap::new();
        for entry in entries
            .iter()
            .filter(|e| e.position >= span.0 && e.position <= span.1)
        {
            let value = highest.entry(entry.kind).or_default();
            *value = (*value).max(entry.value);
        }
        if highest.is_empty() {
            return None;
        }
        let last = (span.1 + self.boundary_lookahead).min(lines.len().saturating_sub(1));

        for entry in entries
            .iter()
            .filter(|e| e.position > span.1 && e.position <= last && !e.paged)
        {
            match highest.get_mut(&entry.kind) {
                Some(value) if entry.value > *value => *value = entry.value,
                _ => return Some(entry.position - 1),
            }
        }
        None
    }
}
