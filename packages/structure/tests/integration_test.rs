//! End-to-end tests for the structure parser.
//!
//! Runs the full pipeline on the text fixtures under `tests/fixtures/` and on
//! generated documents.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use statute_structure::output::{render, Format};
use statute_structure::patterns::canonical_text;
use statute_structure::toc::TocDetector;
use statute_structure::types::{DetectionBasis, TocBoundary};
use statute_structure::{
    DiagnosticKind, DocumentMetadata, HeaderKind, ParsedDocument, ParserConfig, PatternLibrary,
    SectionNode, StructureParser,
};

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn parse(text: &str) -> ParsedDocument {
    StructureParser::default()
        .parse(text, DocumentMetadata::new("test"))
        .expect("parse failed")
}

fn count(document: &ParsedDocument, kind: HeaderKind) -> usize {
    document.tree.iter().map(|node| node.count(kind)).sum()
}

/// Every sibling list is numbered 0, 1, 2, ... in order.
fn assert_sibling_order(nodes: &[SectionNode]) {
    for (position, node) in nodes.iter().enumerate() {
        assert_eq!(node.order_index() as usize, position, "node {}", node.number());
        assert_sibling_order(node.children());
    }
}

#[test]
fn test_labour_law_structure() {
    let document = parse(&load_fixture("labour_law.txt"));

    let toc = document.toc.expect("TOC not detected");
    assert_eq!((toc.start_line, toc.end_line), (3, 10));
    assert_eq!(toc.detection_basis, DetectionBasis::ExplicitTitle);
    assert_eq!(toc.boundary, TocBoundary::Refined);

    assert_eq!(document.tree.len(), 3);
    assert_eq!(count(&document, HeaderKind::Branch), 3);
    assert_eq!(count(&document, HeaderKind::Chapter), 3);
    assert_eq!(count(&document, HeaderKind::Article), 5);

    let numbers: Vec<&str> = document.tree.iter().map(SectionNode::number).collect();
    assert_eq!(numbers, vec!["الأول", "الثاني", "الثالث"]);
    assert_eq!(document.tree[2].title(), "أحكام ختامية");

    let ids: Vec<&str> = document.articles.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["b0.c0.a0", "b0.c1.a0", "b1.c0.a0", "b1.c0.a1", "b2.a0"]
    );

    let bis = &document.articles[3];
    assert_eq!(bis.number, "4 مكرر");
    assert_eq!(bis.title, "فترة التجربة");
    assert_eq!(bis.chapter_number.as_deref(), Some("الأول"));
    assert_eq!(bis.branch_number.as_deref(), Some("الثاني"));
    assert_eq!(
        document.chunks[3].content,
        "فترة التجربة\n\nلا تزيد فترة التجربة على مائة يوم."
    );

    let last = &document.articles[4];
    assert_eq!(last.branch_id.as_deref(), Some("b2"));
    assert_eq!(last.chapter_id, None);

    // A cross-reference inside body text stays body text
    assert!(document.articles[1]
        .content
        .ends_with("ولا تخل المادة 5 من هذا القانون بحقوق العامل المكتسبة."));

    let kinds: Vec<DiagnosticKind> = document.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::OrphanedBody]);
    assert_eq!(document.stats.ignored_lines, 8);
    assert_eq!(document.stats.orphaned_lines, 1);
}

#[test]
fn test_content_round_trip() {
    let text = load_fixture("labour_law.txt");
    let document = parse(&text);
    let toc = document.toc.expect("TOC not detected");
    let library = PatternLibrary::default();

    // Input minus header lines, TOC lines, orphaned preamble and blanks
    let first_header = 11;
    let expected: Vec<&str> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (u32::try_from(i + 1).unwrap(), line))
        .filter(|(index, _)| *index >= first_header && !toc.contains(*index))
        .filter(|(index, line)| {
            let normalized = statute_structure::normalize::normalize_line(*index, line);
            !normalized.is_blank() && library.match_line(&normalized).is_none()
        })
        .map(|(_, line)| line.trim())
        .collect();

    let actual: Vec<&str> = document
        .articles
        .iter()
        .flat_map(|article| article.content.lines())
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_idempotent_output() {
    let text = load_fixture("labour_law.txt");
    let first = render(&parse(&text), Format::Json).unwrap();
    let second = render(&parse(&text), Format::Json).unwrap();
    assert_eq!(first, second);

    let first = render(&parse(&text), Format::Yaml).unwrap();
    let second = render(&parse(&text), Format::Yaml).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_order_preservation() {
    for fixture in [
        "labour_law.txt",
        "bilingual.txt",
        "decree.txt",
        "partial_listing.txt",
        "two_page_toc.txt",
    ] {
        let document = parse(&load_fixture(fixture));
        assert_sibling_order(&document.tree);
    }
}

#[test]
fn test_toc_listing_does_not_double_nodes() {
    for n in [3u16, 5, 12, 25] {
        let mut text = String::new();
        for i in 1..=n {
            text.push_str(&format!(
                "الباب {} ........ {}\n",
                canonical_text(HeaderKind::Branch, i),
                i * 4
            ));
        }
        for i in 1..=n {
            text.push_str(&format!(
                "الباب {}: أحكام\nنص الباب\n",
                canonical_text(HeaderKind::Branch, i)
            ));
        }

        let document = parse(&text);
        assert_eq!(count(&document, HeaderKind::Branch), usize::from(n), "n = {n}");
        let toc = document.toc.expect("TOC not detected");
        assert_eq!(toc.end_line, u32::from(n), "n = {n}");

        let values: Vec<&str> = document.tree.iter().map(SectionNode::number).collect();
        let expected: Vec<String> = (1..=n)
            .map(|i| canonical_text(HeaderKind::Branch, i))
            .collect();
        assert_eq!(values, expected, "n = {n}");
    }
}

#[test]
fn test_chapter_only_listing_keeps_branch_heading() {
    let document = parse(&load_fixture("partial_listing.txt"));

    let toc = document.toc.expect("TOC not detected");
    assert_eq!((toc.start_line, toc.end_line), (1, 4));
    assert_eq!(toc.detection_basis, DetectionBasis::Density);
    assert_eq!(toc.boundary, TocBoundary::Refined);

    let numbers: Vec<&str> = document.tree.iter().map(SectionNode::number).collect();
    assert_eq!(numbers, vec!["الأول", "الثاني"]);
    assert_eq!(document.tree[0].title(), "أحكام عامة");
    assert_eq!(count(&document, HeaderKind::Chapter), 3);

    let ids: Vec<&str> = document.articles.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b0.c0.a0", "b0.c1.a0", "b1.c0.a0"]);
    assert!(document.diagnostics.is_empty());
    assert_eq!(document.stats.ignored_lines, 4);
}

#[test]
fn test_listing_over_two_pages_with_preamble() {
    let document = parse(&load_fixture("two_page_toc.txt"));

    let toc = document.toc.expect("TOC not detected");
    // Both listing pages and the enactment preamble up to the first branch
    assert_eq!((toc.start_line, toc.end_line), (1, 22));
    assert_eq!(toc.detection_basis, DetectionBasis::ExplicitTitle);
    assert_eq!(toc.boundary, TocBoundary::Refined);

    assert_eq!(count(&document, HeaderKind::Branch), 6);
    assert_eq!(count(&document, HeaderKind::Article), 6);
    assert_eq!(document.tree[5].title(), "أحكام ختامية");
    assert_eq!(
        document.articles[5].content,
        "يلغى كل حكم يخالف أحكام هذا القانون."
    );
    assert!(document.diagnostics.is_empty());
}

#[test]
fn test_listing_pages_far_from_body() {
    let mut text = String::new();
    for i in 1..=6u16 {
        text.push_str(&format!(
            "الباب {} ........ {}\n",
            canonical_text(HeaderKind::Branch, i),
            i * 4
        ));
        if i == 3 {
            for line in 0..10 {
                text.push_str(&format!("ترويسة الصفحة {line}\n"));
            }
        }
    }
    for line in 0..25 {
        text.push_str(&format!("ديباجة {line}\n"));
    }
    for i in 1..=6u16 {
        text.push_str(&format!(
            "الباب {}\nنص الباب\n",
            canonical_text(HeaderKind::Branch, i)
        ));
    }

    let document = parse(&text);
    let toc = document.toc.expect("TOC not detected");
    assert_eq!((toc.start_line, toc.end_line), (1, 16));
    assert_eq!(toc.boundary, TocBoundary::Coarse);
    assert_eq!(count(&document, HeaderKind::Branch), 6);
    assert!(!document
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::DiscardedTocCandidate));
}

#[test]
fn test_scenario_compound_ordinal_branches() {
    let document = parse("الباب الأول: مقدمة\nنص أول\nالباب الثاني عشر: ختام\nنص ثان");

    assert_eq!(document.tree.len(), 2);
    let first = &document.tree[0];
    let second = &document.tree[1];
    assert_eq!(first.kind(), HeaderKind::Branch);
    assert_eq!(first.number(), "الأول");
    assert_eq!(first.content(), "نص أول");
    assert_eq!(first.order_index(), 0);
    assert_eq!(second.number(), "الثاني عشر");
    assert_eq!(second.content(), "نص ثان");
    assert_eq!(second.order_index(), 1);
    assert!(first.children().is_empty() && second.children().is_empty());
    assert!(document.toc.is_none());
}

#[test]
fn test_scenario_toc_with_distant_body() {
    let mut text = String::from(
        "الباب الأول .......... 5\nالباب الثاني .......... 9\nالباب الثالث .......... 14\n",
    );
    for i in 0..30 {
        text.push_str(&format!("تمهيد {i}\n"));
    }
    text.push_str("الباب الأول: مقدمة\nنص");

    let document = parse(&text);
    let toc = document.toc.expect("TOC not detected");
    assert_eq!((toc.start_line, toc.end_line), (1, 3));
    assert_eq!(toc.boundary, TocBoundary::Coarse);
    assert_eq!(count(&document, HeaderKind::Branch), 1);
    assert_eq!(document.tree[0].number(), "الأول");
    assert!(document
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::TocBoundaryNotFound));
}

#[test]
fn test_flat_document_fallback() {
    let document = parse(&load_fixture("decree.txt"));

    assert_eq!(document.tree.len(), 1);
    assert_eq!(document.articles.len(), 1);
    assert_eq!(
        document.articles[0].content,
        "بسم الله الرحمن الرحيم\nنحن أمير دولة الكويت\n\nبعد الاطلاع على الدستور\nقررنا الآتي"
    );
    assert_eq!(document.articles[0].branch_id, None);
    assert_eq!(document.chunks[0].content, document.articles[0].content);
    assert_eq!(
        document.diagnostics[0].kind,
        DiagnosticKind::NoStructureDetected
    );
}

#[test]
fn test_bilingual_headings() {
    let document = parse(&load_fixture("bilingual.txt"));

    assert_eq!(document.tree.len(), 2);
    let part_one = &document.tree[0];
    assert_eq!(part_one.number(), "One");
    assert_eq!(part_one.title(), "General Provisions");
    assert_eq!(part_one.children().len(), 2);
    assert_eq!(part_one.children()[1].number(), "Two");

    let part_two = &document.tree[1];
    assert_eq!(part_two.number(), "II");
    assert_eq!(part_two.content(), "Article 4 of this Law is repealed.");

    let titles: Vec<&str> = document.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["", "Scope", "", ""]);
    assert_eq!(document.articles[3].id, "b1.a0");
}

#[test]
fn test_custom_vocabulary() {
    let vocabulary =
        statute_structure::Vocabulary::from_yaml_str("chapter: [\"القسم\"]\narticle: [\"البند\"]\n")
            .unwrap();
    let library = PatternLibrary::with_vocabulary(&vocabulary, 100).unwrap();
    let parser = StructureParser::new(Arc::new(library), ParserConfig::default());

    let document = parser
        .parse_text("القسم الأول: الرسوم\nالبند الثاني\nتستحق الرسوم سنويا")
        .unwrap();
    assert_eq!(document.tree[0].kind(), HeaderKind::Chapter);
    assert_eq!(document.articles[0].number, "الثاني");
    assert_eq!(document.articles[0].chapter_id.as_deref(), Some("c0"));
}

#[test]
fn test_concurrent_parses_share_one_library() {
    let parser = StructureParser::default();
    let text = load_fixture("labour_law.txt");
    let expected = parser.parse_text(&text).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| parser.parse_text(&text).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_toc_detector_on_fixture() {
    let library = PatternLibrary::default();
    let lines = statute_structure::normalize::normalize_document(&load_fixture("bilingual.txt"));
    let detection = TocDetector::new(&library, &ParserConfig::default()).detect(&lines);
    assert!(detection.range.is_none());
}
