//! Statute structure - rebuild the Branch → Chapter → Article hierarchy of
//! extracted Arabic and bilingual statute text.
//!
//! The input is plain text coming out of a PDF/DOCX/OCR extraction step. The
//! parser finds and skips an embedded table of contents, recognises heading
//! lines in Arabic and English (including compound ordinals such as
//! "الثاني عشر"), and returns the tree together with a flat article list and
//! retrieval chunks.
//!
//! # Example
//!
//! ```
//! use statute_structure::{DocumentMetadata, StructureParser};
//!
//! let parser = StructureParser::default();
//! let text = "الباب الأول: مقدمة\nنص أول\nالباب الثاني عشر: ختام\nنص ثان";
//! let document = parser.parse(text, DocumentMetadata::new("مثال")).unwrap();
//!
//! assert_eq!(document.tree.len(), 2);
//! assert_eq!(document.tree[1].number(), "الثاني عشر");
//! ```
//!
//! # Architecture
//!
//! - [`normalize`]: per-line comparison keys
//! - [`patterns`]: heading vocabulary, ordinals and matching
//! - [`toc`]: table of contents detection
//! - [`classify`]: per-line element types
//! - [`hierarchy`]: tree construction
//! - [`mapper`]: flat articles and chunks
//! - [`parser`]: the full pipeline
//! - [`output`]: JSON / YAML output
//! - [`config`]: heuristic thresholds
//! - [`error`]: error types and Result alias
//! - [`cli`]: command-line interface

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod mapper;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod patterns;
pub mod toc;
pub mod types;

pub use config::ParserConfig;
pub use error::{Result, StructureError};
pub use hierarchy::SectionNode;
pub use mapper::{Chunk, FlatArticle};
pub use parser::{ParseStats, ParsedDocument, StructureParser};
pub use patterns::{PatternLibrary, Vocabulary};
pub use types::{
    Diagnostic, DiagnosticKind, DocumentMetadata, ElementType, HeaderKind, Line, TocRange,
};
