//! Heading pattern catalog.
//!
//! A heading is `KEYWORD [filler] ORDINAL [suffix] [separators] title`,
//! anchored at the start of the normalized line. Ordinals are tried longest
//! surface form first, so a compound such as "الثاني عشر" (twelfth) is never
//! read as its prefix "الثاني" (second).

mod library;
mod ordinals;
mod vocabulary;

pub use library::{is_page_reference, HeaderMatch, PatternDefinition, PatternLibrary};
pub use ordinals::{canonical_text, roman_numeral, surface_forms, MAX_WORD_ORDINAL};
pub use vocabulary::{default_keywords, Vocabulary};
