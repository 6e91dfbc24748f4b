//! Heading marker vocabulary and custom vocabulary loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructureError};
use crate::types::HeaderKind;

/// Built-in keywords per kind. Reversed spellings are added automatically.
const BRANCH_KEYWORDS: [&str; 5] = ["الباب", "باب", "part", "branch", "book"];
const CHAPTER_KEYWORDS: [&str; 3] = ["الفصل", "فصل", "chapter"];
const ARTICLE_KEYWORDS: [&str; 5] = ["المادة", "مادة", "article", "art.", "art"];

/// Optional words between marker and ordinal ("المادة رقم 5", "Article No. 5").
pub(crate) const FILLERS: [&str; 3] = ["رقم", "no.", "no"];

/// Suffixes that are part of the number ("المادة 12 مكرر").
pub(crate) const SUFFIXES: [&str; 3] = ["مكرر", "bis", "ter"];

/// First words of a residual that turn a marker into running text: a
/// cross-reference ("المادة 5 من هذا القانون") or a sentence whose subject is
/// the marker ("المادة 5 تسري على", "Article 5 shall apply"). Comparison keys.
pub(crate) const REFERENCE_CONTINUATIONS: &[&str] = &[
    "من", "بموجب", "وفقا", "تسري", "يسري", "تطبق", "يطبق", "تنص", "ينص", "تلغي", "يلغي",
    "يجوز", "لا", "of", "under", "shall", "applies", "apply", "is", "are", "may", "must",
    "provides",
];

/// Built-in keywords for `kind`.
#[must_use]
pub fn default_keywords(kind: HeaderKind) -> &'static [&'static str] {
    match kind {
        HeaderKind::Branch => &BRANCH_KEYWORDS,
        HeaderKind::Chapter => &CHAPTER_KEYWORDS,
        HeaderKind::Article => &ARTICLE_KEYWORDS,
    }
}

/// Extra heading keywords supplied by the caller.
///
/// Loaded from YAML:
///
/// ```yaml
/// branch: ["الكتاب"]
/// chapter: ["القسم"]
/// article: ["البند"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vocabulary {
    #[serde(default)]
    pub branch: Vec<String>,

    #[serde(default)]
    pub chapter: Vec<String>,

    #[serde(default)]
    pub article: Vec<String>,
}

impl Vocabulary {
    /// Parse a vocabulary from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let vocabulary: Self = serde_yaml_ng::from_str(yaml)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Read a vocabulary file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Keywords registered for `kind`.
    #[must_use]
    pub fn keywords(&self, kind: HeaderKind) -> &[String] {
        match kind {
            HeaderKind::Branch => &self.branch,
            HeaderKind::Chapter => &self.chapter,
            HeaderKind::Article => &self.article,
        }
    }

    /// Add a keyword for `kind`.
    #[must_use]
    pub fn with_keyword(mut self, kind: HeaderKind, keyword: impl Into<String>) -> Self {
        let list = match kind {
            HeaderKind::Branch => &mut self.branch,
            HeaderKind::Chapter => &mut self.chapter,
            HeaderKind::Article => &mut self.article,
        };
        list.push(keyword.into());
        self
    }

    /// Reject keywords that are blank once normalized.
    pub fn validate(&self) -> Result<()> {
        for kind in HeaderKind::ALL {
            for keyword in self.keywords(kind) {
                if crate::normalize::comparison_key(keyword).is_empty() {
                    return Err(StructureError::InvalidVocabulary {
                        kind: kind.to_string(),
                        reason: format!("keyword '{keyword}' is blank after normalization"),
                    });
                }
            }
        }
        Ok(())
    }
}
