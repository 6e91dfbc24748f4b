//! Output tree.

use serde::{Deserialize, Serialize};

use crate::types::HeaderKind;

/// A node of the reconstructed hierarchy.
///
/// Each node owns its children; there are no parent references. Branches
/// and chapters keep their own `content` for body text that appears before
/// their first child article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionNode {
    Branch {
        /// Ordinal as written in the source.
        number: String,
        name: String,
        content: String,
        order_index: u32,
        /// Inserted by the flat-document fallback, not present in the source.
        #[serde(default)]
        synthetic: bool,
        /// Chapters, or articles placed directly under the branch.
        children: Vec<SectionNode>,
    },
    Chapter {
        number: String,
        name: String,
        content: String,
        order_index: u32,
        #[serde(default)]
        synthetic: bool,
        children: Vec<SectionNode>,
    },
    Article {
        number: String,
        title: String,
        content: String,
        order_index: u32,
    },
}

impl SectionNode {
    #[must_use]
    pub fn kind(&self) -> HeaderKind {
        match self {
            Self::Branch { .. } => HeaderKind::Branch,
            Self::Chapter { .. } => HeaderKind::Chapter,
            Self::Article { .. } => HeaderKind::Article,
        }
    }

    #[must_use]
    pub fn number(&self) -> &str {
        match self {
            Self::Branch { number, .. }
            | Self::Chapter { number, .. }
            | Self::Article { number, .. } => number,
        }
    }

    /// Branch or chapter name, article title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Branch { name, .. } | Self::Chapter { name, .. } => name,
            Self::Article { title, .. } => title,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Branch { content, .. }
            | Self::Chapter { content, .. }
            | Self::Article { content, .. } => content,
        }
    }

    #[must_use]
    pub fn order_index(&self) -> u32 {
        match self {
            Self::Branch { order_index, .. }
            | Self::Chapter { order_index, .. }
            | Self::Article { order_index, .. } => *order_index,
        }
    }

    /// Whether the node was inserted by the flat-document fallback.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        match self {
            Self::Branch { synthetic, .. } | Self::Chapter { synthetic, .. } => *synthetic,
            Self::Article { .. } => false,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[SectionNode] {
        match self {
            Self::Branch { children, .. } | Self::Chapter { children, .. } => children,
            Self::Article { .. } => &[],
        }
    }

    /// Number of nodes of `kind` in this subtree, this node included.
    #[must_use]
    pub fn count(&self, kind: HeaderKind) -> usize {
        let own = usize::from(self.kind() == kind);
        own + self
            .children()
            .iter()
            .map(|child| child.count(kind))
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(order_index: u32) -> SectionNode {
        SectionNode::Article {
            number: (order_index + 1).to_string(),
            title: String::new(),
            content: "نص".to_string(),
            order_index,
        }
    }

    #[test]
    fn test_count_by_kind() {
        let tree = SectionNode::Branch {
            number: "الأول".to_string(),
            name: "مقدمة".to_string(),
            content: String::new(),
            order_index: 0,
            synthetic: false,
            children: vec![
                article(0),
                SectionNode::Chapter {
                    number: "الأول".to_string(),
                    name: String::new(),
                    content: String::new(),
                    order_index: 1,
                    synthetic: false,
                    children: vec![article(0), article(1)],
                },
            ],
        };
        assert_eq!(tree.count(HeaderKind::Branch), 1);
        assert_eq!(tree.count(HeaderKind::Chapter), 1);
        assert_eq!(tree.count(HeaderKind::Article), 3);
        assert_eq!(tree.title(), "مقدمة");
    }

    #[test]
    fn test_serialized_with_type_tag() {
        let json = serde_json::to_value(article(2)).unwrap();
        assert_eq!(json["type"], "article");
        assert_eq!(json["order_index"], 2);
        assert_eq!(json["number"], "3");
    }
}
