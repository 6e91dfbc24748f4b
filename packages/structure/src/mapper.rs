//! Flattening of the tree into storage and retrieval records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hierarchy::SectionNode;
use crate::types::HeaderKind;

/// An article with its resolved parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatArticle {
    /// Path id, e.g. `b0.c1.a3`.
    pub id: String,
    pub number: String,
    pub title: String,
    pub content: String,
    pub order_index: u32,
    pub branch_id: Option<String>,
    pub branch_number: Option<String>,
    pub chapter_id: Option<String>,
    pub chapter_number: Option<String>,
}

/// Retrieval unit, one per article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Id of the article the chunk was cut from.
    pub source_article_ref: String,
    pub content: String,
    pub order_index: u32,
}

impl Chunk {
    /// Title and body separated by a blank line, or the body alone when the
    /// title is empty.
    #[must_use]
    pub fn format_content(title: &str, content: &str) -> String {
        if title.is_empty() {
            content.to_string()
        } else {
            format!("{title}\n\n{content}")
        }
    }
}

/// What the mapper knows about a structural node.
#[derive(Debug, Clone)]
struct NodeInfo {
    kind: HeaderKind,
    number: String,
    synthetic: bool,
}

/// Walks the tree depth-first, left to right.
#[derive(Debug, Default)]
pub struct PersistenceMapper {
    parents: BTreeMap<String, String>,
    nodes: BTreeMap<String, NodeInfo>,
    articles: Vec<FlatArticle>,
}

impl PersistenceMapper {
    /// Flatten `roots` into articles and chunks, both in document order.
    #[must_use]
    pub fn map(roots: &[SectionNode]) -> (Vec<FlatArticle>, Vec<Chunk>) {
        let mut mapper = Self::default();
        for node in roots {
            mapper.index(node, None);
        }
        for node in roots {
            mapper.emit(node, None);
        }

        let chunks = mapper
            .articles
            .iter()
            .map(|article| Chunk {
                source_article_ref: article.id.clone(),
                content: Chunk::format_content(&article.title, &article.content),
                order_index: article.order_index,
            })
            .collect();
        (mapper.articles, chunks)
    }

    /// Id of a node from its parent's id and its own order index.
    #[must_use]
    pub fn node_id(parent: Option<&str>, node: &SectionNode) -> String {
        let prefix = match node.kind() {
            HeaderKind::Branch => 'b',
            HeaderKind::Chapter => 'c',
            HeaderKind::Article => 'a',
        };
        match parent {
            Some(parent) => format!("{parent}.{prefix}{}", node.order_index()),
            None => format!("{prefix}{}", node.order_index()),
        }
    }

    fn index(&mut self, node: &SectionNode, parent: Option<&str>) {
        let id = Self::node_id(parent, node);
        if let Some(parent) = parent {
            self.parents.insert(id.clone(), parent.to_string());
        }
        self.nodes.insert(
            id.clone(),
            NodeInfo {
                kind: node.kind(),
                number: node.number().to_string(),
                synthetic: node.is_synthetic(),
            },
        );
        for child in node.children() {
            self.index(child, Some(&id));
        }
    }

    fn emit(&mut self, node: &SectionNode, parent: Option<&str>) {
        let id = Self::node_id(parent, node);
        if let SectionNode::Article {
            number,
            title,
            content,
            order_index,
        } = node
        {
            let (branch_id, branch_number) = self.ancestor(&id, HeaderKind::Branch).unzip();
            let (chapter_id, chapter_number) = self.ancestor(&id, HeaderKind::Chapter).unzip();
            self.articles.push(FlatArticle {
                id,
                number: number.clone(),
                title: title.clone(),
                content: content.clone(),
                order_index: *order_index,
                branch_id,
                branch_number,
                chapter_id,
                chapter_number,
            });
            return;
        }
        for child in node.children() {
            self.emit(child, Some(&id));
        }
    }

    /// Nearest non-synthetic ancestor of `kind`, as (id, number).
    fn ancestor(&self, id: &str, kind: HeaderKind) -> Option<(String, String)> {
        let mut current = self.parents.get(id);
        while let Some(parent) = current {
            let info = self.nodes.get(parent)?;
            if info.kind == kind {
                return (!info.synthetic).then(|| (parent.clone(), info.number.clone()));
            }
            current = self.parents.get(parent);
        }
        None
    }
}
