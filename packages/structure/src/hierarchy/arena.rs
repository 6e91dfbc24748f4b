//! Index-addressed node storage used while the tree is under construction.

use super::node::SectionNode;
use crate::types::HeaderKind;

/// Index of a node in a [`SectionArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct ArenaNode {
    pub kind: HeaderKind,
    pub number: String,
    pub title: String,
    pub content: Vec<String>,
    pub order_index: u32,
    pub synthetic: bool,
    pub children: Vec<NodeId>,
}

/// Flat node storage. Edges are kept as child lists only.
#[derive(Debug, Clone, Default)]
pub struct SectionArena {
    nodes: Vec<ArenaNode>,
    roots: Vec<NodeId>,
}

impl SectionArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Append a node under `parent` (or at the root) and return its id.
    ///
    /// The order index is the parent's child count before insertion.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        kind: HeaderKind,
        number: impl Into<String>,
        title: impl Into<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let siblings = match parent {
            Some(parent) => &mut self.nodes[parent.0].children,
            None => &mut self.roots,
        };
        let order_index = u32::try_from(siblings.len()).unwrap_or(u32::MAX);
        siblings.push(id);

        self.nodes.push(ArenaNode {
            kind,
            number: number.into(),
            title: title.into(),
            content: Vec::new(),
            order_index,
            synthetic: false,
            children: Vec::new(),
        });
        id
    }

    pub fn mark_synthetic(&mut self, id: NodeId) {
        self.nodes[id.0].synthetic = true;
    }

    /// Append one line of body text to a node.
    pub fn push_content(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].content.push(text.into());
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> HeaderKind {
        self.nodes[id.0].kind
    }

    #[must_use]
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(parent) => &self.nodes[parent.0].children,
            None => &self.roots,
        }
    }

    /// Convert into the owned output tree.
    #[must_use]
    pub fn into_tree(self) -> Vec<SectionNode> {
        self.roots.iter().map(|id| self.to_node(*id)).collect()
    }

    fn to_node(&self, id: NodeId) -> SectionNode {
        let node = &self.nodes[id.0];
        let content = node.content.join("\n");
        match node.kind {
            HeaderKind::Article => SectionNode::Article {
                number: node.number.clone(),
                title: node.title.clone(),
                content,
                order_index: node.order_index,
            },
            kind => {
                let children = node.children.iter().map(|c| self.to_node(*c)).collect();
                if kind == HeaderKind::Branch {
                    SectionNode::Branch {
                        number: node.number.clone(),
                        name: node.title.clone(),
                        content,
                        order_index: node.order_index,
                        synthetic: node.synthetic,
                        children,
                    }
                } else {
                    SectionNode::Chapter {
                        number: node.number.clone(),
                        name: node.title.clone(),
                        content,
                        order_index: node.order_index,
                        synthetic: node.synthetic,
                        children,
                    }
                }
            }
        }
    }
}
