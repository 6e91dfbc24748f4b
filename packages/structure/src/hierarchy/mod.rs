//! Hierarchy reconstruction.
//!
//! The tree is assembled in a [`SectionArena`] where nodes refer to their
//! children by index, then converted into the owned [`SectionNode`] tree
//! returned to callers.

mod arena;
mod builder;
mod node;

pub use arena::{NodeId, SectionArena};
pub use builder::{Hierarchy, HierarchyBuilder};
pub use node::SectionNode;
