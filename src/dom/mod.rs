//! Element arena: slotmap-backed UI tree with name and tag queries.

pub mod node;
pub mod tree;
pub mod query;

pub use node::{Element, ElementId, ModalKind, Role, Tag, Visibility};
pub use tree::ElementTree;
