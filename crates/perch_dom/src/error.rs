//! Document error types

use thiserror::Error;

use crate::node::NodeId;

/// Structural errors raised by the document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node was removed or never belonged to this document
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Inserting the node would make it its own ancestor
    #[error("Cannot insert {child:?} into its own subtree at {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// The selector could not be parsed
    #[error("Invalid selector: {0:?}")]
    InvalidSelector(String),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DomError>;
