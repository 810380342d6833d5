//! Tree navigation error types

/// Errors raised by the tree navigator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NavigatorError {
    /// The referenced node does not exist in the loaded tree.
    #[error("Node '{id}' not found in tree")]
    NodeNotFound { id: String },

    /// A leaf-only operation was invoked on a non-leaf node.
    #[error("Node '{id}' is not a leaf")]
    NotALeaf { id: String },

    /// A child fetch was requested below the deepest level of the area.
    #[error("No child endpoint at depth {depth}")]
    TooDeep { depth: usize },
}

impl NavigatorError {
    /// Creates a new node-not-found error.
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Creates a new not-a-leaf error.
    pub fn not_a_leaf(id: impl Into<String>) -> Self {
        Self::NotALeaf { id: id.into() }
    }
}
