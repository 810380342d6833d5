//! Child-fetching seam between the navigator and the API client

use async_trait::async_trait;

use super::ChildrenState;
use super::TreeNode;
use crate::error::Error;
use crate::model::ContentArea;
use crate::model::NodeKind;

/// Identifies whose children a fetch is for.
///
/// `path` is the slug chain from the tree root down to the node being
/// expanded; an empty path addresses the top-level list of the area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchScope {
    /// The content area the tree belongs to.
    pub area: ContentArea,
    /// Slug chain from the root to the expanding node.
    pub path: Vec<String>,
}

impl FetchScope {
    /// Creates a scope for the given area and slug chain.
    pub fn new<I, S>(area: ContentArea, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            area,
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a scope addressing the top-level list of an area.
    pub fn roots(area: ContentArea) -> Self {
        Self {
            area,
            path: Vec::new(),
        }
    }

    /// Depth of the node being expanded (0 = the area's top level).
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The kind of the children this scope will produce.
    pub fn child_kind(&self) -> Option<NodeKind> {
        self.area.kind_at_level(self.depth())
    }
}

/// An entry returned by a child fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildEntry {
    /// Slug, unique within this child list.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Kind of the node this entry becomes.
    pub kind: NodeKind,
    /// Exam question count, where the backend reports one.
    pub questions_count: Option<u32>,
}

impl ChildEntry {
    /// Creates a new entry.
    pub fn new(slug: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            kind,
            questions_count: None,
        }
    }

    /// Converts the entry into a tree node.
    ///
    /// Leaves are born loaded-empty (they never fetch children); everything
    /// else starts unloaded.
    pub fn into_node(self) -> TreeNode {
        TreeNode {
            id: self.slug,
            title: self.title,
            kind: self.kind,
            children: if self.kind.is_leaf() {
                ChildrenState::Loaded(Vec::new())
            } else {
                ChildrenState::Unloaded
            },
            questions_count: self.questions_count,
        }
    }
}

/// Fetches the ordered children of a node.
///
/// Implemented by the API client for production use and by scripted fakes
/// in tests. The navigator guarantees single-flight per node on top of this;
/// implementations only need to map a scope to the right list endpoint.
#[async_trait]
pub trait ChildFetcher: Send + Sync {
    /// Fetches the children for the given scope, in display order.
    async fn fetch_children(&self, scope: &FetchScope) -> Result<Vec<ChildEntry>, Error>;
}
