//! Node kinds and list-endpoint wire shapes

use serde::Deserialize;
use serde::Serialize;

/// The kind of a node in the navigation hierarchy.
///
/// Leaf-ness is carried explicitly by the kind; it is never inferred from
/// the shape of loaded children, because a category or chapter can
/// legitimately have zero children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level grouping in the shallow areas (Protocols, PowerPoints).
    Category,
    /// Top-level grouping in the deep areas (Essentials, Handbook).
    Section,
    /// Mid-level grouping in the deep areas.
    Chapter,
    /// A terminal content item that renders actual content.
    Lesson,
}

impl NodeKind {
    /// Returns `true` if nodes of this kind render content rather than
    /// further navigation.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Lesson)
    }
}

/// Wire shape of the list endpoints (sections, chapters, lessons).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeSummary {
    /// Numeric database id.
    pub id: i64,
    /// URL-safe slug, unique within the parent list.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Number of exam questions under this node, where applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_count: Option<u32>,
}
