//! Tree state and pure transitions

use std::collections::HashSet;

use crate::error::NavigatorError;
use crate::model::NodeKind;

/// Load state of a node's children.
///
/// Exactly three observable states: unloaded, loaded-empty, loaded-nonempty.
/// `Unloaded` means the children have never been fetched; `Loaded` with an
/// empty vector means the fetch completed and the node genuinely has no
/// children. The distinction matters: loaded-empty is terminal and must not
/// trigger a refetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChildrenState {
    /// Children have not been fetched yet.
    #[default]
    Unloaded,
    /// Children have been fetched (possibly zero of them).
    Loaded(Vec<TreeNode>),
}

impl ChildrenState {
    /// Returns `true` if children have been fetched, even if empty.
    pub fn is_loaded(&self) -> bool {
        matches!(self, ChildrenState::Loaded(_))
    }

    /// Returns the loaded children, or an empty slice when unloaded.
    pub fn as_slice(&self) -> &[TreeNode] {
        match self {
            ChildrenState::Unloaded => &[],
            ChildrenState::Loaded(children) => children,
        }
    }
}

/// A node in the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Slug identifying this node. Unique within its parent's child list,
    /// not across the whole forest.
    pub id: String,
    /// Display label.
    pub title: String,
    /// Explicit kind; leaf-ness is never inferred from `children`.
    pub kind: NodeKind,
    /// Lazily loaded children.
    pub children: ChildrenState,
    /// Exam question count, where the backend reports one.
    pub questions_count: Option<u32>,
}

impl TreeNode {
    /// Creates a new node with unloaded children.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            children: ChildrenState::Unloaded,
            questions_count: None,
        }
    }

    /// Returns `true` if this node renders content rather than navigation.
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

/// Outcome of a [`TreeState::toggle`] transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The node is now collapsed.
    Collapsed,
    /// The node is now expanded; `needs_children` is `true` when its
    /// children are still unloaded and a fetch should be started.
    Expanded { needs_children: bool },
}

/// Reducer-style state for a sidebar tree.
///
/// Owns the forest exclusively and exposes every mutation as an explicit
/// transition, so the state machine is unit-testable without a UI harness
/// or a live fetcher. The async orchestration (when to fetch, what to fetch)
/// lives in [`super::TreeNavigator`].
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    items: Vec<TreeNode>,
    expanded: HashSet<String>,
    loading_node: Option<String>,
    selected_leaf: Option<String>,
}

impl TreeState {
    /// Creates an empty tree state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the top-level forest.
    ///
    /// Used when the top-level list is (re)fetched. Expansion and selection
    /// survive the rebuild since they are keyed by slug; any in-flight
    /// loading marker is dropped along with the old nodes.
    pub fn set_items(&mut self, items: Vec<TreeNode>) {
        self.items = items;
        self.loading_node = None;
    }

    /// The top-level forest.
    pub fn items(&self) -> &[TreeNode] {
        &self.items
    }

    /// Flips the expansion state of a node.
    pub fn toggle(&mut self, id: &str) -> Result<ToggleOutcome, NavigatorError> {
        let node = self
            .find(id)
            .ok_or_else(|| NavigatorError::node_not_found(id))?;
        let loaded = node.children.is_loaded();

        if self.expanded.remove(id) {
            Ok(ToggleOutcome::Collapsed)
        } else {
            self.expanded.insert(id.to_string());
            Ok(ToggleOutcome::Expanded {
                needs_children: !loaded,
            })
        }
    }

    /// Marks a node expanded without toggling.
    pub fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    /// Returns `true` if the node is currently expanded.
    ///
    /// Expansion is independent of load state; an expanded node with
    /// unloaded children shows a loading indicator in place of children.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Sets or clears the shared loading indicator.
    ///
    /// At most one node is marked loading at a time; fetches are issued
    /// sequentially so the indicator always names the in-flight node.
    pub fn set_loading(&mut self, id: Option<&str>) {
        self.loading_node = id.map(str::to_string);
    }

    /// The node whose children are currently being fetched, if any.
    pub fn loading_node(&self) -> Option<&str> {
        self.loading_node.as_deref()
    }

    /// Installs fetched children on a node.
    ///
    /// A no-op when the node's children are already loaded: a loaded state
    /// (including loaded-empty) is never overwritten, so late or duplicate
    /// fetch results cannot clobber the tree.
    pub fn set_children(
        &mut self,
        id: &str,
        children: Vec<TreeNode>,
    ) -> Result<(), NavigatorError> {
        let node = self
            .find_mut(id)
            .ok_or_else(|| NavigatorError::node_not_found(id))?;
        if !node.children.is_loaded() {
            node.children = ChildrenState::Loaded(children);
        }
        Ok(())
    }

    /// Returns `true` if the node exists and its children are loaded.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.find(id).is_some_and(|n| n.children.is_loaded())
    }

    /// Marks a leaf as selected.
    pub fn select(&mut self, id: &str) {
        self.selected_leaf = Some(id.to_string());
    }

    /// The currently selected leaf, if any.
    pub fn selected_leaf(&self) -> Option<&str> {
        self.selected_leaf.as_deref()
    }

    /// Finds a node by id, depth-first.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        fn walk<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = walk(node.children.as_slice(), id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.items, id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        fn walk<'a>(nodes: &'a mut [TreeNode], id: &str) -> Option<&'a mut TreeNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let ChildrenState::Loaded(children) = &mut node.children {
                    if let Some(found) = walk(children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&mut self.items, id)
    }

    /// Finds the chain of ids from a root down to the given node, depth-first
    /// over the currently loaded tree.
    ///
    /// The returned chain includes the node itself as its last element.
    pub fn find_path(&self, id: &str) -> Option<Vec<String>> {
        fn walk(nodes: &[TreeNode], id: &str, chain: &mut Vec<String>) -> bool {
            for node in nodes {
                chain.push(node.id.clone());
                if node.id == id {
                    return true;
                }
                if walk(node.children.as_slice(), id, chain) {
                    return true;
                }
                chain.pop();
            }
            false
        }

        let mut chain = Vec::new();
        if walk(&self.items, id, &mut chain) {
            Some(chain)
        } else {
            None
        }
    }

    /// Expands every ancestor of the given node found in the loaded tree.
    ///
    /// Returns `true` if the node was found. The node itself is not
    /// expanded; only the chain above it.
    pub fn expand_ancestors(&mut self, id: &str) -> bool {
        let Some(chain) = self.find_path(id) else {
            return false;
        };
        for ancestor in &chain[..chain.len() - 1] {
            self.expanded.insert(ancestor.clone());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str) -> TreeNode {
        TreeNode::new(id, id.to_uppercase(), NodeKind::Lesson)
    }

    fn section_with(id: &str, children: Vec<TreeNode>) -> TreeNode {
        let mut node = TreeNode::new(id, id.to_uppercase(), NodeKind::Section);
        node.children = ChildrenState::Loaded(children);
        node
    }

    fn sample_state() -> TreeState {
        let mut state = TreeState::new();
        state.set_items(vec![
            section_with(
                "cardio",
                vec![section_with("ecg", vec![lesson("axis"), lesson("rhythm")])],
            ),
            TreeNode::new("neuro", "NEURO", NodeKind::Section),
        ]);
        state
    }

    #[test]
    fn test_toggle_reports_unloaded_children() {
        let mut state = sample_state();

        // neuro has never been loaded
        let outcome = state.toggle("neuro").expect("node exists");
        assert_eq!(
            outcome,
            ToggleOutcome::Expanded {
                needs_children: true
            }
        );
        assert!(state.is_expanded("neuro"));

        // cardio is already loaded
        let outcome = state.toggle("cardio").expect("node exists");
        assert_eq!(
            outcome,
            ToggleOutcome::Expanded {
                needs_children: false
            }
        );

        let outcome = state.toggle("cardio").expect("node exists");
        assert_eq!(outcome, ToggleOutcome::Collapsed);
        assert!(!state.is_expanded("cardio"));
    }

    #[test]
    fn test_toggle_unknown_node_fails() {
        let mut state = sample_state();
        assert!(state.toggle("missing").is_err());
    }

    #[test]
    fn test_set_children_never_overwrites_loaded() {
        let mut state = sample_state();

        state
            .set_children("neuro", vec![lesson("stroke")])
            .expect("node exists");
        assert!(state.is_loaded("neuro"));

        // a late duplicate result must not replace the loaded list
        state.set_children("neuro", vec![]).expect("node exists");
        let neuro = state.find("neuro").expect("node exists");
        assert_eq!(neuro.children.as_slice().len(), 1);
    }

    #[test]
    fn test_loaded_empty_is_distinct_from_unloaded() {
        let mut state = sample_state();
        assert!(!state.is_loaded("neuro"));

        state.set_children("neuro", vec![]).expect("node exists");
        assert!(state.is_loaded("neuro"));
        assert_eq!(
            state.find("neuro").expect("node exists").children,
            ChildrenState::Loaded(vec![])
        );

        // re-expanding a loaded-empty node must not ask for a fetch
        let outcome = state.toggle("neuro").expect("node exists");
        assert_eq!(
            outcome,
            ToggleOutcome::Expanded {
                needs_children: false
            }
        );
    }

    #[test]
    fn test_find_path_returns_ancestor_chain() {
        let state = sample_state();
        assert_eq!(
            state.find_path("rhythm"),
            Some(vec![
                "cardio".to_string(),
                "ecg".to_string(),
                "rhythm".to_string()
            ])
        );
        assert_eq!(state.find_path("cardio"), Some(vec!["cardio".to_string()]));
        assert_eq!(state.find_path("missing"), None);
    }

    #[test]
    fn test_expand_ancestors() {
        let mut state = sample_state();
        assert!(state.expand_ancestors("axis"));
        assert!(state.is_expanded("cardio"));
        assert!(state.is_expanded("ecg"));
        assert!(!state.is_expanded("axis"));

        assert!(!state.expand_ancestors("missing"));
    }

    #[test]
    fn test_set_items_clears_loading_but_keeps_expansion() {
        let mut state = sample_state();
        state.expand("cardio");
        state.set_loading(Some("cardio"));

        state.set_items(vec![TreeNode::new("cardio", "Cardiology", NodeKind::Section)]);
        assert!(state.is_expanded("cardio"));
        assert_eq!(state.loading_node(), None);
    }
}
