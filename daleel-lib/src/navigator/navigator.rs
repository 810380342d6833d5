//! Async orchestration over the tree state

use tokio_util::sync::CancellationToken;

use super::ChildEntry;
use super::ChildFetcher;
use super::FetchScope;
use super::ToggleOutcome;
use super::TreeNode;
use super::TreeState;
use crate::error::Error;
use crate::error::NavigatorError;
use crate::model::ContentArea;
use crate::model::HandbookMode;
use crate::selection::Selection;
use crate::selection::SelectionSync;

/// The sidebar navigator for one content area.
///
/// Couples a [`TreeState`] to a [`ChildFetcher`] and enforces the loading
/// contract: children are fetched at most once per node (single-flight), a
/// failed fetch leaves the node unloaded so a later expand retries, and the
/// shared loading indicator is cleared no matter how a fetch ends.
///
/// Fetches are issued sequentially, awaiting each before starting the next,
/// so the single loading indicator always names the in-flight node.
pub struct TreeNavigator<F> {
    area: ContentArea,
    state: TreeState,
    fetcher: F,
    cancel: CancellationToken,
    mode: Option<HandbookMode>,
}

impl<F: ChildFetcher> TreeNavigator<F> {
    /// Creates a navigator for an area with an empty tree.
    pub fn new(area: ContentArea, fetcher: F) -> Self {
        Self {
            area,
            state: TreeState::new(),
            fetcher,
            cancel: CancellationToken::new(),
            mode: None,
        }
    }

    /// Attaches a cancellation token.
    ///
    /// When the token is cancelled (the owning view unmounted), in-flight
    /// fetches resolve to [`Error::Cancelled`] and their late results are
    /// never applied to the tree.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The content area this navigator browses.
    pub fn area(&self) -> ContentArea {
        self.area
    }

    /// Read access to the tree state, for rendering.
    pub fn state(&self) -> &TreeState {
        &self.state
    }

    /// Sets the handbook reading mode carried in published selections.
    pub fn set_mode(&mut self, mode: Option<HandbookMode>) {
        self.mode = mode;
    }

    /// Seeds the top-level forest directly.
    pub fn seed(&mut self, items: Vec<TreeNode>) {
        self.state.set_items(items);
    }

    /// Fetches and installs the top-level list of the area.
    ///
    /// Rebuilds the whole forest; expansion and selection survive since
    /// they are keyed by slug.
    pub async fn load_roots(&mut self) -> Result<(), Error> {
        let scope = FetchScope::roots(self.area);
        let entries = self.fetch(&scope).await?;
        self.state
            .set_items(entries.into_iter().map(ChildEntry::into_node).collect());
        Ok(())
    }

    /// Flips the expansion state of a node, fetching children on first
    /// expand.
    pub async fn toggle(&mut self, id: &str) -> Result<(), Error> {
        match self.state.toggle(id)? {
            ToggleOutcome::Expanded {
                needs_children: true,
            } => self.ensure_children(id).await,
            _ => Ok(()),
        }
    }

    /// Ensures a node's children are loaded, fetching them if necessary.
    ///
    /// Single-flight per node: a no-op when the children are already loaded
    /// (including loaded-empty) or a load for this node is in flight. On
    /// failure the node stays unloaded, so a later expand retries; this
    /// layer never retries by itself.
    pub async fn ensure_children(&mut self, id: &str) -> Result<(), Error> {
        let Some(path) = self.state.find_path(id) else {
            return Err(NavigatorError::node_not_found(id).into());
        };
        if self.state.is_loaded(id) || self.state.loading_node() == Some(id) {
            return Ok(());
        }

        self.state.set_loading(Some(id));
        let scope = FetchScope::new(self.area, path);
        let result = self.fetch(&scope).await;
        // cleared on success, failure, and cancellation alike
        self.state.set_loading(None);

        let children = result?;
        self.state
            .set_children(id, children.into_iter().map(ChildEntry::into_node).collect())?;
        Ok(())
    }

    /// Selects a leaf and publishes its path through the selection sync.
    ///
    /// Non-leaf nodes route to [`toggle`](Self::toggle) instead.
    pub async fn select_leaf(
        &mut self,
        id: &str,
        sync: &mut dyn SelectionSync,
    ) -> Result<(), Error> {
        let is_leaf = self
            .state
            .find(id)
            .map(TreeNode::is_leaf)
            .ok_or_else(|| NavigatorError::node_not_found(id))?;
        if !is_leaf {
            return self.toggle(id).await;
        }

        let path = self
            .state
            .find_path(id)
            .ok_or_else(|| NavigatorError::node_not_found(id))?;
        self.state.select(id);

        let mut selection = Selection::for_path(self.area, &path);
        selection.mode = self.mode;
        sync.replace(&selection.to_query());
        sync.request_overlay_close();
        Ok(())
    }

    /// Restores the browse position from a parsed URL selection.
    ///
    /// Cold-load path restoration is a sequential fetch chain: children are
    /// fetched along the encoded ancestor path (section, then chapter), each
    /// awaited before the next, and only then are the ancestors expanded and
    /// the leaf selected. Nothing outside the encoded path is fetched.
    ///
    /// The top-level forest must already be loaded (via
    /// [`load_roots`](Self::load_roots) or [`seed`](Self::seed)).
    pub async fn restore(&mut self, selection: &Selection) -> Result<(), Error> {
        self.mode = selection.mode;

        let chain: Vec<String> = selection
            .ancestor_chain(self.area)
            .into_iter()
            .map(str::to_string)
            .collect();

        for id in &chain {
            self.ensure_children(id).await?;
        }
        for id in &chain {
            self.state.expand(id);
        }
        if !chain.is_empty()
            && let Some(leaf) = &selection.lesson
        {
            self.state.select(leaf);
        }
        Ok(())
    }

    async fn fetch(&self, scope: &FetchScope) -> Result<Vec<ChildEntry>, Error> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            result = self.fetcher.fetch_children(scope) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ApiError;
    use crate::model::NodeKind;
    use crate::navigator::ChildrenState;

    /// Fetcher that serves scripted responses keyed by slug path and
    /// records every call it receives.
    #[derive(Default)]
    struct ScriptedFetcher {
        responses: HashMap<Vec<String>, Vec<ChildEntry>>,
        fail_once: Mutex<HashSet<Vec<String>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedFetcher {
        fn respond(mut self, path: &[&str], entries: Vec<ChildEntry>) -> Self {
            self.responses
                .insert(path.iter().map(|s| s.to_string()).collect(), entries);
            self
        }

        fn failing_once(self, path: &[&str]) -> Self {
            self.fail_once
                .lock()
                .unwrap()
                .insert(path.iter().map(|s| s.to_string()).collect());
            self
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChildFetcher for ScriptedFetcher {
        async fn fetch_children(&self, scope: &FetchScope) -> Result<Vec<ChildEntry>, Error> {
            self.calls.lock().unwrap().push(scope.path.clone());
            if self.fail_once.lock().unwrap().remove(&scope.path) {
                return Err(ApiError::http(503, "service unavailable").into());
            }
            Ok(self
                .responses
                .get(&scope.path)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct RecordingSync {
        replaced: Vec<String>,
        overlay_closes: usize,
    }

    impl SelectionSync for RecordingSync {
        fn replace(&mut self, query: &str) {
            self.replaced.push(query.to_string());
        }

        fn request_overlay_close(&mut self) {
            self.overlay_closes += 1;
        }
    }

    fn section(id: &str, title: &str) -> TreeNode {
        TreeNode::new(id, title, NodeKind::Section)
    }

    fn chapter_entry(slug: &str) -> ChildEntry {
        ChildEntry::new(slug, slug.to_uppercase(), NodeKind::Chapter)
    }

    fn lesson_entry(slug: &str) -> ChildEntry {
        ChildEntry::new(slug, slug.to_uppercase(), NodeKind::Lesson)
    }

    fn handbook_navigator(fetcher: ScriptedFetcher) -> TreeNavigator<ScriptedFetcher> {
        let mut navigator = TreeNavigator::new(ContentArea::Handbook, fetcher);
        navigator.seed(vec![
            section("cardio", "Cardiology"),
            section("neuro", "Neurology"),
        ]);
        navigator
    }

    #[tokio::test]
    async fn test_expand_fetches_children_once() {
        let fetcher =
            ScriptedFetcher::default().respond(&["cardio"], vec![chapter_entry("ecg")]);
        let mut navigator = handbook_navigator(fetcher);

        navigator.toggle("cardio").await.expect("expand");
        // collapse and re-expand: loaded state must suppress the refetch
        navigator.toggle("cardio").await.expect("collapse");
        navigator.toggle("cardio").await.expect("re-expand");

        assert_eq!(navigator.fetcher.calls().len(), 1);
        assert!(navigator.state().is_expanded("cardio"));
        assert_eq!(
            navigator.state().find("ecg").expect("child installed").kind,
            NodeKind::Chapter
        );
    }

    #[tokio::test]
    async fn test_loaded_empty_is_terminal() {
        // categories = [{slug: "cardio"}], fetcher returns no children
        let fetcher = ScriptedFetcher::default().respond(&["cardio"], vec![]);
        let mut navigator = handbook_navigator(fetcher);

        navigator.toggle("cardio").await.expect("expand");

        let cardio = navigator.state().find("cardio").expect("node");
        assert_eq!(cardio.children, ChildrenState::Loaded(vec![]));
        assert_eq!(navigator.state().loading_node(), None);

        // a second click collapses, a third re-expands: still exactly one fetch
        navigator.toggle("cardio").await.expect("collapse");
        navigator.toggle("cardio").await.expect("re-expand");
        assert_eq!(navigator.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_in_flight_load_suppresses_duplicate_fetch() {
        let fetcher =
            ScriptedFetcher::default().respond(&["cardio"], vec![chapter_entry("ecg")]);
        let mut navigator = handbook_navigator(fetcher);

        // simulate a load already in flight for the node
        navigator.state.set_loading(Some("cardio"));
        navigator.ensure_children("cardio").await.expect("no-op");

        assert!(navigator.fetcher.calls().is_empty());
        assert!(!navigator.state().is_loaded("cardio"));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_node_retryable() {
        let fetcher = ScriptedFetcher::default()
            .respond(&["cardio"], vec![chapter_entry("ecg")])
            .failing_once(&["cardio"]);
        let mut navigator = handbook_navigator(fetcher);

        let err = navigator.ensure_children("cardio").await.expect_err("fails");
        assert!(matches!(err, Error::Api(_)));
        assert!(!navigator.state().is_loaded("cardio"));
        assert_eq!(navigator.state().loading_node(), None);

        // the next attempt fetches again and succeeds
        navigator.ensure_children("cardio").await.expect("retry");
        assert!(navigator.state().is_loaded("cardio"));
        assert_eq!(navigator.fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_restore_fetches_path_in_order() {
        let fetcher = ScriptedFetcher::default()
            .respond(&["cardio"], vec![chapter_entry("ecg"), chapter_entry("echo")])
            .respond(&["cardio", "ecg"], vec![lesson_entry("axis")]);
        let mut navigator = handbook_navigator(fetcher);

        let selection = Selection::parse("sec=cardio&ch=ecg&ls=axis");
        navigator.restore(&selection).await.expect("restore");

        // chapters of the section first, then lessons of the chapter,
        // nothing else (no fetch for echo's or neuro's children)
        assert_eq!(
            navigator.fetcher.calls(),
            vec![
                vec!["cardio".to_string()],
                vec!["cardio".to_string(), "ecg".to_string()]
            ]
        );
        assert!(navigator.state().is_expanded("cardio"));
        assert!(navigator.state().is_expanded("ecg"));
        assert_eq!(navigator.state().selected_leaf(), Some("axis"));
        assert_eq!(navigator.state().loading_node(), None);
    }

    #[tokio::test]
    async fn test_restore_with_empty_selection_is_a_no_op() {
        let fetcher = ScriptedFetcher::default();
        let mut navigator = handbook_navigator(fetcher);

        navigator.restore(&Selection::empty()).await.expect("no-op");
        assert!(navigator.fetcher.calls().is_empty());
        assert_eq!(navigator.state().selected_leaf(), None);
    }

    #[tokio::test]
    async fn test_select_leaf_publishes_exact_path() {
        let fetcher = ScriptedFetcher::default()
            .respond(&["cardio"], vec![chapter_entry("ecg")])
            .respond(&["cardio", "ecg"], vec![lesson_entry("axis")]);
        let mut navigator = handbook_navigator(fetcher);
        navigator.ensure_children("cardio").await.expect("chapters");
        navigator.ensure_children("ecg").await.expect("lessons");

        let mut sync = RecordingSync::default();
        navigator.select_leaf("axis", &mut sync).await.expect("select");

        assert_eq!(sync.replaced, vec!["sec=cardio&ch=ecg&ls=axis".to_string()]);
        assert_eq!(sync.overlay_closes, 1);
        assert_eq!(navigator.state().selected_leaf(), Some("axis"));
    }

    #[tokio::test]
    async fn test_select_leaf_carries_handbook_mode() {
        let fetcher = ScriptedFetcher::default()
            .respond(&["cardio"], vec![chapter_entry("ecg")])
            .respond(&["cardio", "ecg"], vec![lesson_entry("axis")]);
        let mut navigator = handbook_navigator(fetcher);
        navigator.set_mode(Some(HandbookMode::Lesson));
        navigator.ensure_children("cardio").await.expect("chapters");
        navigator.ensure_children("ecg").await.expect("lessons");

        let mut sync = RecordingSync::default();
        navigator.select_leaf("axis", &mut sync).await.expect("select");

        assert_eq!(
            sync.replaced,
            vec!["sec=cardio&ch=ecg&ls=axis&mode=lesson".to_string()]
        );
    }

    #[tokio::test]
    async fn test_select_non_leaf_routes_to_toggle() {
        let fetcher =
            ScriptedFetcher::default().respond(&["cardio"], vec![chapter_entry("ecg")]);
        let mut navigator = handbook_navigator(fetcher);

        let mut sync = RecordingSync::default();
        navigator
            .select_leaf("cardio", &mut sync)
            .await
            .expect("routes to toggle");

        assert!(sync.replaced.is_empty());
        assert_eq!(sync.overlay_closes, 0);
        assert!(navigator.state().is_expanded("cardio"));
        assert_eq!(navigator.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_clears_loading_and_applies_nothing() {
        let fetcher =
            ScriptedFetcher::default().respond(&["cardio"], vec![chapter_entry("ecg")]);
        let token = CancellationToken::new();
        let mut navigator = handbook_navigator(fetcher).with_cancellation(token.clone());

        token.cancel();
        let err = navigator.ensure_children("cardio").await.expect_err("cancelled");
        assert!(matches!(err, Error::Cancelled));
        assert!(!navigator.state().is_loaded("cardio"));
        assert_eq!(navigator.state().loading_node(), None);
    }

    #[tokio::test]
    async fn test_load_roots_builds_forest() {
        let fetcher = ScriptedFetcher::default().respond(
            &[],
            vec![
                ChildEntry::new("cardio", "Cardiology", NodeKind::Section),
                ChildEntry::new("neuro", "Neurology", NodeKind::Section),
            ],
        );
        let mut navigator = TreeNavigator::new(ContentArea::Handbook, fetcher);

        navigator.load_roots().await.expect("roots");
        assert_eq!(navigator.state().items().len(), 2);
        assert!(!navigator.state().items()[0].children.is_loaded());
    }
}
