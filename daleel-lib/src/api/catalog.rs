//! List endpoints for the content hierarchy
//!
//! Sections (or categories), chapters, and lessons are all served as plain
//! JSON lists of [`NodeSummary`]. Every list goes through the in-memory
//! cache with the list TTL; the request path doubles as the cache key.

use async_trait::async_trait;

use crate::DaleelClient;
use crate::error::Error;
use crate::error::NavigatorError;
use crate::model::ContentArea;
use crate::model::NodeSummary;
use crate::navigator::ChildEntry;
use crate::navigator::ChildFetcher;
use crate::navigator::FetchScope;
use crate::response::Response;

impl DaleelClient {
    /// Lists the top-level entries of an area (sections, or categories in
    /// the shallow areas — the backend serves both from one collection).
    pub async fn list_roots(&self, area: ContentArea) -> Result<Response<Vec<NodeSummary>>, Error> {
        let path = format!("/{}/sections", area.as_path());
        self.get_cached(&path, self.list_ttl()).await
    }

    /// Lists the chapters of a section (deep areas).
    pub async fn list_chapters(
        &self,
        area: ContentArea,
        section: &str,
    ) -> Result<Response<Vec<NodeSummary>>, Error> {
        let path = format!(
            "/{}/sections/{}/chapters",
            area.as_path(),
            urlencoding::encode(section)
        );
        self.get_cached(&path, self.list_ttl()).await
    }

    /// Lists the lessons of a chapter (deep areas).
    pub async fn list_lessons(
        &self,
        area: ContentArea,
        section: &str,
        chapter: &str,
    ) -> Result<Response<Vec<NodeSummary>>, Error> {
        let path = format!(
            "/{}/sections/{}/chapters/{}/lessons",
            area.as_path(),
            urlencoding::encode(section),
            urlencoding::encode(chapter)
        );
        self.get_cached(&path, self.list_ttl()).await
    }

    /// Lists the items directly under a category (shallow areas).
    pub async fn list_category_items(
        &self,
        area: ContentArea,
        category: &str,
    ) -> Result<Response<Vec<NodeSummary>>, Error> {
        let path = format!(
            "/{}/sections/{}/lessons",
            area.as_path(),
            urlencoding::encode(category)
        );
        self.get_cached(&path, self.list_ttl()).await
    }
}

/// The production child fetcher: maps a scope to the matching list endpoint
/// and tags the results with the kind the area dictates at that level.
#[async_trait]
impl ChildFetcher for DaleelClient {
    async fn fetch_children(&self, scope: &FetchScope) -> Result<Vec<ChildEntry>, Error> {
        let Some(kind) = scope.child_kind() else {
            return Err(NavigatorError::TooDeep {
                depth: scope.depth(),
            }
            .into());
        };

        let response = match (scope.area.is_shallow(), scope.path.as_slice()) {
            (_, []) => self.list_roots(scope.area).await?,
            (true, [category]) => self.list_category_items(scope.area, category).await?,
            (false, [section]) => self.list_chapters(scope.area, section).await?,
            (false, [section, chapter]) => {
                self.list_lessons(scope.area, section, chapter).await?
            }
            _ => {
                return Err(NavigatorError::TooDeep {
                    depth: scope.depth(),
                }
                .into());
            }
        };

        Ok(response
            .into_inner()
            .into_iter()
            .map(|summary| ChildEntry {
                slug: summary.slug,
                title: summary.title,
                kind,
                questions_count: summary.questions_count,
            })
            .collect())
    }
}
