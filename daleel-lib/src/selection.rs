//! URL-synchronized selection state
//!
//! The current browse position (category/section, chapter, lesson, handbook
//! reading mode) is mirrored into the page's query string so a view is
//! restorable from a shared link or a reload. [`Selection`] is the typed
//! form of that query string; [`SelectionSync`] is the seam through which
//! the navigator publishes a new selection (a history *replace*, never a
//! push, so back-navigation does not unwind every expansion).

use crate::model::ContentArea;
use crate::model::HandbookMode;

/// Query-string keys, in emission order.
const KEY_CATEGORY: &str = "cat";
const KEY_SECTION: &str = "sec";
const KEY_CHAPTER: &str = "ch";
const KEY_LESSON: &str = "ls";
const KEY_MODE: &str = "mode";

/// The browse position encoded in the page URL.
///
/// Every field is optional; an entirely empty selection means "show the
/// empty state". Shallow areas use `category`, deep areas use `section` and
/// `chapter`; `mode` applies to The Handbook only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Top-level slug in the shallow areas (`cat`).
    pub category: Option<String>,
    /// Top-level slug in the deep areas (`sec`).
    pub section: Option<String>,
    /// Chapter slug (`ch`, deep areas).
    pub chapter: Option<String>,
    /// Lesson slug (`ls`).
    pub lesson: Option<String>,
    /// Handbook reading mode (`mode`).
    pub mode: Option<HandbookMode>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the selection for a root-to-leaf slug chain in an area.
    ///
    /// The chain is `[category, lesson]` for shallow areas and
    /// `[section, chapter, lesson]` for deep ones; shorter chains select a
    /// partial path.
    pub fn for_path(area: ContentArea, path: &[String]) -> Self {
        let mut selection = Self::empty();
        if area.is_shallow() {
            selection.category = path.first().cloned();
            selection.lesson = path.get(1).cloned();
        } else {
            selection.section = path.first().cloned();
            selection.chapter = path.get(1).cloned();
            selection.lesson = path.get(2).cloned();
        }
        selection
    }

    /// Builds a selection carrying only a handbook reading mode.
    ///
    /// Switching mode drops the path segments: the new mode starts from the
    /// empty state rather than pointing at a leaf from the old mode.
    pub fn for_mode(mode: HandbookMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::empty()
        }
    }

    /// Returns `true` if no segment is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// The chain of ancestor slugs encoded in this selection, root first.
    ///
    /// The chain stops at the first gap: a chapter without its section is
    /// unreachable and is ignored. The leaf itself is not part of the chain.
    pub fn ancestor_chain(&self, area: ContentArea) -> Vec<&str> {
        let mut chain = Vec::new();
        if area.is_shallow() {
            if let Some(category) = &self.category {
                chain.push(category.as_str());
            }
        } else {
            if let Some(section) = &self.section {
                chain.push(section.as_str());
                if let Some(chapter) = &self.chapter {
                    chain.push(chapter.as_str());
                }
            }
        }
        chain
    }

    /// Serializes to a query string with absent segments removed.
    ///
    /// Keys are emitted in a fixed order (`cat`, `sec`, `ch`, `ls`, `mode`)
    /// and values are percent-encoded.
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        let mut push = |key: &'static str, value: &Option<String>| {
            if let Some(value) = value {
                if !value.is_empty() {
                    pairs.push((key, urlencoding::encode(value).into_owned()));
                }
            }
        };

        push(KEY_CATEGORY, &self.category);
        push(KEY_SECTION, &self.section);
        push(KEY_CHAPTER, &self.chapter);
        push(KEY_LESSON, &self.lesson);
        if let Some(mode) = self.mode {
            pairs.push((KEY_MODE, mode.as_str().to_string()));
        }

        pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parses a query string back into a selection.
    ///
    /// A leading `?` is tolerated; unknown keys and empty values are
    /// ignored, as are malformed percent escapes.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut selection = Self::empty();

        for pair in query.split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            let Ok(value) = urlencoding::decode(raw) else {
                continue;
            };
            let value = value.into_owned();

            match key {
                KEY_CATEGORY => selection.category = Some(value),
                KEY_SECTION => selection.section = Some(value),
                KEY_CHAPTER => selection.chapter = Some(value),
                KEY_LESSON => selection.lesson = Some(value),
                KEY_MODE => selection.mode = HandbookMode::parse(&value),
                _ => {}
            }
        }

        selection
    }
}

/// Publishes selection changes to whatever owns the page URL.
///
/// Consumed, not implemented, by the navigator core; the frontend shell
/// supplies the real implementation over its history API.
pub trait SelectionSync {
    /// Replaces the current query string with `query`.
    ///
    /// Implementations must perform a history replace, not a push.
    fn replace(&mut self, query: &str);

    /// Requests that the narrow-viewport sidebar overlay be closed.
    ///
    /// Called after a leaf selection. Defaults to a no-op for frontends
    /// without an overlay.
    fn request_overlay_close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query_skips_absent_segments() {
        let selection = Selection {
            section: Some("cardio".to_string()),
            lesson: Some("axis".to_string()),
            ..Selection::empty()
        };
        assert_eq!(selection.to_query(), "sec=cardio&ls=axis");
        assert_eq!(Selection::empty().to_query(), "");
    }

    #[test]
    fn test_query_roundtrip_with_encoding() {
        let selection = Selection {
            section: Some("acid base".to_string()),
            chapter: Some("ph".to_string()),
            lesson: Some("anion-gap".to_string()),
            mode: Some(HandbookMode::Lesson),
            ..Selection::empty()
        };
        let query = selection.to_query();
        assert_eq!(query, "sec=acid%20base&ch=ph&ls=anion-gap&mode=lesson");
        assert_eq!(Selection::parse(&query), selection);
        assert_eq!(Selection::parse(&format!("?{query}")), selection);
    }

    #[test]
    fn test_parse_ignores_unknown_and_empty() {
        let selection = Selection::parse("sec=cardio&utm_source=mail&ch=");
        assert_eq!(selection.section.as_deref(), Some("cardio"));
        assert_eq!(selection.chapter, None);
    }

    #[test]
    fn test_mode_switch_clears_path_segments() {
        let selection = Selection::for_mode(HandbookMode::Chapter);
        assert_eq!(selection.to_query(), "mode=chapter");
        assert_eq!(selection.section, None);
        assert_eq!(selection.chapter, None);
        assert_eq!(selection.lesson, None);
    }

    #[test]
    fn test_for_path_shallow_vs_deep() {
        let deep = Selection::for_path(
            ContentArea::Handbook,
            &["cardio".to_string(), "ecg".to_string(), "axis".to_string()],
        );
        assert_eq!(deep.to_query(), "sec=cardio&ch=ecg&ls=axis");

        let shallow = Selection::for_path(
            ContentArea::Protocols,
            &["resus".to_string(), "acls".to_string()],
        );
        assert_eq!(shallow.to_query(), "cat=resus&ls=acls");
    }

    #[test]
    fn test_ancestor_chain_stops_at_gaps() {
        let orphan_chapter = Selection {
            chapter: Some("ecg".to_string()),
            ..Selection::empty()
        };
        assert!(orphan_chapter.ancestor_chain(ContentArea::Handbook).is_empty());

        let full = Selection::parse("sec=cardio&ch=ecg&ls=axis");
        assert_eq!(
            full.ancestor_chain(ContentArea::Handbook),
            vec!["cardio", "ecg"]
        );
    }
}
