//! Lesson content detail shapes

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Detail shape of a lesson content endpoint.
///
/// A lesson carries either an HTML `body`, a `file` reference (PDF or
/// image), or both. The backend is inconsistent about the body field name
/// across areas (`content`, `body`, `desc`); the aliases absorb that.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LessonContent {
    /// Display title.
    pub title: String,
    /// HTML fragment to render, if this is an HTML lesson.
    #[serde(default, alias = "content", alias = "desc")]
    pub body: Option<String>,
    /// URL of an attached file (PDF, image), if any.
    #[serde(default)]
    pub file: Option<String>,
    /// When the lesson was published.
    pub created_at: DateTime<Utc>,
    /// View counter, where the area tracks it.
    #[serde(default)]
    pub views_count: Option<u64>,
    /// Like counter, where the area tracks it.
    #[serde(default)]
    pub likes_count: Option<u64>,
    /// The lesson after this one in reading order, if any.
    #[serde(default)]
    pub next_lesson: Option<LessonRef>,
    /// The lesson before this one in reading order, if any.
    #[serde(default)]
    pub last_lesson: Option<LessonRef>,
}

impl LessonContent {
    /// Classifies the attached file, if any.
    pub fn file_kind(&self) -> Option<FileKind> {
        self.file.as_deref().map(FileKind::classify)
    }
}

/// A lightweight reference to an adjacent lesson.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LessonRef {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

/// How an attached file should be rendered.
///
/// PDFs go through the viewer's iframe/object/embed fallback chain, images
/// through an inline image element, and anything unrecognized degrades to a
/// plain download link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
    Other,
}

impl FileKind {
    /// Classifies a file URL by its extension.
    ///
    /// Query strings and fragments are ignored.
    pub fn classify(url: &str) -> FileKind {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file_name = path.rsplit('/').next().unwrap_or(path);

        let extension = match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return FileKind::Other,
        };

        match extension.as_str() {
            "pdf" => FileKind::Pdf,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => FileKind::Image,
            _ => FileKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(FileKind::classify("https://cdn.example.com/a.pdf"), FileKind::Pdf);
        assert_eq!(FileKind::classify("https://cdn.example.com/a.PNG"), FileKind::Image);
        assert_eq!(FileKind::classify("https://cdn.example.com/a.docx"), FileKind::Other);
        assert_eq!(FileKind::classify("no-extension"), FileKind::Other);
    }

    #[test]
    fn test_classify_ignores_query_and_fragment() {
        assert_eq!(
            FileKind::classify("https://cdn.example.com/slides.pdf?token=abc#page=2"),
            FileKind::Pdf
        );
    }

    #[test]
    fn test_body_field_aliases() {
        let via_content = r#"{"title": "ECG Basics", "content": "<p>hi</p>", "created_at": "2024-03-01T10:00:00Z"}"#;
        let via_desc = r#"{"title": "ECG Basics", "desc": "<p>hi</p>", "created_at": "2024-03-01T10:00:00Z"}"#;

        let a: LessonContent = serde_json::from_str(via_content).expect("content alias");
        let b: LessonContent = serde_json::from_str(via_desc).expect("desc alias");
        assert_eq!(a.body.as_deref(), Some("<p>hi</p>"));
        assert_eq!(a.body, b.body);
    }
}
