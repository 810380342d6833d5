//! Lesson content endpoint

use crate::DaleelClient;
use crate::error::Error;
use crate::model::ContentArea;
use crate::model::LessonContent;
use crate::response::Response;

impl DaleelClient {
    /// Fetches the content of a lesson.
    ///
    /// `chapter` is `None` for the shallow areas, where lessons hang
    /// directly off a category. Content is cached with the content TTL.
    pub async fn get_lesson(
        &self,
        area: ContentArea,
        section: &str,
        chapter: Option<&str>,
        lesson: &str,
    ) -> Result<Response<LessonContent>, Error> {
        let path = match chapter {
            Some(chapter) => format!(
                "/{}/sections/{}/chapters/{}/lessons/{}",
                area.as_path(),
                urlencoding::encode(section),
                urlencoding::encode(chapter),
                urlencoding::encode(lesson)
            ),
            None => format!(
                "/{}/sections/{}/lessons/{}",
                area.as_path(),
                urlencoding::encode(section),
                urlencoding::encode(lesson)
            ),
        };
        self.get_cached(&path, self.content_ttl()).await
    }
}
