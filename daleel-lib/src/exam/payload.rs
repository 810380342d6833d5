//! Exam creation wire payload

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use super::ExamForm;

impl ExamForm {
    /// Serializes the form into the backend's creation payload.
    ///
    /// The payload is a flat JSON object. Chapters are encoded as indexed
    /// sibling keys (`chapters[0]`, `chapters[1]`, ...) rather than a JSON
    /// array — a quirk of the backend's parser that must be preserved
    /// bit-exactly.
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(self.name));
        payload.insert("mode".to_string(), json!(self.mode.as_str()));
        payload.insert(
            "questions_number".to_string(),
            json!(self.questions_number),
        );
        payload.insert("time_mode".to_string(), json!(self.time_mode.as_str()));
        payload.insert(
            "question_type".to_string(),
            json!(self.question_type.as_str()),
        );
        payload.insert(
            "chapters_type".to_string(),
            json!(self.chapters_type.as_str()),
        );
        if let Some(section_id) = self.section_id {
            payload.insert("section_id".to_string(), json!(section_id));
        }
        for (index, chapter) in self.chapters.iter().enumerate() {
            payload.insert(format!("chapters[{index}]"), json!(chapter));
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::super::ChaptersType;
    use super::super::QuestionType;
    use super::*;

    #[test]
    fn test_chapters_serialize_as_indexed_keys() {
        let form = ExamForm {
            name: "Cardio".to_string(),
            questions_number: 10,
            question_type: QuestionType::Incorrect,
            chapters_type: ChaptersType::Specific,
            section_id: Some(3),
            chapters: vec![5, 9],
            ..ExamForm::default()
        };
        let payload = form.payload();

        assert_eq!(payload.get("chapters[0]"), Some(&json!(5)));
        assert_eq!(payload.get("chapters[1]"), Some(&json!(9)));
        // the quirk: sibling keys, never an array key
        assert_eq!(payload.get("chapters"), None);
        assert_eq!(payload.get("section_id"), Some(&json!(3)));
        assert_eq!(payload.get("question_type"), Some(&json!("incorrect")));
        assert_eq!(payload.get("chapters_type"), Some(&json!("specific")));
    }

    #[test]
    fn test_absent_section_is_omitted() {
        let form = ExamForm {
            name: "Quick quiz".to_string(),
            questions_number: 5,
            ..ExamForm::default()
        };
        let payload = form.payload();

        assert_eq!(payload.get("section_id"), None);
        assert_eq!(payload.get("name"), Some(&json!("Quick quiz")));
        assert_eq!(payload.get("mode"), Some(&json!("study")));
        assert_eq!(payload.get("time_mode"), Some(&json!("untimed")));
    }
}
