//! Exam form fields and validation

use crate::error::ValidationErrors;
use crate::model::NodeSummary;

/// How the exam is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExamMode {
    #[default]
    Study,
    Exam,
}

impl ExamMode {
    /// The wire value for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamMode::Study => "study",
            ExamMode::Exam => "exam",
        }
    }
}

/// Whether the exam is timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    #[default]
    Untimed,
    Timed,
}

impl TimeMode {
    /// The wire value for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeMode::Untimed => "untimed",
            TimeMode::Timed => "timed",
        }
    }
}

/// Which question pool the exam draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionType {
    /// All available questions.
    #[default]
    All,
    /// Questions the user previously answered incorrectly.
    Incorrect,
    /// Questions the user has never answered.
    Unanswered,
}

impl QuestionType {
    /// The wire value for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::All => "all",
            QuestionType::Incorrect => "incorrect",
            QuestionType::Unanswered => "unanswered",
        }
    }

    /// History-based pools are tracked per section, so they need one.
    pub fn requires_section(&self) -> bool {
        !matches!(self, QuestionType::All)
    }
}

/// Whether the exam covers all chapters or a specific set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChaptersType {
    #[default]
    All,
    Specific,
}

impl ChaptersType {
    /// The wire value for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChaptersType::All => "all",
            ChaptersType::Specific => "specific",
        }
    }
}

impl std::str::FromStr for ExamMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(ExamMode::Study),
            "exam" => Ok(ExamMode::Exam),
            other => Err(format!("unknown exam mode '{other}'")),
        }
    }
}

impl std::str::FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "untimed" => Ok(TimeMode::Untimed),
            "timed" => Ok(TimeMode::Timed),
            other => Err(format!("unknown time mode '{other}'")),
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(QuestionType::All),
            "incorrect" => Ok(QuestionType::Incorrect),
            "unanswered" => Ok(QuestionType::Unanswered),
            other => Err(format!("unknown question type '{other}'")),
        }
    }
}

impl std::str::FromStr for ChaptersType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ChaptersType::All),
            "specific" => Ok(ChaptersType::Specific),
            other => Err(format!("unknown chapters type '{other}'")),
        }
    }
}

/// The "create exam" form.
///
/// Cross-field rules apply on top of the per-field ones: `question_type`
/// drives whether `section_id` is required, and `chapters_type` drives
/// whether `chapters` must be non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamForm {
    /// Display name for the exam.
    pub name: String,
    /// Study or exam mode.
    pub mode: ExamMode,
    /// How many questions the user asked for.
    pub questions_number: u32,
    /// Timed or untimed.
    pub time_mode: TimeMode,
    /// Question pool selector; non-`All` pools require a section.
    pub question_type: QuestionType,
    /// Chapter coverage selector; `Specific` requires a chapter list.
    pub chapters_type: ChaptersType,
    /// Section the exam draws from.
    pub section_id: Option<i64>,
    /// Chapter ids, when `chapters_type` is `Specific`.
    pub chapters: Vec<i64>,
}

impl ExamForm {
    /// Validates the form.
    ///
    /// All rules are checked in one pass so every failing field gets an
    /// error. `question_cap` is the maximum question count available for
    /// the chosen chapters (see [`question_cap`]); pass `None` when the
    /// counts have not been fetched yet.
    pub fn validate(&self, question_cap: Option<u32>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }

        if self.questions_number == 0 {
            errors.push("questions_number", "At least one question is required");
        } else if let Some(cap) = question_cap
            && self.questions_number > cap
        {
            errors.push(
                "questions_number",
                format!("Only {cap} questions are available"),
            );
        }

        if self.question_type.requires_section() && self.section_id.is_none() {
            errors.push("section_id", "A section is required for this question type");
        }

        if self.chapters_type == ChaptersType::Specific && self.chapters.is_empty() {
            errors.push("chapters", "Select at least one chapter");
        }

        errors.into_result()
    }
}

/// Computes the question cap from fetched chapter summaries.
///
/// The user-entered question count is validated against this sum.
pub fn question_cap<'a>(chapters: impl IntoIterator<Item = &'a NodeSummary>) -> u32 {
    chapters
        .into_iter()
        .filter_map(|c| c.questions_count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ExamForm {
        ExamForm {
            name: "Cardiology review".to_string(),
            questions_number: 20,
            ..ExamForm::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate(None).is_ok());
    }

    #[test]
    fn test_incorrect_pool_requires_section() {
        let form = ExamForm {
            question_type: QuestionType::Incorrect,
            section_id: None,
            ..valid_form()
        };
        let errors = form.validate(None).expect_err("missing section");
        assert!(errors.for_field("section_id").is_some());

        let form = ExamForm {
            question_type: QuestionType::Incorrect,
            section_id: Some(3),
            ..valid_form()
        };
        assert!(form.validate(None).is_ok());
    }

    #[test]
    fn test_specific_chapters_require_a_list() {
        let form = ExamForm {
            chapters_type: ChaptersType::Specific,
            chapters: vec![],
            ..valid_form()
        };
        let errors = form.validate(None).expect_err("missing chapters");
        assert!(errors.for_field("chapters").is_some());

        let form = ExamForm {
            chapters_type: ChaptersType::Specific,
            chapters: vec![5, 9],
            ..valid_form()
        };
        assert!(form.validate(None).is_ok());
    }

    #[test]
    fn test_questions_number_is_clamped_against_cap() {
        let form = ExamForm {
            questions_number: 50,
            ..valid_form()
        };
        let errors = form.validate(Some(30)).expect_err("over cap");
        assert!(errors.for_field("questions_number").is_some());

        assert!(form.validate(Some(50)).is_ok());

        let empty = ExamForm {
            questions_number: 0,
            ..valid_form()
        };
        let errors = empty.validate(None).expect_err("zero questions");
        assert!(errors.for_field("questions_number").is_some());
    }

    #[test]
    fn test_all_failing_fields_are_reported_together() {
        let form = ExamForm {
            name: "  ".to_string(),
            questions_number: 0,
            question_type: QuestionType::Unanswered,
            chapters_type: ChaptersType::Specific,
            ..ExamForm::default()
        };
        let errors = form.validate(None).expect_err("several failures");
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_question_cap_sums_counts() {
        let chapters = vec![
            NodeSummary {
                id: 1,
                slug: "ecg".to_string(),
                title: "ECG".to_string(),
                questions_count: Some(12),
            },
            NodeSummary {
                id: 2,
                slug: "echo".to_string(),
                title: "Echo".to_string(),
                questions_count: None,
            },
            NodeSummary {
                id: 3,
                slug: "valves".to_string(),
                title: "Valves".to_string(),
                questions_count: Some(8),
            },
        ];
        assert_eq!(question_cap(&chapters), 20);
    }
}
