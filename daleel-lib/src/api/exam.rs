//! Exam creation endpoint

use serde::Deserialize;

use crate::DaleelClient;
use crate::error::Error;
use crate::exam::ExamForm;

/// Response from a successful exam creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamCreated {
    /// Id of the newly created exam.
    pub id: i64,
}

impl DaleelClient {
    /// Creates an exam from a filled form.
    ///
    /// The form is validated before anything is sent; the question cap
    /// against fetched chapter counts is the caller's responsibility (see
    /// [`ExamForm::validate`]), since only the caller knows which chapter
    /// lists it has loaded. Submission failures surface as [`Error::Api`]
    /// and leave the form untouched for correction.
    pub async fn create_exam(&self, form: &ExamForm) -> Result<ExamCreated, Error> {
        form.validate(None)?;
        self.post_json("/exams", &form.payload()).await
    }
}
