//! Exam creation form
//!
//! Client-side state and validation for the "create exam" form, plus the
//! backend's wire payload. Validation rules are conditional: some fields are
//! required only for certain values of the two selector fields.

mod form;
mod payload;

pub use form::*;
pub use payload::*;
