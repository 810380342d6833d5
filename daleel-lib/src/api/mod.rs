//! Content API operations

mod catalog;
mod exam;
mod lesson;

pub use catalog::*;
pub use exam::*;
pub use lesson::*;
