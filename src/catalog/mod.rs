pub mod catalog;
pub mod course;

pub use crate::types::identifiers::CourseId;
pub use catalog::Catalog;
pub use course::{Course, CourseError, RawCourse};
