//! Data models for `UniGrade`

pub mod course;
pub mod grade;
pub mod id;
pub mod semester;

pub use course::{CourseField, CourseRecord};
pub use grade::{Grade, ScoreBand, SCORE_BANDS};
pub use id::RecordId;
pub use semester::{SemesterEntry, SemesterField, SemesterRecord};
