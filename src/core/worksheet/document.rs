//! TOML worksheets
//!
//! ```toml
//! student = "Ada Obi"
//! mode = "totals"
//!
//! [[courses]]
//! code = "MTH101"
//! units = 5
//! grade = "A"
//!
//! [[semesters]]
//! name = "Year 1 Harmattan"
//! tcr = 18
//! tgp = 72
//! ```

use super::{Worksheet, WorksheetError};

/// Parse a TOML worksheet; rows are numbered in file order from one
///
/// # Errors
/// Returns [`WorksheetError::Toml`] on syntax or schema errors
pub fn parse_toml(content: &str) -> Result<Worksheet, WorksheetError> {
    let mut sheet: Worksheet = toml::from_str(content)?;

    for (index, course) in sheet.courses.iter_mut().enumerate() {
        course.row = index + 1;
    }
    for (index, semester) in sheet.semesters.iter_mut().enumerate() {
        semester.row = index + 1;
        for (course_index, course) in semester.courses.iter_mut().enumerate() {
            course.row = course_index + 1;
        }
    }

    Ok(sheet)
}
