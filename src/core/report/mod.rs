//! Result sheet export
//!
//! A [`ResultSheet`] is the flat, already-formatted snapshot handed to the
//! exporters: a title, the student, a date, ordered label/value rows and an
//! optional course or semester breakdown. Exporters never see live records.

pub mod formats;

use crate::core::aggregate::{CgpaResult, SemesterSummary};
use crate::core::format::{classify, format_average, format_quantity};
use crate::core::models::{CourseRecord, SemesterRecord};
use serde::Serialize;
use std::io;
use std::path::Path;
use thiserror::Error;

pub use formats::{
    reporter_for, HtmlReporter, JsonReporter, MarkdownReporter, PdfReporter, ReportFormat,
};

/// Title used for semester GPA sheets
pub const GPA_TITLE: &str = "GPA Calculation Result";
/// Title used for CGPA sheets
pub const CGPA_TITLE: &str = "CGPA Calculation Result";
/// Footer line printed under every sheet
pub const FOOTER: &str = "University GPA/CGPA Calculator";

/// Label/value pair on a result sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    /// Row label (e.g., "Total Credit Registered (TCR)")
    pub label: String,
    /// Display value
    pub value: String,
}

impl ResultRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// One line of the course breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseLine {
    /// Course code
    pub code: String,
    /// Credit units
    pub credit_units: u32,
    /// Letter grade
    pub grade: String,
    /// Grade point, blank if not calculated
    pub grade_point: String,
    /// Grade points earned, blank if not calculated
    pub grade_points: String,
}

impl From<&CourseRecord> for CourseLine {
    fn from(course: &CourseRecord) -> Self {
        Self {
            code: course.code.clone(),
            credit_units: course.credit_units,
            grade: course.grade.map(|g| g.to_string()).unwrap_or_default(),
            grade_point: course
                .grade_point()
                .map(|p| p.to_string())
                .unwrap_or_default(),
            grade_points: course
                .grade_points()
                .map(|p| p.to_string())
                .unwrap_or_default(),
        }
    }
}

/// One line of the semester breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterLine {
    /// Semester name
    pub name: String,
    /// TCR
    pub total_credit_registered: String,
    /// TGP
    pub total_grade_points: String,
    /// Semester GPA, two decimals
    pub gpa: String,
}

impl From<&SemesterRecord> for SemesterLine {
    fn from(semester: &SemesterRecord) -> Self {
        Self {
            name: semester.name.clone(),
            total_credit_registered: format_quantity(semester.total_credit_registered()),
            total_grade_points: format_quantity(semester.total_grade_points()),
            gpa: format_average(semester.gpa()),
        }
    }
}

/// Immutable, display-ready snapshot of a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSheet {
    /// Heading
    pub title: String,
    /// Student name, if one was given
    pub student_name: Option<String>,
    /// Date the sheet was produced
    pub date: String,
    /// Ordered label/value rows
    pub rows: Vec<ResultRow>,
    /// Course breakdown (GPA sheets)
    pub courses: Vec<CourseLine>,
    /// Semester breakdown (CGPA sheets)
    pub semesters: Vec<SemesterLine>,
    /// Footer line
    pub footer: String,
}

impl ResultSheet {
    /// Build a sheet for a semester GPA calculation
    #[must_use]
    pub fn for_gpa(
        courses: &[CourseRecord],
        summary: &SemesterSummary,
        student_name: Option<&str>,
    ) -> Self {
        let rows = vec![
            ResultRow::new("Total Courses", summary.course_count.to_string()),
            ResultRow::new(
                "Total Credit Registered (TCR)",
                summary.total_credit_registered.to_string(),
            ),
            ResultRow::new(
                "Total Grade Points (TGP)",
                summary.total_grade_points.to_string(),
            ),
            ResultRow::new("Grade Point Average (GPA)", format_average(summary.gpa)),
            ResultRow::new("Degree Classification", classify(summary.gpa).label()),
        ];
        Self::assemble(GPA_TITLE, student_name, rows)
            .with_courses(courses.iter().map(CourseLine::from).collect())
    }

    /// Build a sheet for a CGPA calculation
    #[must_use]
    pub fn for_cgpa(
        semesters: &[SemesterRecord],
        result: &CgpaResult,
        student_name: Option<&str>,
    ) -> Self {
        let rows = vec![
            ResultRow::new("Total Semesters", result.semester_count.to_string()),
            ResultRow::new(
                "Total Credit Registered (TCR)",
                format_quantity(result.total_credit_registered),
            ),
            ResultRow::new(
                "Total Grade Points (TGP)",
                format_quantity(result.total_grade_points),
            ),
            ResultRow::new(
                "Cumulative Grade Point Average (CGPA)",
                format_average(result.cgpa),
            ),
            ResultRow::new("Degree Classification", classify(result.cgpa).label()),
        ];
        let mut sheet = Self::assemble(CGPA_TITLE, student_name, rows);
        sheet.semesters = semesters.iter().map(SemesterLine::from).collect();
        sheet
    }

    /// Replace the date (sheets are stamped with today's date on creation)
    #[must_use]
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    /// Value of the row with `label`
    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    fn assemble(title: &str, student_name: Option<&str>, rows: Vec<ResultRow>) -> Self {
        Self {
            title: title.to_string(),
            student_name: student_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            rows,
            courses: Vec::new(),
            semesters: Vec::new(),
            footer: FOOTER.to_string(),
        }
    }

    fn with_courses(mut self, courses: Vec<CourseLine>) -> Self {
        self.courses = courses;
        self
    }
}

/// Errors raised while exporting a result sheet
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing the output (or a temporary file) failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No usable HTML-to-PDF converter was found or it failed
    #[error("PDF conversion failed: {0}")]
    Converter(String),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Write the sheet to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, sheet: &ResultSheet, output_path: &Path) -> Result<(), ReportError>;

    /// Render the sheet as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, sheet: &ResultSheet) -> Result<String, ReportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{compute_cgpa, compute_semester_from_courses, CgpaMode};
    use crate::core::models::Grade;

    #[test]
    fn test_gpa_sheet_rows_and_courses() {
        let mut courses = vec![
            CourseRecord::new("MTH101", 5, Grade::A),
            CourseRecord::new("PHY101", 4, Grade::B),
            CourseRecord::new("CHM101", 4, Grade::A),
        ];
        let summary = compute_semester_from_courses(&mut courses).unwrap();
        let sheet = ResultSheet::for_gpa(&courses, &summary, Some("  Ada Obi "));

        assert_eq!(sheet.title, GPA_TITLE);
        assert_eq!(sheet.student_name.as_deref(), Some("Ada Obi"));
        assert_eq!(sheet.value_of("Total Grade Points (TGP)"), Some("61"));
        assert_eq!(sheet.value_of("Grade Point Average (GPA)"), Some("4.69"));
        assert_eq!(
            sheet.value_of("Degree Classification"),
            Some("First Class Honours")
        );
        assert_eq!(sheet.courses.len(), 3);
        assert_eq!(sheet.courses[1].grade_points, "16");
        assert!(sheet.semesters.is_empty());
    }

    #[test]
    fn test_cgpa_sheet_rows_in_order() {
        let semesters = vec![
            SemesterRecord::from_totals("Semester 1", 18.0, 72.0),
            SemesterRecord::from_totals("Semester 2", 15.0, 45.0),
        ];
        let result = compute_cgpa(&semesters, CgpaMode::Totals).unwrap();
        let sheet = ResultSheet::for_cgpa(&semesters, &result, None).with_date("2024-05-01");

        let labels: Vec<&str> = sheet.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Total Semesters",
                "Total Credit Registered (TCR)",
                "Total Grade Points (TGP)",
                "Cumulative Grade Point Average (CGPA)",
                "Degree Classification",
            ]
        );
        assert_eq!(sheet.value_of("Total Credit Registered (TCR)"), Some("33"));
        assert_eq!(sheet.value_of("Cumulative Grade Point Average (CGPA)"), Some("3.55"));
        assert_eq!(
            sheet.value_of("Degree Classification"),
            Some("Second Class Honours (Upper Division)")
        );
        assert_eq!(sheet.semesters[1].gpa, "3.00");
        assert_eq!(sheet.date, "2024-05-01");
        assert!(sheet.student_name.is_none());
    }

    #[test]
    fn test_blank_student_name_is_dropped() {
        let semesters = vec![SemesterRecord::from_totals("Semester 1", 18.0, 72.0)];
        let result = compute_cgpa(&semesters, CgpaMode::Totals).unwrap();
        let sheet = ResultSheet::for_cgpa(&semesters, &result, Some("   "));
        assert!(sheet.student_name.is_none());
    }
}
