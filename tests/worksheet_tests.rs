//! Integration tests for loading worksheets from disk

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use unigrade::core::aggregate::CgpaMode;
use unigrade::core::format::format_average;
use unigrade::core::models::SemesterEntry;
use unigrade::core::worksheet::{Worksheet, WorksheetError};
use unigrade::core::Notice;

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

#[test]
fn test_toml_and_csv_course_sheets_agree() {
    for name in ["first_semester.toml", "first_semester.csv"] {
        let mut session = Worksheet::from_path(sample(name))
            .and_then(Worksheet::into_gpa_session)
            .unwrap_or_else(|e| panic!("{name} should load: {e}"));

        assert_eq!(session.student_name(), "Ada Obi");
        let summary = session.calculate().unwrap();
        assert_eq!(summary.total_credit_registered, 13, "{name}");
        assert_eq!(summary.total_grade_points, 61, "{name}");
        assert_eq!(format_average(summary.gpa), "4.69", "{name}");
    }
}

#[test]
fn test_transcript_with_course_breakdown() {
    let mut session = Worksheet::from_path(sample("transcript.toml"))
        .and_then(|sheet| sheet.into_cgpa_session(None))
        .expect("transcript should load");

    assert_eq!(session.mode(), CgpaMode::Totals);
    let first = &session.semesters().records()[0];
    assert_eq!(first.name, "Year 1 Harmattan");
    assert_eq!(first.entry(), SemesterEntry::Courses);
    assert_eq!(first.courses.len(), 3);

    let result = session.calculate().unwrap();
    assert!((result.total_credit_registered - 46.0).abs() < f64::EPSILON);
    assert!((result.total_grade_points - 178.0).abs() < f64::EPSILON);
    assert_eq!(format_average(result.cgpa), "3.87");
}

#[test]
fn test_gpa_mode_csv_transcript() {
    let mut session = Worksheet::from_path(sample("transcript_gpa.csv"))
        .and_then(|sheet| sheet.into_cgpa_session(None))
        .expect("transcript should load");

    assert_eq!(session.mode(), CgpaMode::Gpa);
    assert_eq!(session.semesters().records()[0].name, "Year 1, Harmattan");

    let result = session.calculate().unwrap();
    assert!((result.total_grade_points - 162.0).abs() < 1e-9);
    assert_eq!(format_average(result.cgpa), "4.26");
}

#[test]
fn test_explicit_mode_overrides_sheet() {
    let session = Worksheet::from_path(sample("transcript.toml"))
        .and_then(|sheet| sheet.into_cgpa_session(Some(CgpaMode::Gpa)))
        .expect("transcript should load");

    assert_eq!(session.mode(), CgpaMode::Gpa);
}

#[test]
fn test_bad_grade_reports_row() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("bad.csv");
    fs::write(&path, "Code,Units,Grade\nMTH101,5,A\nPHY101,4,Z\n").unwrap();

    let err = Worksheet::from_path(&path)
        .and_then(Worksheet::into_gpa_session)
        .unwrap_err();

    match err {
        WorksheetError::Row { row, notice } => {
            assert_eq!(row, 3);
            assert!(matches!(notice, Notice::InvalidInput { field: "grade", .. }));
        }
        other => panic!("expected a row error, got {other}"),
    }
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("grades.xlsx");
    fs::write(&path, "").unwrap();

    let err = Worksheet::from_path(&path).unwrap_err();
    assert!(matches!(err, WorksheetError::UnsupportedExtension(ext) if ext == "xlsx"));
}

#[test]
fn test_missing_file() {
    let err = Worksheet::from_path(sample("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, WorksheetError::Io { .. }));
}

#[test]
fn test_course_sheet_is_not_a_transcript() {
    let err = Worksheet::from_path(sample("first_semester.toml"))
        .and_then(|sheet| sheet.into_cgpa_session(None))
        .unwrap_err();
    assert!(matches!(err, WorksheetError::Empty("semester")));
}
