//! GPA command handler
//!
//! Loads a course worksheet, calculates the semester GPA and optionally
//! exports the result sheet.

use super::export::{print_rows, ExportTarget};
use crate::args::ExportArgs;
use std::path::Path;
use unigrade::config::Config;
use unigrade::core::report::ResultSheet;
use unigrade::core::worksheet::Worksheet;
use unigrade::{error, verbose};

/// Default file stem for exported GPA sheets
const SHEET_STEM: &str = "GPA-Result";

/// Run the gpa command; returns `false` on failure
pub fn run(input_file: &Path, export: &ExportArgs, config: &Config) -> bool {
    match calculate(input_file, export, config) {
        Ok(()) => true,
        Err(err) => {
            error!("GPA calculation failed for {}: {err}", input_file.display());
            eprintln!("{err}");
            false
        }
    }
}

fn calculate(input_file: &Path, export: &ExportArgs, config: &Config) -> Result<(), String> {
    let sheet = Worksheet::from_path(input_file)
        .map_err(|e| format!("✗ Failed to load {}: {e}", input_file.display()))?;
    let mut session = sheet
        .into_gpa_session()
        .map_err(|e| format!("✗ {}: {e}", input_file.display()))?;

    // --student beats the worksheet, which beats the configured name
    if let Some(student) = &export.student {
        session.set_student_name(student);
    } else if session.student_name().is_empty() {
        session.set_student_name(&config.report.student_name);
    }

    let summary = session.calculate().map_err(|notice| format!("✗ {notice}"))?;
    verbose!(
        "Calculated {} courses from {}",
        summary.course_count,
        input_file.display()
    );

    let result: ResultSheet = session
        .result_sheet()
        .ok_or_else(|| "✗ No result was produced".to_string())?;
    print_course_table(&result);
    print_rows(&result);

    if export.report.is_some() || export.output.is_some() {
        let target = ExportTarget::resolve(
            export.report.as_deref(),
            export.output.as_deref(),
            SHEET_STEM,
            config,
        )?;
        session
            .export(target.reporter(config).as_ref(), &target.path)
            .map_err(|notice| format!("✗ {notice}"))?;
        println!("✓ {} sheet written: {}", target.format, target.path.display());
    }

    Ok(())
}

fn print_course_table(sheet: &ResultSheet) {
    let code_width = sheet
        .courses
        .iter()
        .map(|course| course.code.len())
        .max()
        .unwrap_or_default()
        .max("Course".len());

    println!(
        "\n{:<code_width$}  Units  Grade  Point  Points",
        "Course"
    );
    for course in &sheet.courses {
        println!(
            "{:<code_width$}  {:>5}  {:>5}  {:>5}  {:>6}",
            course.code,
            course.credit_units,
            course.grade,
            course.grade_point,
            course.grade_points
        );
    }
}
