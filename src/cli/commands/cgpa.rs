//! CGPA command handler

use super::export::{print_rows, ExportTarget};
use crate::args::ExportArgs;
use std::path::Path;
use unigrade::config::Config;
use unigrade::core::aggregate::CgpaMode;
use unigrade::core::report::ResultSheet;
use unigrade::core::worksheet::Worksheet;
use unigrade::{error, verbose};

/// Default file stem for exported CGPA sheets
const SHEET_STEM: &str = "CGPA-Result";

/// Run the cgpa command; returns `false` on failure
pub fn run(
    input_file: &Path,
    mode: Option<CgpaMode>,
    export: &ExportArgs,
    config: &Config,
) -> bool {
    match calculate(input_file, mode, export, config) {
        Ok(()) => true,
        Err(err) => {
            error!("CGPA calculation failed for {}: {err}", input_file.display());
            eprintln!("{err}");
            false
        }
    }
}

fn calculate(
    input_file: &Path,
    mode: Option<CgpaMode>,
    export: &ExportArgs,
    config: &Config,
) -> Result<(), String> {
    let sheet = Worksheet::from_path(input_file)
        .map_err(|e| format!("✗ Failed to load {}: {e}", input_file.display()))?;
    let mut session = sheet
        .into_cgpa_session(mode)
        .map_err(|e| format!("✗ {}: {e}", input_file.display()))?;

    // --student beats the worksheet, which beats the configured name
    if let Some(student) = &export.student {
        session.set_student_name(student);
    } else if session.student_name().is_empty() {
        session.set_student_name(&config.report.student_name);
    }

    let result = session.calculate().map_err(|notice| format!("✗ {notice}"))?;
    verbose!(
        "Aggregated {} semesters in {} mode",
        result.semester_count,
        result.mode
    );

    let sheet: ResultSheet = session
        .result_sheet()
        .ok_or_else(|| "✗ No result was produced".to_string())?;
    print_semester_table(&sheet);
    print_rows(&sheet);

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

fn print_semester_table(sheet: &ResultSheet) {
    let name_width = sheet
        .semesters
        .iter()
        .map(|semester| semester.name.len())
        .max()
        .unwrap_or_default()
        .max("Semester".len());

    println!("\n{:<name_width$}  {:>6}  {:>7}  {:>5}", "Semester", "TCR", "TGP", "GPA");
    for semester in &sheet.semesters {
        println!(
            "{:<name_width$}  {:>6}  {:>7}  {:>5}",
            semester.name,
            semester.total_credit_registered,
            semester.total_grade_points,
            semester.gpa
        );
    }
}
