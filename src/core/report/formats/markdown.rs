//! Markdown report generator
//!
//! Renders a result sheet as Markdown tables. These render well in GitHub,
//! GitLab and VS Code, and print cleanly from any Markdown viewer.

use crate::core::report::{ReportError, ReportGenerator, ResultSheet};
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/result.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, sheet: &ResultSheet) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{title}}", &sheet.title);
        let student = sheet
            .student_name
            .as_deref()
            .map_or_else(String::new, |name| format!("**Student:** {name}  \n"));
        output = output.replace("{{student_line}}", &student);
        output = output.replace("{{date}}", &sheet.date);
        output = output.replace("{{breakdown}}", &Self::generate_breakdown(sheet));
        output = output.replace("{{summary_table}}", &Self::generate_summary_table(sheet));
        output = output.replace("{{footer}}", &sheet.footer);

        output
    }

    /// Course or semester table, whichever the sheet carries
    fn generate_breakdown(sheet: &ResultSheet) -> String {
        let mut table = String::new();

        if !sheet.courses.is_empty() {
            table.push_str("## Course Details\n\n");
            table.push_str("| Course | Credit Units | Grade | Grade Point | Grade Points |\n");
            table.push_str("|---|---|---|---|---|\n");
            for course in &sheet.courses {
                let _ = writeln!(
                    table,
                    "| {} | {} | {} | {} | {} |",
                    escape_cell(&course.code),
                    course.credit_units,
                    course.grade,
                    course.grade_point,
                    course.grade_points
                );
            }
            table.push('\n');
        }

        if !sheet.semesters.is_empty() {
            table.push_str("## Semester Details\n\n");
            table.push_str("| Semester | TCR | TGP | GPA |\n");
            table.push_str("|---|---|---|---|\n");
            for semester in &sheet.semesters {
                let _ = writeln!(
                    table,
                    "| {} | {} | {} | {} |",
                    escape_cell(&semester.name),
                    semester.total_credit_registered,
                    semester.total_grade_points,
                    semester.gpa
                );
            }
            table.push('\n');
        }

        table
    }

    fn generate_summary_table(sheet: &ResultSheet) -> String {
        let mut table = String::from("| | |\n|---|---:|\n");
        for row in &sheet.rows {
            let _ = writeln!(table, "| {} | {} |", row.label, escape_cell(&row.value));
        }
        table
    }
}

/// Pipes would split a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, sheet: &ResultSheet, output_path: &Path) -> Result<(), ReportError> {
        let report_content = self.render(sheet)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, sheet: &ResultSheet) -> Result<String, ReportError> {
        Ok(self.render_template(sheet))
    }
}
