//! Shared export plumbing for the calculating commands

use std::path::{Path, PathBuf};
use std::str::FromStr;
use unigrade::config::Config;
use unigrade::core::report::{reporter_for, ReportFormat, ReportGenerator, ResultSheet};

/// Where and how a result sheet should be written
pub struct ExportTarget {
    /// Output format
    pub format: ReportFormat,
    /// Output file
    pub path: PathBuf,
}

impl ExportTarget {
    /// Resolve the export target.
    ///
    /// Format: `report`, else the output file's extension, else config.
    /// Path: `output`, else `<reports_dir>/<stem>.<ext>` (directory created).
    pub fn resolve(
        report: Option<&str>,
        output: Option<&Path>,
        stem: &str,
        config: &Config,
    ) -> Result<Self, String> {
        let format = match report {
            Some(name) => ReportFormat::from_str(name)
                .map_err(|e| format!("✗ {e}. Use: markdown, html, pdf or json"))?,
            None => output
                .and_then(Path::extension)
                .and_then(|ext| ext.to_str())
                .and_then(|ext| ext.parse().ok())
                .unwrap_or_else(|| config.report_format()),
        };

        let path = if let Some(output) = output {
            output.to_path_buf()
        } else {
            let reports_dir = PathBuf::from(&config.paths.reports_dir);
            std::fs::create_dir_all(&reports_dir).map_err(|e| {
                format!(
                    "✗ Failed to create reports directory {}: {e}",
                    reports_dir.display()
                )
            })?;
            reports_dir.join(format!("{stem}.{}", format.extension()))
        };

        Ok(Self { format, path })
    }

    /// Generator for this target's format
    pub fn reporter(&self, config: &Config) -> Box<dyn ReportGenerator> {
        reporter_for(self.format, config.pdf_converter())
    }
}

/// Print a result sheet's label/value rows as an aligned block
pub fn print_rows(sheet: &ResultSheet) {
    let width = sheet
        .rows
        .iter()
        .map(|row| row.label.len())
        .max()
        .unwrap_or_default();

    println!("\n=== {} ===", sheet.title);
    if let Some(student) = &sheet.student_name {
        println!("Student: {student}");
    }
    for row in &sheet.rows {
        println!("{:<width$}  {}", row.label, row.value);
    }
}
