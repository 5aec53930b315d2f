//! HTML report generator
//!
//! Renders a result sheet as a self-contained, print-ready HTML page with
//! embedded CSS. The page is also the input for PDF conversion.

use crate::core::report::{ReportError, ReportGenerator, ResultSheet};
use askama::Template;
use std::fs;
use std::path::Path;

/// Askama view over a result sheet
#[derive(Template)]
#[template(path = "result.html")]
struct ResultPage<'a> {
    sheet: &'a ResultSheet,
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, sheet: &ResultSheet, output_path: &Path) -> Result<(), ReportError> {
        let report_content = self.render(sheet)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, sheet: &ResultSheet) -> Result<String, ReportError> {
        Ok(ResultPage { sheet }.render()?)
    }
}
