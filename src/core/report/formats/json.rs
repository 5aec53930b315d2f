//! JSON report generator

use crate::core::report::{ReportError, ReportGenerator, ResultSheet};
use std::fs;
use std::path::Path;

/// Pretty-printed JSON dump of the result sheet, for other tools to consume
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, sheet: &ResultSheet, output_path: &Path) -> Result<(), ReportError> {
        let mut content = self.render(sheet)?;
        content.push('\n');
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, sheet: &ResultSheet) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(sheet)?)
    }
}
