//! PDF report generator via HTML-to-PDF conversion
//!
//! Generates PDF reports by first creating an HTML report and then printing
//! it with headless Chrome/Chromium or a configured converter.

use super::html::HtmlReporter;
use crate::core::report::{ReportError, ReportGenerator, ResultSheet};
use crate::{debug, warn};
use std::path::Path;
use std::process::{Command, Stdio};

/// Install hint shown when no converter can be found
const CONVERTER_HINT: &str = "Chrome/Chromium not found.\n\
    \n\
    To export PDF result sheets, install Chrome or Chromium:\n\
    \n\
    • Ubuntu/Debian:  sudo apt install chromium-browser\n\
    • Fedora/RHEL:    sudo dnf install chromium\n\
    • macOS:          brew install --cask google-chrome\n\
    • Windows:        Download from https://www.google.com/chrome/\n\
    \n\
    Alternatively, set a converter:\n\
      unigrade config set report.pdf_converter /path/to/chrome\n";

/// PDF report generator using HTML-to-PDF conversion
pub struct PdfReporter {
    /// Optional custom PDF converter command
    converter: Option<String>,
}

impl PdfReporter {
    /// Create a new PDF reporter that auto-detects Chrome
    #[must_use]
    pub const fn new() -> Self {
        Self { converter: None }
    }

    /// Create a PDF reporter with a custom converter
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_converter(converter: &str) -> Self {
        Self {
            converter: Some(converter.to_owned()),
        }
    }

    /// Detect available Chrome/Chromium browser
    fn detect_chrome() -> Option<String> {
        let candidates = [
            "google-chrome",
            "chrome",
            "chromium",
            "chromium-browser",
            "google-chrome-stable",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome", // macOS
            "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",   // Windows
            "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
        ];

        candidates
            .into_iter()
            .find(|candidate| {
                Command::new(candidate)
                    .arg("--version")
                    .output()
                    .is_ok_and(|output| output.status.success())
            })
            .map(str::to_owned)
    }

    /// Print an HTML file to PDF with Chrome/Chromium
    fn html_to_pdf_chrome(
        chrome_cmd: &str,
        html_path: &Path,
        pdf_path: &Path,
    ) -> Result<(), ReportError> {
        debug!("Converting {} with {chrome_cmd}", html_path.display());
        let status = Command::new(chrome_cmd)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", html_path.canonicalize()?.display()))
            .stderr(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| ReportError::Converter(format!("could not run '{chrome_cmd}': {e}")))?;

        if !status.success() {
            return Err(ReportError::Converter(format!(
                "'{chrome_cmd}' exited with {status}"
            )));
        }

        Ok(())
    }

    fn convert_html_to_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<(), ReportError> {
        if let Some(converter) = &self.converter {
            return Self::html_to_pdf_chrome(converter, html_path, pdf_path);
        }

        match Self::detect_chrome() {
            Some(chrome) => Self::html_to_pdf_chrome(&chrome, html_path, pdf_path),
            None => {
                warn!("No PDF converter available");
                Err(ReportError::Converter(CONVERTER_HINT.to_string()))
            }
        }
    }
}

impl Default for PdfReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for PdfReporter {
    /// Render HTML to a temporary file, then convert it to PDF
    fn generate(&self, sheet: &ResultSheet, output_path: &Path) -> Result<(), ReportError> {
        let html_path =
            std::env::temp_dir().join(format!("unigrade_result_{}.html", std::process::id()));

        HtmlReporter::new().generate(sheet, &html_path)?;
        let converted = self.convert_html_to_pdf(&html_path, output_path);

        let _ = std::fs::remove_file(&html_path);
        converted
    }

    /// PDF is binary; the string form is the HTML that gets printed
    fn render(&self, sheet: &ResultSheet) -> Result<String, ReportError> {
        HtmlReporter::new().render(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::FOOTER;

    #[test]
    fn test_missing_converter_reports_error() {
        let reporter = PdfReporter::with_converter("/nonexistent/unigrade-chrome");
        let sheet = ResultSheet {
            title: "GPA Calculation Result".to_string(),
            student_name: None,
            date: "2024-01-01".to_string(),
            rows: Vec::new(),
            courses: Vec::new(),
            semesters: Vec::new(),
            footer: FOOTER.to_string(),
        };
        let out = std::env::temp_dir().join("unigrade_missing_converter.pdf");

        let err = reporter.generate(&sheet, &out).unwrap_err();
        assert!(matches!(err, ReportError::Converter(_)));
    }
}
