//! Report format implementations
//!
//! Provides exporters for different report formats: Markdown, HTML, PDF and JSON.

pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;

pub use html::HtmlReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use pdf::PdfReporter;

use super::ReportGenerator;
use std::fmt;
use std::str::FromStr;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Markdown tables
    #[default]
    Markdown,
    /// Self-contained printable HTML page
    Html,
    /// PDF format (generated from HTML)
    Pdf,
    /// Pretty-printed JSON of the result sheet
    Json,
}

impl ReportFormat {
    /// Every format, in the order they are offered
    pub const ALL: [Self; 4] = [Self::Markdown, Self::Html, Self::Pdf, Self::Json];

    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
            Self::Pdf => write!(f, "pdf"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Build the generator for `format`; `pdf_converter` only applies to PDF
#[must_use]
pub fn reporter_for(format: ReportFormat, pdf_converter: Option<&str>) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Html => Box::new(HtmlReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Pdf => Box::new(
            pdf_converter
                .filter(|c| !c.trim().is_empty())
                .map_or_else(PdfReporter::new, PdfReporter::with_converter),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("MD".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
        assert_eq!("htm".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("docx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_extension_and_display() {
        assert_eq!(ReportFormat::Pdf.extension(), "pdf");
        assert_eq!(ReportFormat::Json.extension(), "json");
        assert_eq!(ReportFormat::Markdown.to_string(), "markdown");
    }
}
