//! Configuration module for `UniGrade`

use crate::core::report::ReportFormat;
use crate::logger::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$UNIGRADE";

/// Every key accepted by [`Config::get`], [`Config::set`] and [`Config::unset`]
pub const KEYS: [&str; 7] = [
    "level",
    "file",
    "verbose",
    "reports_dir",
    "format",
    "pdf_converter",
    "student_name",
];

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory exported result sheets are written to
    #[serde(default)]
    pub reports_dir: String,
}

/// Result sheet export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default export format (markdown, html, pdf, json)
    #[serde(default)]
    pub format: String,
    /// HTML-to-PDF converter command; empty means auto-detect Chrome
    #[serde(default)]
    pub pdf_converter: String,
    /// Student name printed on sheets when none is given on the command line
    #[serde(default)]
    pub student_name: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Export settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
    /// Override export format
    pub format: Option<String>,
    /// Override PDF converter
    pub pdf_converter: Option<String>,
    /// Override student name
    pub student_name: Option<String>,
}

impl Config {
    /// Get the `$UNIGRADE` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/unigrade`
    /// - macOS: `~/Library/Application Support/unigrade`
    /// - Windows: `%APPDATA%\unigrade`
    #[must_use]
    pub fn get_unigrade_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("unigrade")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Fills fields that are empty here and non-empty in `defaults`, so new
    /// settings appear in old config files after an upgrade.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let pairs = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.reports_dir, &defaults.paths.reports_dir),
            (&mut self.report.format, &defaults.report.format),
            (&mut self.report.pdf_converter, &defaults.report.pdf_converter),
            (&mut self.report.student_name, &defaults.report.student_name),
        ];

        let mut changed = false;
        for (field, default) in pairs {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Apply command-line overrides to this config
    ///
    /// Overrides last for this run only; nothing is written to disk. Only
    /// non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir = Self::expand_variables(reports_dir);
        }
        if let Some(format) = &overrides.format {
            self.report.format.clone_from(format);
        }
        if let Some(converter) = &overrides.pdf_converter {
            self.report.pdf_converter.clone_from(converter);
        }
        if let Some(student_name) = &overrides.student_name {
            self.report.student_name.clone_from(student_name);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in
    /// the directory returned by [`get_unigrade_dir`](Self::get_unigrade_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_unigrade_dir().join(CONFIG_FILE_NAME)
    }

    /// Replace `$UNIGRADE` with the config directory path
    #[must_use]
    pub fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_unigrade_dir();
            value.replace(DIR_VARIABLE, &dir.to_string_lossy())
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults (empty strings, `false`).
    /// `$UNIGRADE` is expanded in path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from the compiled-in defaults
    ///
    /// The defaults differ between debug and release builds:
    /// - Debug: `DefaultCLIConfigDebug.toml`
    /// - Release: `DefaultCLIConfigRelease.toml`
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_default()
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults and save it back when anything was added
    /// - On first run: create the config directory and save the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created, the
    /// config cannot be serialized or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_file, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to pretty TOML
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Get a configuration value by key
    ///
    /// Keys are listed in [`KEYS`]; a `section.` prefix and dashes are
    /// accepted (`report.pdf-converter`).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "reports_dir" => Some(self.paths.reports_dir.clone()),
            "format" => Some(self.report.format.clone()),
            "pdf_converter" => Some(self.report.pdf_converter.clone()),
            "student_name" => Some(self.report.student_name.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// `level`, `verbose` and `format` are validated. Call
    /// [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => {
                value.parse::<Level>()?;
                self.logging.level = value.to_lowercase();
            }
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "reports_dir" => self.paths.reports_dir = Self::expand_variables(value),
            "format" => {
                let format = value.parse::<ReportFormat>()?;
                self.report.format = format.to_string();
            }
            "pdf_converter" => self.report.pdf_converter = value.to_string(),
            "student_name" => self.report.student_name = value.trim().to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single value to its default
    ///
    /// Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "reports_dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "format" => self.report.format.clone_from(&defaults.report.format),
            "pdf_converter" => self
                .report
                .pdf_converter
                .clone_from(&defaults.report.pdf_converter),
            "student_name" => self
                .report
                .student_name
                .clone_from(&defaults.report.student_name),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Export format, falling back to Markdown for an unknown value
    #[must_use]
    pub fn report_format(&self) -> ReportFormat {
        self.report.format.parse().unwrap_or_default()
    }

    /// Configured PDF converter, if any
    #[must_use]
    pub fn pdf_converter(&self) -> Option<&str> {
        Some(self.report.pdf_converter.trim()).filter(|c| !c.is_empty())
    }

    /// Delete the config file so the next [`load()`](Config::load) recreates it
    ///
    /// Succeeds without doing anything if there is no config file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

/// The [`KEYS`] entry `key` names, accepting the same spellings as
/// [`Config::get`]
#[must_use]
pub fn canonical_key(key: &str) -> Option<&'static str> {
    let normalized = normalize_key(key);
    KEYS.into_iter().find(|known| *known == normalized)
}

/// `report.pdf-converter` -> `pdf_converter`
fn normalize_key(key: &str) -> String {
    let key = key.trim().to_lowercase().replace('-', "_");
    match key.split_once('.') {
        Some(("logging" | "paths" | "report", field)) => field.to_string(),
        _ => key,
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[report]")?;
        writeln!(f, "  format = \"{}\"", self.report.format)?;
        writeln!(f, "  pdf_converter = \"{}\"", self.report.pdf_converter)?;
        writeln!(f, "  student_name = \"{}\"", self.report.student_name)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_defaults_parse() {
        let defaults: Config = toml::from_str(CONFIG_DEFAULTS).unwrap();
        assert!(!defaults.logging.level.is_empty());
        assert_eq!(defaults.report.format, "markdown");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("report.pdf-converter"), "pdf_converter");
        assert_eq!(normalize_key("Logging.Level"), "level");
        assert_eq!(normalize_key("reports-dir"), "reports_dir");
        assert_eq!(normalize_key("other.level"), "other.level");
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("report.student-name"), Some("student_name"));
        assert_eq!(canonical_key(" FORMAT "), Some("format"));
        assert_eq!(canonical_key("paths.reports_dir"), Some("reports_dir"));
        assert_eq!(canonical_key("database.url"), None);
    }

    #[test]
    fn test_set_validates_level_and_format() {
        let mut config = Config::from_defaults();
        assert!(config.set("level", "loud").is_err());
        assert!(config.set("format", "docx").is_err());

        config.set("format", "HTM").unwrap();
        assert_eq!(config.report.format, "html");
        assert_eq!(config.report_format(), ReportFormat::Html);
    }

    #[test]
    fn test_pdf_converter_blank_is_none() {
        let mut config = Config::default();
        assert!(config.pdf_converter().is_none());
        config.report.pdf_converter = " chromium ".to_string();
        assert_eq!(config.pdf_converter(), Some("chromium"));
    }
}
