//! CLI argument definitions for `UniGrade`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use unigrade::config::ConfigOverrides;
use unigrade::core::aggregate::CgpaMode;
use unigrade::logger::Level;

/// CLI log level argument
///
/// Converts to a lowercase string for config storage and to
/// [`Level`] for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// How semesters contribute grade points to the CGPA
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    /// Semesters give TCR and TGP
    Totals,
    /// Semesters give TCR and GPA
    Gpa,
}

impl From<ModeArg> for CgpaMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Totals => Self::Totals,
            ModeArg::Gpa => Self::Gpa,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `format`, `reports_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Export options shared by the calculating commands
#[derive(Debug, clap::Args)]
pub struct ExportArgs {
    /// Student name printed on the result sheet (defaults to config `student_name`)
    #[arg(long, value_name = "NAME")]
    pub student: Option<String>,

    /// Export the result sheet in this format (markdown, html, pdf, json)
    #[arg(long, value_name = "FORMAT")]
    pub report: Option<String>,

    /// Output file for the result sheet (implies an export; defaults to the config `reports_dir`)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Calculate a semester GPA from a course worksheet.
    ///
    /// The worksheet is a TOML file with `[[courses]]` tables or a CSV file
    /// with a `Code,Units,Grade` header.
    Gpa {
        /// Path to the course worksheet (.toml or .csv)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        #[command(flatten)]
        export: ExportArgs,
    },
    /// Calculate a CGPA from a semester worksheet.
    ///
    /// The worksheet is a TOML file with `[[semesters]]` tables or a CSV file
    /// with a `Name,TCR,TGP` or `Name,TCR,GPA` header.
    Cgpa {
        /// Path to the semester worksheet (.toml or .csv)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Aggregation mode; inferred from the worksheet when omitted
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        #[command(flatten)]
        export: ExportArgs,
    },
    /// Print the grading table with score bands.
    Grades,
    /// Edit and calculate interactively.
    ///
    /// Starts a GPA session over courses, or a CGPA session over semesters
    /// with `--cgpa`. Type `help` at the prompt for commands.
    Shell {
        /// Edit semesters and calculate a CGPA instead of a GPA
        #[arg(long)]
        cgpa: bool,

        /// CGPA aggregation mode
        #[arg(long, value_enum, default_value = "totals")]
        mode: ModeArg,

        /// Student name printed on exported sheets
        #[arg(long, value_name = "NAME")]
        student: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "unigrade",
    about = "Semester GPA and CGPA calculator for the five-point grading scale",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override config export format
    #[arg(long = "config-format", value_name = "FORMAT")]
    pub config_format: Option<String>,

    /// Override config PDF converter
    #[arg(long = "config-pdf-converter", value_name = "CMD")]
    pub config_pdf_converter: Option<String>,

    /// Override config PDF converter (short form)
    #[arg(long = "pdf-converter", value_name = "CMD")]
    pub pdf_converter: Option<String>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--reports-dir`) take precedence over
    /// long-form flags (e.g., `--config-reports-dir`) when both are given.
    /// A `--student` on a calculating command overrides the configured name.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let student_name = match &self.command {
            Command::Gpa { export, .. } | Command::Cgpa { export, .. } => export.student.clone(),
            Command::Shell { student, .. } => student.clone(),
            Command::Config { .. } | Command::Grades => None,
        };

        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            reports_dir: self
                .reports_dir
                .as_ref()
                .or(self.config_reports_dir.as_ref())
                .map(|p| p.to_string_lossy().to_string()),
            format: self.config_format.clone(),
            pdf_converter: self
                .pdf_converter
                .clone()
                .or_else(|| self.config_pdf_converter.clone()),
            student_name,
        }
    }
}
