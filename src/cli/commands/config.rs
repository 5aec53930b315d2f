//! Config command handler
//!
//! Shows and edits the stored settings: log level and file, where result
//! sheets are written, the default export format, the PDF converter and the
//! student name printed on sheets.

use crate::args::ConfigSubcommand;
use std::io::{self, BufRead, Write};
use unigrade::config::{canonical_key, Config, KEYS};
use unigrade::core::report::ReportFormat;
use unigrade::{error, info};

/// Run a config subcommand; returns `false` on failure
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> bool {
    let outcome = match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => Ok(show_all(config)),
        Some(ConfigSubcommand::Get { key: Some(key) }) => show_one(config, &key),
        Some(ConfigSubcommand::Set { key, value }) => set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset(&mut io::stdin().lock()),
    };

    match outcome {
        Ok(message) => {
            println!("{message}");
            true
        }
        Err(message) => {
            error!("Config command failed: {message}");
            eprintln!("{message}");
            false
        }
    }
}

fn show_all(config: &Config) -> String {
    format!(
        "\n=== UniGrade settings ===\n\n{config}\nFile: {}",
        Config::get_config_file_path().display()
    )
}

fn show_one(config: &Config, key: &str) -> Result<String, String> {
    let key = known_key(key)?;
    let value = config.get(key).unwrap_or_default();
    Ok(describe(key, &value))
}

fn set(config: &mut Config, key: &str, value: &str) -> Result<String, String> {
    let key = apply_set(config, key, value)?;
    save(config)?;
    info!("Config '{key}' set");
    Ok(confirmation(config, key))
}

fn unset(config: &mut Config, defaults: &Config, key: &str) -> Result<String, String> {
    let key = known_key(key)?;
    config.unset(key, defaults)?;
    save(config)?;
    let value = config.get(key).unwrap_or_default();
    Ok(format!("✓ {key} back to default: {}", describe(key, &value)))
}

fn reset(input: &mut impl BufRead) -> Result<String, String> {
    if !Config::get_config_file_path().exists() {
        return Ok("✓ Settings are already at their defaults".to_string());
    }

    print!("Discard all UniGrade settings, including the student name? (y/n): ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| format!("✗ Could not read the answer: {e}"))?;
    if !is_yes(&answer) {
        return Ok("✗ Reset cancelled".to_string());
    }

    Config::reset().map_err(|e| format!("✗ Failed to remove the settings file: {e}"))?;
    Ok("✓ Settings restored to defaults".to_string())
}

/// Validate and store `value`, returning the key it was stored under
fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<&'static str, String> {
    let key = known_key(key)?;
    config
        .set(key, value)
        .map_err(|_| format!("✗ Invalid value '{value}' for {key}: {}", expected(key)))?;
    Ok(key)
}

fn save(config: &Config) -> Result<(), String> {
    config
        .save()
        .map_err(|e| format!("✗ Failed to save settings: {e}"))
}

fn known_key(key: &str) -> Result<&'static str, String> {
    canonical_key(key)
        .ok_or_else(|| format!("✗ Unknown setting '{key}' (known: {})", KEYS.join(", ")))
}

fn expected(key: &str) -> String {
    match key {
        "level" => "expected error, warn, info or debug".to_string(),
        "verbose" => "expected true or false".to_string(),
        "format" => {
            let names: Vec<String> = ReportFormat::ALL.iter().map(ToString::to_string).collect();
            format!("expected one of {}", names.join(", "))
        }
        _ => "not accepted".to_string(),
    }
}

/// What was stored, phrased for the setting that changed
fn confirmation(config: &Config, key: &str) -> String {
    match key {
        "format" => {
            let format = config.report_format();
            format!("✓ Result sheets export as {format} (.{})", format.extension())
        }
        "student_name" if config.report.student_name.is_empty() => {
            "✓ Result sheets will carry no student name".to_string()
        }
        "student_name" => format!(
            "✓ Result sheets will be issued to {}",
            config.report.student_name
        ),
        _ => {
            let value = config.get(key).unwrap_or_default();
            format!("✓ {key} = {}", describe(key, &value))
        }
    }
}

/// Show blank values as what they mean
fn describe(key: &str, value: &str) -> String {
    if !value.is_empty() {
        return value.to_string();
    }
    let meaning = match key {
        "file" => "(no log file)",
        "reports_dir" => "(current directory)",
        "pdf_converter" => "(headless Chrome or Chromium)",
        "student_name" => "(none)",
        _ => "(unset)",
    };
    meaning.to_string()
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_format_reports_extension() {
        let mut config = Config::from_defaults();
        let key = apply_set(&mut config, "report.format", "HTM").unwrap();

        assert_eq!(key, "format");
        assert_eq!(confirmation(&config, key), "✓ Result sheets export as html (.html)");
    }

    #[test]
    fn test_invalid_format_lists_choices() {
        let mut config = Config::from_defaults();
        let err = apply_set(&mut config, "format", "docx").unwrap_err();

        assert!(err.contains("markdown, html, pdf, json"), "{err}");
        assert_eq!(config.report_format(), ReportFormat::Markdown);
    }

    #[test]
    fn test_invalid_level_names_levels() {
        let mut config = Config::from_defaults();
        let err = apply_set(&mut config, "logging.level", "loud").unwrap_err();
        assert!(err.contains("error, warn, info or debug"), "{err}");
    }

    #[test]
    fn test_student_name_confirmation() {
        let mut config = Config::from_defaults();
        let key = apply_set(&mut config, "student-name", "  Ada Obi ").unwrap();
        assert_eq!(
            confirmation(&config, key),
            "✓ Result sheets will be issued to Ada Obi"
        );

        apply_set(&mut config, key, "").unwrap();
        assert_eq!(
            confirmation(&config, key),
            "✓ Result sheets will carry no student name"
        );
    }

    #[test]
    fn test_unknown_key_lists_known_keys() {
        let err = known_key("database.url").unwrap_err();
        assert!(err.contains("database.url"));
        assert!(err.contains("student_name"));
    }

    #[test]
    fn test_blank_values_are_described() {
        assert_eq!(describe("pdf_converter", ""), "(headless Chrome or Chromium)");
        assert_eq!(describe("student_name", ""), "(none)");
        assert_eq!(describe("level", "warn"), "warn");
    }

    #[test]
    fn test_show_one_uses_canonical_key() {
        let mut config = Config::from_defaults();
        config.report.student_name = "Chidi Okafor".to_string();
        assert_eq!(
            show_one(&config, "REPORT.STUDENT_NAME").unwrap(),
            "Chidi Okafor"
        );
        assert!(show_one(&config, "nope").is_err());
    }

    #[test]
    fn test_reset_answer() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
