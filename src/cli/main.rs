//! Command-line interface entry point for `UniGrade`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use unigrade::config::Config;
use unigrade::info;
use unigrade::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = Some(config.logging.file.as_str())
        .filter(|file| !file.is_empty())
        .map(PathBuf::from);

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let succeeded = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Gpa { input_file, export } => commands::gpa::run(&input_file, &export, &config),
        Command::Cgpa {
            input_file,
            mode,
            export,
        } => commands::cgpa::run(&input_file, mode.map(Into::into), &export, &config),
        Command::Grades => {
            commands::grades::run();
            true
        }
        Command::Shell { cgpa, mode, .. } => {
            commands::shell::run(cgpa, mode.into(), &config);
            true
        }
    };

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
