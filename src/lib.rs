//! Shared library for `UniGrade`
//! Contains the grading core used by the CLI: records, aggregators, sessions and reports

pub mod core;
pub mod logger;

pub use self::core::{config, get_version};
