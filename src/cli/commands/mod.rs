//! CLI command handlers for `UniGrade`.
//!
//! Each command is implemented in its own submodule.

pub mod cgpa;
pub mod config;
pub mod export;
pub mod gpa;
pub mod grades;
pub mod shell;
