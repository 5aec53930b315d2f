//! Core module for the GPA/CGPA calculator

pub mod aggregate;
pub mod collection;
pub mod config;
pub mod format;
pub mod models;
pub mod notice;
pub mod report;
pub mod session;
pub mod worksheet;

pub use notice::Notice;

/// Returns the current version of the `UniGrade` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
