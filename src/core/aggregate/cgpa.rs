//! Cumulative GPA across semesters

use super::semester::ratio;
use crate::core::models::SemesterRecord;
use crate::core::Notice;
use crate::{info, warn};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Highest GPA attainable on the five-point scale
pub const MAX_GPA: f64 = 5.0;

/// How semester grade points are taken into the CGPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CgpaMode {
    /// Semesters carry TCR and TGP (entered or computed from courses)
    #[default]
    Totals,
    /// Semesters carry TCR and a GPA; grade points are GPA × TCR
    Gpa,
}

impl FromStr for CgpaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "totals" | "tgp" | "tce" => Ok(Self::Totals),
            "gpa" => Ok(Self::Gpa),
            _ => Err(format!("Unknown CGPA mode: '{s}' (use totals or gpa)")),
        }
    }
}

impl fmt::Display for CgpaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Totals => write!(f, "totals"),
            Self::Gpa => write!(f, "gpa"),
        }
    }
}

/// Snapshot of one successful CGPA calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgpaResult {
    /// Cumulative grade point average
    pub cgpa: f64,
    /// TCR summed over all semesters
    pub total_credit_registered: f64,
    /// TGP summed over all semesters
    pub total_grade_points: f64,
    /// Number of semesters aggregated
    pub semester_count: usize,
    /// Mode the calculation ran in
    pub mode: CgpaMode,
}

/// Aggregate semesters into a CGPA.
///
/// Every semester is checked before anything is summed; one bad semester fails
/// the whole calculation.
///
/// # Errors
///
/// Returns [`Notice::InvalidSemesters`] if the list is empty or any semester
/// has a blank name or fails the mode's credit/point requirements.
pub fn compute_cgpa(semesters: &[SemesterRecord], mode: CgpaMode) -> Result<CgpaResult, Notice> {
    if semesters.is_empty() || !semesters.iter().all(|s| is_valid(s, mode)) {
        warn!("CGPA calculation refused: invalid semester input");
        return Err(Notice::InvalidSemesters);
    }

    let total_credit_registered: f64 = semesters
        .iter()
        .map(SemesterRecord::total_credit_registered)
        .sum();
    let total_grade_points: f64 = semesters
        .iter()
        .map(|s| match mode {
            CgpaMode::Totals => s.total_grade_points(),
            CgpaMode::Gpa => s.gpa() * s.total_credit_registered(),
        })
        .sum();

    let cgpa = ratio(total_grade_points, total_credit_registered);
    info!(
        "CGPA computed over {} semesters ({mode}): TCR={total_credit_registered}, TGP={total_grade_points}",
        semesters.len()
    );

    Ok(CgpaResult {
        cgpa,
        total_credit_registered,
        total_grade_points,
        semester_count: semesters.len(),
        mode,
    })
}

fn is_valid(semester: &SemesterRecord, mode: CgpaMode) -> bool {
    if semester.name.trim().is_empty() || semester.total_credit_registered() <= 0.0 {
        return false;
    }
    match mode {
        CgpaMode::Totals => semester.total_grade_points() > 0.0,
        CgpaMode::Gpa => (0.0..=MAX_GPA).contains(&semester.gpa()),
    }
}
