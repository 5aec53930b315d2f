//! Semester record model

use crate::core::aggregate::semester::total_to_f64;
use crate::core::aggregate::{derive_from_direct_entry, CgpaResult, DirectField, SemesterSummary};
use crate::core::collection::Record;
use crate::core::models::{CourseRecord, RecordId};
use crate::core::Notice;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which inputs are the source of truth for a semester's totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(tag = "source", content = "gpa", rename_all = "snake_case")]
pub enum SemesterEntry {
    /// Totals were computed from the semester's course breakdown
    Courses,
    /// TCR and TGP were entered directly; GPA is derived on read
    #[default]
    Totals,
    /// TCR and GPA were entered directly; TGP is derived and stored
    Gpa(f64),
}

/// One row of the semester grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterRecord {
    id: RecordId,

    /// Display name (e.g., "Semester 1", "Year 2 Harmattan")
    pub name: String,

    /// Optional course breakdown
    pub courses: Vec<CourseRecord>,

    pub(crate) total_credit_registered: f64,
    pub(crate) total_grade_points: f64,
    pub(crate) entry: SemesterEntry,
}

/// Editable fields of a [`SemesterRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterField {
    /// Semester name
    Name,
    /// Total Credit Registered
    TotalCreditRegistered,
    /// Total Grade Points
    TotalGradePoints,
    /// Semester GPA
    Gpa,
}

impl SemesterField {
    /// Field name used in notices
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::TotalCreditRegistered => "total credit registered",
            Self::TotalGradePoints => "total grade points",
            Self::Gpa => "gpa",
        }
    }
}

impl FromStr for SemesterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "name" => Ok(Self::Name),
            "tcr" | "total_credit_registered" | "credits" => Ok(Self::TotalCreditRegistered),
            "tgp" | "tce" | "total_grade_points" | "points" => Ok(Self::TotalGradePoints),
            "gpa" => Ok(Self::Gpa),
            _ => Err(format!("Unknown semester field: '{s}'")),
        }
    }
}

impl fmt::Display for SemesterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SemesterRecord {
    /// Create an empty semester labelled "Semester {position}"
    #[must_use]
    pub fn blank(position: usize) -> Self {
        Self {
            id: RecordId::generate(),
            name: format!("Semester {position}"),
            courses: Vec::new(),
            total_credit_registered: 0.0,
            total_grade_points: 0.0,
            entry: SemesterEntry::Totals,
        }
    }

    /// Create a semester from directly entered TCR and TGP
    #[must_use]
    pub fn from_totals(name: &str, total_credit_registered: f64, total_grade_points: f64) -> Self {
        Self {
            name: name.to_string(),
            total_credit_registered,
            total_grade_points,
            ..Self::blank(1)
        }
    }

    /// Create a semester from directly entered TCR and GPA
    #[must_use]
    pub fn from_gpa(name: &str, total_credit_registered: f64, gpa: f64) -> Self {
        Self {
            name: name.to_string(),
            total_credit_registered,
            total_grade_points: gpa * total_credit_registered,
            entry: SemesterEntry::Gpa(gpa),
            ..Self::blank(1)
        }
    }

    /// Identifier assigned at creation
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Total Credit Registered (TCR)
    #[must_use]
    pub const fn total_credit_registered(&self) -> f64 {
        self.total_credit_registered
    }

    /// Total Grade Points (TGP)
    #[must_use]
    pub const fn total_grade_points(&self) -> f64 {
        self.total_grade_points
    }

    /// Source of truth for the totals
    #[must_use]
    pub const fn entry(&self) -> SemesterEntry {
        self.entry
    }

    /// Semester GPA; zero whenever no credit is registered
    #[must_use]
    pub fn gpa(&self) -> f64 {
        if self.total_credit_registered <= 0.0 {
            return 0.0;
        }
        match self.entry {
            SemesterEntry::Gpa(gpa) => gpa,
            SemesterEntry::Courses | SemesterEntry::Totals => {
                self.total_grade_points / self.total_credit_registered
            }
        }
    }

    /// Take TCR and TGP from a computed course breakdown
    pub(crate) fn adopt_summary(&mut self, summary: &SemesterSummary) {
        self.total_credit_registered = total_to_f64(summary.total_credit_registered);
        self.total_grade_points = total_to_f64(summary.total_grade_points);
        self.entry = SemesterEntry::Courses;
    }
}

impl Record for SemesterRecord {
    type Field = SemesterField;
    type Outcome = CgpaResult;

    const KIND: &'static str = "semester";

    fn blank(position: usize) -> Self {
        Self::blank(position)
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_field(&self, field: SemesterField, value: &str) -> Result<Self, Notice> {
        let direct = match field {
            SemesterField::Name => {
                let mut next = self.clone();
                next.name = value.trim().to_string();
                return Ok(next);
            }
            SemesterField::TotalCreditRegistered => DirectField::TotalCreditRegistered,
            SemesterField::TotalGradePoints => DirectField::TotalGradePoints,
            SemesterField::Gpa => DirectField::Gpa,
        };
        derive_from_direct_entry(self, direct, value)
    }
}
