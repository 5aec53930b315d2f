//! Course record model

use crate::core::aggregate::SemesterSummary;
use crate::core::collection::Record;
use crate::core::models::{Grade, RecordId};
use crate::core::Notice;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One row of the course grid: code, credit units and grade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    id: RecordId,

    /// Course code (e.g., "MTH101"); may be blank until calculate
    pub code: String,

    /// Credit units; zero means not yet entered
    pub credit_units: u32,

    /// Letter grade, `None` until selected
    pub grade: Option<Grade>,

    grade_point: Option<u8>,
    grade_points: Option<u64>,
}

/// Editable fields of a [`CourseRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    /// Course code text
    Code,
    /// Credit units (whole number)
    CreditUnits,
    /// Letter grade
    Grade,
}

impl CourseField {
    /// Field name used in notices
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::CreditUnits => "credit units",
            Self::Grade => "grade",
        }
    }
}

impl FromStr for CourseField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "code" | "course" | "course_code" => Ok(Self::Code),
            "units" | "credit_units" | "creditunits" | "cu" => Ok(Self::CreditUnits),
            "grade" => Ok(Self::Grade),
            _ => Err(format!("Unknown course field: '{s}'")),
        }
    }
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CourseRecord {
    /// Create a blank course row
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: RecordId::generate(),
            code: String::new(),
            credit_units: 0,
            grade: None,
            grade_point: None,
            grade_points: None,
        }
    }

    /// Create a filled-in course row
    #[must_use]
    pub fn new(code: &str, credit_units: u32, grade: Grade) -> Self {
        Self {
            code: code.to_string(),
            credit_units,
            grade: Some(grade),
            ..Self::blank()
        }
    }

    /// Identifier assigned at creation
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Grade point looked up from the grade at the last calculate
    #[must_use]
    pub const fn grade_point(&self) -> Option<u8> {
        self.grade_point
    }

    /// Grade point times credit units, from the last calculate
    #[must_use]
    pub const fn grade_points(&self) -> Option<u64> {
        self.grade_points
    }

    /// Whether the row can take part in a GPA calculation
    #[must_use]
    pub const fn has_valid_units_and_grade(&self) -> bool {
        self.credit_units > 0 && self.grade.is_some()
    }

    /// Store the derived grade point and grade points for `grade`
    pub(crate) fn annotate(&mut self, grade: Grade) {
        let point = grade.points();
        self.grade_point = Some(point);
        self.grade_points = Some(u64::from(point) * u64::from(self.credit_units));
    }

    fn clear_derived(&mut self) {
        self.grade_point = None;
        self.grade_points = None;
    }
}

impl Record for CourseRecord {
    type Field = CourseField;
    type Outcome = SemesterSummary;

    const KIND: &'static str = "course";

    fn blank(_position: usize) -> Self {
        Self::blank()
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_field(&self, field: CourseField, value: &str) -> Result<Self, Notice> {
        let raw = value.trim();
        let mut next = self.clone();
        match field {
            CourseField::Code => next.code = raw.to_string(),
            CourseField::CreditUnits => {
                next.credit_units = parse_credit_units(raw)?;
                next.clear_derived();
            }
            CourseField::Grade => {
                next.grade = if raw.is_empty() {
                    None
                } else {
                    Some(raw.parse::<Grade>().map_err(|_| {
                        Notice::invalid("grade", value, "expected one of A, B, C, D, E, F")
                    })?)
                };
                next.clear_derived();
            }
        }
        Ok(next)
    }
}

/// Parse credit units; a cleared field reads as zero
fn parse_credit_units(raw: &str) -> Result<u32, Notice> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>().map_err(|_| {
        let reason = if raw.parse::<i64>().is_ok_and(|n| n < 0) {
            "must not be negative"
        } else {
            "expected a whole number"
        };
        Notice::invalid("credit units", raw, reason)
    })
}
