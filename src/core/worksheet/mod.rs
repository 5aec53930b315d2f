//! Worksheet loading
//!
//! A worksheet is a TOML or CSV file holding the rows a user would otherwise
//! type into the calculator. Rows are fed through the same collection
//! operations as interactive edits, so every validation and derivation rule
//! applies; the first rejected value stops the load.

pub mod csv_parser;
pub mod document;

use crate::core::aggregate::CgpaMode;
use crate::core::models::{CourseField, RecordId, SemesterField};
use crate::core::session::{CgpaSession, GpaSession};
use crate::core::Notice;
use crate::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a worksheet
#[derive(Debug, Error)]
pub enum WorksheetError {
    /// The file could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The extension is neither `.toml` nor `.csv`
    #[error("Unsupported worksheet type '{0}' (use .toml or .csv)")]
    UnsupportedExtension(String),

    /// TOML syntax or schema error
    #[error("Invalid TOML worksheet: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV structure error
    #[error("Line {line}: {message}")]
    Csv {
        /// 1-based line in the file
        line: usize,
        /// What was wrong
        message: String,
    },

    /// A value was rejected by the calculator
    #[error("Row {row}: {notice}")]
    Row {
        /// 1-based row (line number for CSV)
        row: usize,
        /// The calculator's notice
        notice: Notice,
    },

    /// The worksheet names an unknown CGPA mode
    #[error("{0}")]
    Mode(String),

    /// The worksheet has no rows of the expected kind
    #[error("Worksheet has no {0} rows")]
    Empty(&'static str),
}

/// A spreadsheet-style cell: whatever the file held, passed on as text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One course row
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CourseRow {
    /// Course code
    #[serde(default)]
    pub code: String,
    /// Credit units
    #[serde(default)]
    pub units: Option<Cell>,
    /// Letter grade
    #[serde(default)]
    pub grade: Option<String>,
    /// Where the row came from, for error messages
    #[serde(skip)]
    pub row: usize,
}

/// One semester row, with an optional course breakdown
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SemesterRow {
    /// Semester name; defaults to "Semester N"
    #[serde(default)]
    pub name: Option<String>,
    /// Total Credit Registered
    #[serde(default)]
    pub tcr: Option<Cell>,
    /// Total Grade Points
    #[serde(default, alias = "tce")]
    pub tgp: Option<Cell>,
    /// Semester GPA
    #[serde(default)]
    pub gpa: Option<Cell>,
    /// Course breakdown; when present it supplies TCR and TGP
    #[serde(default)]
    pub courses: Vec<CourseRow>,
    /// Where the row came from, for error messages
    #[serde(skip)]
    pub row: usize,
}

/// Parsed worksheet contents
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Worksheet {
    /// Student name
    #[serde(default)]
    pub student: Option<String>,
    /// CGPA mode (`totals` or `gpa`)
    #[serde(default)]
    pub mode: Option<String>,
    /// Course rows (GPA worksheets)
    #[serde(default)]
    pub courses: Vec<CourseRow>,
    /// Semester rows (CGPA worksheets)
    #[serde(default)]
    pub semesters: Vec<SemesterRow>,
}

impl Worksheet {
    /// Read and parse a worksheet, choosing the parser by extension
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension or does not parse.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WorksheetError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let content = fs::read_to_string(path).map_err(|source| WorksheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let sheet = match extension.as_str() {
            "toml" => document::parse_toml(&content)?,
            "csv" => csv_parser::parse_csv(&content)?,
            _ => return Err(WorksheetError::UnsupportedExtension(extension)),
        };
        debug!(
            "Loaded worksheet {}: {} courses, {} semesters",
            path.display(),
            sheet.courses.len(),
            sheet.semesters.len()
        );
        Ok(sheet)
    }

    /// CGPA mode to use: an explicit choice, then the sheet's own, then
    /// `gpa` when every semester gives a GPA and none gives TGP
    ///
    /// # Errors
    /// Returns an error if the sheet names an unknown mode
    pub fn resolve_mode(&self, explicit: Option<CgpaMode>) -> Result<CgpaMode, WorksheetError> {
        if let Some(mode) = explicit {
            return Ok(mode);
        }
        if let Some(mode) = &self.mode {
            return mode.parse().map_err(WorksheetError::Mode);
        }
        let gpa_only = !self.semesters.is_empty()
            && self
                .semesters
                .iter()
                .all(|s| s.gpa.is_some() && s.tgp.is_none() && s.courses.is_empty());
        Ok(if gpa_only { CgpaMode::Gpa } else { CgpaMode::Totals })
    }

    /// Build a GPA session from the course rows
    ///
    /// # Errors
    /// Returns [`WorksheetError::Empty`] without course rows, or
    /// [`WorksheetError::Row`] for the first rejected value.
    pub fn into_gpa_session(self) -> Result<GpaSession, WorksheetError> {
        if self.courses.is_empty() {
            return Err(WorksheetError::Empty("course"));
        }

        let mut session = GpaSession::new();
        if let Some(student) = &self.student {
            session.set_student_name(student);
        }

        for (index, course) in self.courses.iter().enumerate() {
            let courses = session.courses_mut();
            let id = match courses.id_at(index) {
                Some(id) => id,
                None => courses.add(),
            };
            for (field, value) in course_cells(course) {
                courses
                    .update(id, field, &value)
                    .map_err(|notice| row_error(course.row, index, notice))?;
            }
        }

        info!("Worksheet loaded {} courses", session.courses().len());
        Ok(session)
    }

    /// Build a CGPA session from the semester rows
    ///
    /// # Errors
    /// Returns [`WorksheetError::Empty`] without semester rows, or
    /// [`WorksheetError::Row`] for the first rejected value.
    pub fn into_cgpa_session(self, mode: Option<CgpaMode>) -> Result<CgpaSession, WorksheetError> {
        if self.semesters.is_empty() {
            return Err(WorksheetError::Empty("semester"));
        }

        let mode = self.resolve_mode(mode)?;
        let mut session = CgpaSession::new(mode);
        if let Some(student) = &self.student {
            session.set_student_name(student);
        }

        for (index, semester) in self.semesters.iter().enumerate() {
            let id = match session.semesters().id_at(index) {
                Some(id) => id,
                None => session.semesters_mut().add(),
            };
            load_semester(&mut session, id, semester, mode)
                .map_err(|notice| row_error(semester.row, index, notice))?;
        }

        info!(
            "Worksheet loaded {} semesters ({mode})",
            session.semesters().len()
        );
        Ok(session)
    }
}

fn load_semester(
    session: &mut CgpaSession,
    id: RecordId,
    semester: &SemesterRow,
    mode: CgpaMode,
) -> Result<(), Notice> {
    if let Some(name) = &semester.name {
        session.semesters_mut().update(id, SemesterField::Name, name)?;
    }

    if !semester.courses.is_empty() {
        for course in &semester.courses {
            let course_id = session.add_course(id)?;
            for (field, value) in course_cells(course) {
                session.update_course(id, course_id, field, &value)?;
            }
        }
        session.compute_semester(id)?;
        return Ok(());
    }

    let semesters = session.semesters_mut();
    if let Some(tcr) = &semester.tcr {
        semesters.update(id, SemesterField::TotalCreditRegistered, &tcr.to_string())?;
    }
    // With both given, the mode decides which one is authoritative
    let points = match (mode, &semester.tgp, &semester.gpa) {
        (CgpaMode::Gpa, _, Some(gpa)) | (CgpaMode::Totals, None, Some(gpa)) => {
            Some((SemesterField::Gpa, gpa))
        }
        (_, Some(tgp), _) => Some((SemesterField::TotalGradePoints, tgp)),
        (_, None, None) => None,
    };
    if let Some((field, value)) = points {
        semesters.update(id, field, &value.to_string())?;
    }
    Ok(())
}

fn course_cells(course: &CourseRow) -> Vec<(CourseField, String)> {
    let mut cells = vec![(CourseField::Code, course.code.clone())];
    if let Some(units) = &course.units {
        cells.push((CourseField::CreditUnits, units.to_string()));
    }
    if let Some(grade) = &course.grade {
        cells.push((CourseField::Grade, grade.clone()));
    }
    cells
}

/// Rows without a recorded source position are numbered from one
fn row_error(row: usize, index: usize, notice: Notice) -> WorksheetError {
    let row = if row == 0 { index + 1 } else { row };
    WorksheetError::Row { row, notice }
}
