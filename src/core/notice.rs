//! User-facing notices reported by calculator operations
//!
//! Every failure the calculator can hit is recoverable: the operation is
//! refused (or the field is reset to a safe zero) and one of these notices is
//! handed back to the caller for display. Nothing here is fatal.

use crate::core::models::RecordId;
use crate::core::report::ReportError;
use thiserror::Error;

/// A reported condition from an edit, calculation or export
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Notice {
    /// A field edit was rejected; the record is unchanged
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidInput {
        /// Name of the field being edited
        field: &'static str,
        /// Raw value that was rejected
        value: String,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// No record with this id exists in the collection
    #[error("No entry found with id {0}")]
    UnknownRecord(RecordId),

    /// Removing would leave the collection empty
    #[error("Cannot remove: at least one {kind} is required")]
    LastRecord {
        /// Kind of record held by the collection ("course", "semester")
        kind: &'static str,
    },

    /// At least one course is missing a code, a grade, or credit units
    #[error("Incomplete or invalid course entries: every course needs a code, credit units and a grade")]
    IncompleteCourses,

    /// At least one semester fails the CGPA preconditions
    #[error("Invalid semester input: every semester needs a name, a Total Credit Registered (TCR) above zero and valid grade points or GPA")]
    InvalidSemesters,

    /// The export collaborator could not produce the document
    #[error("Export failed: {0}")]
    Export(String),
}

impl Notice {
    /// Short title for the notice, suitable for a toast or a CLI prefix
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::IncompleteCourses | Self::InvalidSemesters => {
                "Invalid Input"
            }
            Self::UnknownRecord(_) => "Not Found",
            Self::LastRecord { .. } => "Cannot remove",
            Self::Export(_) => "Export Error",
        }
    }

    pub(crate) fn invalid(field: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

impl From<ReportError> for Notice {
    fn from(err: ReportError) -> Self {
        Self::Export(err.to_string())
    }
}
