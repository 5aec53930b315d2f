//! Calculator sessions
//!
//! A session is the single owned state holder behind one calculator screen:
//! the editable list, the student name and the last result. Front ends (the
//! CLI commands, the interactive shell) hold a session and call into it; no
//! state is global.

use crate::core::aggregate::{
    compute_cgpa, compute_semester_from_courses, CgpaMode, CgpaResult, SemesterSummary,
};
use crate::core::collection::{EditableCollection, Record};
use crate::core::format::format_average;
use crate::core::models::{CourseField, CourseRecord, RecordId, SemesterRecord};
use crate::core::report::{ReportGenerator, ResultSheet};
use crate::core::Notice;
use crate::{info, warn};
use std::path::Path;

/// Semester GPA calculator over a course list
#[derive(Debug, Clone, Default)]
pub struct GpaSession {
    courses: EditableCollection<CourseRecord>,
    student_name: String,
}

impl GpaSession {
    /// Start with one blank course and no student name
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The course list
    #[must_use]
    pub const fn courses(&self) -> &EditableCollection<CourseRecord> {
        &self.courses
    }

    /// The course list, for add/update/remove
    pub fn courses_mut(&mut self) -> &mut EditableCollection<CourseRecord> {
        &mut self.courses
    }

    /// Student name as entered
    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Set the student name printed on the result sheet
    pub fn set_student_name(&mut self, name: &str) {
        self.student_name = name.trim().to_string();
    }

    /// Validate every course and compute the semester GPA.
    ///
    /// On success the courses are annotated with their grade points and the
    /// summary becomes the session's snapshot.
    ///
    /// # Errors
    /// Returns [`Notice::IncompleteCourses`] if any course lacks a code,
    /// credit units or a grade. Nothing changes on error.
    pub fn calculate(&mut self) -> Result<SemesterSummary, Notice> {
        if self
            .courses
            .records()
            .iter()
            .any(|course| course.code.trim().is_empty())
        {
            warn!("GPA calculation refused: course without a code");
            return Err(Notice::IncompleteCourses);
        }

        let mut annotated = self.courses.records().to_vec();
        let summary = compute_semester_from_courses(&mut annotated)?;
        info!(
            "GPA is {} from {} credit units",
            format_average(summary.gpa),
            summary.total_credit_registered
        );
        self.courses.commit_calculation(annotated, summary.clone());
        Ok(summary)
    }

    /// Last successful calculation, if any
    #[must_use]
    pub fn summary(&self) -> Option<&SemesterSummary> {
        self.courses.snapshot()
    }

    /// Result sheet for the last calculation, built from the courses as they
    /// were when it ran
    #[must_use]
    pub fn result_sheet(&self) -> Option<ResultSheet> {
        let courses = self.courses.calculated_records()?;
        let summary = self.summary()?;
        Some(ResultSheet::for_gpa(
            courses,
            summary,
            Some(&self.student_name),
        ))
    }

    /// Export the last calculation with `reporter`
    ///
    /// # Errors
    /// Returns [`Notice::Export`] if nothing has been calculated or the
    /// reporter fails.
    pub fn export(&self, reporter: &dyn ReportGenerator, path: &Path) -> Result<(), Notice> {
        export_sheet(self.result_sheet(), reporter, path)
    }

    /// Back to one blank course; the student name is kept
    pub fn reset(&mut self) {
        self.courses.reset();
        info!("GPA calculator reset");
    }
}

/// CGPA calculator over a semester list
#[derive(Debug, Clone, Default)]
pub struct CgpaSession {
    semesters: EditableCollection<SemesterRecord>,
    student_name: String,
    mode: CgpaMode,
}

impl CgpaSession {
    /// Start with "Semester 1" in the given mode
    #[must_use]
    pub fn new(mode: CgpaMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// The semester list
    #[must_use]
    pub const fn semesters(&self) -> &EditableCollection<SemesterRecord> {
        &self.semesters
    }

    /// The semester list, for add/update/remove
    pub fn semesters_mut(&mut self) -> &mut EditableCollection<SemesterRecord> {
        &mut self.semesters
    }

    /// Student name as entered
    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Set the student name printed on the result sheet
    pub fn set_student_name(&mut self, name: &str) {
        self.student_name = name.trim().to_string();
    }

    /// How semester grade points are aggregated
    #[must_use]
    pub const fn mode(&self) -> CgpaMode {
        self.mode
    }

    /// Switch aggregation mode; takes effect at the next calculate
    pub fn set_mode(&mut self, mode: CgpaMode) {
        self.mode = mode;
    }

    /// Append a blank course to a semester's breakdown
    ///
    /// # Errors
    /// Returns [`Notice::UnknownRecord`] if no semester has `semester_id`
    pub fn add_course(&mut self, semester_id: RecordId) -> Result<RecordId, Notice> {
        let course = CourseRecord::blank();
        let course_id = course.id();
        self.semesters.replace_with(semester_id, |semester| {
            let mut next = semester.clone();
            next.courses.push(course);
            Ok(next)
        })?;
        Ok(course_id)
    }

    /// Set one field of a course inside a semester's breakdown
    ///
    /// # Errors
    /// Returns [`Notice::UnknownRecord`] for an unknown semester or course,
    /// or the field parser's notice.
    pub fn update_course(
        &mut self,
        semester_id: RecordId,
        course_id: RecordId,
        field: CourseField,
        value: &str,
    ) -> Result<(), Notice> {
        self.semesters.replace_with(semester_id, |semester| {
            let index = course_index(semester, course_id)?;
            let edited = semester.courses[index].with_field(field, value)?;
            let mut next = semester.clone();
            next.courses[index] = edited;
            Ok(next)
        })
    }

    /// Remove a course from a semester's breakdown
    ///
    /// # Errors
    /// Returns [`Notice::LastRecord`] when it is the breakdown's only course,
    /// or [`Notice::UnknownRecord`] for an unknown semester or course.
    pub fn remove_course(
        &mut self,
        semester_id: RecordId,
        course_id: RecordId,
    ) -> Result<(), Notice> {
        self.semesters.replace_with(semester_id, |semester| {
            if semester.courses.len() == 1 {
                warn!("Refused to remove the last course of {}", semester.name);
                return Err(Notice::LastRecord {
                    kind: CourseRecord::KIND,
                });
            }
            let index = course_index(semester, course_id)?;
            let mut next = semester.clone();
            next.courses.remove(index);
            Ok(next)
        })
    }

    /// Compute a semester's TCR and TGP from its course breakdown
    ///
    /// # Errors
    /// Returns [`Notice::UnknownRecord`] for an unknown semester, or
    /// [`Notice::IncompleteCourses`] if the breakdown is empty or incomplete.
    pub fn compute_semester(&mut self, semester_id: RecordId) -> Result<SemesterSummary, Notice> {
        let mut computed = None;
        self.semesters.replace_with(semester_id, |semester| {
            let mut next = semester.clone();
            let summary = compute_semester_from_courses(&mut next.courses)?;
            next.adopt_summary(&summary);
            computed = Some(summary);
            Ok(next)
        })?;
        computed.ok_or(Notice::UnknownRecord(semester_id))
    }

    /// Validate every semester and compute the CGPA
    ///
    /// # Errors
    /// Returns [`Notice::InvalidSemesters`] if any semester fails validation.
    /// The previous snapshot, if any, is left in place.
    pub fn calculate(&mut self) -> Result<CgpaResult, Notice> {
        let result = compute_cgpa(self.semesters.records(), self.mode)?;
        info!(
            "CGPA is {} over {} semesters",
            format_average(result.cgpa),
            result.semester_count
        );
        self.semesters.record_snapshot(result.clone());
        Ok(result)
    }

    /// Last successful calculation, if any
    #[must_use]
    pub fn result(&self) -> Option<&CgpaResult> {
        self.semesters.snapshot()
    }

    /// Result sheet for the last calculation, built from the semesters as
    /// they were when it ran
    #[must_use]
    pub fn result_sheet(&self) -> Option<ResultSheet> {
        let semesters = self.semesters.calculated_records()?;
        let result = self.result()?;
        Some(ResultSheet::for_cgpa(
            semesters,
            result,
            Some(&self.student_name),
        ))
    }

    /// Export the last calculation with `reporter`
    ///
    /// # Errors
    /// Returns [`Notice::Export`] if nothing has been calculated or the
    /// reporter fails.
    pub fn export(&self, reporter: &dyn ReportGenerator, path: &Path) -> Result<(), Notice> {
        export_sheet(self.result_sheet(), reporter, path)
    }

    /// Back to a single blank "Semester 1"; clears the student name too
    pub fn reset(&mut self) {
        self.semesters.reset();
        self.student_name.clear();
        info!("CGPA calculator reset");
    }
}

fn course_index(semester: &SemesterRecord, course_id: RecordId) -> Result<usize, Notice> {
    semester
        .courses
        .iter()
        .position(|course| course.id() == course_id)
        .ok_or(Notice::UnknownRecord(course_id))
}

fn export_sheet(
    sheet: Option<ResultSheet>,
    reporter: &dyn ReportGenerator,
    path: &Path,
) -> Result<(), Notice> {
    let sheet = sheet.ok_or_else(|| Notice::Export("nothing has been calculated yet".to_string()))?;
    reporter.generate(&sheet, path)?;
    info!("Result exported to {}", path.display());
    Ok(())
}
