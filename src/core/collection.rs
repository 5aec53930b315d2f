//! Editable collection controller shared by the course and semester grids
//!
//! A collection always holds at least one record. Edits replace the affected
//! record with a fresh value built from the old one, so no two rows ever
//! share state. A calculation snapshot survives later edits (it is marked
//! stale) and is only dropped by [`EditableCollection::reset`].

use crate::core::models::RecordId;
use crate::core::Notice;
use crate::{debug, warn};
use std::fmt;

/// A row kind that can live in an [`EditableCollection`]
pub trait Record: Clone + fmt::Debug {
    /// Editable fields of the record
    type Field: Copy + fmt::Debug + fmt::Display;
    /// Snapshot produced when the collection is calculated
    type Outcome: Clone + fmt::Debug;

    /// Singular noun used in notices ("course", "semester")
    const KIND: &'static str;

    /// A blank record for 1-based `position`
    fn blank(position: usize) -> Self;

    /// Identifier assigned at creation
    fn id(&self) -> RecordId;

    /// A copy of this record with `field` set from the raw text `value`
    ///
    /// # Errors
    /// Returns a notice if `value` is not acceptable for `field`
    fn with_field(&self, field: Self::Field, value: &str) -> Result<Self, Notice>;
}

/// Lifecycle of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    /// Freshly created or reset: one blank record
    Seeded,
    /// Records have been added, edited or removed since the last calculate
    Editing,
    /// The snapshot reflects the current records
    Calculated,
}

/// A calculation outcome together with the rows it was computed from
#[derive(Debug, Clone)]
struct Snapshot<R: Record> {
    outcome: R::Outcome,
    records: Vec<R>,
}

/// Ordered list of records with add/update/remove/reset and a result snapshot
#[derive(Debug, Clone)]
pub struct EditableCollection<R: Record> {
    records: Vec<R>,
    state: CollectionState,
    snapshot: Option<Snapshot<R>>,
}

impl<R: Record> EditableCollection<R> {
    /// Create a collection seeded with one blank record
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: vec![R::blank(1)],
            state: CollectionState::Seeded,
            snapshot: None,
        }
    }

    /// Append a blank record and return its id
    pub fn add(&mut self) -> RecordId {
        let record = R::blank(self.records.len() + 1);
        let id = record.id();
        self.records.push(record);
        self.touch();
        debug!("Added {} {id} ({} total)", R::KIND, self.records.len());
        id
    }

    /// Set one field of the record with `id` from raw text
    ///
    /// # Errors
    /// Returns [`Notice::UnknownRecord`] if no record has `id`, or the notice
    /// raised by the field parser. The collection is unchanged on error.
    pub fn update(&mut self, id: RecordId, field: R::Field, value: &str) -> Result<(), Notice> {
        self.replace_with(id, |record| record.with_field(field, value))
            .inspect(|()| debug!("Updated {} {id}: {field} = '{value}'", R::KIND))
    }

    /// Replace the record with `id` by the value `build` derives from it
    ///
    /// # Errors
    /// Returns [`Notice::UnknownRecord`] if no record has `id`, or whatever
    /// `build` returns. The collection is unchanged on error.
    pub fn replace_with<F>(&mut self, id: RecordId, build: F) -> Result<(), Notice>
    where
        F: FnOnce(&R) -> Result<R, Notice>,
    {
        let index = self.index_of(id)?;
        let replacement = build(&self.records[index])?;
        self.records[index] = replacement;
        self.touch();
        Ok(())
    }

    /// Remove the record with `id`
    ///
    /// # Errors
    /// Returns [`Notice::LastRecord`] when only one record is left (whatever
    /// `id` is), or [`Notice::UnknownRecord`] if no record has `id`.
    pub fn remove(&mut self, id: RecordId) -> Result<R, Notice> {
        if self.records.len() == 1 {
            warn!("Refused to remove the last {}", R::KIND);
            return Err(Notice::LastRecord { kind: R::KIND });
        }
        let index = self.index_of(id)?;
        let removed = self.records.remove(index);
        self.touch();
        debug!("Removed {} {id} ({} left)", R::KIND, self.records.len());
        Ok(removed)
    }

    /// Back to a single blank record with no snapshot
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("Reset {} list", R::KIND);
    }

    /// Store a calculation snapshot, replacing any previous one.
    /// The current records are copied alongside so later edits cannot leak
    /// into what the snapshot describes.
    pub fn record_snapshot(&mut self, outcome: R::Outcome) {
        self.snapshot = Some(Snapshot {
            outcome,
            records: self.records.clone(),
        });
        self.state = CollectionState::Calculated;
    }

    /// Swap in recalculated records together with their snapshot.
    /// `records` must be the same rows, only with derived values refreshed.
    pub(crate) fn commit_calculation(&mut self, records: Vec<R>, outcome: R::Outcome) {
        debug_assert_eq!(records.len(), self.records.len());
        self.records = records;
        self.record_snapshot(outcome);
    }

    /// All records in display order
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Record with `id`, if present
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// 0-based position of the record with `id`
    #[must_use]
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Id of the record at 0-based `index`
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<RecordId> {
        self.records.get(index).map(Record::id)
    }

    /// Number of records (never zero)
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; provided for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> CollectionState {
        self.state
    }

    /// Last calculation snapshot, if any
    #[must_use]
    pub fn snapshot(&self) -> Option<&R::Outcome> {
        self.snapshot.as_ref().map(|snapshot| &snapshot.outcome)
    }

    /// Records as they were when the snapshot was taken
    #[must_use]
    pub fn calculated_records(&self) -> Option<&[R]> {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.records.as_slice())
    }

    /// Whether a snapshot exists but records changed since it was taken
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.snapshot.is_some() && self.state != CollectionState::Calculated
    }

    fn index_of(&self, id: RecordId) -> Result<usize, Notice> {
        self.position(id).ok_or_else(|| {
            warn!("No {} with id {id}", R::KIND);
            Notice::UnknownRecord(id)
        })
    }

    fn touch(&mut self) {
        self.state = CollectionState::Editing;
    }
}

impl<R: Record> Default for EditableCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{CgpaMode, CgpaResult};
    use crate::core::models::{CourseField, CourseRecord, Grade, SemesterField, SemesterRecord};

    fn sample_result() -> CgpaResult {
        CgpaResult {
            cgpa: 4.0,
            total_credit_registered: 18.0,
            total_grade_points: 72.0,
            semester_count: 1,
            mode: CgpaMode::Totals,
        }
    }

    #[test]
    fn test_new_collection_is_seeded_with_one_blank() {
        let courses: EditableCollection<CourseRecord> = EditableCollection::new();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses.state(), CollectionState::Seeded);
        assert!(courses.snapshot().is_none());
        assert!(!courses.is_empty());
    }

    #[test]
    fn test_add_labels_semesters_by_count() {
        let mut semesters: EditableCollection<SemesterRecord> = EditableCollection::new();
        let id = semesters.add();
        let third = semesters.add();

        assert_eq!(semesters.get(id).unwrap().name, "Semester 2");
        assert_eq!(semesters.get(third).unwrap().name, "Semester 3");
        assert_eq!(semesters.state(), CollectionState::Editing);
    }

    #[test]
    fn test_update_touches_only_the_target() {
        let mut courses: EditableCollection<CourseRecord> = EditableCollection::new();
        let first = courses.id_at(0).unwrap();
        let second = courses.add();

        courses.update(second, CourseField::Code, "MTH101").unwrap();
        courses.update(second, CourseField::Grade, "A").unwrap();

        assert!(courses.get(first).unwrap().code.is_empty());
        assert!(courses.get(first).unwrap().grade.is_none());
        assert_eq!(courses.get(second).unwrap().code, "MTH101");
        assert_eq!(courses.get(second).unwrap().grade, Some(Grade::A));
    }

    #[test]
    fn test_update_unknown_id_is_reported() {
        let mut courses: EditableCollection<CourseRecord> = EditableCollection::new();
        let stranger = RecordId::generate();
        assert_eq!(
            courses.update(stranger, CourseField::Code, "X"),
            Err(Notice::UnknownRecord(stranger))
        );
        assert_eq!(courses.state(), CollectionState::Seeded);
    }

    #[test]
    fn test_rejected_update_leaves_record_unchanged() {
        let mut semesters: EditableCollection<SemesterRecord> = EditableCollection::new();
        let id = semesters.id_at(0).unwrap();
        semesters
            .update(id, SemesterField::TotalCreditRegistered, "18")
            .unwrap();
        let before = semesters.get(id).unwrap().clone();

        assert!(semesters.update(id, SemesterField::Gpa, "four").is_err());
        assert_eq!(semesters.get(id).unwrap(), &before);
    }

    #[test]
    fn test_remove_last_record_is_refused() {
        let mut courses: EditableCollection<CourseRecord> = EditableCollection::new();
        let only = courses.id_at(0).unwrap();

        assert_eq!(
            courses.remove(only),
            Err(Notice::LastRecord { kind: "course" })
        );
        assert_eq!(
            courses.remove(RecordId::generate()),
            Err(Notice::LastRecord { kind: "course" })
        );
        assert_eq!(courses.len(), 1);
    }

    #[test]
    fn test_remove_by_id() {
        let mut courses: EditableCollection<CourseRecord> = EditableCollection::new();
        let first = courses.id_at(0).unwrap();
        let second = courses.add();

        let removed = courses.remove(first).unwrap();
        assert_eq!(removed.id(), first);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses.id_at(0), Some(second));
        assert!(matches!(
            courses.remove(first),
            Err(Notice::LastRecord { .. })
        ));
    }

    #[test]
    fn test_remove_unknown_id_with_several_records() {
        let mut courses: EditableCollection<CourseRecord> = EditableCollection::new();
        courses.add();
        let stranger = RecordId::generate();
        assert_eq!(courses.remove(stranger), Err(Notice::UnknownRecord(stranger)));
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn test_edit_after_calculate_marks_snapshot_stale() {
        let mut semesters: EditableCollection<SemesterRecord> = EditableCollection::new();
        semesters.record_snapshot(sample_result());
        assert_eq!(semesters.state(), CollectionState::Calculated);
        assert!(!semesters.is_stale());

        semesters.add();
        assert_eq!(semesters.state(), CollectionState::Editing);
        assert!(semesters.is_stale());
        assert_eq!(semesters.snapshot(), Some(&sample_result()));
    }

    #[test]
    fn test_snapshot_keeps_rows_as_calculated() {
        let mut semesters: EditableCollection<SemesterRecord> = EditableCollection::new();
        let id = semesters.id_at(0).unwrap();
        semesters.update(id, SemesterField::Name, "Year 1").unwrap();
        semesters.record_snapshot(sample_result());

        semesters.update(id, SemesterField::Name, "Renamed").unwrap();
        semesters.add();

        let calculated = semesters.calculated_records().unwrap();
        assert_eq!(calculated.len(), 1);
        assert_eq!(calculated[0].name, "Year 1");
        assert_eq!(semesters.records()[0].name, "Renamed");
    }

    #[test]
    fn test_reset_clears_records_and_snapshot() {
        let mut semesters: EditableCollection<SemesterRecord> = EditableCollection::new();
        let id = semesters.add();
        semesters.update(id, SemesterField::Name, "Final Year").unwrap();
        semesters.record_snapshot(sample_result());

        semesters.reset();

        assert_eq!(semesters.len(), 1);
        assert_eq!(semesters.records()[0].name, "Semester 1");
        assert!(semesters.snapshot().is_none());
        assert!(semesters.calculated_records().is_none());
        assert_eq!(semesters.state(), CollectionState::Seeded);
    }

    #[test]
    fn test_course_with_units_and_grade_after_updates() {
        let mut courses: EditableCollection<CourseRecord> = EditableCollection::new();
        let id = courses.id_at(0).unwrap();
        courses.update(id, CourseField::CreditUnits, "3").unwrap();
        courses.update(id, CourseField::Grade, "c").unwrap();

        let course = courses.get(id).unwrap();
        assert_eq!(course.credit_units, 3);
        assert_eq!(course.grade, Some(Grade::C));
        assert!(course.has_valid_units_and_grade());
        assert_eq!(CourseRecord::new("X", 3, Grade::C).credit_units, 3);
    }
}
