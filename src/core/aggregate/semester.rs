//! Semester aggregation: course lists and direct-entry totals

use crate::core::models::{CourseRecord, Grade, SemesterEntry, SemesterRecord};
use crate::core::Notice;
use crate::{debug, warn};
use serde::Serialize;

/// Totals and GPA for one semester's course list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterSummary {
    /// Sum of credit units (TCR)
    pub total_credit_registered: u64,
    /// Sum of grade point × credit units (TGP)
    pub total_grade_points: u64,
    /// TGP / TCR, or zero without credit
    pub gpa: f64,
    /// Number of courses aggregated
    pub course_count: usize,
}

/// Semester fields that can be typed in without a course breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectField {
    /// Total Credit Registered
    TotalCreditRegistered,
    /// Total Grade Points
    TotalGradePoints,
    /// Semester GPA
    Gpa,
}

impl DirectField {
    const fn name(self) -> &'static str {
        match self {
            Self::TotalCreditRegistered => "total credit registered",
            Self::TotalGradePoints => "total grade points",
            Self::Gpa => "gpa",
        }
    }
}

/// Compute totals and GPA from a course list, annotating each course.
///
/// Every course needs credit units above zero and a grade. If any course
/// fails, nothing is annotated.
///
/// # Errors
///
/// Returns [`Notice::IncompleteCourses`] when the list is empty or any course
/// is incomplete.
pub fn compute_semester_from_courses(
    courses: &mut [CourseRecord],
) -> Result<SemesterSummary, Notice> {
    let grades: Option<Vec<Grade>> = courses
        .iter()
        .map(|course| course.grade.filter(|_| course.credit_units > 0))
        .collect();

    let grades = match grades {
        Some(grades) if !grades.is_empty() => grades,
        _ => {
            warn!("Semester calculation refused: incomplete course entries");
            return Err(Notice::IncompleteCourses);
        }
    };

    let mut total_credit_registered: u64 = 0;
    let mut total_grade_points: u64 = 0;
    for (course, grade) in courses.iter_mut().zip(grades) {
        course.annotate(grade);
        total_credit_registered += u64::from(course.credit_units);
        total_grade_points += course.grade_points().unwrap_or_default();
    }

    let gpa = ratio(
        total_to_f64(total_grade_points),
        total_to_f64(total_credit_registered),
    );
    debug!(
        "Semester computed from {} courses: TCR={total_credit_registered}, TGP={total_grade_points}",
        courses.len()
    );

    Ok(SemesterSummary {
        total_credit_registered,
        total_grade_points,
        gpa,
        course_count: courses.len(),
    })
}

/// Apply a directly typed TCR, TGP or GPA value to a semester.
///
/// Returns the updated semester; `semester` itself is never touched. The
/// two entered values stay consistent with the third:
/// - GPA entry stores `TGP = GPA × TCR`
/// - TCR entry recomputes TGP when the GPA is held, otherwise the GPA is
///   re-derived from the stored TGP on read
/// - TGP entry switches the semester to TCR/TGP entry
///
/// An empty value zeroes the field and the value that depends on it.
///
/// # Errors
///
/// Returns [`Notice::InvalidInput`] for non-numeric, non-finite or negative
/// input.
pub fn derive_from_direct_entry(
    semester: &SemesterRecord,
    field: DirectField,
    raw: &str,
) -> Result<SemesterRecord, Notice> {
    let mut next = semester.clone();
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        match field {
            DirectField::TotalCreditRegistered => {
                next.total_credit_registered = 0.0;
                next.total_grade_points = 0.0;
                if next.entry == SemesterEntry::Courses {
                    next.entry = SemesterEntry::Totals;
                }
            }
            DirectField::TotalGradePoints => {
                next.total_grade_points = 0.0;
                next.entry = SemesterEntry::Totals;
            }
            DirectField::Gpa => {
                next.total_grade_points = 0.0;
                next.entry = SemesterEntry::Gpa(0.0);
            }
        }
        return Ok(next);
    }

    let value = parse_non_negative(field, trimmed)?;
    match field {
        DirectField::TotalCreditRegistered => {
            next.total_credit_registered = value;
            match next.entry {
                SemesterEntry::Gpa(gpa) => next.total_grade_points = gpa * value,
                SemesterEntry::Courses => next.entry = SemesterEntry::Totals,
                SemesterEntry::Totals => {}
            }
        }
        DirectField::TotalGradePoints => {
            next.total_grade_points = value;
            next.entry = SemesterEntry::Totals;
        }
        DirectField::Gpa => {
            next.total_grade_points = value * next.total_credit_registered;
            next.entry = SemesterEntry::Gpa(value);
        }
    }
    Ok(next)
}

fn parse_non_negative(field: DirectField, raw: &str) -> Result<f64, Notice> {
    let value = raw.parse::<f64>().map_err(|_| {
        warn!("Rejected {} entry '{raw}': not a number", field.name());
        Notice::invalid(field.name(), raw, "not a number")
    })?;
    if !value.is_finite() {
        return Err(Notice::invalid(field.name(), raw, "not a finite number"));
    }
    if value < 0.0 {
        warn!("Rejected {} entry '{raw}': negative", field.name());
        return Err(Notice::invalid(field.name(), raw, "must not be negative"));
    }
    Ok(value)
}

/// Integer total as a float; exact below 2^53
#[allow(clippy::cast_precision_loss)]
pub(crate) fn total_to_f64(total: u64) -> f64 {
    total as f64
}

/// `numerator / denominator`, or zero when the denominator is not positive
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_semester_courses() -> Vec<CourseRecord> {
        vec![
            CourseRecord::new("MTH101", 5, Grade::A),
            CourseRecord::new("PHY101", 4, Grade::B),
            CourseRecord::new("CHM101", 4, Grade::A),
        ]
    }

    #[test]
    fn test_compute_from_courses() {
        let mut courses = first_semester_courses();
        let summary = compute_semester_from_courses(&mut courses).unwrap();

        assert_eq!(summary.total_credit_registered, 13);
        assert_eq!(summary.total_grade_points, 61);
        assert_eq!(summary.course_count, 3);
        assert!((summary.gpa - 61.0 / 13.0).abs() < f64::EPSILON);

        assert_eq!(courses[0].grade_point(), Some(5));
        assert_eq!(courses[0].grade_points(), Some(25));
        assert_eq!(courses[1].grade_points(), Some(16));
        assert_eq!(courses[2].grade_points(), Some(20));
    }

    #[test]
    fn test_large_credit_units_do_not_saturate() {
        let mut courses = vec![CourseRecord::new("PRJ499", 1_000_000_000, Grade::A)];
        let summary = compute_semester_from_courses(&mut courses).unwrap();

        assert_eq!(summary.total_credit_registered, 1_000_000_000);
        assert_eq!(summary.total_grade_points, 5_000_000_000);
        assert!((summary.gpa - 5.0).abs() < f64::EPSILON);
        assert_eq!(courses[0].grade_points(), Some(5_000_000_000));

        let mut widest = vec![
            CourseRecord::new("PRJ498", u32::MAX, Grade::B),
            CourseRecord::new("PRJ499", u32::MAX, Grade::B),
        ];
        let summary = compute_semester_from_courses(&mut widest).unwrap();
        assert_eq!(summary.total_grade_points, 8 * u64::from(u32::MAX));
        assert!((summary.gpa - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_incomplete_course_blocks_all_annotation() {
        let mut courses = first_semester_courses();
        courses.push(CourseRecord::blank());

        let err = compute_semester_from_courses(&mut courses).unwrap_err();
        assert_eq!(err, Notice::IncompleteCourses);
        assert!(courses.iter().all(|c| c.grade_points().is_none()));
    }

    #[test]
    fn test_zero_units_is_incomplete() {
        let mut courses = vec![CourseRecord::new("GST101", 0, Grade::A)];
        assert_eq!(
            compute_semester_from_courses(&mut courses),
            Err(Notice::IncompleteCourses)
        );
    }

    #[test]
    fn test_empty_list_is_incomplete() {
        assert_eq!(
            compute_semester_from_courses(&mut []),
            Err(Notice::IncompleteCourses)
        );
    }

    #[test]
    fn test_all_fail_grades_give_zero_gpa() {
        let mut courses = vec![
            CourseRecord::new("MTH102", 3, Grade::F),
            CourseRecord::new("PHY102", 2, Grade::F),
        ];
        let summary = compute_semester_from_courses(&mut courses).unwrap();
        assert_eq!(summary.total_credit_registered, 5);
        assert_eq!(summary.total_grade_points, 0);
        assert!(summary.gpa.abs() < f64::EPSILON);
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let mut courses = first_semester_courses();
        let first = compute_semester_from_courses(&mut courses).unwrap();
        let annotated = courses.clone();
        let second = compute_semester_from_courses(&mut courses).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.gpa.to_bits(), second.gpa.to_bits());
        assert_eq!(annotated, courses);
    }

    #[test]
    fn test_gpa_entry_sets_grade_points() {
        let semester = SemesterRecord::from_totals("Year 3", 20.0, 0.0);
        let next = derive_from_direct_entry(&semester, DirectField::Gpa, "4.5").unwrap();

        assert!((next.total_grade_points() - 90.0).abs() < 1e-9);
        assert_eq!(next.entry(), SemesterEntry::Gpa(4.5));
        assert!((next.gpa() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tcr_entry_with_held_gpa_recomputes_points() {
        let semester = SemesterRecord::from_gpa("Year 3", 10.0, 4.0);
        let next =
            derive_from_direct_entry(&semester, DirectField::TotalCreditRegistered, "15").unwrap();

        assert!((next.total_credit_registered() - 15.0).abs() < f64::EPSILON);
        assert!((next.total_grade_points() - 60.0).abs() < 1e-9);
        assert!((next.gpa() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tcr_entry_with_totals_rederives_gpa() {
        let semester = SemesterRecord::from_totals("Year 1", 18.0, 72.0);
        let next =
            derive_from_direct_entry(&semester, DirectField::TotalCreditRegistered, "24").unwrap();

        assert!((next.total_grade_points() - 72.0).abs() < f64::EPSILON);
        assert!((next.gpa() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tgp_entry_switches_to_totals() {
        let semester = SemesterRecord::from_gpa("Year 2", 15.0, 3.0);
        let next =
            derive_from_direct_entry(&semester, DirectField::TotalGradePoints, "60").unwrap();

        assert_eq!(next.entry(), SemesterEntry::Totals);
        assert!((next.gpa() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clearing_zeroes_field_and_dependent() {
        let semester = SemesterRecord::from_gpa("Year 2", 20.0, 4.5);

        let cleared_gpa = derive_from_direct_entry(&semester, DirectField::Gpa, "").unwrap();
        assert!(cleared_gpa.gpa().abs() < f64::EPSILON);
        assert!(cleared_gpa.total_grade_points().abs() < f64::EPSILON);
        assert!((cleared_gpa.total_credit_registered() - 20.0).abs() < f64::EPSILON);

        let cleared_tcr =
            derive_from_direct_entry(&semester, DirectField::TotalCreditRegistered, "  ").unwrap();
        assert!(cleared_tcr.total_credit_registered().abs() < f64::EPSILON);
        assert!(cleared_tcr.total_grade_points().abs() < f64::EPSILON);

        let totals = SemesterRecord::from_totals("Year 1", 18.0, 72.0);
        let cleared_tgp =
            derive_from_direct_entry(&totals, DirectField::TotalGradePoints, "").unwrap();
        assert!(cleared_tgp.total_grade_points().abs() < f64::EPSILON);
        assert!(cleared_tgp.gpa().abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejected_entries_leave_semester_unchanged() {
        let semester = SemesterRecord::from_totals("Year 1", 18.0, 72.0);

        for bad in ["abc", "-1", "NaN", "inf", "4.5.1"] {
            let err = derive_from_direct_entry(&semester, DirectField::Gpa, bad).unwrap_err();
            assert!(matches!(err, Notice::InvalidInput { field: "gpa", .. }), "{bad}");
        }
        assert!((semester.gpa() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert!(ratio(10.0, 0.0).abs() < f64::EPSILON);
        assert!((ratio(10.0, 4.0) - 2.5).abs() < f64::EPSILON);
    }
}
