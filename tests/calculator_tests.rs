//! End-to-end calculator scenarios through the public session API

use proptest::prelude::*;
use unigrade::core::aggregate::{compute_cgpa, compute_semester_from_courses, CgpaMode};
use unigrade::core::collection::CollectionState;
use unigrade::core::format::{classify, format_average, Classification};
use unigrade::core::models::{CourseField, CourseRecord, Grade, SemesterField, SemesterRecord};
use unigrade::core::session::{CgpaSession, GpaSession};
use unigrade::core::Notice;

fn fill_course(session: &mut GpaSession, row: usize, code: &str, units: &str, grade: &str) {
    let courses = session.courses_mut();
    let id = courses.id_at(row).expect("row should exist");
    courses.update(id, CourseField::Code, code).unwrap();
    courses.update(id, CourseField::CreditUnits, units).unwrap();
    courses.update(id, CourseField::Grade, grade).unwrap();
}

fn fill_semester(session: &mut CgpaSession, row: usize, tcr: &str, tgp: &str) {
    let semesters = session.semesters_mut();
    let id = semesters.id_at(row).expect("row should exist");
    semesters
        .update(id, SemesterField::TotalCreditRegistered, tcr)
        .unwrap();
    semesters
        .update(id, SemesterField::TotalGradePoints, tgp)
        .unwrap();
}

#[test]
fn test_first_semester_gpa() {
    let mut session = GpaSession::new();
    fill_course(&mut session, 0, "MTH101", "5", "A");
    session.courses_mut().add();
    fill_course(&mut session, 1, "PHY101", "4", "B");
    session.courses_mut().add();
    fill_course(&mut session, 2, "CHM101", "4", "A");

    let summary = session.calculate().unwrap();

    assert_eq!(summary.total_grade_points, 61);
    assert_eq!(summary.total_credit_registered, 13);
    assert_eq!(format_average(summary.gpa), "4.69");
    assert_eq!(classify(summary.gpa), Classification::FirstClass);
    assert_eq!(session.courses().state(), CollectionState::Calculated);

    let points: Vec<Option<u64>> = session
        .courses()
        .records()
        .iter()
        .map(CourseRecord::grade_points)
        .collect();
    assert_eq!(points, vec![Some(25), Some(16), Some(20)]);
}

#[test]
fn test_two_semester_cgpa() {
    let mut session = CgpaSession::new(CgpaMode::Totals);
    fill_semester(&mut session, 0, "18", "72");
    session.semesters_mut().add();
    fill_semester(&mut session, 1, "15", "45");

    let result = session.calculate().unwrap();

    assert!((result.cgpa - 117.0 / 33.0).abs() < 1e-12);
    assert_eq!(format_average(result.cgpa), "3.55");
    assert_eq!(classify(result.cgpa), Classification::SecondClassUpper);

    let sheet = session.result_sheet().unwrap();
    assert_eq!(
        sheet.value_of("Cumulative Grade Point Average (CGPA)"),
        Some("3.55")
    );
    assert_eq!(
        sheet.value_of("Degree Classification"),
        Some("Second Class Honours (Upper Division)")
    );
}

#[test]
fn test_zero_credit_semester_is_refused() {
    let mut session = CgpaSession::new(CgpaMode::Totals);
    fill_semester(&mut session, 0, "0", "");

    assert_eq!(session.calculate(), Err(Notice::InvalidSemesters));
    assert!(session.result().is_none());
}

#[test]
fn test_last_course_cannot_be_removed() {
    let mut session = GpaSession::new();
    let id = session.courses().id_at(0).unwrap();

    let err = session.courses_mut().remove(id).unwrap_err();

    assert_eq!(err, Notice::LastRecord { kind: "course" });
    assert_eq!(session.courses().len(), 1);
}

#[test]
fn test_gpa_entry_derives_grade_points() {
    let mut session = CgpaSession::new(CgpaMode::Gpa);
    let semesters = session.semesters_mut();
    let id = semesters.id_at(0).unwrap();
    semesters
        .update(id, SemesterField::TotalCreditRegistered, "20")
        .unwrap();
    semesters.update(id, SemesterField::Gpa, "4.5").unwrap();

    let semester = session.semesters().get(id).unwrap();
    assert!((semester.total_grade_points() - 90.0).abs() < f64::EPSILON);
    assert!((semester.gpa() - 4.5).abs() < f64::EPSILON);
}

#[test]
fn test_edit_after_calculate_keeps_snapshot_until_reset() {
    let mut session = GpaSession::new();
    fill_course(&mut session, 0, "GST101", "2", "C");
    session.calculate().unwrap();

    session.courses_mut().add();
    assert!(session.courses().is_stale());
    assert!(session.summary().is_some());

    session.reset();
    assert!(session.summary().is_none());
    assert_eq!(session.courses().len(), 1);
    assert_eq!(session.courses().state(), CollectionState::Seeded);
}

#[test]
fn test_failed_calculation_changes_nothing() {
    let mut session = GpaSession::new();
    fill_course(&mut session, 0, "GST101", "2", "C");
    session.courses_mut().add();
    let before = session.courses().records().to_vec();

    assert_eq!(session.calculate(), Err(Notice::IncompleteCourses));
    assert_eq!(session.courses().records(), before.as_slice());
    assert!(session.summary().is_none());
}

#[test]
fn test_semester_breakdown_feeds_cgpa() {
    let mut session = CgpaSession::new(CgpaMode::Totals);
    let semester = session.semesters().id_at(0).unwrap();
    for (code, units, grade) in [("MTH101", "5", "A"), ("PHY101", "4", "B")] {
        let course = session.add_course(semester).unwrap();
        session
            .update_course(semester, course, CourseField::Code, code)
            .unwrap();
        session
            .update_course(semester, course, CourseField::CreditUnits, units)
            .unwrap();
        session
            .update_course(semester, course, CourseField::Grade, grade)
            .unwrap();
    }

    let summary = session.compute_semester(semester).unwrap();
    assert_eq!(summary.total_credit_registered, 9);
    assert_eq!(summary.total_grade_points, 41);

    let result = session.calculate().unwrap();
    assert!((result.cgpa - 41.0 / 9.0).abs() < 1e-12);
}

fn course_strategy() -> impl Strategy<Value = CourseRecord> {
    (1u32..=6, 0usize..Grade::ALL.len())
        .prop_map(|(units, grade)| CourseRecord::new("XYZ101", units, Grade::ALL[grade]))
}

proptest! {
    #[test]
    fn prop_gpa_is_grade_points_over_credits(
        mut courses in prop::collection::vec(course_strategy(), 1..12)
    ) {
        let summary = compute_semester_from_courses(&mut courses).unwrap();
        let tgp = u32::try_from(summary.total_grade_points).unwrap();
        let tcr = u32::try_from(summary.total_credit_registered).unwrap();
        let expected = f64::from(tgp) / f64::from(tcr);
        prop_assert!((summary.gpa - expected).abs() < 1e-12);
        prop_assert!((0.0..=5.0).contains(&summary.gpa));
    }

    #[test]
    fn prop_course_order_does_not_change_gpa(
        courses in prop::collection::vec(course_strategy(), 1..12)
    ) {
        let mut forward = courses.clone();
        let mut backward: Vec<CourseRecord> = courses.into_iter().rev().collect();
        let a = compute_semester_from_courses(&mut forward).unwrap();
        let b = compute_semester_from_courses(&mut backward).unwrap();
        prop_assert_eq!(a.total_credit_registered, b.total_credit_registered);
        prop_assert_eq!(a.total_grade_points, b.total_grade_points);
    }

    #[test]
    fn prop_semester_order_does_not_change_cgpa(
        totals in prop::collection::vec((1u32..=30, 1u32..=150), 1..10)
    ) {
        let semesters: Vec<SemesterRecord> = totals
            .iter()
            .map(|&(tcr, tgp)| {
                SemesterRecord::from_totals("Semester", f64::from(tcr), f64::from(tgp))
            })
            .collect();
        let reversed: Vec<SemesterRecord> = semesters.iter().rev().cloned().collect();

        let a = compute_cgpa(&semesters, CgpaMode::Totals).unwrap();
        let b = compute_cgpa(&reversed, CgpaMode::Totals).unwrap();
        prop_assert!((a.cgpa - b.cgpa).abs() < 1e-9);
    }
}
