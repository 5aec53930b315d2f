//! Aggregators: course lists into semester totals, semesters into a CGPA
//!
//! Aggregators only read the records they are given; the one exception is
//! [`compute_semester_from_courses`], which annotates each course with its
//! derived grade points once the whole list has validated.

pub mod cgpa;
pub mod semester;

pub use cgpa::{compute_cgpa, CgpaMode, CgpaResult};
pub use semester::{
    compute_semester_from_courses, derive_from_direct_entry, DirectField, SemesterSummary,
};
