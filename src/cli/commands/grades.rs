//! Grades command handler: prints the grading scale

use unigrade::core::format::Classification;
use unigrade::core::models::SCORE_BANDS;

/// Print the grade table and the classification bands
pub fn run() {
    println!("\n=== Grading Scale ===\n");
    println!("Grade  Score     Point  Remark");
    for band in &SCORE_BANDS {
        println!(
            "{:<5}  {:>3}-{:<3}   {:>5}  {}",
            band.grade,
            band.min_score,
            band.max_score,
            band.grade.points(),
            band.remark
        );
    }

    println!("\n=== Degree Classification ===\n");
    for class in Classification::ALL {
        match class.lower_bound() {
            Some(bound) => println!("{bound:>4.2} and above  {class}"),
            None => println!("below 1.00      {class}"),
        }
    }
}
