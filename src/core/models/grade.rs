//! Grading table for the five-point scale

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade on the five-point scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    /// Excellent, 5 points
    A,
    /// Very good, 4 points
    B,
    /// Good, 3 points
    C,
    /// Fair, 2 points
    D,
    /// Pass, 1 point
    E,
    /// Fail, 0 points
    F,
}

/// Informational mapping from a score range to a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    /// Grade awarded for this band
    pub grade: Grade,
    /// Lowest score in the band (inclusive)
    pub min_score: u8,
    /// Highest score in the band (inclusive)
    pub max_score: u8,
    /// Remark printed next to the grade
    pub remark: &'static str,
}

/// Score bands, highest first. Display only; calculations use [`Grade::points`].
pub static SCORE_BANDS: [ScoreBand; 6] = [
    ScoreBand { grade: Grade::A, min_score: 70, max_score: 100, remark: "Excellent" },
    ScoreBand { grade: Grade::B, min_score: 60, max_score: 69, remark: "Very Good" },
    ScoreBand { grade: Grade::C, min_score: 50, max_score: 59, remark: "Good" },
    ScoreBand { grade: Grade::D, min_score: 45, max_score: 49, remark: "Fair" },
    ScoreBand { grade: Grade::E, min_score: 40, max_score: 44, remark: "Pass" },
    ScoreBand { grade: Grade::F, min_score: 0, max_score: 39, remark: "Fail" },
];

impl Grade {
    /// All grades, best first
    pub const ALL: [Self; 6] = [Self::A, Self::B, Self::C, Self::D, Self::E, Self::F];

    /// Grade point awarded for this letter
    #[must_use]
    pub const fn points(self) -> u8 {
        match self {
            Self::A => 5,
            Self::B => 4,
            Self::C => 3,
            Self::D => 2,
            Self::E => 1,
            Self::F => 0,
        }
    }

    /// Score band for this grade
    #[must_use]
    pub fn band(self) -> &'static ScoreBand {
        &SCORE_BANDS[self as usize]
    }

    /// Grade for a raw score out of 100, `None` above 100
    #[must_use]
    pub fn from_score(score: u8) -> Option<Self> {
        SCORE_BANDS
            .iter()
            .find(|band| (band.min_score..=band.max_score).contains(&score))
            .map(|band| band.grade)
    }

    /// Letter as a static string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            "F" => Ok(Self::F),
            _ => Err(format!("Unknown grade: '{s}'")),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points() {
        let points: Vec<u8> = Grade::ALL.iter().map(|g| g.points()).collect();
        assert_eq!(points, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_grade_from_str_is_case_insensitive() {
        assert_eq!("a".parse::<Grade>(), Ok(Grade::A));
        assert_eq!(" e ".parse::<Grade>(), Ok(Grade::E));
        assert!("G".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
        assert!("AB".parse::<Grade>().is_err());
    }

    #[test]
    fn test_band_lookup_matches_grade() {
        for grade in Grade::ALL {
            assert_eq!(grade.band().grade, grade);
        }
        assert_eq!(Grade::B.band().remark, "Very Good");
    }

    #[test]
    fn test_from_score_boundaries() {
        assert_eq!(Grade::from_score(100), Some(Grade::A));
        assert_eq!(Grade::from_score(70), Some(Grade::A));
        assert_eq!(Grade::from_score(69), Some(Grade::B));
        assert_eq!(Grade::from_score(45), Some(Grade::D));
        assert_eq!(Grade::from_score(44), Some(Grade::E));
        assert_eq!(Grade::from_score(39), Some(Grade::F));
        assert_eq!(Grade::from_score(0), Some(Grade::F));
        assert_eq!(Grade::from_score(101), None);
    }
}
