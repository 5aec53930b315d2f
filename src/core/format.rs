//! Result formatting: two-decimal averages and degree classification

use serde::Serialize;
use std::fmt;

/// Degree classification bands, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Classification {
    /// 4.50 and above
    FirstClass,
    /// 3.50 up to 4.50
    SecondClassUpper,
    /// 2.40 up to 3.50
    SecondClassLower,
    /// 1.50 up to 2.40
    ThirdClass,
    /// 1.00 up to 1.50
    Pass,
    /// Below 1.00
    Fail,
}

/// Lower bound of each band, evaluated top-down; first match wins
const BANDS: [(f64, Classification); 5] = [
    (4.50, Classification::FirstClass),
    (3.50, Classification::SecondClassUpper),
    (2.40, Classification::SecondClassLower),
    (1.50, Classification::ThirdClass),
    (1.00, Classification::Pass),
];

impl Classification {
    /// All classifications, best first
    pub const ALL: [Self; 6] = [
        Self::FirstClass,
        Self::SecondClassUpper,
        Self::SecondClassLower,
        Self::ThirdClass,
        Self::Pass,
        Self::Fail,
    ];

    /// Label as printed on a result sheet
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstClass => "First Class Honours",
            Self::SecondClassUpper => "Second Class Honours (Upper Division)",
            Self::SecondClassLower => "Second Class Honours (Lower Division)",
            Self::ThirdClass => "Third Class Honours",
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }

    /// Inclusive lower bound of the band (`None` for Fail)
    #[must_use]
    pub fn lower_bound(self) -> Option<f64> {
        BANDS
            .iter()
            .find(|(_, class)| *class == self)
            .map(|(bound, _)| *bound)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an unrounded average.
///
/// Non-finite input classifies as [`Classification::Fail`].
#[must_use]
pub fn classify(average: f64) -> Classification {
    BANDS
        .iter()
        .find(|(bound, _)| average >= *bound)
        .map_or(Classification::Fail, |(_, class)| *class)
}

/// Render an average with exactly two decimals, rounding half away from zero
#[must_use]
pub fn format_average(average: f64) -> String {
    if !average.is_finite() {
        return "0.00".to_string();
    }
    format!("{:.2}", round_to_hundredths(average))
}

/// Render a credit or point total: at most two decimals, no trailing zeros
#[must_use]
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.2}", round_to_hundredths(value));
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    // f64::round is half away from zero
    (value * 100.0).round() / 100.0
}
