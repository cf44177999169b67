//! Rule hit types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the centre line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Above,
    Below,
}

impl Side {
    /// Classify a value against the centre; `None` when exactly on it
    pub fn of(value: f64, centre: f64) -> Option<Self> {
        if value > centre {
            Some(Side::Above)
        } else if value < centre {
            Some(Side::Below)
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Above => write!(f, "above"),
            Side::Below => write!(f, "below"),
        }
    }
}

/// Direction of a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Inclusive index range covered by a rule hit
pub trait HitRange {
    fn start(&self) -> usize;
    fn end(&self) -> usize;

    /// Number of points in the range
    fn len(&self) -> usize {
        self.end() - self.start() + 1
    }
}

/// A run of consecutive points on one side of the centre line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRange {
    pub start: usize,
    /// Inclusive
    pub end: usize,
    pub side: Side,
    pub len: usize,
}

impl HitRange for RunRange {
    fn start(&self) -> usize {
        self.start
    }
    fn end(&self) -> usize {
        self.end
    }
}

impl fmt::Display for RunRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "points {}-{} ({} points {} the centre line)",
            self.start + 1,
            self.end + 1,
            self.len,
            self.side
        )
    }
}

/// A sequence of strictly rising or falling points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRange {
    pub start: usize,
    /// Inclusive
    pub end: usize,
    pub direction: TrendDirection,
    pub len: usize,
}

impl HitRange for TrendRange {
    fn start(&self) -> usize {
        self.start
    }
    fn end(&self) -> usize {
        self.end
    }
}

impl fmt::Display for TrendRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "points {}-{} ({} points {})",
            self.start + 1,
            self.end + 1,
            self.len,
            self.direction
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of() {
        assert_eq!(Side::of(6.0, 5.0), Some(Side::Above));
        assert_eq!(Side::of(4.0, 5.0), Some(Side::Below));
        assert_eq!(Side::of(5.0, 5.0), None);
    }

    #[test]
    fn test_display_is_one_based() {
        let run = RunRange { start: 0, end: 7, side: Side::Below, len: 8 };
        assert_eq!(run.to_string(), "points 1-8 (8 points below the centre line)");
        let trend = TrendRange { start: 3, end: 8, direction: TrendDirection::Increasing, len: 6 };
        assert_eq!(trend.to_string(), "points 4-9 (6 points increasing)");
        assert_eq!(HitRange::len(&trend), 6);
    }
}
