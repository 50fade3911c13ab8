use crate::{
    geo::{Coordinate, Distance},
    time::Timestamp,
};

/// One reported location estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub pos: Coordinate,
    /// Uncertainty radius in meters. Negative values mark invalid fixes.
    pub horizontal_accuracy: f64,
    pub timestamp: Timestamp,
}

impl LocationFix {
    pub const fn new(pos: Coordinate, horizontal_accuracy: f64, timestamp: Timestamp) -> Self {
        Self {
            pos,
            horizontal_accuracy,
            timestamp,
        }
    }

    pub fn has_valid_accuracy(&self) -> bool {
        self.horizontal_accuracy >= 0.0
    }

    pub fn is_more_accurate_than(&self, other: &LocationFix) -> bool {
        self.horizontal_accuracy < other.horizontal_accuracy
    }

    pub fn distance_from(&self, other: &LocationFix) -> Option<Distance> {
        Coordinate::distance(self.pos, other.pos)
    }
}
