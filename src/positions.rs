//! Tourist Positions
//!
//! The last position a tourist reported. Each report replaces the previous one.

use jiff::Timestamp;

use crate::{geo::Coordinate, ids::TouristId};

/// Where a tourist said they were, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct TouristPosition {
    /// Reporting tourist
    pub tourist: TouristId,

    /// Reported coordinate
    pub coordinate: Coordinate,

    /// When the report was stored
    pub updated_at: Timestamp,
}

impl TouristPosition {
    /// Record `coordinate` as the tourist's position at `now`.
    pub fn report(tourist: TouristId, coordinate: Coordinate, now: Timestamp) -> Self {
        Self {
            tourist,
            coordinate,
            updated_at: now,
        }
    }

    /// Great-circle distance from this position to `other`, in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        self.coordinate.distance_to(other)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn report_keeps_coordinate_and_time() -> TestResult {
        let coordinate = Coordinate::new(45.2517, 19.8659)?;
        let position =
            TouristPosition::report(TouristId::from("tourist"), coordinate, Timestamp::UNIX_EPOCH);

        assert_eq!(position.coordinate, coordinate);
        assert_eq!(position.updated_at, Timestamp::UNIX_EPOCH);
        assert!(position.distance_to(&coordinate).abs() < f64::EPSILON);

        Ok(())
    }
}
