//! Property-based tests for proximity advancement.
//!
//! Key point sets are generated in a small area around a fixed origin so that
//! a good share of them fall inside the proximity threshold.

use jiff::Timestamp;
use proptest::prelude::*;
use wayfarer::prelude::*;

const SPREAD_DEGREES: f64 = 0.001;

prop_compose! {
    fn offset()(d in -SPREAD_DEGREES..SPREAD_DEGREES) -> f64 {
        d
    }
}

prop_compose! {
    fn key_points()(offsets in prop::collection::vec((offset(), offset()), 0..12)) -> Vec<KeyPoint> {
        let tour = TourUuid::new();

        offsets
            .into_iter()
            .enumerate()
            .filter_map(|(i, (lat, lon))| {
                let coordinate = Coordinate::new(45.0 + lat, 19.0 + lon).ok()?;

                Some(KeyPoint::new(
                    KeyPointUuid::new(),
                    tour,
                    NewKeyPoint {
                        coordinate,
                        name: format!("kp-{i}"),
                        description: String::new(),
                        image: None,
                        order: i32::try_from(i).unwrap_or(i32::MAX),
                    },
                ))
            })
            .collect()
    }
}

fn fresh_execution(tour: TourUuid) -> Result<TourExecution, GeoError> {
    Ok(TourExecution::start(
        ExecutionUuid::new(),
        NewExecution {
            tourist: TouristId::from("walker"),
            tour,
            start: Coordinate::new(45.0, 19.0)?,
        },
        Timestamp::UNIX_EPOCH,
    ))
}

fn completion_ids(execution: &TourExecution) -> Vec<KeyPointUuid> {
    execution
        .completed_key_points
        .iter()
        .map(|completed| completed.key_point)
        .collect()
}

proptest! {
    #[test]
    fn at_most_one_key_point_per_check(
        key_points in key_points(),
        lat in offset(),
        lon in offset(),
    ) {
        let mut execution = fresh_execution(TourUuid::new())?;
        let position = Coordinate::new(45.0 + lat, 19.0 + lon)?;

        let before = execution.completed_key_points.len();
        let outcome = execution.check_proximity(&position, &key_points, Timestamp::UNIX_EPOCH)?;
        let after = execution.completed_key_points.len();

        prop_assert!(after - before <= 1);
        prop_assert_eq!(outcome.advanced(), after == before + 1);
    }

    #[test]
    fn repeated_checks_never_recomplete(
        key_points in key_points(),
        lat in offset(),
        lon in offset(),
        repeats in 1..20usize,
    ) {
        let mut execution = fresh_execution(TourUuid::new())?;
        let position = Coordinate::new(45.0 + lat, 19.0 + lon)?;

        for _ in 0..repeats {
            execution.check_proximity(&position, &key_points, Timestamp::UNIX_EPOCH)?;
        }

        let mut ids = completion_ids(&execution);
        let total = ids.len();
        ids.sort();
        ids.dedup();

        prop_assert_eq!(ids.len(), total);
        prop_assert!(total <= key_points.len());
        prop_assert!(total <= repeats);
    }

    #[test]
    fn advanced_key_point_is_first_in_range(
        key_points in key_points(),
        lat in offset(),
        lon in offset(),
    ) {
        let mut execution = fresh_execution(TourUuid::new())?;
        let position = Coordinate::new(45.0 + lat, 19.0 + lon)?;

        let expected = key_points
            .iter()
            .find(|kp| is_within_threshold(position.distance_to(&kp.coordinate)))
            .map(|kp| kp.uuid);

        let outcome = execution.check_proximity(&position, &key_points, Timestamp::UNIX_EPOCH)?;

        let actual = match outcome {
            ProximityOutcome::Advanced { key_point, .. } => Some(key_point.uuid),
            ProximityOutcome::NotAdvanced { .. } => None,
        };

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn distance_is_symmetric(
        lat1 in -89.0..89.0f64,
        lon1 in -179.0..179.0f64,
        lat2 in -89.0..89.0f64,
        lon2 in -179.0..179.0f64,
    ) {
        let ab = haversine_distance(lat1, lon1, lat2, lon2);
        let ba = haversine_distance(lat2, lon2, lat1, lon1);

        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!(haversine_distance(lat1, lon1, lat1, lon1).abs() < 1e-9);
    }
}
