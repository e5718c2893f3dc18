//! Tour Executions
//!
//! A [`TourExecution`] is one tourist's attempt at walking one tour. It starts
//! `active`, advances as the tourist reaches key points, and ends either
//! `completed` or `abandoned`. Both end states are final.
//!
//! Proximity checks scan the tour's key points in stored order and complete the
//! *first* uncompleted key point within [`PROXIMITY_THRESHOLD_METERS`], even when
//! a later key point is closer. At most one key point is completed per check.
//!
//! [`PROXIMITY_THRESHOLD_METERS`]: crate::geo::PROXIMITY_THRESHOLD_METERS

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geo::{Coordinate, is_within_threshold},
    ids::{TouristId, TypedUuid},
    tours::{KeyPoint, KeyPointUuid, TourUuid},
};

/// Tour Execution UUID
pub type ExecutionUuid = TypedUuid<TourExecution>;

/// Errors raised by execution transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The execution already reached a terminal state.
    #[error("execution already {0}")]
    AlreadyTerminated(ExecutionStatus),
}

/// Lifecycle state of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The tour is being walked.
    Active,

    /// The tourist finished the tour.
    Completed,

    /// The tourist gave up on the tour.
    Abandoned,
}

impl ExecutionStatus {
    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Whether no further transitions are allowed.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key point reached during an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedKeyPoint {
    /// Key point reached
    pub key_point: KeyPointUuid,

    /// When it was reached
    pub completed_at: Timestamp,
}

/// Data needed to begin walking a tour.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExecution {
    /// Walker
    pub tourist: TouristId,

    /// Tour being walked
    pub tour: TourUuid,

    /// Where the walk started
    pub start: Coordinate,
}

/// Result of a single proximity check.
#[derive(Debug, Clone, PartialEq)]
pub enum ProximityOutcome {
    /// A key point was completed by this check.
    Advanced {
        /// The key point just completed
        key_point: KeyPoint,

        /// Distance to it, in metres
        distance: f64,
    },

    /// Nothing uncompleted was in range.
    NotAdvanced {
        /// Distance to the closest uncompleted key point, if any remain
        nearest_distance: Option<f64>,
    },
}

impl ProximityOutcome {
    /// Whether a key point was completed.
    pub fn advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

/// One tourist's walk through one tour.
#[derive(Debug, Clone, PartialEq)]
pub struct TourExecution {
    /// Execution identifier
    pub uuid: ExecutionUuid,

    /// Walker
    pub tourist: TouristId,

    /// Tour being walked
    pub tour: TourUuid,

    /// Lifecycle state
    pub status: ExecutionStatus,

    /// Where the walk started
    pub start: Coordinate,

    /// When the walk started
    pub started_at: Timestamp,

    /// Last time the execution was touched
    pub last_activity: Timestamp,

    /// When the walk ended, for either terminal state
    pub completed_at: Option<Timestamp>,

    /// Key points reached, in the order they were reached
    pub completed_key_points: Vec<CompletedKeyPoint>,

    /// Store revision the execution was read at
    pub revision: u64,
}

impl TourExecution {
    /// Begin a new active execution.
    pub fn start(uuid: ExecutionUuid, execution: NewExecution, now: Timestamp) -> Self {
        Self {
            uuid,
            tourist: execution.tourist,
            tour: execution.tour,
            status: ExecutionStatus::Active,
            start: execution.start,
            started_at: now,
            last_activity: now,
            completed_at: None,
            completed_key_points: Vec::new(),
            revision: 0,
        }
    }

    /// Whether the execution can still change.
    pub fn is_active(&self) -> bool {
        self.status == ExecutionStatus::Active
    }

    /// Whether `key_point` was already reached.
    pub fn has_completed(&self, key_point: KeyPointUuid) -> bool {
        self.completed_key_points
            .iter()
            .any(|completed| completed.key_point == key_point)
    }

    /// Check `position` against the tour's key points (in stored order) and
    /// complete the first uncompleted one in range.
    ///
    /// `last_activity` is touched whether or not the execution advances.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AlreadyTerminated`] if the execution is no longer active.
    pub fn check_proximity(
        &mut self,
        position: &Coordinate,
        key_points: &[KeyPoint],
        now: Timestamp,
    ) -> Result<ProximityOutcome, ExecutionError> {
        self.ensure_active()?;

        self.last_activity = now;

        let mut nearest_distance: Option<f64> = None;

        for key_point in key_points {
            if self.has_completed(key_point.uuid) {
                continue;
            }

            let distance = position.distance_to(&key_point.coordinate);

            if is_within_threshold(distance) {
                self.completed_key_points.push(CompletedKeyPoint {
                    key_point: key_point.uuid,
                    completed_at: now,
                });

                return Ok(ProximityOutcome::Advanced {
                    key_point: key_point.clone(),
                    distance,
                });
            }

            nearest_distance = Some(nearest_distance.map_or(distance, |d| d.min(distance)));
        }

        Ok(ProximityOutcome::NotAdvanced { nearest_distance })
    }

    /// Finish the walk.
    ///
    /// Completion does not require every key point to have been reached.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AlreadyTerminated`] if the execution is no longer active.
    pub fn complete(&mut self, now: Timestamp) -> Result<(), ExecutionError> {
        self.terminate(ExecutionStatus::Completed, now)
    }

    /// Give up on the walk.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AlreadyTerminated`] if the execution is no longer active.
    pub fn abandon(&mut self, now: Timestamp) -> Result<(), ExecutionError> {
        self.terminate(ExecutionStatus::Abandoned, now)
    }

    fn terminate(&mut self, status: ExecutionStatus, now: Timestamp) -> Result<(), ExecutionError> {
        self.ensure_active()?;

        self.status = status;
        self.completed_at = Some(now);
        self.last_activity = now;

        Ok(())
    }

    fn ensure_active(&self) -> Result<(), ExecutionError> {
        if self.status.is_terminal() {
            return Err(ExecutionError::AlreadyTerminated(self.status));
        }

        Ok(())
    }
}
