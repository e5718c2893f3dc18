//! Executions service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use wayfarer::{
    executions::{ExecutionUuid, NewExecution, ProximityOutcome, TourExecution},
    geo::Coordinate,
    guards::tourist_owns_execution,
    ids::TouristId,
    tours::TourUuid,
};

use crate::{
    domain::{
        executions::{errors::ExecutionsServiceError, repository::ExecutionsRepository},
        purchases::repository::PurchaseTokensRepository,
        tours::repository::KeyPointsRepository,
    },
    store::StoreError,
};

/// Result of starting a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedExecution {
    pub execution: TourExecution,

    /// `true` when an already-active execution was returned instead of a new one.
    pub resumed: bool,
}

/// Result of a proximity check, with the execution as persisted afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityCheck {
    pub outcome: ProximityOutcome,
    pub execution: TourExecution,
}

#[derive(Clone)]
pub struct StoreExecutionsService {
    executions: Arc<dyn ExecutionsRepository>,
    key_points: Arc<dyn KeyPointsRepository>,
    tokens: Arc<dyn PurchaseTokensRepository>,
}

impl StoreExecutionsService {
    #[must_use]
    pub fn new(
        executions: Arc<dyn ExecutionsRepository>,
        key_points: Arc<dyn KeyPointsRepository>,
        tokens: Arc<dyn PurchaseTokensRepository>,
    ) -> Self {
        Self {
            executions,
            key_points,
            tokens,
        }
    }

    /// An execution the tourist may act on. Existence is checked before ownership.
    async fn owned_execution(
        &self,
        tourist: &TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError> {
        let execution = self.executions.get_execution(execution).await?;

        if !tourist_owns_execution(&execution, tourist) {
            return Err(ExecutionsServiceError::Unauthorized);
        }

        Ok(execution)
    }
}

#[async_trait]
impl ExecutionsService for StoreExecutionsService {
    #[tracing::instrument(
        name = "executions.service.start_execution",
        skip_all,
        fields(tourist = %tourist, tour_uuid = %tour),
        err
    )]
    async fn start_execution(
        &self,
        tourist: TouristId,
        tour: TourUuid,
        start: Coordinate,
    ) -> Result<StartedExecution, ExecutionsServiceError> {
        if !self.tokens.has_purchased(tourist.clone(), tour).await? {
            return Err(ExecutionsServiceError::NotPurchased);
        }

        if let Some(execution) = self
            .executions
            .find_active_execution(tourist.clone(), tour)
            .await?
        {
            tracing::info!(execution_uuid = %execution.uuid, "resumed active execution");

            return Ok(StartedExecution {
                execution,
                resumed: true,
            });
        }

        let created = self
            .executions
            .create_execution(NewExecution {
                tourist: tourist.clone(),
                tour,
                start,
            })
            .await;

        let execution = match created {
            Ok(execution) => execution,
            // Another start for the same walk won the race; continue that one.
            Err(StoreError::AlreadyExists) => {
                let execution = self
                    .executions
                    .find_active_execution(tourist, tour)
                    .await?
                    .ok_or(ExecutionsServiceError::Storage(StoreError::AlreadyExists))?;

                tracing::info!(
                    execution_uuid = %execution.uuid,
                    "resumed concurrently started execution"
                );

                return Ok(StartedExecution {
                    execution,
                    resumed: true,
                });
            }
            Err(error) => return Err(error.into()),
        };

        tracing::info!(execution_uuid = %execution.uuid, "started execution");

        Ok(StartedExecution {
            execution,
            resumed: false,
        })
    }

    #[tracing::instrument(
        name = "executions.service.check_proximity",
        skip_all,
        fields(tourist = %tourist, execution_uuid = %execution),
        err
    )]
    async fn check_proximity(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
        position: Coordinate,
    ) -> Result<ProximityCheck, ExecutionsServiceError> {
        let mut execution = self.owned_execution(&tourist, execution).await?;

        let key_points = self.key_points.list_key_points(execution.tour).await?;

        let outcome = execution.check_proximity(&position, &key_points, Timestamp::now())?;

        let execution = self.executions.update_execution(execution).await?;

        match &outcome {
            ProximityOutcome::Advanced {
                key_point,
                distance,
            } => {
                tracing::info!(
                    key_point_uuid = %key_point.uuid,
                    distance_m = distance,
                    "completed key point"
                );
            }
            ProximityOutcome::NotAdvanced { nearest_distance } => {
                tracing::debug!(distance_m = ?nearest_distance, "no key point in range");
            }
        }

        Ok(ProximityCheck { outcome, execution })
    }

    #[tracing::instrument(
        name = "executions.service.complete_execution",
        skip_all,
        fields(tourist = %tourist, execution_uuid = %execution),
        err
    )]
    async fn complete_execution(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError> {
        let mut execution = self.owned_execution(&tourist, execution).await?;

        execution.complete(Timestamp::now())?;

        let execution = self.executions.update_execution(execution).await?;

        tracing::info!(
            completed_key_points = execution.completed_key_points.len(),
            "completed execution"
        );

        Ok(execution)
    }

    #[tracing::instrument(
        name = "executions.service.abandon_execution",
        skip_all,
        fields(tourist = %tourist, execution_uuid = %execution),
        err
    )]
    async fn abandon_execution(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError> {
        let mut execution = self.owned_execution(&tourist, execution).await?;

        execution.abandon(Timestamp::now())?;

        let execution = self.executions.update_execution(execution).await?;

        tracing::info!("abandoned execution");

        Ok(execution)
    }

    async fn get_execution(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError> {
        self.owned_execution(&tourist, execution).await
    }

    async fn list_active_executions(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<TourExecution>, ExecutionsServiceError> {
        Ok(self.executions.list_active_executions(tourist).await?)
    }
}

#[automock]
#[async_trait]
pub trait ExecutionsService: Send + Sync {
    /// Start walking a purchased tour, or resume the active walk of it.
    async fn start_execution(
        &self,
        tourist: TouristId,
        tour: TourUuid,
        start: Coordinate,
    ) -> Result<StartedExecution, ExecutionsServiceError>;

    /// Report a position and complete the first uncompleted key point in range.
    async fn check_proximity(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
        position: Coordinate,
    ) -> Result<ProximityCheck, ExecutionsServiceError>;

    /// Finish an active walk.
    async fn complete_execution(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError>;

    /// Give up on an active walk.
    async fn abandon_execution(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError>;

    /// Retrieve one of the tourist's executions in any state.
    async fn get_execution(
        &self,
        tourist: TouristId,
        execution: ExecutionUuid,
    ) -> Result<TourExecution, ExecutionsServiceError>;

    /// The tourist's active executions.
    async fn list_active_executions(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<TourExecution>, ExecutionsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;
    use testresult::TestResult;
    use wayfarer::executions::{ExecutionError, ExecutionStatus};

    use crate::{
        domain::{
            FailureKind, executions::repository::MockExecutionsRepository,
            purchases::repository::MockPurchaseTokensRepository,
            tours::repository::MockKeyPointsRepository,
        },
        store::StoreError,
        test::{TestContext, helpers},
    };

    use super::*;

    /// A purchased tour with K1 at (0, 0.001) and K2 at (0, 0.002).
    async fn purchased_tour(ctx: &TestContext) -> TestResult<TourUuid> {
        let tour = helpers::create_published_tour(ctx, "Walk", Decimal::TEN).await?;

        helpers::add_key_point(ctx, tour.uuid, "K1", 0.0, 0.001, 1).await?;
        helpers::add_key_point(ctx, tour.uuid, "K2", 0.0, 0.002, 2).await?;
        helpers::buy(ctx, tour.uuid).await?;

        Ok(tour.uuid)
    }

    async fn started(ctx: &TestContext, tour: TourUuid) -> TestResult<TourExecution> {
        let started = ctx
            .executions
            .start_execution(ctx.tourist.clone(), tour, Coordinate::new(0.0, 0.0)?)
            .await?;

        Ok(started.execution)
    }

    #[tokio::test]
    async fn starting_requires_a_purchase() -> TestResult {
        let ctx = TestContext::new();
        let tour = helpers::create_published_tour(&ctx, "Walk", Decimal::TEN).await?;

        let result = ctx
            .executions
            .start_execution(ctx.tourist.clone(), tour.uuid, Coordinate::new(0.0, 0.0)?)
            .await;

        assert!(
            matches!(result, Err(ExecutionsServiceError::NotPurchased)),
            "expected NotPurchased, got {result:?}"
        );
        assert_eq!(
            result.err().map(|error| error.kind()),
            Some(FailureKind::InvalidState)
        );

        Ok(())
    }

    #[tokio::test]
    async fn starting_twice_resumes_the_same_execution() -> TestResult {
        let ctx = TestContext::new();
        let tour = purchased_tour(&ctx).await?;

        let first = ctx
            .executions
            .start_execution(ctx.tourist.clone(), tour, Coordinate::new(0.0, 0.0)?)
            .await?;
        let second = ctx
            .executions
            .start_execution(ctx.tourist.clone(), tour, Coordinate::new(1.0, 1.0)?)
            .await?;

        assert!(!first.resumed);
        assert!(second.resumed);
        assert_eq!(first.execution.uuid, second.execution.uuid);
        assert_eq!(second.execution.start, Coordinate::new(0.0, 0.0)?);

        Ok(())
    }

    #[tokio::test]
    async fn walking_to_key_points_advances_in_order() -> TestResult {
        let ctx = TestContext::new();
        let tour = purchased_tour(&ctx).await?;
        let execution = started(&ctx, tour).await?;
        let at_k1 = Coordinate::new(0.0, 0.001)?;

        let first = ctx
            .executions
            .check_proximity(ctx.tourist.clone(), execution.uuid, at_k1)
            .await?;

        assert!(first.outcome.advanced());
        assert_eq!(first.execution.completed_key_points.len(), 1);

        let again = ctx
            .executions
            .check_proximity(ctx.tourist.clone(), execution.uuid, at_k1)
            .await?;

        assert!(!again.outcome.advanced());
        assert_eq!(again.execution.completed_key_points.len(), 1);

        let second = ctx
            .executions
            .check_proximity(
                ctx.tourist.clone(),
                execution.uuid,
                Coordinate::new(0.0, 0.002)?,
            )
            .await?;

        assert!(second.outcome.advanced());
        assert_eq!(second.execution.completed_key_points.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn far_away_positions_do_not_advance() -> TestResult {
        let ctx = TestContext::new();
        let tour = purchased_tour(&ctx).await?;
        let execution = started(&ctx, tour).await?;

        let check = ctx
            .executions
            .check_proximity(
                ctx.tourist.clone(),
                execution.uuid,
                Coordinate::new(10.0, 10.0)?,
            )
            .await?;

        assert!(
            matches!(
                check.outcome,
                ProximityOutcome::NotAdvanced {
                    nearest_distance: Some(_)
                }
            ),
            "expected NotAdvanced with a distance, got {:?}",
            check.outcome
        );
        assert!(check.execution.last_activity >= execution.last_activity);

        Ok(())
    }

    #[tokio::test]
    async fn other_tourists_cannot_touch_an_execution() -> TestResult {
        let ctx = TestContext::new();
        let tour = purchased_tour(&ctx).await?;
        let execution = started(&ctx, tour).await?;
        let intruder = TouristId::from("intruder");

        let read = ctx
            .executions
            .get_execution(intruder.clone(), execution.uuid)
            .await;
        let check = ctx
            .executions
            .check_proximity(intruder.clone(), execution.uuid, Coordinate::new(0.0, 0.0)?)
            .await;
        let abandon = ctx
            .executions
            .abandon_execution(intruder, execution.uuid)
            .await;

        assert!(
            matches!(read, Err(ExecutionsServiceError::Unauthorized)),
            "expected Unauthorized, got {read:?}"
        );
        assert!(
            matches!(check, Err(ExecutionsServiceError::Unauthorized)),
            "expected Unauthorized, got {check:?}"
        );
        assert!(
            matches!(abandon, Err(ExecutionsServiceError::Unauthorized)),
            "expected Unauthorized, got {abandon:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_execution_is_not_found() {
        let ctx = TestContext::new();

        let result = ctx
            .executions
            .complete_execution(TouristId::from("intruder"), ExecutionUuid::new())
            .await;

        assert!(
            matches!(result, Err(ExecutionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn terminal_executions_reject_further_transitions() -> TestResult {
        let ctx = TestContext::new();
        let tour = purchased_tour(&ctx).await?;
        let execution = started(&ctx, tour).await?;

        let completed = ctx
            .executions
            .complete_execution(ctx.tourist.clone(), execution.uuid)
            .await?;

        assert_eq!(completed.status, ExecutionStatus::Completed);
        assert!(completed.completed_at.is_some());

        let abandon = ctx
            .executions
            .abandon_execution(ctx.tourist.clone(), execution.uuid)
            .await;
        let check = ctx
            .executions
            .check_proximity(
                ctx.tourist.clone(),
                execution.uuid,
                Coordinate::new(0.0, 0.001)?,
            )
            .await;

        assert!(
            matches!(
                abandon,
                Err(ExecutionsServiceError::Terminated(
                    ExecutionError::AlreadyTerminated(ExecutionStatus::Completed)
                ))
            ),
            "expected AlreadyTerminated, got {abandon:?}"
        );
        assert!(
            matches!(check, Err(ExecutionsServiceError::Terminated(_))),
            "expected Terminated, got {check:?}"
        );

        let stored = ctx
            .executions
            .get_execution(ctx.tourist.clone(), execution.uuid)
            .await?;

        assert_eq!(stored.status, ExecutionStatus::Completed);
        assert!(stored.completed_key_points.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn abandoning_ends_the_walk_and_allows_a_fresh_start() -> TestResult {
        let ctx = TestContext::new();
        let tour = purchased_tour(&ctx).await?;
        let execution = started(&ctx, tour).await?;

        let abandoned = ctx
            .executions
            .abandon_execution(ctx.tourist.clone(), execution.uuid)
            .await?;

        assert_eq!(abandoned.status, ExecutionStatus::Abandoned);
        assert!(
            ctx.executions
                .list_active_executions(ctx.tourist.clone())
                .await?
                .is_empty()
        );

        let fresh = started(&ctx, tour).await?;

        assert_ne!(fresh.uuid, execution.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn stale_execution_write_is_a_conflict() -> TestResult {
        let tourist = TouristId::from("tourist");
        let execution = TourExecution::start(
            ExecutionUuid::new(),
            NewExecution {
                tourist: tourist.clone(),
                tour: TourUuid::new(),
                start: Coordinate::new(0.0, 0.0)?,
            },
            Timestamp::now(),
        );
        let uuid = execution.uuid;

        let mut executions = MockExecutionsRepository::new();

        executions
            .expect_get_execution()
            .once()
            .returning(move |_| Ok(execution.clone()));
        executions.expect_update_execution().once().returning(|_| {
            Err(StoreError::StaleRevision {
                expected: 0,
                found: 1,
            })
        });

        let mut key_points = MockKeyPointsRepository::new();

        key_points
            .expect_list_key_points()
            .once()
            .returning(|_| Ok(Vec::new()));

        let service = StoreExecutionsService::new(
            Arc::new(executions),
            Arc::new(key_points),
            Arc::new(MockPurchaseTokensRepository::new()),
        );

        let result = service
            .check_proximity(tourist, uuid, Coordinate::new(0.0, 0.0)?)
            .await;

        assert!(
            matches!(result, Err(ExecutionsServiceError::StaleExecution)),
            "expected StaleExecution, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn losing_a_start_race_resumes_the_winner() -> TestResult {
        let tourist = TouristId::from("tourist");
        let tour = TourUuid::new();
        let winner = TourExecution::start(
            ExecutionUuid::new(),
            NewExecution {
                tourist: tourist.clone(),
                tour,
                start: Coordinate::new(0.0, 0.0)?,
            },
            Timestamp::now(),
        );
        let winner_uuid = winner.uuid;

        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&lookups);
        let mut executions = MockExecutionsRepository::new();

        executions
            .expect_find_active_execution()
            .times(2)
            .returning(move |_, _| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Ok(None);
                }

                Ok(Some(winner.clone()))
            });
        executions
            .expect_create_execution()
            .once()
            .returning(|_| Err(StoreError::AlreadyExists));

        let mut tokens = MockPurchaseTokensRepository::new();

        tokens.expect_has_purchased().once().returning(|_, _| Ok(true));

        let service = StoreExecutionsService::new(
            Arc::new(executions),
            Arc::new(MockKeyPointsRepository::new()),
            Arc::new(tokens),
        );

        let started = service
            .start_execution(tourist, tour, Coordinate::new(0.0, 0.0)?)
            .await?;

        assert!(started.resumed, "a lost race should resume the active execution");
        assert_eq!(started.execution.uuid, winner_uuid);
        assert_eq!(lookups.load(Ordering::SeqCst), 2);

        Ok(())
    }
}
