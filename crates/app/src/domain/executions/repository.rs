//! Executions repository.

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{
    executions::{ExecutionUuid, NewExecution, TourExecution},
    ids::TouristId,
    tours::TourUuid,
};

use crate::store::StoreError;

#[automock]
#[async_trait]
pub trait ExecutionsRepository: Send + Sync {
    /// Persist a new active execution; fails with [`StoreError::AlreadyExists`] while the
    /// tourist already has an active execution of the same tour.
    async fn create_execution(&self, execution: NewExecution)
    -> Result<TourExecution, StoreError>;

    /// Fetch a single execution.
    async fn get_execution(&self, execution: ExecutionUuid) -> Result<TourExecution, StoreError>;

    /// The tourist's active execution of `tour`, if any.
    async fn find_active_execution(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<Option<TourExecution>, StoreError>;

    /// Every active execution of `tourist`, oldest first.
    async fn list_active_executions(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<TourExecution>, StoreError>;

    /// Write `execution` back if its revision is still current, returning it at its new revision.
    async fn update_execution(&self, execution: TourExecution)
    -> Result<TourExecution, StoreError>;
}
