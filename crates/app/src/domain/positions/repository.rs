//! Positions repository.

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{geo::Coordinate, ids::TouristId, positions::TouristPosition};

use crate::store::StoreError;

#[automock]
#[async_trait]
pub trait PositionsRepository: Send + Sync {
    /// Store `coordinate` as the tourist's position, replacing any earlier one.
    async fn upsert_position(
        &self,
        tourist: TouristId,
        coordinate: Coordinate,
    ) -> Result<TouristPosition, StoreError>;

    /// The tourist's last stored position.
    async fn get_position(&self, tourist: TouristId) -> Result<TouristPosition, StoreError>;
}
