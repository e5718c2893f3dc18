//! Positions service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{geo::Coordinate, ids::TouristId, positions::TouristPosition};

use crate::domain::positions::{
    errors::PositionsServiceError, repository::PositionsRepository,
};

#[derive(Clone)]
pub struct StorePositionsService {
    positions: Arc<dyn PositionsRepository>,
}

impl StorePositionsService {
    #[must_use]
    pub fn new(positions: Arc<dyn PositionsRepository>) -> Self {
        Self { positions }
    }
}

#[async_trait]
impl PositionsService for StorePositionsService {
    #[tracing::instrument(
        name = "positions.service.update_position",
        skip_all,
        fields(tourist = %tourist),
        err
    )]
    async fn update_position(
        &self,
        tourist: TouristId,
        coordinate: Coordinate,
    ) -> Result<TouristPosition, PositionsServiceError> {
        let position = self.positions.upsert_position(tourist, coordinate).await?;

        tracing::debug!(
            latitude = position.coordinate.latitude(),
            longitude = position.coordinate.longitude(),
            "stored position"
        );

        Ok(position)
    }

    async fn get_current_position(
        &self,
        tourist: TouristId,
    ) -> Result<TouristPosition, PositionsServiceError> {
        Ok(self.positions.get_position(tourist).await?)
    }
}

#[automock]
#[async_trait]
pub trait PositionsService: Send + Sync {
    /// Replace the tourist's stored position with `coordinate`.
    async fn update_position(
        &self,
        tourist: TouristId,
        coordinate: Coordinate,
    ) -> Result<TouristPosition, PositionsServiceError>;

    /// The tourist's most recently reported position.
    async fn get_current_position(
        &self,
        tourist: TouristId,
    ) -> Result<TouristPosition, PositionsServiceError>;
}
