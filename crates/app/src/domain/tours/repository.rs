//! Tours repositories.

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{
    ids::GuideId,
    tours::{KeyPoint, KeyPointUuid, NewKeyPoint, NewTour, Tour, TourUuid},
};

use crate::store::StoreError;

#[automock]
#[async_trait]
pub trait ToursRepository: Send + Sync {
    /// Persist a new draft tour; the store assigns its id and creation time.
    async fn create_tour(&self, guide: GuideId, tour: NewTour) -> Result<Tour, StoreError>;

    /// Fetch a single tour.
    async fn get_tour(&self, tour: TourUuid) -> Result<Tour, StoreError>;

    /// Tours authored by `guide`, oldest first.
    async fn list_tours_by_guide(&self, guide: GuideId) -> Result<Vec<Tour>, StoreError>;

    /// Every published tour, oldest first.
    async fn list_published_tours(&self) -> Result<Vec<Tour>, StoreError>;

    /// Replace a stored tour.
    async fn update_tour(&self, tour: Tour) -> Result<Tour, StoreError>;
}

#[automock]
#[async_trait]
pub trait KeyPointsRepository: Send + Sync {
    /// Persist a new key point for `tour`.
    async fn create_key_point(
        &self,
        tour: TourUuid,
        key_point: NewKeyPoint,
    ) -> Result<KeyPoint, StoreError>;

    /// Fetch a single key point.
    async fn get_key_point(&self, key_point: KeyPointUuid) -> Result<KeyPoint, StoreError>;

    /// Key points of `tour` in stored order.
    async fn list_key_points(&self, tour: TourUuid) -> Result<Vec<KeyPoint>, StoreError>;

    /// Replace a stored key point.
    async fn update_key_point(&self, key_point: KeyPoint) -> Result<KeyPoint, StoreError>;

    /// Delete a key point, returning the number of rows removed.
    async fn delete_key_point(&self, key_point: KeyPointUuid) -> Result<u64, StoreError>;
}
