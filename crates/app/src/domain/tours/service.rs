//! Tours service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use wayfarer::{
    guards::{can_view_all_key_points, guide_owns_tour},
    ids::{GuideId, TouristId},
    tours::{
        KeyPoint, KeyPointUpdate, KeyPointUuid, NewKeyPoint, NewTour, Tour, TourUuid,
        visible_key_points,
    },
};

use crate::{
    domain::{
        purchases::repository::PurchaseTokensRepository,
        tours::{
            errors::ToursServiceError,
            repository::{KeyPointsRepository, ToursRepository},
        },
    },
    store::StoreError,
};

/// Key points a viewer may see, and whether the viewer bought the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPointListing {
    pub key_points: Vec<KeyPoint>,
    pub is_purchased: bool,
}

#[derive(Clone)]
pub struct StoreToursService {
    tours: Arc<dyn ToursRepository>,
    key_points: Arc<dyn KeyPointsRepository>,
    tokens: Arc<dyn PurchaseTokensRepository>,
}

impl StoreToursService {
    #[must_use]
    pub fn new(
        tours: Arc<dyn ToursRepository>,
        key_points: Arc<dyn KeyPointsRepository>,
        tokens: Arc<dyn PurchaseTokensRepository>,
    ) -> Self {
        Self {
            tours,
            key_points,
            tokens,
        }
    }

    /// A tour the guide may modify. Existence is checked before ownership.
    async fn owned_tour(&self, guide: &GuideId, tour: TourUuid) -> Result<Tour, ToursServiceError> {
        let tour = self.tours.get_tour(tour).await?;

        if !guide_owns_tour(&tour, guide) {
            return Err(ToursServiceError::Unauthorized);
        }

        Ok(tour)
    }

    /// A tour the viewer may read. Drafts only exist for their guide.
    async fn visible_tour(
        &self,
        viewer: Option<&str>,
        tour: TourUuid,
    ) -> Result<Tour, ToursServiceError> {
        let tour = self.tours.get_tour(tour).await?;

        if !tour.is_published() && !viewer.is_some_and(|viewer| tour.guide.as_str() == viewer) {
            return Err(ToursServiceError::TourNotFound);
        }

        Ok(tour)
    }

    async fn tour_key_point(
        &self,
        tour: &Tour,
        key_point: KeyPointUuid,
    ) -> Result<KeyPoint, ToursServiceError> {
        let key_point = self
            .key_points
            .get_key_point(key_point)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => ToursServiceError::KeyPointNotFound,
                other => other.into(),
            })?;

        if key_point.tour != tour.uuid {
            return Err(ToursServiceError::KeyPointNotFound);
        }

        Ok(key_point)
    }
}

#[async_trait]
impl ToursService for StoreToursService {
    #[tracing::instrument(
        name = "tours.service.create_tour",
        skip_all,
        fields(guide = %guide),
        err
    )]
    async fn create_tour(&self, guide: GuideId, tour: NewTour) -> Result<Tour, ToursServiceError> {
        let tour = self.tours.create_tour(guide, tour).await?;

        tracing::info!(tour_uuid = %tour.uuid, "created tour");

        Ok(tour)
    }

    async fn get_tour(
        &self,
        viewer: Option<String>,
        tour: TourUuid,
    ) -> Result<Tour, ToursServiceError> {
        self.visible_tour(viewer.as_deref(), tour).await
    }

    async fn list_published_tours(&self) -> Result<Vec<Tour>, ToursServiceError> {
        Ok(self.tours.list_published_tours().await?)
    }

    async fn list_guide_tours(&self, guide: GuideId) -> Result<Vec<Tour>, ToursServiceError> {
        Ok(self.tours.list_tours_by_guide(guide).await?)
    }

    #[tracing::instrument(
        name = "tours.service.publish_tour",
        skip_all,
        fields(guide = %guide, tour_uuid = %tour, price = %price),
        err
    )]
    async fn publish_tour(
        &self,
        guide: GuideId,
        tour: TourUuid,
        price: Decimal,
    ) -> Result<Tour, ToursServiceError> {
        let mut tour = self.owned_tour(&guide, tour).await?;

        tour.publish(price, Timestamp::now())?;

        let tour = self.tours.update_tour(tour).await?;

        tracing::info!(tour_uuid = %tour.uuid, "published tour");

        Ok(tour)
    }

    #[tracing::instrument(
        name = "tours.service.add_key_point",
        skip_all,
        fields(guide = %guide, tour_uuid = %tour),
        err
    )]
    async fn add_key_point(
        &self,
        guide: GuideId,
        tour: TourUuid,
        key_point: NewKeyPoint,
    ) -> Result<KeyPoint, ToursServiceError> {
        let tour = self.owned_tour(&guide, tour).await?;

        let key_point = self.key_points.create_key_point(tour.uuid, key_point).await?;

        tracing::info!(key_point_uuid = %key_point.uuid, "added key point");

        Ok(key_point)
    }

    #[tracing::instrument(
        name = "tours.service.update_key_point",
        skip_all,
        fields(guide = %guide, tour_uuid = %tour, key_point_uuid = %key_point),
        err
    )]
    async fn update_key_point(
        &self,
        guide: GuideId,
        tour: TourUuid,
        key_point: KeyPointUuid,
        update: KeyPointUpdate,
    ) -> Result<KeyPoint, ToursServiceError> {
        let tour = self.owned_tour(&guide, tour).await?;
        let mut key_point = self.tour_key_point(&tour, key_point).await?;

        key_point.apply(update);

        let key_point = self
            .key_points
            .update_key_point(key_point)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => ToursServiceError::KeyPointNotFound,
                other => other.into(),
            })?;

        tracing::info!("updated key point");

        Ok(key_point)
    }

    #[tracing::instrument(
        name = "tours.service.delete_key_point",
        skip_all,
        fields(guide = %guide, tour_uuid = %tour, key_point_uuid = %key_point),
        err
    )]
    async fn delete_key_point(
        &self,
        guide: GuideId,
        tour: TourUuid,
        key_point: KeyPointUuid,
    ) -> Result<(), ToursServiceError> {
        let tour = self.owned_tour(&guide, tour).await?;
        let key_point = self.tour_key_point(&tour, key_point).await?;

        let rows_affected = self.key_points.delete_key_point(key_point.uuid).await?;

        if rows_affected == 0 {
            return Err(ToursServiceError::KeyPointNotFound);
        }

        tracing::info!("deleted key point");

        Ok(())
    }

    async fn list_key_points(
        &self,
        viewer: Option<String>,
        tour: TourUuid,
    ) -> Result<KeyPointListing, ToursServiceError> {
        let tour = self.visible_tour(viewer.as_deref(), tour).await?;

        let is_purchased = match viewer.as_deref() {
            Some(viewer) => {
                self.tokens
                    .has_purchased(TouristId::from(viewer), tour.uuid)
                    .await?
            }
            None => false,
        };

        let key_points = self.key_points.list_key_points(tour.uuid).await?;
        let can_view_all = can_view_all_key_points(&tour, viewer.as_deref(), is_purchased);

        Ok(KeyPointListing {
            key_points: visible_key_points(&key_points, can_view_all).to_vec(),
            is_purchased,
        })
    }
}

#[automock]
#[async_trait]
pub trait ToursService: Send + Sync {
    /// Create a draft tour owned by `guide`.
    async fn create_tour(&self, guide: GuideId, tour: NewTour) -> Result<Tour, ToursServiceError>;

    /// Retrieve a single tour. Drafts are only visible to their guide.
    async fn get_tour(
        &self,
        viewer: Option<String>,
        tour: TourUuid,
    ) -> Result<Tour, ToursServiceError>;

    /// Every published tour.
    async fn list_published_tours(&self) -> Result<Vec<Tour>, ToursServiceError>;

    /// Every tour authored by `guide`, drafts included.
    async fn list_guide_tours(&self, guide: GuideId) -> Result<Vec<Tour>, ToursServiceError>;

    /// Publish (or re-price) a tour owned by `guide`.
    async fn publish_tour(
        &self,
        guide: GuideId,
        tour: TourUuid,
        price: Decimal,
    ) -> Result<Tour, ToursServiceError>;

    /// Add a key point to a tour owned by `guide`.
    async fn add_key_point(
        &self,
        guide: GuideId,
        tour: TourUuid,
        key_point: NewKeyPoint,
    ) -> Result<KeyPoint, ToursServiceError>;

    /// Edit a key point of a tour owned by `guide`.
    async fn update_key_point(
        &self,
        guide: GuideId,
        tour: TourUuid,
        key_point: KeyPointUuid,
        update: KeyPointUpdate,
    ) -> Result<KeyPoint, ToursServiceError>;

    /// Remove a key point from a tour owned by `guide`.
    async fn delete_key_point(
        &self,
        guide: GuideId,
        tour: TourUuid,
        key_point: KeyPointUuid,
    ) -> Result<(), ToursServiceError>;

    /// Key points of a tour as `viewer` may see them: all for the guide and
    /// purchasers, otherwise only the first.
    async fn list_key_points(
        &self,
        viewer: Option<String>,
        tour: TourUuid,
    ) -> Result<KeyPointListing, ToursServiceError>;
}
