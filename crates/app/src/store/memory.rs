//! In-memory store

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use wayfarer::{
    carts::ShoppingCart,
    executions::{ExecutionUuid, NewExecution, TourExecution},
    geo::Coordinate,
    ids::{GuideId, TouristId},
    positions::TouristPosition,
    purchases::{NewPurchaseToken, PurchaseToken, PurchaseTokenUuid},
    tours::{
        KeyPoint, KeyPointUuid, NewKeyPoint, NewTour, Tour, TourUuid, in_stored_order,
    },
};

use crate::{
    domain::{
        carts::repository::CartsRepository,
        executions::repository::ExecutionsRepository,
        positions::repository::PositionsRepository,
        purchases::repository::PurchaseTokensRepository,
        tours::repository::{KeyPointsRepository, ToursRepository},
    },
    store::StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    tours: RwLock<FxHashMap<TourUuid, Tour>>,
    // Kept in insertion order so that equal `order` values tie-break by insertion.
    key_points: RwLock<Vec<KeyPoint>>,
    carts: RwLock<FxHashMap<TouristId, ShoppingCart>>,
    tokens: RwLock<Vec<PurchaseToken>>,
    executions: RwLock<FxHashMap<ExecutionUuid, TourExecution>>,
    positions: RwLock<FxHashMap<TouristId, TouristPosition>>,
}

/// Process-local store backing every repository. Cloning shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_revision(expected: u64, found: u64) -> Result<(), StoreError> {
    if expected != found {
        return Err(StoreError::StaleRevision { expected, found });
    }

    Ok(())
}

#[async_trait]
impl ToursRepository for MemoryStore {
    async fn create_tour(&self, guide: GuideId, tour: NewTour) -> Result<Tour, StoreError> {
        let tour = Tour::draft(TourUuid::new(), guide, tour, Timestamp::now());

        self.tables
            .tours
            .write()
            .await
            .insert(tour.uuid, tour.clone());

        Ok(tour)
    }

    async fn get_tour(&self, tour: TourUuid) -> Result<Tour, StoreError> {
        self.tables
            .tours
            .read()
            .await
            .get(&tour)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_tours_by_guide(&self, guide: GuideId) -> Result<Vec<Tour>, StoreError> {
        let mut tours: Vec<Tour> = self
            .tables
            .tours
            .read()
            .await
            .values()
            .filter(|tour| tour.guide == guide)
            .cloned()
            .collect();

        tours.sort_by_key(|tour| (tour.created_at, tour.uuid));

        Ok(tours)
    }

    async fn list_published_tours(&self) -> Result<Vec<Tour>, StoreError> {
        let mut tours: Vec<Tour> = self
            .tables
            .tours
            .read()
            .await
            .values()
            .filter(|tour| tour.is_published())
            .cloned()
            .collect();

        tours.sort_by_key(|tour| (tour.created_at, tour.uuid));

        Ok(tours)
    }

    async fn update_tour(&self, tour: Tour) -> Result<Tour, StoreError> {
        let mut tours = self.tables.tours.write().await;

        let stored = tours.get_mut(&tour.uuid).ok_or(StoreError::NotFound)?;

        *stored = tour.clone();

        Ok(tour)
    }
}

#[async_trait]
impl KeyPointsRepository for MemoryStore {
    async fn create_key_point(
        &self,
        tour: TourUuid,
        key_point: NewKeyPoint,
    ) -> Result<KeyPoint, StoreError> {
        if !self.tables.tours.read().await.contains_key(&tour) {
            return Err(StoreError::NotFound);
        }

        let key_point = KeyPoint::new(KeyPointUuid::new(), tour, key_point);

        self.tables.key_points.write().await.push(key_point.clone());

        Ok(key_point)
    }

    async fn get_key_point(&self, key_point: KeyPointUuid) -> Result<KeyPoint, StoreError> {
        self.tables
            .key_points
            .read()
            .await
            .iter()
            .find(|stored| stored.uuid == key_point)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_key_points(&self, tour: TourUuid) -> Result<Vec<KeyPoint>, StoreError> {
        let key_points = self
            .tables
            .key_points
            .read()
            .await
            .iter()
            .filter(|key_point| key_point.tour == tour)
            .cloned()
            .collect();

        Ok(in_stored_order(key_points))
    }

    async fn update_key_point(&self, key_point: KeyPoint) -> Result<KeyPoint, StoreError> {
        let mut key_points = self.tables.key_points.write().await;

        let stored = key_points
            .iter_mut()
            .find(|stored| stored.uuid == key_point.uuid)
            .ok_or(StoreError::NotFound)?;

        *stored = key_point.clone();

        Ok(key_point)
    }

    async fn delete_key_point(&self, key_point: KeyPointUuid) -> Result<u64, StoreError> {
        let mut key_points = self.tables.key_points.write().await;
        let before = key_points.len();

        key_points.retain(|stored| stored.uuid != key_point);

        Ok(u64::try_from(before - key_points.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl CartsRepository for MemoryStore {
    async fn find_cart(&self, tourist: TouristId) -> Result<Option<ShoppingCart>, StoreError> {
        Ok(self.tables.carts.read().await.get(&tourist).cloned())
    }

    async fn create_cart(&self, tourist: TouristId) -> Result<ShoppingCart, StoreError> {
        let mut carts = self.tables.carts.write().await;

        if carts.contains_key(&tourist) {
            return Err(StoreError::AlreadyExists);
        }

        let cart = ShoppingCart::new(tourist.clone());

        carts.insert(tourist, cart.clone());

        Ok(cart)
    }

    async fn update_cart(&self, cart: ShoppingCart) -> Result<ShoppingCart, StoreError> {
        let mut carts = self.tables.carts.write().await;

        let stored = carts.get_mut(cart.tourist()).ok_or(StoreError::NotFound)?;

        check_revision(cart.revision(), stored.revision())?;

        let updated = ShoppingCart::with_lines(
            cart.tourist().clone(),
            cart.lines().to_vec(),
            stored.revision() + 1,
        );

        *stored = updated.clone();

        Ok(updated)
    }
}

#[async_trait]
impl PurchaseTokensRepository for MemoryStore {
    async fn create_token(&self, token: NewPurchaseToken) -> Result<PurchaseToken, StoreError> {
        let token = PurchaseToken::issue(PurchaseTokenUuid::new(), token, Timestamp::now());

        self.tables.tokens.write().await.push(token.clone());

        Ok(token)
    }

    async fn has_purchased(&self, tourist: TouristId, tour: TourUuid) -> Result<bool, StoreError> {
        Ok(wayfarer::purchases::has_purchased(
            &self.tables.tokens.read().await,
            &tourist,
            tour,
        ))
    }

    async fn list_tokens(&self, tourist: TouristId) -> Result<Vec<PurchaseToken>, StoreError> {
        Ok(self
            .tables
            .tokens
            .read()
            .await
            .iter()
            .filter(|token| token.tourist == tourist)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExecutionsRepository for MemoryStore {
    async fn create_execution(
        &self,
        execution: NewExecution,
    ) -> Result<TourExecution, StoreError> {
        let mut executions = self.tables.executions.write().await;

        let walking = executions.values().any(|stored| {
            stored.is_active()
                && stored.tour == execution.tour
                && stored.tourist == execution.tourist
        });

        if walking {
            return Err(StoreError::AlreadyExists);
        }

        let execution = TourExecution::start(ExecutionUuid::new(), execution, Timestamp::now());

        executions.insert(execution.uuid, execution.clone());

        Ok(execution)
    }

    async fn get_execution(&self, execution: ExecutionUuid) -> Result<TourExecution, StoreError> {
        self.tables
            .executions
            .read()
            .await
            .get(&execution)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_active_execution(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<Option<TourExecution>, StoreError> {
        Ok(self
            .tables
            .executions
            .read()
            .await
            .values()
            .filter(|execution| {
                execution.is_active() && execution.tour == tour && execution.tourist == tourist
            })
            .min_by_key(|execution| (execution.started_at, execution.uuid))
            .cloned())
    }

    async fn list_active_executions(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<TourExecution>, StoreError> {
        let mut executions: Vec<TourExecution> = self
            .tables
            .executions
            .read()
            .await
            .values()
            .filter(|execution| execution.is_active() && execution.tourist == tourist)
            .cloned()
            .collect();

        executions.sort_by_key(|execution| (execution.started_at, execution.uuid));

        Ok(executions)
    }

    async fn update_execution(
        &self,
        execution: TourExecution,
    ) -> Result<TourExecution, StoreError> {
        let mut executions = self.tables.executions.write().await;

        let stored = executions
            .get_mut(&execution.uuid)
            .ok_or(StoreError::NotFound)?;

        check_revision(execution.revision, stored.revision)?;

        let updated = TourExecution {
            revision: stored.revision + 1,
            ..execution
        };

        *stored = updated.clone();

        Ok(updated)
    }
}

#[async_trait]
impl PositionsRepository for MemoryStore {
    async fn upsert_position(
        &self,
        tourist: TouristId,
        coordinate: Coordinate,
    ) -> Result<TouristPosition, StoreError> {
        let position = TouristPosition::report(tourist.clone(), coordinate, Timestamp::now());

        self.tables
            .positions
            .write()
            .await
            .insert(tourist, position.clone());

        Ok(position)
    }

    async fn get_position(&self, tourist: TouristId) -> Result<TouristPosition, StoreError> {
        self.tables
            .positions
            .read()
            .await
            .get(&tourist)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
