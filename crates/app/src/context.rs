//! App Context

use std::sync::Arc;

use crate::{
    domain::{
        carts::{CartsService, StoreCartsService},
        executions::{ExecutionsService, StoreExecutionsService},
        positions::{PositionsService, StorePositionsService},
        purchases::{PurchasesService, StorePurchasesService},
        tours::{StoreToursService, ToursService},
    },
    store::MemoryStore,
};

#[derive(Clone)]
pub struct AppContext {
    pub tours: Arc<dyn ToursService>,
    pub carts: Arc<dyn CartsService>,
    pub purchases: Arc<dyn PurchasesService>,
    pub executions: Arc<dyn ExecutionsService>,
    pub positions: Arc<dyn PositionsService>,
}

impl AppContext {
    /// Build application context over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(&MemoryStore::new())
    }

    /// Build application context with every service sharing `store`.
    #[must_use]
    pub fn from_store(store: &MemoryStore) -> Self {
        let store = Arc::new(store.clone());

        Self {
            tours: Arc::new(StoreToursService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            carts: Arc::new(StoreCartsService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            purchases: Arc::new(StorePurchasesService::new(store.clone())),
            executions: Arc::new(StoreExecutionsService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            positions: Arc::new(StorePositionsService::new(store)),
        }
    }
}
