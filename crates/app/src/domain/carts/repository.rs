//! Carts repository.

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{carts::ShoppingCart, ids::TouristId};

use crate::store::StoreError;

#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// The tourist's cart, if one was ever created.
    async fn find_cart(&self, tourist: TouristId) -> Result<Option<ShoppingCart>, StoreError>;

    /// Create an empty cart; fails with [`StoreError::AlreadyExists`] if one exists.
    async fn create_cart(&self, tourist: TouristId) -> Result<ShoppingCart, StoreError>;

    /// Write `cart` back if its revision is still current, returning it at its new revision.
    async fn update_cart(&self, cart: ShoppingCart) -> Result<ShoppingCart, StoreError>;
}
