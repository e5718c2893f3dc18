//! Purchases service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{ids::TouristId, purchases::PurchaseToken, tours::TourUuid};

use crate::domain::purchases::{
    errors::PurchasesServiceError, repository::PurchaseTokensRepository,
};

#[derive(Clone)]
pub struct StorePurchasesService {
    tokens: Arc<dyn PurchaseTokensRepository>,
}

impl StorePurchasesService {
    #[must_use]
    pub fn new(tokens: Arc<dyn PurchaseTokensRepository>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl PurchasesService for StorePurchasesService {
    async fn has_purchased(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<bool, PurchasesServiceError> {
        Ok(self.tokens.has_purchased(tourist, tour).await?)
    }

    async fn list_purchases(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<PurchaseToken>, PurchasesServiceError> {
        Ok(self.tokens.list_tokens(tourist).await?)
    }
}

#[automock]
#[async_trait]
pub trait PurchasesService: Send + Sync {
    /// Whether `tourist` holds a purchase token for `tour`.
    async fn has_purchased(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<bool, PurchasesServiceError>;

    /// Every purchase token issued to `tourist`.
    async fn list_purchases(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<PurchaseToken>, PurchasesServiceError>;
}
