//! Purchase tokens repository.

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{
    ids::TouristId,
    purchases::{NewPurchaseToken, PurchaseToken},
    tours::TourUuid,
};

use crate::store::StoreError;

#[automock]
#[async_trait]
pub trait PurchaseTokensRepository: Send + Sync {
    /// Append a token to the ledger.
    async fn create_token(&self, token: NewPurchaseToken) -> Result<PurchaseToken, StoreError>;

    /// Whether any token proves `tourist` bought `tour`.
    async fn has_purchased(&self, tourist: TouristId, tour: TourUuid) -> Result<bool, StoreError>;

    /// Every token issued to `tourist`, oldest first.
    async fn list_tokens(&self, tourist: TouristId) -> Result<Vec<PurchaseToken>, StoreError>;
}
