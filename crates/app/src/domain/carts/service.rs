//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use wayfarer::{
    carts::ShoppingCart,
    ids::TouristId,
    purchases::{CheckoutLine, CheckoutReceipt, LineOutcome, NewPurchaseToken},
    tours::TourUuid,
};

use crate::{
    domain::{
        carts::{errors::CartsServiceError, repository::CartsRepository},
        purchases::{repository::PurchaseTokensRepository, token::generate_purchase_token},
        tours::repository::ToursRepository,
    },
    store::StoreError,
};

/// Attempts at releasing checked-out lines before giving up on a busy cart.
const RELEASE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct StoreCartsService {
    carts: Arc<dyn CartsRepository>,
    tours: Arc<dyn ToursRepository>,
    tokens: Arc<dyn PurchaseTokensRepository>,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsRepository>,
        tours: Arc<dyn ToursRepository>,
        tokens: Arc<dyn PurchaseTokensRepository>,
    ) -> Self {
        Self {
            carts,
            tours,
            tokens,
        }
    }

    /// The tourist's cart, created empty on first use.
    async fn cart_for(&self, tourist: &TouristId) -> Result<ShoppingCart, CartsServiceError> {
        if let Some(cart) = self.carts.find_cart(tourist.clone()).await? {
            return Ok(cart);
        }

        match self.carts.create_cart(tourist.clone()).await {
            Ok(cart) => Ok(cart),
            // Lost a creation race; the winner's cart is the one to use.
            Err(StoreError::AlreadyExists) => self
                .carts
                .find_cart(tourist.clone())
                .await?
                .ok_or(CartsServiceError::Storage(StoreError::NotFound)),
            Err(error) => Err(error.into()),
        }
    }

    /// Drop the checked-out tours from the cart. Lines added while checkout was
    /// running stay put; a stale write re-reads the cart and tries again.
    async fn release_checked_out(
        &self,
        tourist: &TouristId,
        tours: &[TourUuid],
    ) -> Result<(), StoreError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let Some(mut cart) = self.carts.find_cart(tourist.clone()).await? else {
                return Ok(());
            };

            let released = tours
                .iter()
                .fold(false, |released, tour| cart.remove(*tour) || released);

            if !released {
                return Ok(());
            }

            match self.carts.update_cart(cart).await {
                Ok(cart) => {
                    tracing::debug!(remaining = cart.len(), attempt, "released checked-out lines");

                    return Ok(());
                }
                Err(StoreError::StaleRevision { .. }) if attempt < RELEASE_ATTEMPTS => {
                    tracing::debug!(attempt, "cart changed during checkout, retrying release");
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    async fn get_cart(&self, tourist: TouristId) -> Result<ShoppingCart, CartsServiceError> {
        self.cart_for(&tourist).await
    }

    #[tracing::instrument(
        name = "carts.service.add_to_cart",
        skip_all,
        fields(tourist = %tourist, tour_uuid = %tour),
        err
    )]
    async fn add_to_cart(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<ShoppingCart, CartsServiceError> {
        let tour = self
            .tours
            .get_tour(tour)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => CartsServiceError::TourNotFound,
                other => other.into(),
            })?;

        let mut cart = self.cart_for(&tourist).await?;

        cart.add(&tour)?;

        let cart = self.carts.update_cart(cart).await?;

        tracing::info!(total = %cart.total(), lines = cart.len(), "added tour to cart");

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.remove_from_cart",
        skip_all,
        fields(tourist = %tourist, tour_uuid = %tour),
        err
    )]
    async fn remove_from_cart(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<ShoppingCart, CartsServiceError> {
        let mut cart = self.cart_for(&tourist).await?;

        if !cart.remove(tour) {
            return Ok(cart);
        }

        let cart = self.carts.update_cart(cart).await?;

        tracing::info!(total = %cart.total(), lines = cart.len(), "removed tour from cart");

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.checkout",
        skip_all,
        fields(tourist = %tourist),
        err
    )]
    async fn checkout(&self, tourist: TouristId) -> Result<CheckoutReceipt, CartsServiceError> {
        let cart = self.cart_for(&tourist).await?;

        if cart.is_empty() {
            return Err(CartsServiceError::EmptyCart);
        }

        let mut receipt = CheckoutReceipt::new();

        for line in cart.lines() {
            let token = NewPurchaseToken {
                tourist: tourist.clone(),
                tour: line.tour,
                token: generate_purchase_token(),
            };

            let outcome = match self.tokens.create_token(token).await {
                Ok(token) => LineOutcome::Issued(token),
                Err(error) => {
                    tracing::warn!(tour_uuid = %line.tour, %error, "failed to issue purchase token");

                    LineOutcome::Failed {
                        reason: error.to_string(),
                    }
                }
            };

            receipt.push(CheckoutLine {
                tour: line.tour,
                tour_name: line.tour_name.clone(),
                outcome,
            });
        }

        let checked_out: Vec<TourUuid> = cart.lines().iter().map(|line| line.tour).collect();

        // Checked-out lines leave the cart even when their token failed.
        if let Err(error) = self.release_checked_out(&tourist, &checked_out).await {
            tracing::error!(%error, "failed to clear cart after checkout");
        }

        tracing::info!(
            issued = receipt.issued_count(),
            failed = receipt.failed_count(),
            "checked out cart"
        );

        Ok(receipt)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The tourist's cart, created empty on first access.
    async fn get_cart(&self, tourist: TouristId) -> Result<ShoppingCart, CartsServiceError>;

    /// Add a published tour to the tourist's cart at its current price.
    async fn add_to_cart(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<ShoppingCart, CartsServiceError>;

    /// Remove a tour from the tourist's cart. Removing an absent tour is a no-op.
    async fn remove_from_cart(
        &self,
        tourist: TouristId,
        tour: TourUuid,
    ) -> Result<ShoppingCart, CartsServiceError>;

    /// Issue one purchase token per cart line, best effort, then remove those lines
    /// from the cart.
    async fn checkout(&self, tourist: TouristId) -> Result<CheckoutReceipt, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use wayfarer::{
        carts::CartLine,
        purchases::{PurchaseToken, PurchaseTokenUuid},
    };

    use crate::{
        domain::{
            carts::repository::MockCartsRepository,
            purchases::{
                PurchasesService, repository::MockPurchaseTokensRepository,
                token::is_purchase_token,
            },
        },
        store::MemoryStore,
        test::{TestContext, helpers},
    };

    use super::*;

    /// Ledger that puts another tour in the cart while the first token is written.
    struct AddsDuringCheckout {
        store: MemoryStore,
        carts: StoreCartsService,
        tourist: TouristId,
        tour: TourUuid,
        added: AtomicBool,
    }

    #[async_trait]
    impl PurchaseTokensRepository for AddsDuringCheckout {
        async fn create_token(
            &self,
            token: NewPurchaseToken,
        ) -> Result<PurchaseToken, StoreError> {
            if !self.added.swap(true, Ordering::SeqCst) {
                self.carts
                    .add_to_cart(self.tourist.clone(), self.tour)
                    .await
                    .map_err(|error| StoreError::Unavailable(error.to_string()))?;
            }

            self.store.create_token(token).await
        }

        async fn has_purchased(
            &self,
            tourist: TouristId,
            tour: TourUuid,
        ) -> Result<bool, StoreError> {
            self.store.has_purchased(tourist, tour).await
        }

        async fn list_tokens(&self, tourist: TouristId) -> Result<Vec<PurchaseToken>, StoreError> {
            self.store.list_tokens(tourist).await
        }
    }

    #[tokio::test]
    async fn first_access_creates_an_empty_cart() -> TestResult {
        let ctx = TestContext::new();

        let cart = ctx.carts.get_cart(ctx.tourist.clone()).await?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.tourist(), &ctx.tourist);

        Ok(())
    }

    #[tokio::test]
    async fn totals_follow_adds_and_removes() -> TestResult {
        let ctx = TestContext::new();
        let a = helpers::create_published_tour(&ctx, "A", Decimal::from(10)).await?;
        let b = helpers::create_published_tour(&ctx, "B", Decimal::from(5)).await?;

        ctx.carts.add_to_cart(ctx.tourist.clone(), a.uuid).await?;
        let cart = ctx.carts.add_to_cart(ctx.tourist.clone(), b.uuid).await?;

        assert_eq!(cart.total(), Decimal::from(15));

        let cart = ctx.carts.remove_from_cart(ctx.tourist.clone(), a.uuid).await?;

        assert_eq!(cart.total(), Decimal::from(5));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn adding_a_tour_twice_conflicts() -> TestResult {
        let ctx = TestContext::new();
        let tour = helpers::create_published_tour(&ctx, "A", Decimal::from(10)).await?;

        ctx.carts.add_to_cart(ctx.tourist.clone(), tour.uuid).await?;
        let result = ctx.carts.add_to_cart(ctx.tourist.clone(), tour.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::AlreadyInCart)),
            "expected AlreadyInCart, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.tourist.clone()).await?;

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn adding_a_draft_is_rejected() -> TestResult {
        let ctx = TestContext::new();
        let tour = helpers::create_tour(&ctx, "Draft").await?;

        let result = ctx.carts.add_to_cart(ctx.tourist.clone(), tour.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotPublished)),
            "expected NotPublished, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_unknown_tour_is_not_found() {
        let ctx = TestContext::new();

        let result = ctx
            .carts
            .add_to_cart(ctx.tourist.clone(), TourUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::TourNotFound)),
            "expected TourNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn removing_an_absent_tour_is_a_noop() -> TestResult {
        let ctx = TestContext::new();

        let cart = ctx
            .carts
            .remove_from_cart(ctx.tourist.clone(), TourUuid::new())
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_of_empty_cart_is_rejected() {
        let ctx = TestContext::new();

        let result = ctx.carts.checkout(ctx.tourist.clone()).await;

        assert!(
            matches!(result, Err(CartsServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn checkout_issues_tokens_and_empties_cart() -> TestResult {
        let ctx = TestContext::new();
        let a = helpers::create_published_tour(&ctx, "A", Decimal::from(10)).await?;
        let b = helpers::create_published_tour(&ctx, "B", Decimal::from(5)).await?;

        ctx.carts.add_to_cart(ctx.tourist.clone(), a.uuid).await?;
        ctx.carts.add_to_cart(ctx.tourist.clone(), b.uuid).await?;

        let receipt = ctx.carts.checkout(ctx.tourist.clone()).await?;

        assert_eq!(receipt.issued_count(), 2);
        assert!(
            receipt.tokens().all(|token| is_purchase_token(&token.token)),
            "every issued token should be well formed"
        );

        let cart = ctx.carts.get_cart(ctx.tourist.clone()).await?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        let purchases = ctx.purchases.list_purchases(ctx.tourist.clone()).await?;

        assert_eq!(purchases.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_skips_lines_whose_token_fails() -> TestResult {
        let ctx = TestContext::new();

        for name in ["A", "B", "C"] {
            let tour = helpers::create_published_tour(&ctx, name, Decimal::ONE).await?;

            ctx.carts.add_to_cart(ctx.tourist.clone(), tour.uuid).await?;
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut tokens = MockPurchaseTokensRepository::new();

        tokens.expect_create_token().times(3).returning(move |token| {
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                return Err(StoreError::Unavailable("ledger offline".to_string()));
            }

            Ok(PurchaseToken::issue(
                PurchaseTokenUuid::new(),
                token,
                Timestamp::now(),
            ))
        });

        let carts = StoreCartsService::new(
            Arc::new(ctx.store.clone()),
            Arc::new(ctx.store.clone()),
            Arc::new(tokens),
        );

        let receipt = carts.checkout(ctx.tourist.clone()).await?;

        assert_eq!(receipt.issued_count(), 2);
        assert_eq!(receipt.failed_count(), 1);
        assert!(
            receipt
                .lines()
                .get(1)
                .is_some_and(|line| line.tour_name == "B" && line.token().is_none()),
            "the second line should be the failed one"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let cart = ctx.carts.get_cart(ctx.tourist.clone()).await?;

        assert!(cart.is_empty(), "cart should be emptied even on partial failure");

        Ok(())
    }

    #[tokio::test]
    async fn stale_cart_write_is_a_conflict() -> TestResult {
        let ctx = TestContext::new();
        let tour = helpers::create_published_tour(&ctx, "A", Decimal::ONE).await?;
        let tourist = ctx.tourist.clone();

        let mut carts = MockCartsRepository::new();

        carts
            .expect_find_cart()
            .once()
            .returning(|tourist| Ok(Some(ShoppingCart::new(tourist))));
        carts
            .expect_update_cart()
            .once()
            .returning(|_| Err(StoreError::StaleRevision { expected: 0, found: 1 }));

        let service = StoreCartsService::new(
            Arc::new(carts),
            Arc::new(ctx.store.clone()),
            Arc::new(MockPurchaseTokensRepository::new()),
        );

        let result = service.add_to_cart(tourist, tour.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::StaleCart)),
            "expected StaleCart, got {result:?}"
        );
        assert_eq!(
            result.map_err(|error| error.kind()).err(),
            Some(crate::domain::FailureKind::Conflict)
        );

        Ok(())
    }

    #[tokio::test]
    async fn tour_added_during_checkout_stays_in_cart() -> TestResult {
        let ctx = TestContext::new();
        let a = helpers::create_published_tour(&ctx, "A", Decimal::from(10)).await?;
        let b = helpers::create_published_tour(&ctx, "B", Decimal::from(5)).await?;

        ctx.carts.add_to_cart(ctx.tourist.clone(), a.uuid).await?;

        let tokens = AddsDuringCheckout {
            store: ctx.store.clone(),
            carts: ctx.carts.clone(),
            tourist: ctx.tourist.clone(),
            tour: b.uuid,
            added: AtomicBool::new(false),
        };

        let service = StoreCartsService::new(
            Arc::new(ctx.store.clone()),
            Arc::new(ctx.store.clone()),
            Arc::new(tokens),
        );

        let receipt = service.checkout(ctx.tourist.clone()).await?;

        assert_eq!(receipt.issued_count(), 1);

        let cart = ctx.carts.get_cart(ctx.tourist.clone()).await?;

        assert!(!cart.contains(a.uuid), "checked-out tour should leave the cart");
        assert!(cart.contains(b.uuid), "tour added during checkout should remain");
        assert_eq!(cart.total(), Decimal::from(5));

        assert!(ctx.purchases.has_purchased(ctx.tourist.clone(), a.uuid).await?);
        assert!(!ctx.purchases.has_purchased(ctx.tourist.clone(), b.uuid).await?);

        Ok(())
    }

    #[tokio::test]
    async fn busy_cart_release_gives_up_after_retries() -> TestResult {
        let tour = TourUuid::new();
        let mut carts = MockCartsRepository::new();

        carts.expect_find_cart().returning(move |tourist| {
            Ok(Some(ShoppingCart::with_lines(
                tourist,
                vec![CartLine {
                    tour,
                    tour_name: "A".to_string(),
                    price: Decimal::ONE,
                }],
                0,
            )))
        });
        carts
            .expect_update_cart()
            .times(RELEASE_ATTEMPTS)
            .returning(|_| Err(StoreError::StaleRevision { expected: 0, found: 1 }));

        let mut tokens = MockPurchaseTokensRepository::new();

        tokens.expect_create_token().once().returning(|token| {
            Ok(PurchaseToken::issue(
                PurchaseTokenUuid::new(),
                token,
                Timestamp::now(),
            ))
        });

        let service = StoreCartsService::new(
            Arc::new(carts),
            Arc::new(MemoryStore::new()),
            Arc::new(tokens),
        );

        let receipt = service.checkout(TouristId::from("tourist")).await?;

        assert_eq!(receipt.issued_count(), 1);

        Ok(())
    }
}
