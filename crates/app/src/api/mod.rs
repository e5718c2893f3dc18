//! Operation boundary
//!
//! [`TourApi`] exposes one method per operation. Every outcome, success or
//! failure, is returned as a [`Response`]; nothing escapes as a raw error.

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::Serialize;
use wayfarer::{
    executions::ExecutionUuid,
    geo::{Coordinate, GeoError},
    ids::{GuideId, TouristId},
    tours::{KeyPointUpdate, KeyPointUuid, NewKeyPoint, NewTour, TourUuid},
};

use crate::{
    context::AppContext,
    domain::{
        FailureKind, carts::CartsServiceError, executions::ExecutionsServiceError,
        positions::PositionsServiceError, purchases::PurchasesServiceError,
        tours::ToursServiceError,
    },
};

pub mod requests;
pub mod views;

use requests::{
    AddKeyPointRequest, CartItemRequest, CheckProximityRequest, CreateTourRequest,
    DeleteKeyPointRequest, ExecutionRequest, GuideToursRequest, PublishTourRequest,
    StartExecutionRequest, TourRequest, TouristRequest, UpdateKeyPointRequest,
    UpdatePositionRequest,
};
use views::{
    CartView, CheckoutView, ExecutionView, KeyPointView, KeyPointsView, PositionView,
    ProximityView, PurchaseTokenView, StartedExecutionView, TourView,
};

/// Outcome of a single operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
            data: Some(data),
        }
    }

    pub fn fail(failure: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(failure),
            data: None,
        }
    }
}

/// A failure on its way to becoming a [`Response`].
#[derive(Debug)]
struct Rejection {
    kind: FailureKind,
    message: String,
    cause: Option<String>,
}

impl Rejection {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    fn invalid_id(what: &str) -> Self {
        Self::new(FailureKind::NotFound, format!("Invalid {what} ID"))
    }

    fn from_service_error(kind: FailureKind, error: &dyn std::error::Error) -> Self {
        Self {
            kind,
            message: error.to_string(),
            cause: error.source().map(ToString::to_string),
        }
    }
}

impl From<ToursServiceError> for Rejection {
    fn from(error: ToursServiceError) -> Self {
        Self::from_service_error(error.kind(), &error)
    }
}

impl From<CartsServiceError> for Rejection {
    fn from(error: CartsServiceError) -> Self {
        Self::from_service_error(error.kind(), &error)
    }
}

impl From<PurchasesServiceError> for Rejection {
    fn from(error: PurchasesServiceError) -> Self {
        Self::from_service_error(error.kind(), &error)
    }
}

impl From<ExecutionsServiceError> for Rejection {
    fn from(error: ExecutionsServiceError) -> Self {
        Self::from_service_error(error.kind(), &error)
    }
}

impl From<PositionsServiceError> for Rejection {
    fn from(error: PositionsServiceError) -> Self {
        Self::from_service_error(error.kind(), &error)
    }
}

impl From<GeoError> for Rejection {
    fn from(error: GeoError) -> Self {
        Self::new(FailureKind::InvalidState, format!("Invalid coordinates: {error}"))
    }
}

fn respond<T>(operation: &str, result: Result<(String, T), Rejection>) -> Response<T> {
    match result {
        Ok((message, data)) => Response::ok(message, data),
        Err(rejection) => {
            if rejection.kind == FailureKind::PersistenceFailure {
                tracing::error!(
                    operation,
                    cause = rejection.cause.as_deref().unwrap_or_default(),
                    "{}",
                    rejection.message
                );
            } else {
                tracing::debug!(operation, kind = ?rejection.kind, "{}", rejection.message);
            }

            Response::fail(rejection.kind, rejection.message)
        }
    }
}

fn parse_price(price: f64) -> Result<Decimal, Rejection> {
    Decimal::from_f64(price)
        .ok_or_else(|| Rejection::new(FailureKind::InvalidState, format!("Invalid price {price}")))
}

#[derive(Clone)]
pub struct TourApi {
    ctx: AppContext,
}

impl TourApi {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn create_tour(&self, request: CreateTourRequest) -> Response<TourView> {
        let result = async {
            let tour = self
                .ctx
                .tours
                .create_tour(
                    GuideId::from(request.guide_id),
                    NewTour {
                        name: request.name,
                        description: request.description,
                        difficulty: request.difficulty,
                        tags: request.tags,
                    },
                )
                .await?;

            Ok::<_, Rejection>(("Tour created successfully".to_string(), tour.into()))
        }
        .await;

        respond("create_tour", result)
    }

    pub async fn get_tour(&self, request: TourRequest) -> Response<TourView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;

            let tour = self.ctx.tours.get_tour(request.viewer_id, tour).await?;

            Ok::<_, Rejection>(("Tour retrieved successfully".to_string(), tour.into()))
        }
        .await;

        respond("get_tour", result)
    }

    pub async fn list_published_tours(&self) -> Response<Vec<TourView>> {
        let result = async {
            let tours = self.ctx.tours.list_published_tours().await?;

            Ok::<_, Rejection>((
                "Tours retrieved successfully".to_string(),
                tours.into_iter().map(Into::into).collect(),
            ))
        }
        .await;

        respond("list_published_tours", result)
    }

    pub async fn list_guide_tours(&self, request: GuideToursRequest) -> Response<Vec<TourView>> {
        let result = async {
            let tours = self
                .ctx
                .tours
                .list_guide_tours(GuideId::from(request.guide_id))
                .await?;

            Ok::<_, Rejection>((
                "Tours retrieved successfully".to_string(),
                tours.into_iter().map(Into::into).collect(),
            ))
        }
        .await;

        respond("list_guide_tours", result)
    }

    pub async fn publish_tour(&self, request: PublishTourRequest) -> Response<TourView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;
            let price = parse_price(request.price)?;

            let tour = self
                .ctx
                .tours
                .publish_tour(GuideId::from(request.guide_id), tour, price)
                .await?;

            Ok::<_, Rejection>(("Tour published successfully".to_string(), tour.into()))
        }
        .await;

        respond("publish_tour", result)
    }

    pub async fn add_key_point(&self, request: AddKeyPointRequest) -> Response<KeyPointView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;
            let coordinate = Coordinate::new(request.latitude, request.longitude)?;

            let key_point = self
                .ctx
                .tours
                .add_key_point(
                    GuideId::from(request.guide_id),
                    tour,
                    NewKeyPoint {
                        coordinate,
                        name: request.name,
                        description: request.description,
                        image: request.image,
                        order: request.order,
                    },
                )
                .await?;

            Ok::<_, Rejection>(("Keypoint added successfully".to_string(), key_point.into()))
        }
        .await;

        respond("add_key_point", result)
    }

    pub async fn update_key_point(&self, request: UpdateKeyPointRequest) -> Response<KeyPointView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;
            let key_point = request
                .key_point_id
                .parse::<KeyPointUuid>()
                .map_err(|_| Rejection::invalid_id("keypoint"))?;
            let coordinate = Coordinate::new(request.latitude, request.longitude)?;

            let key_point = self
                .ctx
                .tours
                .update_key_point(
                    GuideId::from(request.guide_id),
                    tour,
                    key_point,
                    KeyPointUpdate {
                        coordinate,
                        name: request.name,
                        description: request.description,
                        image: request.image,
                        order: request.order,
                    },
                )
                .await?;

            Ok::<_, Rejection>((
                "Keypoint updated successfully".to_string(),
                key_point.into(),
            ))
        }
        .await;

        respond("update_key_point", result)
    }

    pub async fn delete_key_point(&self, request: DeleteKeyPointRequest) -> Response<()> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;
            let key_point = request
                .key_point_id
                .parse::<KeyPointUuid>()
                .map_err(|_| Rejection::invalid_id("keypoint"))?;

            self.ctx
                .tours
                .delete_key_point(GuideId::from(request.guide_id), tour, key_point)
                .await?;

            Ok::<_, Rejection>(("Keypoint deleted successfully".to_string(), ()))
        }
        .await;

        respond("delete_key_point", result)
    }

    pub async fn list_key_points(&self, request: TourRequest) -> Response<KeyPointsView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;

            let listing = self
                .ctx
                .tours
                .list_key_points(request.viewer_id, tour)
                .await?;

            Ok::<_, Rejection>((
                "Keypoints retrieved successfully".to_string(),
                listing.into(),
            ))
        }
        .await;

        respond("list_key_points", result)
    }

    pub async fn get_cart(&self, request: TouristRequest) -> Response<CartView> {
        let result = async {
            let cart = self
                .ctx
                .carts
                .get_cart(TouristId::from(request.tourist_id))
                .await?;

            Ok::<_, Rejection>(("Cart retrieved successfully".to_string(), cart.into()))
        }
        .await;

        respond("get_cart", result)
    }

    pub async fn add_to_cart(&self, request: CartItemRequest) -> Response<CartView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;

            let cart = self
                .ctx
                .carts
                .add_to_cart(TouristId::from(request.tourist_id), tour)
                .await?;

            Ok::<_, Rejection>(("Tour added to cart".to_string(), cart.into()))
        }
        .await;

        respond("add_to_cart", result)
    }

    pub async fn remove_from_cart(&self, request: CartItemRequest) -> Response<CartView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;

            let cart = self
                .ctx
                .carts
                .remove_from_cart(TouristId::from(request.tourist_id), tour)
                .await?;

            Ok::<_, Rejection>(("Tour removed from cart".to_string(), cart.into()))
        }
        .await;

        respond("remove_from_cart", result)
    }

    pub async fn checkout(&self, request: TouristRequest) -> Response<CheckoutView> {
        let result = async {
            let receipt = self
                .ctx
                .carts
                .checkout(TouristId::from(request.tourist_id))
                .await?;

            Ok::<_, Rejection>((
                format!("Successfully purchased {} tours", receipt.issued_count()),
                receipt.into(),
            ))
        }
        .await;

        respond("checkout", result)
    }

    pub async fn list_purchases(&self, request: TouristRequest) -> Response<Vec<PurchaseTokenView>> {
        let result = async {
            let tokens = self
                .ctx
                .purchases
                .list_purchases(TouristId::from(request.tourist_id))
                .await?;

            Ok::<_, Rejection>((
                "Purchases retrieved successfully".to_string(),
                tokens.into_iter().map(Into::into).collect(),
            ))
        }
        .await;

        respond("list_purchases", result)
    }

    pub async fn start_execution(
        &self,
        request: StartExecutionRequest,
    ) -> Response<StartedExecutionView> {
        let result = async {
            let tour = request
                .tour_id
                .parse::<TourUuid>()
                .map_err(|_| Rejection::invalid_id("tour"))?;
            let start = Coordinate::new(request.start_latitude, request.start_longitude)?;

            let started = self
                .ctx
                .executions
                .start_execution(TouristId::from(request.tourist_id), tour, start)
                .await?;

            let message = if started.resumed {
                "Continuing existing tour execution"
            } else {
                "Tour execution started"
            };

            Ok::<_, Rejection>((message.to_string(), started.into()))
        }
        .await;

        respond("start_execution", result)
    }

    pub async fn check_proximity(&self, request: CheckProximityRequest) -> Response<ProximityView> {
        let result = async {
            let execution = request
                .execution_id
                .parse::<ExecutionUuid>()
                .map_err(|_| Rejection::invalid_id("execution"))?;
            let position = Coordinate::new(request.current_latitude, request.current_longitude)?;

            let check = self
                .ctx
                .executions
                .check_proximity(TouristId::from(request.tourist_id), execution, position)
                .await?;

            let message = if check.outcome.advanced() {
                "Near keypoint"
            } else {
                "No nearby keypoints"
            };

            Ok::<_, Rejection>((message.to_string(), check.into()))
        }
        .await;

        respond("check_proximity", result)
    }

    pub async fn complete_tour(&self, request: ExecutionRequest) -> Response<ExecutionView> {
        let result = async {
            let execution = request
                .execution_id
                .parse::<ExecutionUuid>()
                .map_err(|_| Rejection::invalid_id("execution"))?;

            let execution = self
                .ctx
                .executions
                .complete_execution(TouristId::from(request.tourist_id), execution)
                .await?;

            Ok::<_, Rejection>(("Tour completed successfully".to_string(), execution.into()))
        }
        .await;

        respond("complete_tour", result)
    }

    pub async fn abandon_tour(&self, request: ExecutionRequest) -> Response<ExecutionView> {
        let result = async {
            let execution = request
                .execution_id
                .parse::<ExecutionUuid>()
                .map_err(|_| Rejection::invalid_id("execution"))?;

            let execution = self
                .ctx
                .executions
                .abandon_execution(TouristId::from(request.tourist_id), execution)
                .await?;

            Ok::<_, Rejection>(("Tour abandoned".to_string(), execution.into()))
        }
        .await;

        respond("abandon_tour", result)
    }

    pub async fn get_execution(&self, request: ExecutionRequest) -> Response<ExecutionView> {
        let result = async {
            let execution = request
                .execution_id
                .parse::<ExecutionUuid>()
                .map_err(|_| Rejection::invalid_id("execution"))?;

            let execution = self
                .ctx
                .executions
                .get_execution(TouristId::from(request.tourist_id), execution)
                .await?;

            Ok::<_, Rejection>((
                "Execution retrieved successfully".to_string(),
                execution.into(),
            ))
        }
        .await;

        respond("get_execution", result)
    }

    pub async fn list_active_executions(
        &self,
        request: TouristRequest,
    ) -> Response<Vec<ExecutionView>> {
        let result = async {
            let executions = self
                .ctx
                .executions
                .list_active_executions(TouristId::from(request.tourist_id))
                .await?;

            Ok::<_, Rejection>((
                "Executions retrieved successfully".to_string(),
                executions.into_iter().map(Into::into).collect(),
            ))
        }
        .await;

        respond("list_active_executions", result)
    }

    pub async fn update_position(&self, request: UpdatePositionRequest) -> Response<PositionView> {
        let result = async {
            let coordinate = Coordinate::new(request.latitude, request.longitude)?;

            let position = self
                .ctx
                .positions
                .update_position(TouristId::from(request.tourist_id), coordinate)
                .await?;

            Ok::<_, Rejection>(("Position updated successfully".to_string(), position.into()))
        }
        .await;

        respond("update_position", result)
    }

    pub async fn get_current_position(&self, request: TouristRequest) -> Response<PositionView> {
        let result = async {
            let position = self
                .ctx
                .positions
                .get_current_position(TouristId::from(request.tourist_id))
                .await?;

            Ok::<_, Rejection>((
                "Position retrieved successfully".to_string(),
                position.into(),
            ))
        }
        .await;

        respond("get_current_position", result)
    }
}
