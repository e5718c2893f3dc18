//! Response views
//!
//! Ids are rendered as strings, timestamps as RFC 3339 and money as `f64`.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use wayfarer::{
    carts::{CartLine, ShoppingCart},
    executions::{CompletedKeyPoint, ExecutionStatus, ProximityOutcome, TourExecution},
    positions::TouristPosition,
    purchases::{CheckoutLine, CheckoutReceipt, LineOutcome, PurchaseToken},
    tours::{KeyPoint, Tour, TourStatus},
};

use crate::domain::{
    executions::{ProximityCheck, StartedExecution},
    tours::KeyPointListing,
};

fn money(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourView {
    pub id: String,
    pub guide_id: String,
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub status: TourStatus,
    pub price: f64,
    pub published_at: Option<String>,
    pub created_at: String,
}

impl From<Tour> for TourView {
    fn from(tour: Tour) -> Self {
        Self {
            id: tour.uuid.to_string(),
            guide_id: tour.guide.to_string(),
            name: tour.name,
            description: tour.description,
            difficulty: tour.difficulty,
            tags: tour.tags,
            status: tour.status,
            price: money(tour.price),
            published_at: tour.published_at.map(|at| at.to_string()),
            created_at: tour.created_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPointView {
    pub id: String,
    pub tour_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub order: i32,
}

impl From<KeyPoint> for KeyPointView {
    fn from(key_point: KeyPoint) -> Self {
        Self {
            id: key_point.uuid.to_string(),
            tour_id: key_point.tour.to_string(),
            latitude: key_point.coordinate.latitude(),
            longitude: key_point.coordinate.longitude(),
            name: key_point.name,
            description: key_point.description,
            image: key_point.image,
            order: key_point.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPointsView {
    pub key_points: Vec<KeyPointView>,
    pub is_purchased: bool,
}

impl From<KeyPointListing> for KeyPointsView {
    fn from(listing: KeyPointListing) -> Self {
        Self {
            key_points: listing.key_points.into_iter().map(Into::into).collect(),
            is_purchased: listing.is_purchased,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItemView {
    pub tour_id: String,
    pub tour_name: String,
    pub price: f64,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            tour_id: line.tour.to_string(),
            tour_name: line.tour_name.clone(),
            price: money(line.price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub tourist_id: String,
    pub items: Vec<CartItemView>,
    pub total_price: f64,
}

impl From<ShoppingCart> for CartView {
    fn from(cart: ShoppingCart) -> Self {
        Self {
            tourist_id: cart.tourist().to_string(),
            items: cart.lines().iter().map(Into::into).collect(),
            total_price: money(cart.total()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseTokenView {
    pub id: String,
    pub tour_id: String,
    pub token: String,
    pub purchased_at: String,
}

impl From<PurchaseToken> for PurchaseTokenView {
    fn from(token: PurchaseToken) -> Self {
        Self {
            id: token.uuid.to_string(),
            tour_id: token.tour.to_string(),
            token: token.token,
            purchased_at: token.purchased_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutLineView {
    pub tour_id: String,
    pub tour_name: String,
    pub token: Option<PurchaseTokenView>,
    pub error: Option<String>,
}

impl From<CheckoutLine> for CheckoutLineView {
    fn from(line: CheckoutLine) -> Self {
        let (token, error) = match line.outcome {
            LineOutcome::Issued(token) => (Some(token.into()), None),
            LineOutcome::Failed { reason } => (None, Some(reason)),
        };

        Self {
            tour_id: line.tour.to_string(),
            tour_name: line.tour_name,
            token,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutView {
    pub purchased: usize,
    pub failed: usize,
    pub lines: Vec<CheckoutLineView>,
}

impl From<CheckoutReceipt> for CheckoutView {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            purchased: receipt.issued_count(),
            failed: receipt.failed_count(),
            lines: receipt.lines().iter().cloned().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedKeyPointView {
    pub key_point_id: String,
    pub completed_at: String,
}

impl From<&CompletedKeyPoint> for CompletedKeyPointView {
    fn from(completed: &CompletedKeyPoint) -> Self {
        Self {
            key_point_id: completed.key_point.to_string(),
            completed_at: completed.completed_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionView {
    pub id: String,
    pub tourist_id: String,
    pub tour_id: String,
    pub status: ExecutionStatus,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub started_at: String,
    pub last_activity: String,
    pub completed_at: Option<String>,
    pub completed_key_points: Vec<CompletedKeyPointView>,
}

impl From<TourExecution> for ExecutionView {
    fn from(execution: TourExecution) -> Self {
        Self {
            id: execution.uuid.to_string(),
            tourist_id: execution.tourist.to_string(),
            tour_id: execution.tour.to_string(),
            status: execution.status,
            start_latitude: execution.start.latitude(),
            start_longitude: execution.start.longitude(),
            started_at: execution.started_at.to_string(),
            last_activity: execution.last_activity.to_string(),
            completed_at: execution.completed_at.map(|at| at.to_string()),
            completed_key_points: execution
                .completed_key_points
                .iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartedExecutionView {
    pub resumed: bool,

    #[serde(flatten)]
    pub execution: ExecutionView,
}

impl From<StartedExecution> for StartedExecutionView {
    fn from(started: StartedExecution) -> Self {
        Self {
            resumed: started.resumed,
            execution: started.execution.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityView {
    pub near_key_point: bool,
    pub key_point: Option<KeyPointView>,

    /// Distance to the completed key point, or to the nearest remaining one.
    pub distance: Option<f64>,
    pub execution: ExecutionView,
}

impl From<ProximityCheck> for ProximityView {
    fn from(check: ProximityCheck) -> Self {
        let (near_key_point, key_point, distance) = match check.outcome {
            ProximityOutcome::Advanced {
                key_point,
                distance,
            } => (true, Some(key_point.into()), Some(distance)),
            ProximityOutcome::NotAdvanced { nearest_distance } => (false, None, nearest_distance),
        };

        Self {
            near_key_point,
            key_point,
            distance,
            execution: check.execution.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionView {
    pub tourist_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: String,
}

impl From<TouristPosition> for PositionView {
    fn from(position: TouristPosition) -> Self {
        Self {
            tourist_id: position.tourist.to_string(),
            latitude: position.coordinate.latitude(),
            longitude: position.coordinate.longitude(),
            updated_at: position.updated_at.to_string(),
        }
    }
}
