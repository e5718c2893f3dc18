//! Wayfarer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    carts::{CartError, CartLine, ShoppingCart},
    executions::{
        CompletedKeyPoint, ExecutionError, ExecutionStatus, ExecutionUuid, NewExecution,
        ProximityOutcome, TourExecution,
    },
    geo::{
        Coordinate, EARTH_RADIUS_METERS, GeoError, PROXIMITY_THRESHOLD_METERS, haversine_distance,
        is_within_threshold,
    },
    guards::{
        can_view_all_key_points, guide_owns_tour, tourist_owns_cart, tourist_owns_execution,
    },
    ids::{GuideId, TouristId, TypedUuid},
    positions::TouristPosition,
    purchases::{
        CheckoutLine, CheckoutReceipt, LineOutcome, NewPurchaseToken, PurchaseToken,
        PurchaseTokenUuid, has_purchased,
    },
    tours::{
        KeyPoint, KeyPointUpdate, KeyPointUuid, NewKeyPoint, NewTour, Tour, TourError, TourStatus,
        TourUuid, in_stored_order, visible_key_points,
    },
};
