//! Ownership Guards
//!
//! Plain predicates shared by every mutating operation. Callers confirm the
//! resource exists before asking who owns it, so a missing resource is always
//! reported as not found rather than unauthorised.

use crate::{
    carts::ShoppingCart,
    executions::TourExecution,
    ids::{GuideId, TouristId},
    tours::Tour,
};

/// Whether `guide` authored `tour`.
pub fn guide_owns_tour(tour: &Tour, guide: &GuideId) -> bool {
    &tour.guide == guide
}

/// Whether `tourist` is walking `execution`.
pub fn tourist_owns_execution(execution: &TourExecution, tourist: &TouristId) -> bool {
    &execution.tourist == tourist
}

/// Whether `cart` belongs to `tourist`.
pub fn tourist_owns_cart(cart: &ShoppingCart, tourist: &TouristId) -> bool {
    cart.tourist() == tourist
}

/// Whether a viewer may see every key point of `tour`: its guide, or anyone who bought it.
///
/// Identities are opaque strings, so the viewer is compared against the guide id as-is.
pub fn can_view_all_key_points(tour: &Tour, viewer: Option<&str>, has_purchased: bool) -> bool {
    has_purchased || viewer.is_some_and(|viewer| tour.guide.as_str() == viewer)
}
