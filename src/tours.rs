//! Tours and Key Points

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geo::Coordinate,
    ids::{GuideId, TypedUuid},
};

/// Tour UUID
pub type TourUuid = TypedUuid<Tour>;

/// Key Point UUID
pub type KeyPointUuid = TypedUuid<KeyPoint>;

/// Errors raised by tour mutations.
#[derive(Debug, Error, PartialEq)]
pub enum TourError {
    /// Tours cannot be published with a negative price.
    #[error("price {0} must not be negative")]
    NegativePrice(Decimal),
}

/// Publication status of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    /// Being authored; invisible to everyone but its guide.
    Draft,

    /// Listed and purchasable.
    Published,
}

impl TourStatus {
    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Descriptive fields supplied when a guide creates a tour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTour {
    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Difficulty label
    pub difficulty: String,

    /// Search tags
    pub tags: Vec<String>,
}

/// Tour
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Tour identifier
    pub uuid: TourUuid,

    /// Owning guide
    pub guide: GuideId,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Difficulty label
    pub difficulty: String,

    /// Search tags
    pub tags: Vec<String>,

    /// Publication status
    pub status: TourStatus,

    /// Price; zero until published
    pub price: Decimal,

    /// When the tour was (last) published
    pub published_at: Option<Timestamp>,

    /// When the tour was created
    pub created_at: Timestamp,
}

impl Tour {
    /// Create an unpublished tour with a zero price.
    pub fn draft(uuid: TourUuid, guide: GuideId, details: NewTour, now: Timestamp) -> Self {
        Self {
            uuid,
            guide,
            name: details.name,
            description: details.description,
            difficulty: details.difficulty,
            tags: details.tags,
            status: TourStatus::Draft,
            price: Decimal::ZERO,
            published_at: None,
            created_at: now,
        }
    }

    /// Whether the tour is listed and purchasable.
    pub fn is_published(&self) -> bool {
        self.status == TourStatus::Published
    }

    /// Publish the tour at the given price. Publishing again updates the price.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::NegativePrice`] for prices below zero.
    pub fn publish(&mut self, price: Decimal, now: Timestamp) -> Result<(), TourError> {
        if price < Decimal::ZERO {
            return Err(TourError::NegativePrice(price));
        }

        self.status = TourStatus::Published;
        self.price = price;
        self.published_at = Some(now);

        Ok(())
    }
}

/// Data supplied when a guide adds a key point.
#[derive(Debug, Clone, PartialEq)]
pub struct NewKeyPoint {
    /// Location of the key point
    pub coordinate: Coordinate,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Optional image reference
    pub image: Option<String>,

    /// Display order within the tour
    pub order: i32,
}

/// Replacement data for an existing key point. `order` is kept when omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPointUpdate {
    /// Location of the key point
    pub coordinate: Coordinate,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Optional image reference
    pub image: Option<String>,

    /// New display order, if changing
    pub order: Option<i32>,
}

/// A geotagged waypoint belonging to exactly one tour.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPoint {
    /// Key point identifier
    pub uuid: KeyPointUuid,

    /// Tour the key point belongs to
    pub tour: TourUuid,

    /// Location of the key point
    pub coordinate: Coordinate,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Optional image reference
    pub image: Option<String>,

    /// Display order within the tour
    pub order: i32,
}

impl KeyPoint {
    /// Build a key point for `tour`.
    pub fn new(uuid: KeyPointUuid, tour: TourUuid, data: NewKeyPoint) -> Self {
        Self {
            uuid,
            tour,
            coordinate: data.coordinate,
            name: data.name,
            description: data.description,
            image: data.image,
            order: data.order,
        }
    }

    /// Replace the editable fields.
    pub fn apply(&mut self, update: KeyPointUpdate) {
        self.coordinate = update.coordinate;
        self.name = update.name;
        self.description = update.description;
        self.image = update.image;

        if let Some(order) = update.order {
            self.order = order;
        }
    }
}

/// Arrange key points (given in insertion order) into stored order: by `order`
/// ascending, ties keeping insertion order.
pub fn in_stored_order(mut key_points: Vec<KeyPoint>) -> Vec<KeyPoint> {
    key_points.sort_by_key(|key_point| key_point.order);

    key_points
}

/// The key points a viewer may see: all of them, or only the first in stored order.
pub fn visible_key_points(key_points: &[KeyPoint], can_view_all: bool) -> &[KeyPoint] {
    if can_view_all {
        return key_points;
    }

    key_points.get(..1).unwrap_or(key_points)
}
