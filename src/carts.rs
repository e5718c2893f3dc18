//! Shopping Carts

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    ids::TouristId,
    tours::{Tour, TourUuid},
};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Only published tours can be bought.
    #[error("tour {0} is not published")]
    NotPublished(TourUuid),

    /// A tour may appear in a cart at most once.
    #[error("tour {0} is already in the cart")]
    AlreadyInCart(TourUuid),
}

/// A tour snapshot taken when it was added to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Tour being bought
    pub tour: TourUuid,

    /// Tour name at the time of adding
    pub tour_name: String,

    /// Tour price at the time of adding
    pub price: Decimal,
}

/// A tourist's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingCart {
    tourist: TouristId,
    lines: Vec<CartLine>,
    total: Decimal,
    revision: u64,
}

impl ShoppingCart {
    /// Create an empty cart for `tourist`.
    pub fn new(tourist: TouristId) -> Self {
        Self::with_lines(tourist, Vec::new(), 0)
    }

    /// Rebuild a cart from stored lines. The total is recomputed.
    pub fn with_lines(tourist: TouristId, lines: Vec<CartLine>, revision: u64) -> Self {
        let total = sum(&lines);

        Self {
            tourist,
            lines,
            total,
            revision,
        }
    }

    /// Owning tourist.
    pub fn tourist(&self) -> &TouristId {
        &self.tourist
    }

    /// Lines in the order they were added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of the current line prices.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Revision the cart was read at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether `tour` already has a line.
    pub fn contains(&self, tour: TourUuid) -> bool {
        self.lines.iter().any(|line| line.tour == tour)
    }

    /// Add a snapshot of `tour`.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotPublished`]: the tour cannot be bought yet.
    /// - [`CartError::AlreadyInCart`]: the tour already has a line.
    pub fn add(&mut self, tour: &Tour) -> Result<(), CartError> {
        if !tour.is_published() {
            return Err(CartError::NotPublished(tour.uuid));
        }

        if self.contains(tour.uuid) {
            return Err(CartError::AlreadyInCart(tour.uuid));
        }

        self.lines.push(CartLine {
            tour: tour.uuid,
            tour_name: tour.name.clone(),
            price: tour.price,
        });

        self.total = sum(&self.lines);

        Ok(())
    }

    /// Remove the line for `tour`, returning whether one was present.
    pub fn remove(&mut self, tour: TourUuid) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.tour != tour);
        self.total = sum(&self.lines);

        self.lines.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Decimal::ZERO;
    }
}

// Totals are always recomputed from the lines rather than adjusted in place.
fn sum(lines: &[CartLine]) -> Decimal {
    lines.iter().map(|line| line.price).sum()
}
