//! Purchase Ledger

use jiff::Timestamp;

use crate::{
    ids::{TouristId, TypedUuid},
    tours::TourUuid,
};

/// Purchase Token UUID
pub type PurchaseTokenUuid = TypedUuid<PurchaseToken>;

/// A token about to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchaseToken {
    /// Buyer
    pub tourist: TouristId,

    /// Tour bought
    pub tour: TourUuid,

    /// Opaque token value
    pub token: String,
}

/// Immutable proof that a tourist bought a tour. Never consumed or expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseToken {
    /// Ledger entry identifier
    pub uuid: PurchaseTokenUuid,

    /// Buyer
    pub tourist: TouristId,

    /// Tour bought
    pub tour: TourUuid,

    /// Opaque token value
    pub token: String,

    /// When the token was issued
    pub purchased_at: Timestamp,
}

impl PurchaseToken {
    /// Record a new token as issued at `now`.
    pub fn issue(uuid: PurchaseTokenUuid, token: NewPurchaseToken, now: Timestamp) -> Self {
        Self {
            uuid,
            tourist: token.tourist,
            tour: token.tour,
            token: token.token,
            purchased_at: now,
        }
    }
}

/// Whether any token in `ledger` proves `tourist` bought `tour`.
pub fn has_purchased(ledger: &[PurchaseToken], tourist: &TouristId, tour: TourUuid) -> bool {
    ledger
        .iter()
        .any(|entry| entry.tour == tour && &entry.tourist == tourist)
}

/// Outcome of minting the token for a single cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The token was written to the ledger.
    Issued(PurchaseToken),

    /// Writing the token failed; the line was skipped.
    Failed {
        /// Why the write failed
        reason: String,
    },
}

/// One cart line's checkout result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    /// Tour on the line
    pub tour: TourUuid,

    /// Tour name snapshot from the cart
    pub tour_name: String,

    /// What happened to it
    pub outcome: LineOutcome,
}

impl CheckoutLine {
    /// Issued token, if any.
    pub fn token(&self) -> Option<&PurchaseToken> {
        match &self.outcome {
            LineOutcome::Issued(token) => Some(token),
            LineOutcome::Failed { .. } => None,
        }
    }
}

/// Per-line results of a best-effort checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutReceipt {
    lines: Vec<CheckoutLine>,
}

impl CheckoutReceipt {
    /// Create an empty receipt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for one line.
    pub fn push(&mut self, line: CheckoutLine) {
        self.lines.push(line);
    }

    /// All line results, in cart order.
    pub fn lines(&self) -> &[CheckoutLine] {
        &self.lines
    }

    /// Tokens actually issued.
    pub fn tokens(&self) -> impl Iterator<Item = &PurchaseToken> {
        self.lines.iter().filter_map(CheckoutLine::token)
    }

    /// Number of tokens actually issued.
    pub fn issued_count(&self) -> usize {
        self.tokens().count()
    }

    /// Number of lines whose token could not be written.
    pub fn failed_count(&self) -> usize {
        self.lines.len() - self.issued_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(tourist: &str, tour: TourUuid) -> PurchaseToken {
        PurchaseToken::issue(
            PurchaseTokenUuid::new(),
            NewPurchaseToken {
                tourist: TouristId::from(tourist),
                tour,
                token: "pt_test".to_string(),
            },
            Timestamp::UNIX_EPOCH,
        )
    }

    #[test]
    fn ledger_lookup_matches_tourist_and_tour() {
        let tour = TourUuid::new();
        let ledger = [token("alice", tour)];

        assert!(has_purchased(&ledger, &TouristId::from("alice"), tour));
        assert!(!has_purchased(&ledger, &TouristId::from("bob"), tour));
        assert!(!has_purchased(
            &ledger,
            &TouristId::from("alice"),
            TourUuid::new()
        ));
    }

    #[test]
    fn receipt_counts_partial_outcomes() {
        let mut receipt = CheckoutReceipt::new();
        let (a, b, c) = (TourUuid::new(), TourUuid::new(), TourUuid::new());

        receipt.push(CheckoutLine {
            tour: a,
            tour_name: "A".to_string(),
            outcome: LineOutcome::Issued(token("alice", a)),
        });
        receipt.push(CheckoutLine {
            tour: b,
            tour_name: "B".to_string(),
            outcome: LineOutcome::Failed {
                reason: "store unavailable".to_string(),
            },
        });
        receipt.push(CheckoutLine {
            tour: c,
            tour_name: "C".to_string(),
            outcome: LineOutcome::Issued(token("alice", c)),
        });

        assert_eq!(receipt.issued_count(), 2);
        assert_eq!(receipt.failed_count(), 1);
        assert_eq!(receipt.lines().len(), 3);
        assert!(receipt.lines().get(1).and_then(CheckoutLine::token).is_none());
    }
}
