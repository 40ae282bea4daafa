//! Escrow conservation invariant checker.
//!
//! Two equalities must hold for the house account after every operation:
//! ```text
//! held == recorded(escrowed) - recorded(refunds paid) - recorded(proceeds paid)
//! held == Σ(withdrawable refunds) + Σ(unclaimed winning bids)
//! ```
//!
//! The first catches funds moving without being recorded; the second
//! catches funds the house holds but no longer owes anyone, or owes
//! but no longer holds.
//!
//! Only the net recorded amount is kept. Lifetime volume is unbounded and
//! would eventually leave the range of [`Decimal`]; the net amount never
//! exceeds what the house actually holds.

use auctionhouse_types::{AuctionError, Result};
use rust_decimal::Decimal;

/// Net amount the recorded flows say the house holds in escrow.
#[derive(Debug, Default)]
pub struct EscrowConservation {
    expected: Decimal,
    /// Number of recorded movements, for diagnostics.
    movements: u64,
}

impl EscrowConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            expected: Decimal::ZERO,
            movements: 0,
        }
    }

    /// Check that `amount` can enter escrow without leaving the
    /// representable range. Call before committing the movement.
    ///
    /// # Errors
    /// Returns [`AuctionError::EscrowInvariantViolation`] on overflow.
    pub fn check_escrow(&self, amount: Decimal) -> Result<Decimal> {
        self.expected
            .checked_add(amount)
            .ok_or_else(|| AuctionError::EscrowInvariantViolation {
                reason: format!("escrowing {amount} overflows held {}", self.expected),
            })
    }

    /// A bid's funds entered escrow.
    ///
    /// # Errors
    /// Returns [`AuctionError::EscrowInvariantViolation`] on overflow;
    /// nothing is recorded in that case.
    pub fn record_escrow(&mut self, amount: Decimal) -> Result<()> {
        self.expected = self.check_escrow(amount)?;
        self.movements = self.movements.saturating_add(1);
        Ok(())
    }

    /// A withdrawal paid a refund out of escrow.
    ///
    /// # Errors
    /// Returns [`AuctionError::EscrowInvariantViolation`] if more leaves
    /// escrow than was ever recorded entering it.
    pub fn record_refund(&mut self, amount: Decimal) -> Result<()> {
        self.release(amount, "refund")
    }

    /// Proceeds were paid to a seller.
    ///
    /// # Errors
    /// Same as [`record_refund`](Self::record_refund).
    pub fn record_payout(&mut self, amount: Decimal) -> Result<()> {
        self.release(amount, "payout")
    }

    /// What the house should hold according to recorded flows.
    #[must_use]
    pub fn expected_held(&self) -> Decimal {
        self.expected
    }

    #[must_use]
    pub fn movements(&self) -> u64 {
        self.movements
    }

    /// Check `held` against the recorded flows and against what is owed.
    ///
    /// # Errors
    /// Returns [`AuctionError::EscrowInvariantViolation`] on any mismatch.
    pub fn verify(
        &self,
        held: Decimal,
        owed_to_bidders: Decimal,
        owed_to_sellers: Decimal,
    ) -> Result<()> {
        if held != self.expected {
            return Err(AuctionError::EscrowInvariantViolation {
                reason: format!(
                    "held {held} != expected {} after {} movements",
                    self.expected, self.movements
                ),
            });
        }
        let owed = owed_to_bidders.checked_add(owed_to_sellers);
        if owed != Some(held) {
            return Err(AuctionError::EscrowInvariantViolation {
                reason: format!(
                    "held {held} != owed (bidders={owed_to_bidders}, sellers={owed_to_sellers})"
                ),
            });
        }
        Ok(())
    }

    fn release(&mut self, amount: Decimal, what: &str) -> Result<()> {
        if amount > self.expected {
            return Err(AuctionError::EscrowInvariantViolation {
                reason: format!("{what} of {amount} exceeds held {}", self.expected),
            });
        }
        self.expected -= amount;
        self.movements = self.movements.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_escrow_is_zero() {
        let ec = EscrowConservation::new();
        assert_eq!(ec.expected_held(), Decimal::ZERO);
        assert!(ec.verify(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO).is_ok());
    }

    #[test]
    fn outbid_keeps_funds_owed_to_bidder() {
        let mut ec = EscrowConservation::new();
        ec.record_escrow(Decimal::ONE).unwrap();
        ec.record_escrow(Decimal::new(2, 0)).unwrap();
        // first bidder is owed 1, seller is owed 2
        assert!(
            ec.verify(Decimal::new(3, 0), Decimal::ONE, Decimal::new(2, 0))
                .is_ok()
        );
    }

    #[test]
    fn refunds_and_payouts_reduce_expected() {
        let mut ec = EscrowConservation::new();
        ec.record_escrow(Decimal::new(10, 0)).unwrap();
        ec.record_escrow(Decimal::new(12, 0)).unwrap();
        ec.record_refund(Decimal::new(10, 0)).unwrap();
        ec.record_payout(Decimal::new(12, 0)).unwrap();
        assert_eq!(ec.expected_held(), Decimal::ZERO);
        assert_eq!(ec.movements(), 4);
        assert!(ec.verify(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO).is_ok());
    }

    #[test]
    fn lifetime_volume_beyond_decimal_range() {
        let mut ec = EscrowConservation::new();
        let big = Decimal::MAX;
        for _ in 0..3 {
            ec.record_escrow(big).unwrap();
            ec.record_refund(big).unwrap();
        }
        assert_eq!(ec.expected_held(), Decimal::ZERO);
    }

    #[test]
    fn overflowing_escrow_rejected_and_not_recorded() {
        let mut ec = EscrowConservation::new();
        ec.record_escrow(Decimal::MAX).unwrap();
        assert!(matches!(
            ec.check_escrow(Decimal::ONE),
            Err(AuctionError::EscrowInvariantViolation { .. })
        ));
        assert!(ec.record_escrow(Decimal::ONE).is_err());
        assert_eq!(ec.expected_held(), Decimal::MAX);
        assert_eq!(ec.movements(), 1);
    }

    #[test]
    fn release_beyond_held_rejected() {
        let mut ec = EscrowConservation::new();
        ec.record_escrow(Decimal::new(5, 0)).unwrap();
        assert!(ec.record_payout(Decimal::new(6, 0)).is_err());
        assert_eq!(ec.expected_held(), Decimal::new(5, 0));
    }

    #[test]
    fn unrecorded_flow_detected() {
        let mut ec = EscrowConservation::new();
        ec.record_escrow(Decimal::new(5, 0)).unwrap();
        let err = ec
            .verify(Decimal::new(4, 0), Decimal::ZERO, Decimal::new(4, 0))
            .unwrap_err();
        assert!(matches!(err, AuctionError::EscrowInvariantViolation { .. }));
    }

    #[test]
    fn silently_retained_funds_detected() {
        let mut ec = EscrowConservation::new();
        ec.record_escrow(Decimal::new(5, 0)).unwrap();
        ec.record_escrow(Decimal::new(6, 0)).unwrap();
        // the outbid 5 was never credited to the bidder
        let err = ec
            .verify(Decimal::new(11, 0), Decimal::ZERO, Decimal::new(6, 0))
            .unwrap_err();
        assert!(matches!(err, AuctionError::EscrowInvariantViolation { .. }));
    }
}
