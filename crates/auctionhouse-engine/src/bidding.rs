//! Bidding engine: accepts competing bids and applies the anti-snipe rule.
//!
//! A bid is checked against the record as it stands, then paid into
//! escrow, then committed. If payment fails nothing is committed.
//!
//! ## Anti-snipe
//!
//! When `end_time - now <= time_extension_window`, the end is reset to
//! `now + time_extension_increase`. Extensions reset the remaining time;
//! they do not stack. The end never moves backwards.

use auctionhouse_ledger::{FundsLedger, WithdrawalLedger};
use auctionhouse_types::{AccountId, AuctionError, AuctionId, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::registry::AuctionRegistry;

/// What an accepted bid changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidOutcome {
    pub auction_id: AuctionId,
    pub amount: Decimal,
    /// Highest bid before this one (zero if none).
    pub previous_bid: Decimal,
    /// Outbid bidder and the amount now withdrawable by them.
    pub refunded: Option<(AccountId, Decimal)>,
    /// `(old_end, new_end)` if the bid extended the auction.
    pub extended: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// Places bids on behalf of the house account that holds escrow.
pub struct BiddingEngine {
    house: AccountId,
}

impl BiddingEngine {
    #[must_use]
    pub fn new(house: AccountId) -> Self {
        Self { house }
    }

    /// Place a bid of `amount` by `bidder` on auction `id` at time `now`.
    ///
    /// # Errors
    /// - `AuctionNotFound` for an unknown id
    /// - `AuctionNotActive` before `start_time` or at/after `end_time`
    /// - `BidTooLow` below `min_price` (first bid) or below
    ///   `highest_bid + bid_increment`
    /// - `InsufficientFunds` if the bidder cannot pay the bid into escrow
    #[allow(clippy::too_many_arguments)]
    pub fn place_bid<L: FundsLedger>(
        &self,
        registry: &mut AuctionRegistry,
        funds: &mut L,
        withdrawals: &mut WithdrawalLedger,
        id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<BidOutcome> {
        let auction = registry.get_mut(id)?;

        if !auction.is_active_at(now) {
            tracing::warn!(
                auction = %id,
                bidder = %bidder,
                start = %auction.start_time,
                end = %auction.end_time,
                now = %now,
                "Bid rejected: auction not active"
            );
            return Err(AuctionError::AuctionNotActive);
        }

        let minimum = auction.minimum_next_bid();
        if amount < minimum {
            tracing::warn!(
                auction = %id,
                bidder = %bidder,
                offered = %amount,
                minimum = %minimum,
                "Bid rejected: too low"
            );
            return Err(AuctionError::BidTooLow {
                minimum,
                offered: amount,
            });
        }

        // Staged before any write. An end beyond the representable range is
        // capped at the latest instant.
        let extended = if auction.in_extension_window(now) {
            let proposed = now
                .checked_add_signed(auction.time_extension_increase)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            (proposed > auction.end_time).then_some((auction.end_time, proposed))
        } else {
            None
        };

        // Escrow the new bid first: if the bidder cannot pay, nothing below runs.
        funds.transfer(bidder, self.house, amount)?;

        let previous_bid = auction.highest_bid;
        let refunded = auction.highest_bidder.map(|prev| (prev, previous_bid));
        if let Some((prev, owed)) = refunded {
            withdrawals.credit(prev, owed);
        }

        auction.highest_bid = amount;
        auction.highest_bidder = Some(bidder);
        auction.bid_count = auction.bid_count.saturating_add(1);

        if let Some((_, new_end)) = extended {
            auction.end_time = new_end;
        }

        tracing::info!(
            auction = %id,
            bidder = %bidder,
            amount = %amount,
            previous_bid = %previous_bid,
            end = %auction.end_time,
            extended = extended.is_some(),
            "Bid accepted"
        );

        Ok(BidOutcome {
            auction_id: id,
            amount,
            previous_bid,
            refunded,
            extended,
        })
    }
}
