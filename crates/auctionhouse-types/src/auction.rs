//! The auction record.
//!
//! An [`Auction`] is created once by the registry, mutated only by bidding
//! and settlement, and never removed: settled auctions stay queryable for
//! audit.
//!
//! ## Lifecycle
//!
//! ```text
//!   created ──▶ pending ──(start_time)──▶ active ──(end_time)──▶ ended
//!                                          │  ▲                    │
//!                                          └──┘ bid (may extend)   ├─ claim asset    (once)
//!                                                                  └─ claim proceeds (once)
//! ```

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetRef, AuctionId};

/// Creation inputs for a new auction. The seller is supplied separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionParams {
    /// The asset to escrow.
    pub asset: AssetRef,
    /// Smallest acceptable opening bid.
    pub min_price: Decimal,
    /// Bidding opens at this instant (inclusive).
    pub start_time: DateTime<Utc>,
    /// Bidding closes at this instant (exclusive).
    pub end_time: DateTime<Utc>,
    /// Minimum amount a new bid must add over the current highest bid.
    pub bid_increment: Decimal,
    /// Trailing window before `end_time` in which a bid extends the auction.
    #[serde(with = "duration_secs")]
    pub time_extension_window: Duration,
    /// How far past the bid's timestamp the end is pushed when extended.
    #[serde(with = "duration_secs")]
    pub time_extension_increase: Duration,
}

impl AuctionParams {
    /// Requested duration (`end_time - start_time`).
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// A timed English auction over one escrowed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub seller: AccountId,
    pub asset: AssetRef,
    pub min_price: Decimal,
    pub start_time: DateTime<Utc>,
    /// Current end; moved forward by anti-snipe extensions.
    pub end_time: DateTime<Utc>,
    pub bid_increment: Decimal,
    #[serde(with = "duration_secs")]
    pub time_extension_window: Duration,
    #[serde(with = "duration_secs")]
    pub time_extension_increase: Duration,
    /// Zero until the first accepted bid.
    pub highest_bid: Decimal,
    pub highest_bidder: Option<AccountId>,
    /// Number of accepted bids.
    pub bid_count: u32,
    pub nft_claimed: bool,
    pub reward_claimed: bool,
    pub created_at: DateTime<Utc>,
}

impl Auction {
    /// Build a fresh record: no bids, nothing claimed.
    #[must_use]
    pub fn from_params(
        id: AuctionId,
        seller: AccountId,
        params: &AuctionParams,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            seller,
            asset: params.asset,
            min_price: params.min_price,
            start_time: params.start_time,
            end_time: params.end_time,
            bid_increment: params.bid_increment,
            time_extension_window: params.time_extension_window,
            time_extension_increase: params.time_extension_increase,
            highest_bid: Decimal::ZERO,
            highest_bidder: None,
            bid_count: 0,
            nft_claimed: false,
            reward_claimed: false,
            created_at,
        }
    }

    /// Current duration, including any extensions.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Bids are accepted in `[start_time, end_time)`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now < self.end_time
    }

    #[must_use]
    pub fn has_ended_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }

    /// Smallest amount the next bid must offer.
    #[must_use]
    pub fn minimum_next_bid(&self) -> Decimal {
        match self.highest_bidder {
            None => self.min_price,
            Some(_) => self.highest_bid.saturating_add(self.bid_increment),
        }
    }

    /// Whether a bid landing at `now` falls inside the anti-snipe window.
    #[must_use]
    pub fn in_extension_window(&self, now: DateTime<Utc>) -> bool {
        self.end_time - now <= self.time_extension_window
    }

    /// Who receives the asset on claim: the winner, or the seller if unsold.
    #[must_use]
    pub fn asset_recipient(&self) -> AccountId {
        self.highest_bidder.unwrap_or(self.seller)
    }

    /// Funds the house still holds on behalf of this auction's seller.
    #[must_use]
    pub fn unclaimed_proceeds(&self) -> Decimal {
        if self.reward_claimed {
            Decimal::ZERO
        } else {
            self.highest_bid
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.nft_claimed && self.reward_claimed
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl AuctionParams {
    /// Sixty-day auction with unit price, increment and extension settings.
    pub fn sample(asset: AssetRef, start_time: DateTime<Utc>) -> Self {
        Self {
            asset,
            min_price: Decimal::ONE,
            start_time,
            end_time: start_time + Duration::days(60),
            bid_increment: Decimal::ONE,
            time_extension_window: Duration::seconds(1),
            time_extension_increase: Duration::seconds(1),
        }
    }
}

/// Serde adapter storing a [`Duration`] as whole seconds.
pub mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("duration out of range: {secs}s")))
    }
}
