//! Audit trail types.
//!
//! Every committed state change produces an [`AuctionEvent`], wrapped in a
//! hash-chained [`AuctionReceipt`] so the history of an auction can be
//! replayed and independently checked.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetRef, AuctionId};

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    /// Asset taken into custody and the record stored.
    AuctionCreated {
        auction_id: AuctionId,
        seller: AccountId,
        asset: AssetRef,
        min_price: Decimal,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    /// A bid became the highest bid.
    BidPlaced {
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
        previous_bid: Decimal,
    },
    /// A bid inside the extension window moved the end time.
    AuctionExtended {
        auction_id: AuctionId,
        old_end_time: DateTime<Utc>,
        new_end_time: DateTime<Utc>,
    },
    /// An outbid bidder's escrow became withdrawable.
    RefundCredited {
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
    },
    /// A pull-based refund was paid out.
    FundsWithdrawn { account: AccountId, amount: Decimal },
    /// The asset left custody.
    AssetClaimed {
        auction_id: AuctionId,
        recipient: AccountId,
        caller: AccountId,
    },
    /// The winning bid (possibly zero) was paid to the seller.
    ProceedsClaimed {
        auction_id: AuctionId,
        seller: AccountId,
        amount: Decimal,
        caller: AccountId,
    },
}

impl AuctionEvent {
    /// Stable name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuctionCreated { .. } => "AUCTION_CREATED",
            Self::BidPlaced { .. } => "BID_PLACED",
            Self::AuctionExtended { .. } => "AUCTION_EXTENDED",
            Self::RefundCredited { .. } => "REFUND_CREDITED",
            Self::FundsWithdrawn { .. } => "FUNDS_WITHDRAWN",
            Self::AssetClaimed { .. } => "ASSET_CLAIMED",
            Self::ProceedsClaimed { .. } => "PROCEEDS_CLAIMED",
        }
    }

    /// The auction this event concerns, if any.
    #[must_use]
    pub fn auction_id(&self) -> Option<AuctionId> {
        match self {
            Self::AuctionCreated { auction_id, .. }
            | Self::BidPlaced { auction_id, .. }
            | Self::AuctionExtended { auction_id, .. }
            | Self::RefundCredited { auction_id, .. }
            | Self::AssetClaimed { auction_id, .. }
            | Self::ProceedsClaimed { auction_id, .. } => Some(*auction_id),
            Self::FundsWithdrawn { .. } => None,
        }
    }

    /// Canonical bytes committed to by the receipt hash.
    ///
    /// Format: `kind || fields in declaration order`, with ids as raw bytes,
    /// amounts as decimal strings and timestamps as little-endian millis.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(self.kind().as_bytes());
        match self {
            Self::AuctionCreated {
                auction_id,
                seller,
                asset,
                min_price,
                start_time,
                end_time,
            } => {
                payload.extend_from_slice(&auction_id.0.to_le_bytes());
                payload.extend_from_slice(seller.0.as_bytes());
                payload.extend_from_slice(asset.collection.0.as_bytes());
                payload.extend_from_slice(&asset.token_id.0.to_le_bytes());
                payload.extend_from_slice(min_price.to_string().as_bytes());
                payload.extend_from_slice(&start_time.timestamp_millis().to_le_bytes());
                payload.extend_from_slice(&end_time.timestamp_millis().to_le_bytes());
            }
            Self::BidPlaced {
                auction_id,
                bidder,
                amount,
                previous_bid,
            } => {
                payload.extend_from_slice(&auction_id.0.to_le_bytes());
                payload.extend_from_slice(bidder.0.as_bytes());
                payload.extend_from_slice(amount.to_string().as_bytes());
                payload.extend_from_slice(previous_bid.to_string().as_bytes());
            }
            Self::AuctionExtended {
                auction_id,
                old_end_time,
                new_end_time,
            } => {
                payload.extend_from_slice(&auction_id.0.to_le_bytes());
                payload.extend_from_slice(&old_end_time.timestamp_millis().to_le_bytes());
                payload.extend_from_slice(&new_end_time.timestamp_millis().to_le_bytes());
            }
            Self::RefundCredited {
                auction_id,
                bidder,
                amount,
            } => {
                payload.extend_from_slice(&auction_id.0.to_le_bytes());
                payload.extend_from_slice(bidder.0.as_bytes());
                payload.extend_from_slice(amount.to_string().as_bytes());
            }
            Self::FundsWithdrawn { account, amount } => {
                payload.extend_from_slice(account.0.as_bytes());
                payload.extend_from_slice(amount.to_string().as_bytes());
            }
            Self::AssetClaimed {
                auction_id,
                recipient,
                caller,
            } => {
                payload.extend_from_slice(&auction_id.0.to_le_bytes());
                payload.extend_from_slice(recipient.0.as_bytes());
                payload.extend_from_slice(caller.0.as_bytes());
            }
            Self::ProceedsClaimed {
                auction_id,
                seller,
                amount,
                caller,
            } => {
                payload.extend_from_slice(&auction_id.0.to_le_bytes());
                payload.extend_from_slice(seller.0.as_bytes());
                payload.extend_from_slice(amount.to_string().as_bytes());
                payload.extend_from_slice(caller.0.as_bytes());
            }
        }
        payload
    }
}

impl std::fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// One link in the append-only audit chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionReceipt {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    pub event: AuctionEvent,
    /// Engine time at which the event was committed.
    pub recorded_at: DateTime<Utc>,
    /// `payload_hash` of the previous receipt (all zeros for the first).
    pub prev_hash: [u8; 32],
    /// SHA-256 over domain, sequence, `prev_hash` and the event payload.
    pub payload_hash: [u8; 32],
}

impl AuctionReceipt {
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.payload_hash)
    }
}
