//! Error types for the auction house.
//!
//! All errors use the `AH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Auction creation errors
//! - 2xx: Bidding errors
//! - 3xx: Settlement errors
//! - 4xx: Custody errors
//! - 5xx: Funds errors
//! - 9xx: General / internal errors

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AuctionId;

/// Which side of the permitted duration window an end time violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationBound {
    TooLow,
    TooHigh,
}

impl fmt::Display for DurationBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLow => write!(f, "Too low"),
            Self::TooHigh => write!(f, "Too high"),
        }
    }
}

/// Which one-shot settlement step was already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    Asset,
    Proceeds,
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "ASSET"),
            Self::Proceeds => write!(f, "PROCEEDS"),
        }
    }
}

/// Central error enum for all auction house operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Creation Errors (1xx)
    // =================================================================
    /// A numeric creation parameter was zero.
    #[error("AH_ERR_100: Creation parameter cannot be zero")]
    CannotBeZero,

    /// The start time is not strictly in the future.
    #[error("AH_ERR_101: Invalid start time")]
    InvalidStartTime,

    /// `end_time - start_time` is outside the permitted window.
    #[error("AH_ERR_102: Invalid end time: {0}")]
    InvalidEndTime(DurationBound),

    // =================================================================
    // Bidding Errors (2xx)
    // =================================================================
    /// No auction exists with this id.
    #[error("AH_ERR_200: Auction not found: {0}")]
    AuctionNotFound(AuctionId),

    /// The auction has not started yet or has already ended.
    #[error("AH_ERR_201: Auction not active")]
    AuctionNotActive,

    /// The offered amount does not clear the minimum next bid.
    #[error("AH_ERR_202: Bid too low: minimum {minimum}, offered {offered}")]
    BidTooLow { minimum: Decimal, offered: Decimal },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// The asset or the proceeds were already claimed.
    #[error("AH_ERR_300: Already claimed: {what}")]
    AlreadyClaimed { what: ClaimKind },

    /// Settlement attempted before the auction's end time.
    #[error("AH_ERR_301: Auction has not ended, ends at {ends_at}")]
    AuctionNotEnded { ends_at: DateTime<Utc> },

    // =================================================================
    // Custody Errors (4xx)
    // =================================================================
    /// The external asset registry refused the transfer.
    #[error("AH_ERR_400: Asset transfer rejected: {reason}")]
    AssetTransferRejected { reason: String },

    // =================================================================
    // Funds Errors (5xx)
    // =================================================================
    /// Not enough funds to perform the transfer.
    #[error("AH_ERR_500: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// A withdrawal was requested with nothing owed.
    #[error("AH_ERR_501: Nothing to withdraw")]
    NothingToWithdraw,

    /// Escrow held by the house no longer matches what it owes.
    #[error("AH_ERR_502: Escrow invariant violation: {reason}")]
    EscrowInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("AH_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("AH_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid policy, missing fields, etc.).
    #[error("AH_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
