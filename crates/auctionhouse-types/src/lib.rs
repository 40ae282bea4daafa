//! # auctionhouse-types
//!
//! Shared types, errors, and configuration for the **AuctionHouse**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`CollectionId`], [`TokenId`], [`AssetRef`], [`AuctionId`]
//! - **Auction model**: [`Auction`], [`AuctionParams`]
//! - **Audit trail**: [`AuctionEvent`], [`AuctionReceipt`]
//! - **Configuration**: [`AuctionPolicy`]
//! - **Errors**: [`AuctionError`] with `AH_ERR_` prefix codes
//! - **Constants**: duration bounds and defaults

pub mod auction;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use auctionhouse_types::{Auction, AuctionId, AccountId, ...};

pub use auction::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use receipt::*;

// Constants are accessed via `auctionhouse_types::constants::FOO`
// (not re-exported to avoid name collisions).
