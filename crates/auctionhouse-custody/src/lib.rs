//! # auctionhouse-custody
//!
//! Escrow of non-fungible assets for the lifetime of an auction.
//!
//! - **AssetRegistry**: the ownership/approval contract of an external
//!   asset registry (`owner_of`, `approve`, `transfer_from`)
//! - **InMemoryAssetRegistry**: a single-process implementation of it
//! - **AssetCustody**: moves a listed asset into the house at creation and
//!   out to the winner (or back to the seller) at settlement
//!
//! ```text
//! seller ──approve(house)──▶ registry
//! AuctionRegistry.create ──▶ AssetCustody.take    (seller → house)
//! SettlementEngine.claim ──▶ AssetCustody.release (house → winner | seller)
//! ```

pub mod custody;
pub mod registry;

pub use custody::AssetCustody;
pub use registry::{AssetRegistry, InMemoryAssetRegistry};
