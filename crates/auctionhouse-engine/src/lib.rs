//! # auctionhouse-engine
//!
//! Timed English auctions over escrowed non-fungible assets.
//!
//! ## Architecture
//!
//! 1. **AuctionRegistry**: validates listings, takes the asset into
//!    custody, allocates sequential ids, owns every record
//! 2. **BiddingEngine**: minimum-increment and timing rules, escrow of the
//!    new bid, pull-based credit for the outbid bidder, anti-snipe extension
//! 3. **SettlementEngine**: one-shot asset and proceeds claims after the end
//! 4. **AuctionHouse**: serializes all of the above behind one `&mut self`,
//!    reads the clock, checks escrow conservation, keeps the audit log
//!
//! ## Flow
//!
//! ```text
//! create ──▶ bid* ──▶ (end_time) ──▶ claim_asset
//!                                └──▶ claim_proceeds
//! outbid bidders ──▶ withdraw (any time)
//! ```

pub mod audit;
pub mod bidding;
pub mod clock;
pub mod house;
pub mod registry;
pub mod settlement;

pub use audit::AuditLog;
pub use bidding::{BidOutcome, BiddingEngine};
pub use clock::{Clock, ManualClock, SystemClock};
pub use house::AuctionHouse;
pub use registry::AuctionRegistry;
pub use settlement::SettlementEngine;
