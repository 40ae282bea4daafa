//! System-wide constants for the auction house.

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Shortest permitted auction (`end_time - start_time`), inclusive.
pub const DEFAULT_MIN_DURATION_SECS: i64 = SECONDS_PER_DAY;

/// Longest permitted auction (`end_time - start_time`), inclusive.
pub const DEFAULT_MAX_DURATION_SECS: i64 = 60 * SECONDS_PER_DAY;

/// Domain separator for audit receipt hashes.
pub const RECEIPT_DOMAIN: &[u8] = b"auctionhouse:receipt:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "AuctionHouse";
