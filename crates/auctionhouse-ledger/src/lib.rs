//! # auctionhouse-ledger
//!
//! Funds side of the auction house.
//!
//! 1. **FundsLedger**: transfer contract of the external native-currency
//!    ledger; [`NativeLedger`] is the in-memory implementation
//! 2. **WithdrawalLedger**: pull-based refunds owed to outbid bidders
//! 3. **EscrowConservation**: checks the house balance against recorded
//!    flows and outstanding obligations
//!
//! ## Funds Flow
//!
//! ```text
//! bid      : bidder ──transfer──▶ house
//! outbid   : WithdrawalLedger.credit(previous bidder)
//! withdraw : house ──transfer──▶ bidder
//! proceeds : house ──transfer──▶ seller
//! ```

pub mod conservation;
pub mod funds;
pub mod withdrawals;

pub use conservation::EscrowConservation;
pub use funds::{FundsLedger, NativeLedger};
pub use withdrawals::WithdrawalLedger;
