//! Native-currency funds ledger.
//!
//! Tracks one balance per account. Bids move funds from the bidder into
//! the house account; refunds and proceeds move them back out. All
//! mutations are atomic: either the full transfer succeeds or both
//! balances are unchanged.

use std::collections::HashMap;

use auctionhouse_types::{AccountId, AuctionError, Result};
use rust_decimal::Decimal;

/// Transfer primitive of an external funds ledger.
pub trait FundsLedger {
    /// Spendable balance of `account` (zero if unknown).
    fn balance(&self, account: AccountId) -> Decimal;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `from` cannot cover `amount`, or an
    /// error if `to`'s balance would overflow; nothing changes in either case.
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()>;
}

/// In-memory ledger keyed by account.
#[derive(Debug, Default)]
pub struct NativeLedger {
    balances: HashMap<AccountId, Decimal>,
}

impl NativeLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Mint funds into an account (increases its balance).
    ///
    /// # Errors
    /// Returns `Internal` if the balance would leave the representable range.
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        let credited = Self::credited(self.balance(account), amount)?;
        self.balances.insert(account, credited);
        Ok(())
    }

    fn credited(balance: Decimal, amount: Decimal) -> Result<Decimal> {
        balance
            .checked_add(amount)
            .ok_or_else(|| AuctionError::Internal(format!("balance overflow crediting {amount}")))
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }
}

impl FundsLedger for NativeLedger {
    fn balance(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() {
            return Err(AuctionError::Internal(format!(
                "negative transfer of {amount}"
            )));
        }
        let available = self.balance(from);
        if available < amount {
            return Err(AuctionError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        if amount.is_zero() || from == to {
            return Ok(());
        }

        let credited = Self::credited(self.balance(to), amount)?;
        self.balances.insert(from, available - amount);
        self.balances.insert(to, credited);
        Ok(())
    }
}
