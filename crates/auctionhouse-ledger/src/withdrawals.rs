//! Pull-based withdrawal ledger.
//!
//! When a bidder is outbid, the house does not push their escrow back.
//! It credits the amount here and the bidder pulls it later with an
//! explicit withdrawal. A recipient that cannot receive funds therefore
//! never blocks bidding or settlement for anyone else.

use std::collections::HashMap;

use auctionhouse_types::{AccountId, AuctionError, Result};
use rust_decimal::Decimal;

/// Amounts the house owes each account, payable on request.
#[derive(Debug, Default)]
pub struct WithdrawalLedger {
    owed: HashMap<AccountId, Decimal>,
}

impl WithdrawalLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            owed: HashMap::new(),
        }
    }

    /// Add `amount` to what `account` may withdraw.
    pub fn credit(&mut self, account: AccountId, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        *self.owed.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Restore a balance removed by [`take`](Self::take) whose payout failed.
    pub fn restore(&mut self, account: AccountId, amount: Decimal) {
        self.credit(account, amount);
    }

    /// What `account` may currently withdraw.
    #[must_use]
    pub fn withdrawable(&self, account: AccountId) -> Decimal {
        self.owed.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Remove and return the full balance owed to `account`.
    ///
    /// # Errors
    /// Returns `NothingToWithdraw` if nothing is owed.
    pub fn take(&mut self, account: AccountId) -> Result<Decimal> {
        match self.owed.remove(&account) {
            Some(amount) if !amount.is_zero() => Ok(amount),
            _ => Err(AuctionError::NothingToWithdraw),
        }
    }

    /// Sum owed across all accounts.
    #[must_use]
    pub fn total_owed(&self) -> Decimal {
        self.owed.values().copied().sum()
    }

    /// Number of accounts with a pending balance.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_accumulate() {
        let mut wl = WithdrawalLedger::new();
        let bidder = AccountId::new();
        wl.credit(bidder, Decimal::ONE);
        wl.credit(bidder, Decimal::new(2, 0));
        assert_eq!(wl.withdrawable(bidder), Decimal::new(3, 0));
        assert_eq!(wl.total_owed(), Decimal::new(3, 0));
    }

    #[test]
    fn take_zeroes_balance() {
        let mut wl = WithdrawalLedger::new();
        let bidder = AccountId::new();
        wl.credit(bidder, Decimal::new(5, 0));
        assert_eq!(wl.take(bidder).unwrap(), Decimal::new(5, 0));
        assert_eq!(wl.withdrawable(bidder), Decimal::ZERO);
        assert!(wl.is_empty());
    }

    #[test]
    fn take_with_nothing_owed_fails() {
        let mut wl = WithdrawalLedger::new();
        let err = wl.take(AccountId::new()).unwrap_err();
        assert!(matches!(err, AuctionError::NothingToWithdraw));
    }

    #[test]
    fn zero_credit_creates_no_entry() {
        let mut wl = WithdrawalLedger::new();
        wl.credit(AccountId::new(), Decimal::ZERO);
        assert_eq!(wl.len(), 0);
    }

    #[test]
    fn restore_puts_balance_back() {
        let mut wl = WithdrawalLedger::new();
        let bidder = AccountId::new();
        wl.credit(bidder, Decimal::TEN);
        let amount = wl.take(bidder).unwrap();
        wl.restore(bidder, amount);
        assert_eq!(wl.withdrawable(bidder), Decimal::TEN);
    }
}
