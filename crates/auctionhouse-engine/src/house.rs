//! The auction house: single entry point for every operation.
//!
//! All mutations go through `&mut self`, so operations are applied one
//! at a time in call order. Each operation reads the clock once, stages
//! every fallible step before its first write, and appends one or more
//! receipts to the audit log only after it has fully committed.

use auctionhouse_custody::{AssetCustody, AssetRegistry};
use auctionhouse_ledger::{EscrowConservation, FundsLedger, WithdrawalLedger};
use auctionhouse_types::{
    AccountId, Auction, AuctionError, AuctionEvent, AuctionId, AuctionParams, AuctionPolicy,
    Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::audit::AuditLog;
use crate::bidding::BiddingEngine;
use crate::clock::Clock;
use crate::registry::AuctionRegistry;
use crate::settlement::SettlementEngine;

/// Settlement engine for timed English auctions over escrowed assets.
///
/// Generic over its collaborators: the external asset registry `A`, the
/// native funds ledger `L` and the time source `C`.
pub struct AuctionHouse<A, L, C> {
    /// The account that holds escrowed assets and funds.
    account: AccountId,
    assets: A,
    funds: L,
    clock: C,
    /// Latest instant any operation has observed.
    last_seen: Option<DateTime<Utc>>,
    custody: AssetCustody,
    registry: AuctionRegistry,
    bidding: BiddingEngine,
    settlement: SettlementEngine,
    withdrawals: WithdrawalLedger,
    conservation: EscrowConservation,
    audit: AuditLog,
}

impl<A: AssetRegistry, L: FundsLedger, C: Clock> AuctionHouse<A, L, C> {
    /// Create a house with a fresh account identity.
    ///
    /// # Errors
    /// Returns `Configuration` if `policy` is invalid.
    pub fn new(policy: AuctionPolicy, assets: A, funds: L, clock: C) -> Result<Self> {
        Self::with_account(AccountId::new(), policy, assets, funds, clock)
    }

    /// Create a house operating as `account`.
    ///
    /// # Errors
    /// Returns `Configuration` if `policy` is invalid.
    pub fn with_account(
        account: AccountId,
        policy: AuctionPolicy,
        assets: A,
        funds: L,
        clock: C,
    ) -> Result<Self> {
        policy.validate()?;
        let custody = AssetCustody::new(account);
        tracing::info!(
            account = %account,
            min_duration_secs = policy.min_duration_secs,
            max_duration_secs = policy.max_duration_secs,
            "Auction house started"
        );
        Ok(Self {
            account,
            assets,
            funds,
            clock,
            last_seen: None,
            custody,
            registry: AuctionRegistry::new(policy),
            bidding: BiddingEngine::new(account),
            settlement: SettlementEngine::new(custody),
            withdrawals: WithdrawalLedger::new(),
            conservation: EscrowConservation::new(),
            audit: AuditLog::new(),
        })
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// List an asset. The seller must have approved [`account`](Self::account)
    /// on the asset registry; the asset moves into custody immediately.
    pub fn create_auction(&mut self, seller: AccountId, params: &AuctionParams) -> Result<AuctionId> {
        let now = self.now();
        let id = self
            .registry
            .create(&self.custody, &mut self.assets, seller, params, now)?;

        self.audit.record(
            AuctionEvent::AuctionCreated {
                auction_id: id,
                seller,
                asset: params.asset,
                min_price: params.min_price,
                start_time: params.start_time,
                end_time: params.end_time,
            },
            now,
        );
        Ok(id)
    }

    /// Bid `amount` on auction `id`. The amount is paid into escrow; any
    /// outbid bidder's escrow becomes withdrawable.
    pub fn bid(&mut self, id: AuctionId, bidder: AccountId, amount: Decimal) -> Result<()> {
        let now = self.now();
        self.conservation.check_escrow(amount)?;
        let outcome = self.bidding.place_bid(
            &mut self.registry,
            &mut self.funds,
            &mut self.withdrawals,
            id,
            bidder,
            amount,
            now,
        )?;
        // Cannot fail: checked above against the same state.
        self.conservation.record_escrow(amount)?;

        self.audit.record(
            AuctionEvent::BidPlaced {
                auction_id: id,
                bidder,
                amount,
                previous_bid: outcome.previous_bid,
            },
            now,
        );
        if let Some((prev, owed)) = outcome.refunded {
            tracing::info!(auction = %id, bidder = %prev, amount = %owed, "Refund credited");
            self.audit.record(
                AuctionEvent::RefundCredited {
                    auction_id: id,
                    bidder: prev,
                    amount: owed,
                },
                now,
            );
        }
        if let Some((old_end_time, new_end_time)) = outcome.extended {
            tracing::info!(
                auction = %id,
                old_end = %old_end_time,
                new_end = %new_end_time,
                "Auction extended"
            );
            self.audit.record(
                AuctionEvent::AuctionExtended {
                    auction_id: id,
                    old_end_time,
                    new_end_time,
                },
                now,
            );
        }
        Ok(())
    }

    /// Pay out everything owed to `caller` from outbid escrow.
    ///
    /// # Errors
    /// - `NothingToWithdraw` if nothing is owed
    /// - any ledger error from the payout, in which case the balance stays
    ///   withdrawable
    pub fn withdraw(&mut self, caller: AccountId) -> Result<Decimal> {
        let now = self.now();
        let amount = self.withdrawals.take(caller)?;
        if let Err(err) = self.funds.transfer(self.account, caller, amount) {
            self.withdrawals.restore(caller, amount);
            tracing::warn!(account = %caller, amount = %amount, error = %err, "Withdrawal failed");
            return Err(err);
        }
        self.conservation.record_refund(amount)?;

        tracing::info!(account = %caller, amount = %amount, "Funds withdrawn");
        self.audit.record(
            AuctionEvent::FundsWithdrawn {
                account: caller,
                amount,
            },
            now,
        );
        Ok(amount)
    }

    /// Release the asset of an ended auction to its winner, or back to the
    /// seller if unsold. Returns the recipient.
    pub fn claim_asset(&mut self, id: AuctionId, caller: AccountId) -> Result<AccountId> {
        let now = self.now();
        let recipient =
            self.settlement
                .claim_asset(&mut self.registry, &mut self.assets, id, caller, now)?;
        self.audit.record(
            AuctionEvent::AssetClaimed {
                auction_id: id,
                recipient,
                caller,
            },
            now,
        );
        Ok(recipient)
    }

    /// Pay the winning bid of an ended auction (zero if unsold) to its
    /// seller. Returns the amount paid.
    pub fn claim_proceeds(&mut self, id: AuctionId, caller: AccountId) -> Result<Decimal> {
        let now = self.now();
        let amount =
            self.settlement
                .claim_proceeds(&mut self.registry, &mut self.funds, id, caller, now)?;
        self.conservation.record_payout(amount)?;

        let seller = self.registry.get(id)?.seller;
        self.audit.record(
            AuctionEvent::ProceedsClaimed {
                auction_id: id,
                seller,
                amount,
                caller,
            },
            now,
        );
        Ok(amount)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn auction(&self, id: AuctionId) -> Result<&Auction> {
        self.registry.get(id)
    }

    pub fn auctions(&self) -> impl Iterator<Item = &Auction> {
        self.registry.iter()
    }

    #[must_use]
    pub fn auction_count(&self) -> usize {
        self.registry.len()
    }

    /// `(highest_bid, highest_bidder)` of auction `id`.
    pub fn highest_bid(&self, id: AuctionId) -> Result<(Decimal, Option<AccountId>)> {
        let auction = self.registry.get(id)?;
        Ok((auction.highest_bid, auction.highest_bidder))
    }

    /// `(nft_claimed, reward_claimed)` of auction `id`.
    pub fn claimed_flags(&self, id: AuctionId) -> Result<(bool, bool)> {
        let auction = self.registry.get(id)?;
        Ok((auction.nft_claimed, auction.reward_claimed))
    }

    /// Outbid escrow `account` can currently pull.
    #[must_use]
    pub fn withdrawable(&self, account: AccountId) -> Decimal {
        self.withdrawals.withdrawable(account)
    }

    /// Check that the house holds exactly what it owes bidders and sellers.
    pub fn verify_escrow(&self) -> Result<()> {
        let held = self.funds.balance(self.account);
        let owed_to_sellers = self
            .registry
            .iter()
            .map(Auction::unclaimed_proceeds)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .ok_or_else(|| AuctionError::EscrowInvariantViolation {
                reason: "owed to sellers exceeds representable range".into(),
            })?;
        self.conservation
            .verify(held, self.withdrawals.total_owed(), owed_to_sellers)
    }

    #[must_use]
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }

    #[must_use]
    pub fn policy(&self) -> &AuctionPolicy {
        self.registry.policy()
    }

    // -----------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Direct registry access for fixtures (minting, approvals). Bypasses
    /// custody, so it only exists with `test-helpers`.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub fn funds(&self) -> &L {
        &self.funds
    }

    /// Direct ledger access for fixtures (funding accounts). Bypasses
    /// escrow, so it only exists with `test-helpers`.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn funds_mut(&mut self) -> &mut L {
        &mut self.funds
    }

    /// Read the clock once, never going backwards.
    fn now(&mut self) -> DateTime<Utc> {
        let reading = self.clock.now();
        let now = match self.last_seen {
            Some(last) if reading < last => {
                tracing::warn!(
                    reading = %reading,
                    last_seen = %last,
                    "Clock moved backwards; using last observed time"
                );
                last
            }
            _ => reading,
        };
        self.last_seen = Some(now);
        now
    }
}
