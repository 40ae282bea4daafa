//! Auction registry: validates listings and owns every auction record.
//!
//! Creation checks run in a fixed order and the first failure wins:
//! 1. any of `min_price`, `bid_increment`, `time_extension_window`,
//!    `time_extension_increase` is zero → `CannotBeZero`
//! 2. `start_time <= now` → `InvalidStartTime`
//! 3. duration below the policy minimum → `InvalidEndTime(TooLow)`
//! 4. duration above the policy maximum → `InvalidEndTime(TooHigh)`
//!
//! Only then is the asset taken into custody and an id allocated.

use std::collections::BTreeMap;

use auctionhouse_custody::{AssetCustody, AssetRegistry};
use auctionhouse_types::{
    AccountId, Auction, AuctionError, AuctionId, AuctionParams, AuctionPolicy, DurationBound,
    Result,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// Keyed store of auctions, with sequential id allocation.
pub struct AuctionRegistry {
    /// Every auction ever created, by id. Records are never removed.
    auctions: BTreeMap<AuctionId, Auction>,
    /// Id the next successful creation receives.
    next_id: AuctionId,
    policy: AuctionPolicy,
}

impl AuctionRegistry {
    #[must_use]
    pub fn new(policy: AuctionPolicy) -> Self {
        Self {
            auctions: BTreeMap::new(),
            next_id: AuctionId(0),
            policy,
        }
    }

    /// Run the creation checks without touching any state.
    pub fn validate(&self, params: &AuctionParams, now: DateTime<Utc>) -> Result<()> {
        // Unsigned on the wire; a non-positive value is treated as zero.
        if params.min_price <= Decimal::ZERO
            || params.bid_increment <= Decimal::ZERO
            || params.time_extension_window <= Duration::zero()
            || params.time_extension_increase <= Duration::zero()
        {
            return Err(AuctionError::CannotBeZero);
        }

        if params.start_time <= now {
            return Err(AuctionError::InvalidStartTime);
        }

        let duration = params.duration();
        if duration < self.policy.min_duration() {
            return Err(AuctionError::InvalidEndTime(DurationBound::TooLow));
        }
        if duration > self.policy.max_duration() {
            return Err(AuctionError::InvalidEndTime(DurationBound::TooHigh));
        }
        Ok(())
    }

    /// Validate, take the asset into custody, and store a new auction.
    ///
    /// # Errors
    /// - the validation errors listed in the module docs
    /// - `AssetTransferRejected` if the seller has not approved the custodian
    ///
    /// On error nothing changes: no id is consumed and the asset stays put.
    pub fn create<R: AssetRegistry>(
        &mut self,
        custody: &AssetCustody,
        assets: &mut R,
        seller: AccountId,
        params: &AuctionParams,
        now: DateTime<Utc>,
    ) -> Result<AuctionId> {
        if let Err(err) = self.validate(params, now) {
            tracing::debug!(
                seller = %seller,
                asset = %params.asset,
                error = %err,
                "Auction rejected"
            );
            return Err(err);
        }
        custody.take(assets, seller, &params.asset)?;

        let id = self.next_id;
        self.next_id = id.next();
        self.auctions
            .insert(id, Auction::from_params(id, seller, params, now));

        tracing::info!(
            auction = %id,
            seller = %seller,
            asset = %params.asset,
            min_price = %params.min_price,
            start = %params.start_time,
            end = %params.end_time,
            "Auction created"
        );
        Ok(id)
    }

    /// Look up an auction.
    ///
    /// # Errors
    /// Returns `AuctionNotFound` for an unknown id.
    pub fn get(&self, id: AuctionId) -> Result<&Auction> {
        self.auctions.get(&id).ok_or(AuctionError::AuctionNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: AuctionId) -> Result<&mut Auction> {
        self.auctions
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound(id))
    }

    /// All auctions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }

    #[must_use]
    pub fn policy(&self) -> &AuctionPolicy {
        &self.policy
    }
}
