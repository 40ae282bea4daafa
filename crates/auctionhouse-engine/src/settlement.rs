//! Settlement of concluded auctions.
//!
//! Two independent one-shot claims, each allowed once `now >= end_time`:
//! 1. **Asset**: custody releases the asset to the highest bidder, or back
//!    to the seller if nobody bid
//! 2. **Proceeds**: the escrowed winning bid (zero if none) goes to the seller
//!
//! Either may run first. Anyone may trigger either one; the recipient is
//! fixed by the auction record, not by the caller.

use auctionhouse_custody::{AssetCustody, AssetRegistry};
use auctionhouse_ledger::FundsLedger;
use auctionhouse_types::{AccountId, Auction, AuctionError, AuctionId, ClaimKind, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::registry::AuctionRegistry;

/// Executes the asset and proceeds claims against the house's holdings.
pub struct SettlementEngine {
    custody: AssetCustody,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(custody: AssetCustody) -> Self {
        Self { custody }
    }

    /// Release the asset of auction `id`. Returns the recipient.
    ///
    /// # Errors
    /// - `AuctionNotFound` for an unknown id
    /// - `AuctionNotEnded` before `end_time`
    /// - `AlreadyClaimed` on the second call
    /// - `AssetTransferRejected` if the registry refuses the release
    pub fn claim_asset<R: AssetRegistry>(
        &self,
        registry: &mut AuctionRegistry,
        assets: &mut R,
        id: AuctionId,
        caller: AccountId,
        now: DateTime<Utc>,
    ) -> Result<AccountId> {
        let auction = registry.get_mut(id)?;
        Self::check_claimable(auction, now, auction.nft_claimed, ClaimKind::Asset)?;

        let recipient = auction.asset_recipient();
        self.custody.release(assets, recipient, &auction.asset)?;
        auction.nft_claimed = true;

        tracing::info!(
            auction = %id,
            recipient = %recipient,
            caller = %caller,
            sold = auction.highest_bidder.is_some(),
            "Asset claimed"
        );
        Ok(recipient)
    }

    /// Pay the winning bid of auction `id` to its seller. Returns the amount.
    ///
    /// # Errors
    /// - `AuctionNotFound` for an unknown id
    /// - `AuctionNotEnded` before `end_time`
    /// - `AlreadyClaimed` on the second call
    /// - `InsufficientFunds` if the house no longer holds the escrow
    pub fn claim_proceeds<L: FundsLedger>(
        &self,
        registry: &mut AuctionRegistry,
        funds: &mut L,
        id: AuctionId,
        caller: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        let auction = registry.get_mut(id)?;
        Self::check_claimable(auction, now, auction.reward_claimed, ClaimKind::Proceeds)?;

        let amount = auction.highest_bid;
        funds.transfer(self.custody.custodian(), auction.seller, amount)?;
        auction.reward_claimed = true;

        tracing::info!(
            auction = %id,
            seller = %auction.seller,
            amount = %amount,
            caller = %caller,
            "Proceeds claimed"
        );
        Ok(amount)
    }

    fn check_claimable(
        auction: &Auction,
        now: DateTime<Utc>,
        already: bool,
        what: ClaimKind,
    ) -> Result<()> {
        if !auction.has_ended_at(now) {
            return Err(AuctionError::AuctionNotEnded {
                ends_at: auction.end_time,
            });
        }
        if already {
            return Err(AuctionError::AlreadyClaimed { what });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use auctionhouse_custody::InMemoryAssetRegistry;
    use auctionhouse_ledger::NativeLedger;
    use auctionhouse_types::{AssetRef, AuctionParams, AuctionPolicy, CollectionId, TokenId};
    use chrono::{Duration, TimeZone};

    use super::*;

    struct Fixture {
        registry: AuctionRegistry,
        assets: InMemoryAssetRegistry,
        funds: NativeLedger,
        engine: SettlementEngine,
        house: AccountId,
        seller: AccountId,
        asset: AssetRef,
        id: AuctionId,
        end: DateTime<Utc>,
    }

    fn setup() -> Fixture {
        let house = AccountId::new();
        let custody = AssetCustody::new(house);
        let mut assets = InMemoryAssetRegistry::new();
        let seller = AccountId::new();
        let asset = AssetRef::new(CollectionId::new(), TokenId(0));
        assets.mint(seller, asset).unwrap();
        assets.approve(seller, house, &asset).unwrap();

        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let params = AuctionParams::sample(asset, created + Duration::seconds(2));
        let end = params.end_time;
        let mut registry = AuctionRegistry::new(AuctionPolicy::default());
        let id = registry
            .create(&custody, &mut assets, seller, &params, created)
            .unwrap();

        Fixture {
            registry,
            assets,
            funds: NativeLedger::new(),
            engine: SettlementEngine::new(custody),
            house,
            seller,
            asset,
            id,
            end,
        }
    }

    /// Record a winning bid as if the bidding engine had escrowed it.
    fn win(f: &mut Fixture, amount: i64) -> AccountId {
        let winner = AccountId::new();
        f.funds.deposit(f.house, Decimal::new(amount, 0)).unwrap();
        let auction = f.registry.get_mut(f.id).unwrap();
        auction.highest_bid = Decimal::new(amount, 0);
        auction.highest_bidder = Some(winner);
        winner
    }

    #[test]
    fn claims_rejected_before_end() {
        let mut f = setup();
        let caller = AccountId::new();
        let before = f.end - Duration::seconds(1);
        assert!(matches!(
            f.engine
                .claim_asset(&mut f.registry, &mut f.assets, f.id, caller, before),
            Err(AuctionError::AuctionNotEnded { .. })
        ));
        assert!(matches!(
            f.engine
                .claim_proceeds(&mut f.registry, &mut f.funds, f.id, caller, before),
            Err(AuctionError::AuctionNotEnded { .. })
        ));
    }

    #[test]
    fn asset_goes_to_winner_once() {
        let mut f = setup();
        let winner = win(&mut f, 7);
        let caller = AccountId::new();

        let to = f
            .engine
            .claim_asset(&mut f.registry, &mut f.assets, f.id, caller, f.end)
            .unwrap();
        assert_eq!(to, winner);
        assert_eq!(f.assets.owner_of(&f.asset), Some(winner));

        let err = f
            .engine
            .claim_asset(&mut f.registry, &mut f.assets, f.id, caller, f.end)
            .unwrap_err();
        assert!(matches!(
            err,
            AuctionError::AlreadyClaimed {
                what: ClaimKind::Asset
            }
        ));
    }

    #[test]
    fn proceeds_go_to_seller_once() {
        let mut f = setup();
        win(&mut f, 7);
        let paid = f
            .engine
            .claim_proceeds(&mut f.registry, &mut f.funds, f.id, f.seller, f.end)
            .unwrap();
        assert_eq!(paid, Decimal::new(7, 0));
        assert_eq!(f.funds.balance(f.seller), Decimal::new(7, 0));
        assert_eq!(f.funds.balance(f.house), Decimal::ZERO);

        let err = f
            .engine
            .claim_proceeds(&mut f.registry, &mut f.funds, f.id, f.seller, f.end)
            .unwrap_err();
        assert!(matches!(
            err,
            AuctionError::AlreadyClaimed {
                what: ClaimKind::Proceeds
            }
        ));
        assert_eq!(f.funds.balance(f.seller), Decimal::new(7, 0));
    }

    #[test]
    fn unsold_auction_returns_asset_and_pays_zero() {
        let mut f = setup();
        let caller = AccountId::new();
        let to = f
            .engine
            .claim_asset(&mut f.registry, &mut f.assets, f.id, caller, f.end)
            .unwrap();
        assert_eq!(to, f.seller);
        assert_eq!(f.assets.owner_of(&f.asset), Some(f.seller));

        let paid = f
            .engine
            .claim_proceeds(&mut f.registry, &mut f.funds, f.id, caller, f.end)
            .unwrap();
        assert_eq!(paid, Decimal::ZERO);
        assert!(f.registry.get(f.id).unwrap().is_settled());
    }

    #[test]
    fn failed_payout_leaves_flag_unset() {
        let mut f = setup();
        // record a winner without funding the house
        let auction = f.registry.get_mut(f.id).unwrap();
        auction.highest_bid = Decimal::TEN;
        auction.highest_bidder = Some(AccountId::new());

        let err = f
            .engine
            .claim_proceeds(&mut f.registry, &mut f.funds, f.id, f.seller, f.end)
            .unwrap_err();
        assert!(matches!(err, AuctionError::InsufficientFunds { .. }));
        assert!(!f.registry.get(f.id).unwrap().reward_claimed);
    }
}
