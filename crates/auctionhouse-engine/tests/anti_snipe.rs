//! Anti-snipe extension driven through the house's clock.

use auctionhouse_custody::{AssetRegistry, InMemoryAssetRegistry};
use auctionhouse_engine::{AuctionHouse, ManualClock};
use auctionhouse_ledger::NativeLedger;
use auctionhouse_types::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

type House = AuctionHouse<InMemoryAssetRegistry, NativeLedger, ManualClock>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A live auction with a 10 minute window and 10 minute increase, plus
/// two funded bidders. Returns the house positioned at `start_time`.
fn live_auction() -> (House, ManualClock, AuctionId, AccountId, AccountId) {
    init_tracing();
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let clock = ManualClock::new(t0);
    let mut house = AuctionHouse::new(
        AuctionPolicy::default(),
        InMemoryAssetRegistry::new(),
        NativeLedger::new(),
        clock.clone(),
    )
    .unwrap();

    let seller = AccountId::new();
    let asset = AssetRef::new(CollectionId::new(), TokenId(9));
    let spender = house.account();
    house.assets_mut().mint(seller, asset).unwrap();
    house.assets_mut().approve(seller, spender, &asset).unwrap();

    let start = t0 + Duration::minutes(1);
    let params = AuctionParams {
        end_time: start + Duration::days(1),
        time_extension_window: Duration::minutes(10),
        time_extension_increase: Duration::minutes(10),
        ..AuctionParams::sample(asset, start)
    };
    let id = house.create_auction(seller, &params).unwrap();

    let alice = AccountId::new();
    let bob = AccountId::new();
    house.funds_mut().deposit(alice, Decimal::ONE_HUNDRED).unwrap();
    house.funds_mut().deposit(bob, Decimal::ONE_HUNDRED).unwrap();
    clock.set(start);
    (house, clock, id, alice, bob)
}

fn end_of(house: &House, id: AuctionId) -> DateTime<Utc> {
    house.auction(id).unwrap().end_time
}

#[test]
fn last_minute_bid_extends_and_logs() {
    let (mut house, clock, id, alice, _bob) = live_auction();
    let end = end_of(&house, id);
    clock.set(end - Duration::minutes(2));

    house.bid(id, alice, Decimal::ONE).unwrap();

    let new_end = end_of(&house, id);
    assert_eq!(new_end, end + Duration::minutes(8));
    let extended = house
        .audit_log()
        .receipts()
        .iter()
        .find_map(|r| match &r.event {
            AuctionEvent::AuctionExtended {
                old_end_time,
                new_end_time,
                ..
            } => Some((*old_end_time, *new_end_time)),
            _ => None,
        });
    assert_eq!(extended, Some((end, new_end)));
}

#[test]
fn bidding_war_keeps_auction_open() {
    let (mut house, clock, id, alice, bob) = live_auction();
    let bidders = [alice, bob];

    // Each bid lands one minute before the current end.
    for round in 0..20_i64 {
        let end = end_of(&house, id);
        clock.set(end - Duration::minutes(1));
        let who = bidders[usize::try_from(round).unwrap() % 2];
        house.bid(id, who, Decimal::new(round + 1, 0)).unwrap();
        assert_eq!(
            end_of(&house, id),
            end - Duration::minutes(1) + Duration::minutes(10)
        );
    }

    assert_eq!(house.highest_bid(id).unwrap(), (Decimal::new(20, 0), Some(bob)));
    house.verify_escrow().unwrap();

    // Quiet period: the auction closes at its last extended end.
    clock.set(end_of(&house, id));
    assert!(matches!(
        house.bid(id, alice, Decimal::new(50, 0)),
        Err(AuctionError::AuctionNotActive)
    ));
    assert_eq!(house.claim_asset(id, alice).unwrap(), bob);
}

#[test]
fn bid_exactly_at_window_edge_extends() {
    let (mut house, clock, id, alice, _bob) = live_auction();
    let end = end_of(&house, id);
    let at = end - Duration::minutes(10);
    clock.set(at);

    house.bid(id, alice, Decimal::ONE).unwrap();
    // now + increase == end: nothing to extend
    assert_eq!(end_of(&house, id), end);

    clock.set(at + Duration::seconds(1));
    house.bid(id, alice, Decimal::TWO).unwrap();
    assert_eq!(end_of(&house, id), at + Duration::seconds(1) + Duration::minutes(10));
}

#[test]
fn early_bids_never_extend() {
    let (mut house, _clock, id, alice, bob) = live_auction();
    let end = end_of(&house, id);
    house.bid(id, alice, Decimal::ONE).unwrap();
    house.bid(id, bob, Decimal::TWO).unwrap();
    assert_eq!(end_of(&house, id), end);
    assert!(
        !house
            .audit_log()
            .receipts()
            .iter()
            .any(|r| r.event.kind() == "AUCTION_EXTENDED")
    );
}

#[test]
fn rejected_late_bid_does_not_extend() {
    let (mut house, clock, id, alice, bob) = live_auction();
    house.bid(id, alice, Decimal::new(5, 0)).unwrap();
    let end = end_of(&house, id);
    clock.set(end - Duration::minutes(1));

    assert!(matches!(
        house.bid(id, bob, Decimal::new(5, 0)),
        Err(AuctionError::BidTooLow { .. })
    ));
    assert_eq!(end_of(&house, id), end);
}
