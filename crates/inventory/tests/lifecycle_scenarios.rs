use chrono::{Duration, NaiveDate, TimeZone, Utc};

use larder_core::{DomainError, Money};
use larder_inventory::{
    AcquireOutcome, ExpiredDecision, ExpiredResolution, FixedClock, ItemStatus, LifecycleEngine,
    MergeDecision, NewItem, StorageCategory,
};
use larder_ledger::ConsumptionRecord;

fn engine() -> LifecycleEngine<FixedClock> {
    larder_observability::init_test();
    LifecycleEngine::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap(),
    ))
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

#[test]
fn partial_consumption_scenario() {
    let mut engine = engine();
    let id = engine
        .acquire_item(NewItem::new(
            "Yogurt cups",
            "🥣",
            StorageCategory::Fridge,
            3,
            Money::from_cents(600),
            date(9, 9),
        ))
        .unwrap()
        .require_no_conflict()
        .unwrap()
        .id_typed();

    let consumption = engine.consume_item(id, 1, 50.0).unwrap();

    assert_eq!(consumption.record.consumed_amount, Money::from_cents(100));
    assert_eq!(consumption.record.wasted_amount, Money::from_cents(100));
    assert_eq!(consumption.record.total_cost, Money::from_cents(200));
    let remaining = consumption.remaining.unwrap();
    assert_eq!(remaining.quantity(), 2);
    assert_eq!(remaining.cost(), Money::from_cents(400));
}

#[test]
fn wasting_an_expired_item_scenario() {
    let mut engine = engine();
    let id = engine
        .acquire_item(NewItem::new(
            "Baby spinach",
            "🥬",
            StorageCategory::Fridge,
            1,
            Money::from_cents(399),
            date(9, 4),
        ))
        .unwrap()
        .require_no_conflict()
        .unwrap()
        .id_typed();

    let expired = engine.expire_check(date(9, 6)).unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].cost(), Money::from_cents(399));
    assert_eq!(expired[0].expired_days(), 2);

    let ExpiredResolution::Wasted(record) =
        engine.resolve_expired(id, ExpiredDecision::Wasted).unwrap()
    else {
        panic!("expected a waste record");
    };

    assert_eq!(record.consumed_amount, Money::ZERO);
    assert_eq!(record.wasted_amount, Money::from_cents(399));
    assert_eq!(record.days_until_expiry_at_consumption, -2.0);
    assert!(engine.store().get_expired(id).is_none());
    assert_eq!(engine.ledger().len(), 1);
}

#[test]
fn earlier_records_never_change() {
    let mut engine = engine();
    let mut snapshots: Vec<ConsumptionRecord> = Vec::new();

    let id = engine
        .acquire_item(NewItem::new(
            "Apples",
            "🍎",
            StorageCategory::Pantry,
            6,
            Money::from_cents(450),
            date(9, 20),
        ))
        .unwrap()
        .require_no_conflict()
        .unwrap()
        .id_typed();

    for pct in [100.0, 75.0, 0.0] {
        engine.clock().advance(Duration::hours(5));
        snapshots.push(engine.consume_item(id, 1, pct).unwrap().record);
        assert_eq!(engine.ledger().read_all(), snapshots.as_slice());
    }

    engine.open_item(id, Some(StorageCategory::Fridge), Some(5.0)).unwrap();
    engine.expire_check(date(9, 30)).unwrap();
    engine
        .resolve_expired(id, ExpiredDecision::Revive { extension_days: Some(2.0) })
        .unwrap();
    engine.consume_item(id, 3, 100.0).unwrap();

    assert_eq!(&engine.ledger().read_all()[..3], snapshots.as_slice());
    assert_eq!(engine.ledger().len(), 4);
    assert!(engine.store().items().is_empty());
}

#[test]
fn revived_item_keeps_its_opened_state() {
    let mut engine = engine();
    let id = engine
        .acquire_item(NewItem::new(
            "Hummus",
            "🫘",
            StorageCategory::Fridge,
            1,
            Money::from_cents(275),
            date(9, 3),
        ))
        .unwrap()
        .require_no_conflict()
        .unwrap()
        .id_typed();
    engine.open_item(id, None, Some(1.0)).unwrap();
    engine.expire_check(date(9, 3)).unwrap();

    let ExpiredResolution::Revived(item) = engine
        .resolve_expired(id, ExpiredDecision::Revive { extension_days: None })
        .unwrap()
    else {
        panic!("expected revival");
    };
    assert_eq!(item.status(), ItemStatus::Opened);
    assert_eq!(item.days_until_expiry(), 3.0);
}

#[test]
fn barcode_duplicate_flows_through_decision_point() {
    let mut engine = engine();
    let first = NewItem::new(
        "Oat milk",
        "🥛",
        StorageCategory::Pantry,
        1,
        Money::from_cents(229),
        date(12, 1),
    )
    .with_barcode("7394376616228");
    let existing = engine
        .acquire_item(first)
        .unwrap()
        .require_no_conflict()
        .unwrap()
        .id_typed();

    let again = NewItem::new(
        "Oatly Barista",
        "🥛",
        StorageCategory::Fridge,
        2,
        Money::from_cents(458),
        date(12, 1),
    )
    .with_barcode("7394376616228");

    let outcome = engine.acquire_item(again).unwrap();
    let err = outcome.clone().require_no_conflict().unwrap_err();
    assert_eq!(err, DomainError::DuplicateDecisionRequired { existing });

    let AcquireOutcome::PendingDecision(pending) = outcome else {
        panic!("expected pending decision");
    };
    let combined = engine.resolve_pending(pending, MergeDecision::Combine).unwrap();
    let item = combined.item().unwrap();
    assert_eq!(item.quantity(), 3);
    assert_eq!(item.cost(), Money::from_cents(687));
    assert_eq!(engine.store().items().len(), 1);
}

#[test]
fn collections_round_trip_through_parts() {
    let mut engine = engine();
    engine
        .acquire_item(NewItem::new(
            "Rice",
            "🍚",
            StorageCategory::Pantry,
            1,
            Money::from_cents(300),
            date(12, 31),
        ))
        .unwrap();
    let clock = engine.clock().clone();
    let (store, ledger) = engine.into_parts();

    let resumed = LifecycleEngine::from_parts(store.clone(), ledger, clock);
    assert_eq!(resumed.store(), &store);
    assert_eq!(resumed.store().inventory_value(), Money::from_cents(300));
}
