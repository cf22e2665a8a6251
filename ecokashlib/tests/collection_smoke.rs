use chrono::{Duration, TimeZone, Utc};
use ecokashlib::{
    error::EcoError,
    model::{EntryKind, UserId, UserProfile},
    session::Session,
    signature::MockAttestor,
};
use rust_decimal::Decimal;

fn session() -> Session<MockAttestor> {
    let mut s = Session::new(MockAttestor);
    s.sign_up(UserProfile {
        id: UserId::new("u1"),
        full_name: "A".into(),
        email: "a@example.com".into(),
        phone: None,
        address: None,
        wallet_balance: Decimal::new(100, 2),
    });
    s
}

#[test]
fn purchase_then_collect() {
    let mut s = session();
    let bought = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
    let collected = Utc.with_ymd_and_hms(2025, 10, 15, 8, 0, 0).unwrap();

    s.purchase_bin_at(bought);
    let e = s.record_collection_at(Decimal::new(550, 2), 12, collected).expect("collect");

    let bin = s.collection().active().expect("active bin");
    assert!(s.collection().has_bin());
    assert_eq!(bin.cumulative_amount, Decimal::new(550, 2));
    assert_eq!(bin.cumulative_items, 12);
    assert_eq!(bin.last_collection, Some(collected));
    assert_eq!(bin.next_collection, collected + Duration::days(14));

    assert_eq!(s.balance(), Decimal::new(650, 2));
    assert_eq!(e.kind, EntryKind::Collection);
    assert_eq!(e.display_amount(), "+$5.50");
    assert_eq!(s.wallet().entries().len(), 1);
}

#[test]
fn totals_accumulate() {
    let mut s = session();
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    s.purchase_bin_at(t0);
    s.record_collection_at(Decimal::ONE, 3, t0 + Duration::days(14)).unwrap();
    s.record_collection_at(Decimal::TWO, 4, t0 + Duration::days(28)).unwrap();

    let bin = s.collection().active().unwrap();
    assert_eq!(bin.cumulative_amount, Decimal::from(3));
    assert_eq!(bin.cumulative_items, 7);
    assert_eq!(bin.next_collection, t0 + Duration::days(42));
}

#[test]
fn collection_without_bin_is_rejected() {
    let mut s = session();
    let err = s.record_collection(Decimal::ONE, 1).unwrap_err();
    assert!(matches!(err, EcoError::NoBin));
    assert_eq!(s.balance(), Decimal::new(100, 2));
    assert!(s.wallet().entries().is_empty());
}

#[test]
fn invalid_amount_leaves_totals_alone() {
    let mut s = session();
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    s.purchase_bin_at(t0);
    assert!(matches!(s.record_collection_at(Decimal::ZERO, 5, t0), Err(EcoError::InvalidAmount)));
    let bin = s.collection().active().unwrap();
    assert_eq!(bin.cumulative_items, 0);
    assert_eq!(bin.last_collection, None);
    assert_eq!(bin.next_collection, t0 + Duration::days(14));
}
