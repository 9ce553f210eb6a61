//! End-to-end properties of the booking engine, exercised against the
//! in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, TimeZone, Utc};
use turfbook_core::{
    BookingEngine, BookingError, Money, PaymentStatus, Player, Slot, SlotRange, SlotStore, Venue,
    WalletLedger,
};
use turfbook_testing::MemoryBackend;

fn fixture(wallet: Money, price: Money) -> (MemoryBackend, Venue, Player, Slot) {
    let backend = MemoryBackend::new();
    let venue = backend.seed_venue("Green Arena", price).unwrap();
    let player = backend.seed_player("9876500001", wallet).unwrap();
    let slot = backend.seed_slot(venue.id, 9, price).unwrap();
    (backend, venue, player, slot)
}

#[tokio::test]
async fn booked_flag_tracks_active_bookings() {
    let (backend, venue, player, slot) =
        fixture(Money::from_rupees(2000), Money::from_rupees(500));
    let other = backend
        .seed_slot(venue.id, 11, Money::from_rupees(500))
        .unwrap();

    let outcome = backend.reserve(player.id, slot.id).await.unwrap();
    backend.check_invariants().unwrap();

    backend.reschedule(outcome.booking.id, other.id).await.unwrap();
    backend.check_invariants().unwrap();
    assert!(!backend.get(slot.id).await.unwrap().is_booked);
    assert!(backend.get(other.id).await.unwrap().is_booked);

    backend.cancel(outcome.booking.id, None, None).await.unwrap();
    backend.check_invariants().unwrap();
    assert!(!backend.get(other.id).await.unwrap().is_booked);
}

#[tokio::test]
async fn reserve_on_booked_slot_leaves_wallet_alone() {
    let (backend, _venue, player, slot) =
        fixture(Money::from_rupees(2000), Money::from_rupees(500));
    let rival = backend.seed_player("9876500002", Money::from_rupees(2000)).unwrap();

    backend.reserve(player.id, slot.id).await.unwrap();
    let err = backend.reserve(rival.id, slot.id).await.unwrap_err();
    assert!(matches!(err, BookingError::SlotUnavailable(id) if id == slot.id));
    assert_eq!(backend.balance(rival.id).await.unwrap(), Money::from_rupees(2000));
    assert!(backend.history(rival.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn reserve_without_funds_creates_no_booking() {
    let (backend, _venue, player, slot) =
        fixture(Money::from_rupees(100), Money::from_rupees(500));

    let err = backend.reserve(player.id, slot.id).await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::InsufficientFunds { required, available }
            if required == Money::from_rupees(500) && available == Money::from_rupees(100)
    ));
    assert!(!backend.get(slot.id).await.unwrap().is_booked);
    assert!(backend.bookings_for_player(player.id).await.unwrap().is_empty());
    assert_eq!(backend.balance(player.id).await.unwrap(), Money::from_rupees(100));
}

#[tokio::test]
async fn second_cancel_does_not_refund_twice() {
    let (backend, _venue, player, slot) =
        fixture(Money::from_rupees(1000), Money::from_rupees(500));

    let outcome = backend.reserve(player.id, slot.id).await.unwrap();
    backend.cancel(outcome.booking.id, Some(slot.price), None).await.unwrap();
    assert_eq!(backend.balance(player.id).await.unwrap(), Money::from_rupees(1000));

    let err = backend
        .cancel(outcome.booking.id, Some(slot.price), None)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::AlreadyCancelled(id) if id == outcome.booking.id));
    assert_eq!(backend.balance(player.id).await.unwrap(), Money::from_rupees(1000));
}

#[tokio::test]
async fn reschedule_to_booked_slot_changes_nothing() {
    let (backend, venue, player, slot) =
        fixture(Money::from_rupees(2000), Money::from_rupees(500));
    let taken = backend
        .seed_slot(venue.id, 11, Money::from_rupees(500))
        .unwrap();
    let rival = backend.seed_player("9876500002", Money::from_rupees(2000)).unwrap();

    let mine = backend.reserve(player.id, slot.id).await.unwrap();
    backend.reserve(rival.id, taken.id).await.unwrap();

    let err = backend.reschedule(mine.booking.id, taken.id).await.unwrap_err();
    assert!(matches!(err, BookingError::SlotUnavailable(id) if id == taken.id));
    assert!(backend.get(slot.id).await.unwrap().is_booked);
    assert!(backend.get(taken.id).await.unwrap().is_booked);
    assert_eq!(backend.booking(mine.booking.id).await.unwrap().slot_id, slot.id);
}

#[tokio::test]
async fn reserve_then_cancel_restores_the_wallet() {
    let (backend, _venue, player, slot) =
        fixture(Money::from_rupees(1000), Money::from_rupees(500));

    let outcome = backend.reserve(player.id, slot.id).await.unwrap();
    assert_eq!(outcome.balance, Money::from_rupees(500));
    assert_eq!(outcome.booking.payment_status, PaymentStatus::Confirmed);

    let cancelled = backend
        .cancel(outcome.booking.id, Some(slot.price), Some("rain".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.refund, Money::from_rupees(500));
    assert_eq!(cancelled.balance, Money::from_rupees(1000));
    assert_eq!(cancelled.booking.payment_status, PaymentStatus::Refunded);
    assert!(cancelled.booking.is_cancelled);
    assert_eq!(cancelled.booking.refunded_amount, Money::from_rupees(500));
    assert!(!backend.get(slot.id).await.unwrap().is_booked);

    let history = backend.history(player.id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn two_hour_range_yields_two_hourly_slots() {
    let backend = MemoryBackend::new();
    let venue = backend.seed_venue("Green Arena", Money::from_rupees(500)).unwrap();

    let start = Utc.with_ymd_and_hms(2026, 8, 25, 6, 0, 0).unwrap();
    let range = SlotRange::new(start, start + Duration::hours(2)).unwrap();
    let ids = backend
        .generate(venue.id, range, Duration::minutes(60), Money::from_rupees(500))
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let slots = backend.list(venue.id, Some(start.date_naive())).await.unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_time, start);
    assert_eq!(slots[0].end_time, start + Duration::hours(1));
    assert_eq!(slots[1].start_time, start + Duration::hours(1));
    assert_eq!(slots[1].end_time, start + Duration::hours(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reserves_have_exactly_one_winner() {
    for _ in 0..20 {
        let backend = MemoryBackend::new();
        let venue = backend.seed_venue("Green Arena", Money::from_rupees(500)).unwrap();
        let slot = backend.seed_slot(venue.id, 9, Money::from_rupees(500)).unwrap();
        let a = backend.seed_player("9876500001", Money::from_rupees(1000)).unwrap();
        let b = backend.seed_player("9876500002", Money::from_rupees(1000)).unwrap();

        let left = {
            let backend = backend.clone();
            tokio::spawn(async move { backend.reserve(a.id, slot.id).await })
        };
        let right = {
            let backend = backend.clone();
            tokio::spawn(async move { backend.reserve(b.id, slot.id).await })
        };
        let results = [left.await.unwrap(), right.await.unwrap()];

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        for result in &results {
            if let Err(err) = result {
                assert!(matches!(err, BookingError::SlotUnavailable(_)));
            }
        }
        backend.check_invariants().unwrap();
    }
}

#[tokio::test]
async fn advance_booking_refunds_the_advance_by_default() {
    let (backend, _venue, player, slot) =
        fixture(Money::from_rupees(1000), Money::from_rupees(500));

    let booking = backend
        .reserve_with_advance(player.id, slot.id, Money::from_rupees(200), PaymentStatus::Pending)
        .await
        .unwrap();
    assert_eq!(backend.balance(player.id).await.unwrap(), Money::from_rupees(1000));

    let cancelled = backend.cancel(booking.id, None, None).await.unwrap();
    assert_eq!(cancelled.refund, Money::from_rupees(200));
    assert_eq!(cancelled.balance, Money::from_rupees(1200));
}

#[tokio::test]
async fn status_transitions_are_enforced() {
    let (backend, _venue, player, slot) =
        fixture(Money::from_rupees(1000), Money::from_rupees(500));

    let outcome = backend.reserve(player.id, slot.id).await.unwrap();
    let booking = backend
        .update_status(outcome.booking.id, PaymentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Completed);

    let err = backend
        .update_status(outcome.booking.id, PaymentStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::InvalidTransition { from: PaymentStatus::Completed, to: PaymentStatus::Pending }
    ));
}
