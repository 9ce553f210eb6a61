//! End-to-end API tests over the in-memory backend.
//!
//! The full router is exercised through `axum-test`, with tokens
//! registered in a [`StaticTokenVerifier`], so every status-code mapping
//! and role gate is covered without a database.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use turfbook_core::types::{Money, Player, Slot, SlotId, Venue};
use turfbook_testing::MemoryBackend;
use turfbook_web::{AppState, StaticTokenVerifier, router};

const ADMIN_TOKEN: &str = "admin-token";

fn setup() -> (TestServer, MemoryBackend, Arc<StaticTokenVerifier>) {
    let backend = MemoryBackend::new();
    let verifier = Arc::new(StaticTokenVerifier::with_admin_token(ADMIN_TOKEN));
    let state = AppState::from_backend(backend.clone(), verifier.clone());
    let server = TestServer::new(router(state)).expect("router should build");
    (server, backend, verifier)
}

/// Venue, funded player (with a registered token) and one slot.
fn seed(
    backend: &MemoryBackend,
    verifier: &StaticTokenVerifier,
    wallet: Money,
    price: Money,
) -> (Venue, Player, Slot, String) {
    let venue = backend.seed_venue("Green Arena", price).unwrap();
    let player = backend.seed_player("9876543210", wallet).unwrap();
    let slot = backend.seed_slot(venue.id, 10, price).unwrap();
    let token = format!("player-{}", player.id);
    verifier.insert_player(&token, player.id);
    (venue, player, slot, token)
}

#[tokio::test]
async fn health_is_public() {
    let (server, _, _) = setup();
    let res = server.get("/health").await;
    res.assert_status_ok();
    res.assert_text("ok");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (server, _, _) = setup();
    let res = server.get("/api/bookings").await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn admin_routes_reject_players() {
    let (server, backend, verifier) = setup();
    let (_, _, _, token) = seed(
        &backend,
        &verifier,
        Money::from_rupees(100),
        Money::from_rupees(100),
    );

    let res = server
        .get("/api/admin/dashboard")
        .authorization_bearer(&token)
        .await;
    assert_eq!(res.status_code(), 403);
}

#[tokio::test]
async fn reserve_and_cancel_round_trip() {
    let (server, backend, verifier) = setup();
    let price = Money::from_rupees(500);
    let (_, _, slot, token) = seed(&backend, &verifier, Money::from_rupees(1_000), price);

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    assert_eq!(res.status_code(), 201);
    let body = res.json::<Value>();
    assert_eq!(body["balance"], json!(Money::from_rupees(500).paise()));
    assert_eq!(body["booking"]["payment_status"], "confirmed");
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let res = server
        .post(&format!("/api/bookings/{booking_id}/cancel"))
        .authorization_bearer(&token)
        .json(&json!({ "reason": "rained out" }))
        .await;
    res.assert_status_ok();
    let body = res.json::<Value>();
    assert_eq!(body["refund"], json!(price.paise()));
    assert_eq!(body["balance"], json!(Money::from_rupees(1_000).paise()));

    let res = server
        .get("/api/wallet")
        .authorization_bearer(&token)
        .await;
    res.assert_status_ok();
    let wallet = res.json::<Value>();
    assert_eq!(wallet["balance"], json!(Money::from_rupees(1_000).paise()));
    assert_eq!(wallet["history"].as_array().unwrap().len(), 2);

    backend.check_invariants().unwrap();
}

#[tokio::test]
async fn reserve_without_funds_is_payment_required() {
    let (server, backend, verifier) = setup();
    let (_, _, slot, token) = seed(
        &backend,
        &verifier,
        Money::from_rupees(100),
        Money::from_rupees(500),
    );

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    assert_eq!(res.status_code(), 402);
    assert_eq!(res.json::<Value>()["code"], "INSUFFICIENT_FUNDS");
}

#[tokio::test]
async fn double_booking_is_conflict() {
    let (server, backend, verifier) = setup();
    let price = Money::from_rupees(200);
    let (_, _, slot, token) = seed(&backend, &verifier, Money::from_rupees(1_000), price);

    let rival = backend
        .seed_player("9123456780", Money::from_rupees(1_000))
        .unwrap();
    let rival_token = format!("player-{}", rival.id);
    verifier.insert_player(&rival_token, rival.id);

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    assert_eq!(res.status_code(), 201);

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&rival_token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    assert_eq!(res.status_code(), 409);
}

#[tokio::test]
async fn unknown_slot_is_not_found() {
    let (server, backend, verifier) = setup();
    let (_, _, _, token) = seed(
        &backend,
        &verifier,
        Money::from_rupees(100),
        Money::from_rupees(100),
    );

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": SlotId::new() }))
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn players_cannot_read_foreign_bookings() {
    let (server, backend, verifier) = setup();
    let (_, _, slot, token) = seed(
        &backend,
        &verifier,
        Money::from_rupees(1_000),
        Money::from_rupees(200),
    );

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    let booking_id = res.json::<Value>()["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let stranger = backend
        .seed_player("9000000001", Money::ZERO)
        .unwrap();
    let stranger_token = format!("player-{}", stranger.id);
    verifier.insert_player(&stranger_token, stranger.id);

    let res = server
        .get(&format!("/api/bookings/{booking_id}"))
        .authorization_bearer(&stranger_token)
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn registration_then_me() {
    let (server, _, verifier) = setup();

    let res = server
        .post("/api/players")
        .json(&json!({ "phone": "9998887770", "name": "Asha", "city": "Pune" }))
        .await;
    assert_eq!(res.status_code(), 201);
    let body = res.json::<Value>();
    assert_eq!(body["phone"], "9998887770");
    let player_id: turfbook_core::types::PlayerId =
        serde_json::from_value(body["id"].clone()).unwrap();

    verifier.insert_player("asha-token", player_id);
    let res = server
        .get("/api/players/me")
        .authorization_bearer("asha-token")
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["name"], "Asha");
}

#[tokio::test]
async fn admin_venue_lifecycle_is_audited() {
    let (server, _, _) = setup();

    let res = server
        .post("/api/admin/venues")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "name": "Blue Court",
            "location": "Indiranagar",
            "sport_type": "badminton",
            "price_per_hour": 40_000,
        }))
        .await;
    assert_eq!(res.status_code(), 201);
    let venue_id = res.json::<Value>()["id"].as_str().unwrap().to_string();

    let res = server
        .post(&format!("/api/admin/venues/{venue_id}/activate"))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "active": false }))
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["is_active"], false);

    // Deactivated venues drop out of the public listing.
    let res = server.get("/api/venues").await;
    assert!(res.json::<Value>().as_array().unwrap().is_empty());

    let res = server
        .get("/api/admin/actions")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    res.assert_status_ok();
    let actions = res.json::<Value>();
    let names: Vec<&str> = actions
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"create_venue"));
    assert!(names.contains(&"set_venue_active"));
}

#[tokio::test]
async fn slot_generation_and_inverted_range() {
    let (server, backend, _) = setup();
    let venue = backend
        .seed_venue("Green Arena", Money::from_rupees(300))
        .unwrap();
    let day = Utc.with_ymd_and_hms(2026, 9, 1, 6, 0, 0).unwrap();

    let res = server
        .post(&format!("/api/admin/venues/{}/slots/generate", venue.id))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "start": day,
            "end": day + Duration::hours(3),
            "duration_minutes": 60,
            "price": 30_000,
        }))
        .await;
    assert_eq!(res.status_code(), 201);
    assert_eq!(res.json::<Value>()["slot_ids"].as_array().unwrap().len(), 3);

    let res = server
        .post(&format!("/api/admin/venues/{}/slots/generate", venue.id))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "start": day,
            "end": day - Duration::hours(1),
            "duration_minutes": 60,
            "price": 30_000,
        }))
        .await;
    assert_eq!(res.status_code(), 422);

    // A duration too large for chrono must be rejected, not panic the
    // handler.
    let res = server
        .post(&format!("/api/admin/venues/{}/slots/generate", venue.id))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "start": day,
            "end": day + Duration::hours(3),
            "duration_minutes": i64::MAX,
            "price": 30_000,
        }))
        .await;
    assert_eq!(res.status_code(), 422);
    assert_eq!(res.json::<Value>()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn admin_booking_desk_flow() {
    let (server, backend, verifier) = setup();
    let price = Money::from_rupees(400);
    let (venue, player, slot, _) = seed(&backend, &verifier, Money::ZERO, price);
    let second = backend.seed_slot(venue.id, 18, price).unwrap();

    let res = server
        .post("/api/admin/bookings")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "player_id": player.id,
            "slot_id": slot.id,
            "advance": Money::from_rupees(100).paise(),
            "status": "pending",
        }))
        .await;
    assert_eq!(res.status_code(), 201);
    let booking_id = res.json::<Value>()["id"].as_str().unwrap().to_string();

    let res = server
        .post(&format!("/api/admin/bookings/{booking_id}/reschedule"))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "slot_id": second.id }))
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["slot_id"], json!(second.id));

    let res = server
        .post(&format!("/api/admin/bookings/{booking_id}/status"))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "status": "completed" }))
        .await;
    assert_eq!(res.status_code(), 409);

    let res = server
        .post(&format!("/api/admin/bookings/{booking_id}/cancel"))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({}))
        .await;
    res.assert_status_ok();
    // No explicit refund: the recorded advance comes back.
    assert_eq!(res.json::<Value>()["refund"], json!(Money::from_rupees(100).paise()));

    backend.check_invariants().unwrap();
}

#[tokio::test]
async fn wallet_adjustments_and_filtered_listing() {
    let (server, backend, verifier) = setup();
    let (venue, player, slot, token) = seed(
        &backend,
        &verifier,
        Money::ZERO,
        Money::from_rupees(250),
    );

    let res = server
        .post(&format!("/api/admin/players/{}/wallet", player.id))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "amount": Money::from_rupees(300).paise(), "direction": "add" }))
        .await;
    res.assert_status_ok();
    assert_eq!(
        res.json::<Value>()["balance"],
        json!(Money::from_rupees(300).paise())
    );

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    assert_eq!(res.status_code(), 201);

    let res = server
        .get("/api/admin/bookings")
        .authorization_bearer(ADMIN_TOKEN)
        .add_query_param("venue_id", venue.id.to_string())
        .add_query_param("status", "confirmed")
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>().as_array().unwrap().len(), 1);

    // Zero-amount adjustments are rejected by the ledger.
    let res = server
        .post(&format!("/api/admin/players/{}/wallet", player.id))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "amount": 0, "direction": "debit" }))
        .await;
    assert_eq!(res.status_code(), 422);
}

#[tokio::test]
async fn coupon_campaign_minting() {
    let (server, _, _) = setup();

    let res = server
        .post("/api/admin/coupons")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "name": "Monsoon opener",
            "code": "MONSOON25",
            "discount": { "kind": "percent", "value": 20 },
            "min_order": 50_000,
            "usage_limit": 1,
        }))
        .await;
    assert_eq!(res.status_code(), 201);
    let campaign_id = res.json::<Value>()["id"].as_str().unwrap().to_string();

    let res = server
        .post(&format!("/api/admin/coupons/{campaign_id}/codes"))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "count": 5 }))
        .await;
    assert_eq!(res.status_code(), 201);
    let codes = res.json::<Value>();
    assert_eq!(codes.as_array().unwrap().len(), 5);
    for code in codes.as_array().unwrap() {
        assert!(code["code"].as_str().unwrap().starts_with("MONSOON25-"));
    }

    let res = server
        .get(&format!("/api/admin/coupons/{campaign_id}/codes"))
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>().as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn dashboard_reflects_seeded_data() {
    let (server, backend, verifier) = setup();
    let price = Money::from_rupees(600);
    let (_, _, slot, token) = seed(&backend, &verifier, Money::from_rupees(1_000), price);

    let res = server
        .post("/api/bookings")
        .authorization_bearer(&token)
        .json(&json!({ "slot_id": slot.id }))
        .await;
    assert_eq!(res.status_code(), 201);

    let res = server
        .get("/api/admin/dashboard")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    res.assert_status_ok();
    let body = res.json::<Value>();
    assert_eq!(body["players"], 1);
    assert_eq!(body["venues"], 1);
    assert_eq!(body["bookings_today"], 1);
    assert_eq!(body["revenue_today"], json!(price.paise()));
}
