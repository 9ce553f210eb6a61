//! Route table for the booking API.

use crate::handlers::{admin, bookings, coupons, health, players, slots, venues, wallet};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router.
///
/// Authentication and role checks happen per handler; the router only
/// groups routes. Admin routes live under `/api/admin`.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(venues::list))
        .route("/venues/:id", get(venues::get))
        .route("/venues/:id/slots", get(slots::list))
        .route("/venues/:id/availability", get(slots::availability))
        .route("/players", post(players::register))
        .route("/players/me", get(players::me))
        .route("/bookings", post(bookings::reserve).get(bookings::list_own))
        .route("/bookings/:id", get(bookings::get))
        .route("/bookings/:id/cancel", post(bookings::cancel))
        .route("/wallet", get(wallet::get_own))
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/venues",
            get(venues::admin_list).post(venues::create),
        )
        .route("/venues/:id", patch(venues::update))
        .route("/venues/:id/activate", post(venues::set_active))
        .route("/venues/:id/slots", post(slots::create))
        .route("/venues/:id/slots/generate", post(slots::generate))
        .route("/slots/:id", delete(slots::delete))
        .route(
            "/bookings",
            get(bookings::admin_list).post(bookings::admin_reserve),
        )
        .route("/bookings/:id/cancel", post(bookings::admin_cancel))
        .route("/bookings/:id/reschedule", post(bookings::reschedule))
        .route("/bookings/:id/status", post(bookings::update_status))
        .route("/players", get(players::admin_list))
        .route(
            "/players/:id",
            get(players::admin_get).patch(players::admin_update),
        )
        .route(
            "/players/:id/wallet",
            get(wallet::admin_get).post(wallet::adjust),
        )
        .route(
            "/coupons",
            get(coupons::list_campaigns).post(coupons::create_campaign),
        )
        .route("/coupons/:id", get(coupons::get_campaign))
        .route(
            "/coupons/:id/codes",
            get(coupons::list_codes).post(coupons::mint_codes),
        )
        .route("/dashboard", get(admin::dashboard))
        .route("/reports/sales", get(admin::sales))
        .route("/actions", get(admin::actions))
}
