use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, baggage, board, checkin, gates, info};
use crate::middleware::auth::{
    auth_middleware, require_admin, require_baggage_handler, require_checkin_agent,
    require_gate_controller,
};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Create role-specific governor layers
    let checkin_governor = create_role_governor(RateLimitedRole::CheckinAgent);
    let baggage_governor = create_role_governor(RateLimitedRole::BaggageHandler);
    let gate_governor = create_role_governor(RateLimitedRole::GateController);
    // Create IP-based governor for the routes that need no token
    let public_governor = create_public_governor();

    // Public routes (rate limited per IP)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public departure board
    let public_routes = Router::new()
        .route("/flights", get(board::departures))
        .layer(public_governor);

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Flight management
        .route("/flights", get(admin::list_flights))
        .route("/flights", post(admin::create_flight))
        .route("/flights/{id}", get(admin::get_flight))
        .route("/flights/{id}", put(admin::update_flight))
        .route("/flights/{id}", delete(admin::delete_flight))
        .route("/flights/{id}/status", put(admin::update_flight_status))
        // User management
        .route("/users", get(admin::list_users))
        .route("/users", post(admin::create_user))
        .route("/users/{id}/active", put(admin::set_user_active))
        // Booking management
        .route("/bookings/{id}", delete(admin::delete_booking))
        .route("/bookings/{id}/check-in", delete(admin::revoke_check_in))
        // No role governor for admin; the IP limiter in main covers it
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Check-in desk routes (requires auth + check-in agent role)
    // Rate limit: 300 requests per minute per agent
    let checkin_routes = Router::new()
        .route("/bookings", post(checkin::create_booking))
        .route("/bookings/{id}", get(checkin::get_booking))
        .route(
            "/bookings/reference/{reference}",
            get(checkin::get_booking_by_reference),
        )
        .route("/bookings/{id}/check-in", post(checkin::check_in))
        .route("/bookings/{id}/seat", put(checkin::assign_seat))
        .route("/flights/{flight_id}/manifest", get(checkin::flight_manifest))
        .route(
            "/flights/{flight_id}/seats/{seat_number}",
            get(checkin::seat_availability),
        )
        .layer(checkin_governor)
        .layer(middleware::from_fn(require_checkin_agent))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Baggage routes (requires auth + baggage handler role)
    // Rate limit: 300 requests per minute per handler
    let baggage_routes = Router::new()
        .route("/", post(baggage::register_baggage))
        .route("/{id}", get(baggage::get_baggage))
        .route("/tag/{tag}", get(baggage::get_baggage_by_tag))
        .route("/booking/{booking_id}", get(baggage::list_booking_baggage))
        .route("/{id}/status", put(baggage::update_baggage_status))
        .layer(baggage_governor)
        .layer(middleware::from_fn(require_baggage_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Gate routes (requires auth + gate controller role)
    // Rate limit: 120 requests per minute per controller
    let gate_routes = Router::new()
        .route("/", get(gates::list_gates))
        .route("/", post(gates::create_gate))
        .route("/name/{gate_name}", get(gates::get_gate_by_name))
        .route("/{id}", put(gates::rename_gate))
        .route("/{id}/active", put(gates::set_gate_active))
        .route("/flights/{flight_id}", put(gates::assign_gate))
        .route("/flights/{flight_id}", delete(gates::release_gate))
        .layer(gate_governor)
        .layer(middleware::from_fn(require_gate_controller))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Enrichment lookups (any authenticated staff)
    let info_routes = Router::new()
        .route("/weather/{airport}", get(info::weather))
        .route("/flights/{flight_no}", get(info::flight_status))
        .route("/airports/{code}", get(info::airport_info))
        .route("/tracking/{tag}", get(info::baggage_tracking))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/checkin", checkin_routes)
        .nest("/api/baggage", baggage_routes)
        .nest("/api/gates", gate_routes)
        .nest("/api/info", info_routes)
        .with_state(state)
}
