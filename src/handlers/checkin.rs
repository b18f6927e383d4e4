use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entities::{booking, flight};
use crate::error::{AppError, AppResult};
use crate::services::{checkin, seats};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: i32,
    pub passenger_name: String,
    pub passport_no: Option<String>,
    pub seat_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeatRequest {
    pub seat_number: String,
}

#[derive(Debug, Serialize)]
pub struct SeatAvailabilityResponse {
    pub flight_id: i32,
    pub seat_number: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct FlightManifestResponse {
    pub flight_id: i32,
    pub flight_no: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub bookings: Vec<booking::Model>,
}

/// Create a booking for a passenger (check-in agent)
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = checkin::create_booking(
        &*state.db,
        checkin::NewBooking {
            flight_id: payload.flight_id,
            passenger_name: payload.passenger_name,
            passport_no: payload.passport_no,
            seat_number: payload.seat_number,
        },
    )
    .await?;

    tracing::info!(
        operator = %claims.username,
        reference = %booking.booking_reference,
        "Booking created at desk"
    );
    Ok(Json(booking))
}

/// Get a booking by id (check-in agent)
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<booking::Model>> {
    let booking = booking::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

/// Look up a booking by its reference (check-in agent)
pub async fn get_booking_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<booking::Model>> {
    let reference = reference.trim().to_uppercase();

    let booking = booking::Entity::find()
        .filter(booking::Column::BookingReference.eq(&reference))
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", reference)))?;

    Ok(Json(booking))
}

/// Passenger manifest for a flight, with each booking's check-in state
pub async fn flight_manifest(
    State(state): State<AppState>,
    Path(flight_id): Path<i32>,
) -> AppResult<Json<FlightManifestResponse>> {
    let flight = flight::Entity::find_by_id(flight_id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let bookings = booking::Entity::find()
        .filter(booking::Column::FlightId.eq(flight_id))
        .order_by_asc(booking::Column::Id)
        .all(&*state.db)
        .await?;

    Ok(Json(FlightManifestResponse {
        flight_id: flight.id,
        flight_no: flight.flight_no,
        origin: flight.origin,
        destination: flight.destination,
        scheduled_departure: flight.scheduled_departure.with_timezone(&Utc),
        bookings,
    }))
}

/// Check a passenger in onto a seat (check-in agent)
pub async fn check_in(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<SeatRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = checkin::check_in(&*state.db, id, &payload.seat_number).await?;

    tracing::info!(
        operator = %claims.username,
        reference = %booking.booking_reference,
        seat = %payload.seat_number,
        "Passenger checked in"
    );
    Ok(Json(booking))
}

/// Pre-assign or move a seat without checking in (check-in agent)
pub async fn assign_seat(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SeatRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = booking::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let updated = seats::assign_seat(&*state.db, booking, &payload.seat_number).await?;
    Ok(Json(updated))
}

/// Probe whether a seat is still free on a flight (check-in agent)
pub async fn seat_availability(
    State(state): State<AppState>,
    Path((flight_id, seat_number)): Path<(i32, String)>,
) -> AppResult<Json<SeatAvailabilityResponse>> {
    flight::Entity::find_by_id(flight_id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    seats::validate_seat_number(&seat_number)?;
    let available = seats::is_seat_available(&*state.db, flight_id, &seat_number, None).await?;

    Ok(Json(SeatAvailabilityResponse {
        flight_id,
        seat_number,
        available,
    }))
}
