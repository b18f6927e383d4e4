use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::FlightCancelPolicy;
use crate::entities::flight::{self, FlightStatus};
use crate::entities::user::{self, UserRole};
use crate::entities::booking;
use crate::error::{AppError, AppResult};
use crate::services::{checkin, flight_status};
use crate::AppState;

// ============ Flight Management ============

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub flight_no: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub aircraft_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlightRequest {
    pub flight_no: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub aircraft_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlightStatusRequest {
    pub status: FlightStatus,
}

/// List all flights (admin)
pub async fn list_flights(State(state): State<AppState>) -> AppResult<Json<Vec<flight::Model>>> {
    let flights = flight::Entity::find().all(&*state.db).await?;
    Ok(Json(flights))
}

/// Get one flight (admin)
pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<flight::Model>> {
    let flight = flight::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    Ok(Json(flight))
}

/// Create a new flight (admin)
pub async fn create_flight(
    State(state): State<AppState>,
    Json(payload): Json<CreateFlightRequest>,
) -> AppResult<Json<flight::Model>> {
    let flight_no = payload.flight_no.trim().to_uppercase();
    if flight_no.is_empty() {
        return Err(AppError::Validation(
            "Flight number must not be blank".to_string(),
        ));
    }

    let origin = flight_status::normalize_airport_code(&payload.origin)?;
    let destination = flight_status::normalize_airport_code(&payload.destination)?;
    flight_status::validate_schedule(payload.scheduled_departure, payload.scheduled_arrival)?;

    let new_flight = flight::ActiveModel {
        flight_no: Set(flight_no),
        origin: Set(origin),
        destination: Set(destination),
        scheduled_departure: Set(payload.scheduled_departure.into()),
        scheduled_arrival: Set(payload.scheduled_arrival.into()),
        aircraft_type: Set(payload.aircraft_type.trim().to_string()),
        status: Set(FlightStatus::Scheduled),
        gate_id: Set(None),
        ..Default::default()
    };

    let result = new_flight.insert(&*state.db).await?;
    tracing::info!(flight = %result.flight_no, flight_id = result.id, "Flight created");
    Ok(Json(result))
}

/// Update a flight's schedule or descriptive fields (admin)
pub async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFlightRequest>,
) -> AppResult<Json<flight::Model>> {
    let flight = flight::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    if flight.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Flight {} is finished and can no longer be edited",
            flight.flight_no
        )));
    }

    // Re-validate the merged schedule, not just the changed side
    let departure = payload
        .scheduled_departure
        .unwrap_or_else(|| flight.scheduled_departure.with_timezone(&Utc));
    let arrival = payload
        .scheduled_arrival
        .unwrap_or_else(|| flight.scheduled_arrival.with_timezone(&Utc));
    flight_status::validate_schedule(departure, arrival)?;

    let mut active: flight::ActiveModel = flight.into();

    if let Some(flight_no) = payload.flight_no {
        let flight_no = flight_no.trim().to_uppercase();
        if flight_no.is_empty() {
            return Err(AppError::Validation(
                "Flight number must not be blank".to_string(),
            ));
        }
        active.flight_no = Set(flight_no);
    }

    if let Some(origin) = payload.origin {
        active.origin = Set(flight_status::normalize_airport_code(&origin)?);
    }

    if let Some(destination) = payload.destination {
        active.destination = Set(flight_status::normalize_airport_code(&destination)?);
    }

    if payload.scheduled_departure.is_some() {
        active.scheduled_departure = Set(departure.into());
    }

    if payload.scheduled_arrival.is_some() {
        active.scheduled_arrival = Set(arrival.into());
    }

    if let Some(aircraft_type) = payload.aircraft_type {
        active.aircraft_type = Set(aircraft_type.trim().to_string());
    }

    active.updated_at = Set(Utc::now().into());

    let result = active.update(&*state.db).await?;
    Ok(Json(result))
}

/// Move a flight through its lifecycle (admin)
///
/// Cancellation normally retains bookings and baggage for the record.
/// Under the purge policy the cancelled flight's bookings are deleted
/// afterwards and baggage rows follow their booking.
pub async fn update_flight_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFlightStatusRequest>,
) -> AppResult<Json<flight::Model>> {
    let updated = flight_status::advance(&*state.db, id, payload.status.clone()).await?;

    if payload.status == FlightStatus::Cancelled
        && state.config.flight_cancel_policy == FlightCancelPolicy::Purge
    {
        let purged = booking::Entity::delete_many()
            .filter(booking::Column::FlightId.eq(updated.id))
            .exec(&*state.db)
            .await?;
        tracing::info!(
            flight = %updated.flight_no,
            bookings = purged.rows_affected,
            "Purged bookings of cancelled flight"
        );
    }

    Ok(Json(updated))
}

/// Delete a flight (admin). Refused while bookings reference it.
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    let booked = booking::Entity::find()
        .filter(booking::Column::FlightId.eq(id))
        .one(&*state.db)
        .await?;

    if booked.is_some() {
        return Err(AppError::Conflict(
            "Flight still has bookings; delete them first".to_string(),
        ));
    }

    let result = flight::Entity::delete_by_id(id).exec(&*state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Flight not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Flight deleted" })))
}

// ============ User Management ============

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct SetUserActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            full_name: u.full_name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at.with_timezone(&Utc),
        }
    }
}

/// Create a staff account (admin)
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let username = payload.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::Validation(
            "Username must not be blank".to_string(),
        ));
    }

    // Check if username already exists
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&*state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        password_hash: Set(password_hash),
        full_name: Set(payload.full_name.trim().to_string()),
        role: Set(payload.role.clone()),
        is_active: Set(true),
        ..Default::default()
    };

    let created = new_user.insert(&*state.db).await?;
    tracing::info!(username = %created.username, role = ?created.role, "Staff account created");
    Ok(Json(created.into()))
}

/// List all staff accounts (admin)
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::Entity::find().all(&*state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Activate or deactivate a staff account (admin)
pub async fn set_user_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetUserActiveRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = user::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_active == payload.is_active {
        return Ok(Json(user.into()));
    }

    let username = user.username.clone();
    let mut active: user::ActiveModel = user.into();
    active.is_active = Set(payload.is_active);

    let updated = active.update(&*state.db).await?;
    tracing::info!(username = %username, is_active = payload.is_active, "Staff account toggled");
    Ok(Json(updated.into()))
}

// ============ Booking Management (Admin) ============

/// Delete any booking (admin). Its baggage rows go with it.
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    let result = booking::Entity::delete_by_id(booking_id)
        .exec(&*state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Booking deleted" })))
}

/// Undo a passenger's check-in (admin). The seat stays as a pre-assignment.
pub async fn revoke_check_in(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<booking::Model>> {
    let booking = checkin::revoke_check_in(&*state.db, booking_id).await?;
    Ok(Json(booking))
}
