use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use crate::entities::baggage::{self, BaggageStatus, BaggageType};
use crate::error::{AppError, AppResult};
use crate::services::baggage as baggage_service;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBaggageRequest {
    pub booking_id: i32,
    pub weight_kg: f64,
    pub baggage_type: BaggageType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBaggageStatusRequest {
    pub status: BaggageStatus,
}

/// Register a bag against a booking and issue its tag (baggage handler)
pub async fn register_baggage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RegisterBaggageRequest>,
) -> AppResult<Json<baggage::Model>> {
    let bag = baggage_service::register(
        &*state.db,
        baggage_service::NewBaggage {
            booking_id: payload.booking_id,
            weight_kg: payload.weight_kg,
            baggage_type: payload.baggage_type,
        },
        state.config.baggage_checkin_policy,
    )
    .await?;

    tracing::info!(
        operator = %claims.username,
        tag = %bag.baggage_tag,
        booking_id = bag.booking_id,
        "Baggage registered"
    );
    Ok(Json(bag))
}

/// Get a bag by id (baggage handler)
pub async fn get_baggage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<baggage::Model>> {
    let bag = baggage::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Baggage not found".to_string()))?;

    Ok(Json(bag))
}

/// Look up a bag by its tag (baggage handler)
pub async fn get_baggage_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> AppResult<Json<baggage::Model>> {
    let tag = tag.trim().to_uppercase();

    let bag = baggage::Entity::find()
        .filter(baggage::Column::BaggageTag.eq(&tag))
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Baggage {} not found", tag)))?;

    Ok(Json(bag))
}

/// List all bags on a booking (baggage handler)
pub async fn list_booking_baggage(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<Vec<baggage::Model>>> {
    let bags = baggage::Entity::find()
        .filter(baggage::Column::BookingId.eq(booking_id))
        .order_by_asc(baggage::Column::Id)
        .all(&*state.db)
        .await?;

    Ok(Json(bags))
}

/// Move a bag through its lifecycle (baggage handler)
pub async fn update_baggage_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBaggageStatusRequest>,
) -> AppResult<Json<baggage::Model>> {
    let bag = baggage_service::advance(&*state.db, id, payload.status).await?;

    tracing::info!(
        operator = %claims.username,
        tag = %bag.baggage_tag,
        status = ?bag.status,
        "Baggage status updated"
    );
    Ok(Json(bag))
}
