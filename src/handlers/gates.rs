use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use crate::entities::{flight, gate};
use crate::error::{AppError, AppResult};
use crate::services::gates as gate_service;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GateNameRequest {
    pub gate_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetGateActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssignGateRequest {
    pub gate_id: i32,
}

/// List all gates (gate controller)
pub async fn list_gates(State(state): State<AppState>) -> AppResult<Json<Vec<gate::Model>>> {
    let gates = gate::Entity::find()
        .order_by_asc(gate::Column::GateName)
        .all(&*state.db)
        .await?;

    Ok(Json(gates))
}

/// Look up a gate by name (gate controller)
pub async fn get_gate_by_name(
    State(state): State<AppState>,
    Path(gate_name): Path<String>,
) -> AppResult<Json<gate::Model>> {
    let gate = gate::Entity::find()
        .filter(gate::Column::GateName.eq(gate_name.trim()))
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gate {} not found", gate_name)))?;

    Ok(Json(gate))
}

/// Create a gate (gate controller)
pub async fn create_gate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GateNameRequest>,
) -> AppResult<Json<gate::Model>> {
    let gate = gate_service::create_gate(&*state.db, &payload.gate_name).await?;

    tracing::info!(operator = %claims.username, gate = %gate.gate_name, "Gate created");
    Ok(Json(gate))
}

/// Rename a gate (gate controller)
pub async fn rename_gate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<GateNameRequest>,
) -> AppResult<Json<gate::Model>> {
    let gate = gate_service::rename_gate(&*state.db, id, &payload.gate_name).await?;
    Ok(Json(gate))
}

/// Activate or deactivate a gate (gate controller)
pub async fn set_gate_active(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<SetGateActiveRequest>,
) -> AppResult<Json<gate::Model>> {
    let gate = gate_service::set_active(
        &*state.db,
        id,
        payload.is_active,
        state.config.gate_deactivation_policy,
    )
    .await?;

    tracing::info!(
        operator = %claims.username,
        gate = %gate.gate_name,
        is_active = gate.is_active,
        "Gate active flag set"
    );
    Ok(Json(gate))
}

/// Assign a gate to a flight (gate controller)
pub async fn assign_gate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(flight_id): Path<i32>,
    Json(payload): Json<AssignGateRequest>,
) -> AppResult<Json<flight::Model>> {
    let flight = gate_service::assign_to_flight(&*state.db, flight_id, payload.gate_id).await?;

    tracing::info!(
        operator = %claims.username,
        flight = %flight.flight_no,
        gate_id = payload.gate_id,
        "Gate assigned"
    );
    Ok(Json(flight))
}

/// Release a flight's gate (gate controller)
pub async fn release_gate(
    State(state): State<AppState>,
    Path(flight_id): Path<i32>,
) -> AppResult<Json<flight::Model>> {
    let flight = gate_service::release_from_flight(&*state.db, flight_id).await?;
    Ok(Json(flight))
}
