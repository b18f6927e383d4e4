use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::error::AppResult;
use crate::external::InfoKind;
use crate::AppState;

/// Current weather at an airport (any staff)
pub async fn weather(
    State(state): State<AppState>,
    Path(airport): Path<String>,
) -> AppResult<Json<Value>> {
    let payload = state.flight_info.fetch(InfoKind::Weather, &airport).await;
    Ok(Json(payload))
}

/// Live status feed for a flight number (any staff)
pub async fn flight_status(
    State(state): State<AppState>,
    Path(flight_no): Path<String>,
) -> AppResult<Json<Value>> {
    let payload = state
        .flight_info
        .fetch(InfoKind::FlightStatus, &flight_no)
        .await;
    Ok(Json(payload))
}

/// Airport facts by IATA code (any staff)
pub async fn airport_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Value>> {
    let payload = state.flight_info.fetch(InfoKind::AirportInfo, &code).await;
    Ok(Json(payload))
}

/// Where a bag was last scanned, by tag (any staff)
pub async fn baggage_tracking(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> AppResult<Json<Value>> {
    let payload = state
        .flight_info
        .fetch(InfoKind::BaggageTracking, &tag)
        .await;
    Ok(Json(payload))
}
