use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::entities::flight::{self, FlightStatus};
use crate::entities::gate;
use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BoardEntry {
    pub flight_no: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub status: FlightStatus,
    pub gate: Option<String>,
}

/// Public departure board: upcoming flights in departure order, with the
/// gate name when one is assigned.
pub async fn departures(State(state): State<AppState>) -> AppResult<Json<Vec<BoardEntry>>> {
    let now = Utc::now();

    let flights = flight::Entity::find()
        .filter(flight::Column::ScheduledDeparture.gte(now))
        .order_by_asc(flight::Column::ScheduledDeparture)
        .all(&*state.db)
        .await?;

    let gates = gate::Entity::find().all(&*state.db).await?;

    let entries: Vec<BoardEntry> = flights
        .into_iter()
        .map(|f| {
            // The gate cell is blanked once the flight no longer holds it
            let gate_name = f
                .gate_id
                .filter(|_| f.status.occupies_gate())
                .and_then(|gid| gates.iter().find(|g| g.id == gid))
                .map(|g| g.gate_name.clone());

            BoardEntry {
                flight_no: f.flight_no,
                origin: f.origin,
                destination: f.destination,
                scheduled_departure: f.scheduled_departure.with_timezone(&Utc),
                scheduled_arrival: f.scheduled_arrival.with_timezone(&Utc),
                status: f.status,
                gate: gate_name,
            }
        })
        .collect();

    Ok(Json(entries))
}
