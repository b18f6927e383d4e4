use chrono::{DateTime, Utc};
use sea_orm::{ActiveEnum, ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::entities::flight::{self, FlightStatus};
use crate::error::{AppError, AppResult};

/// Move a flight to the requested lifecycle state.
///
/// The controller changes nothing but the flight row itself: cancelling a
/// flight does not touch its bookings or baggage here. Any propagation is
/// an orchestration step owned by the caller.
pub async fn advance(
    db: &DatabaseConnection,
    flight_id: i32,
    target: FlightStatus,
) -> AppResult<flight::Model> {
    let txn = db.begin().await?;

    let flight = flight::Entity::find_by_id(flight_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", flight_id)))?;

    if flight.status.is_terminal() {
        return Err(AppError::TerminalState(format!(
            "Flight {} is {} and cannot change status",
            flight.flight_no,
            flight.status.to_value()
        )));
    }

    if !flight.status.can_transition_to(&target) {
        return Err(AppError::InvalidTransition(format!(
            "Flight {} cannot move from {} to {}",
            flight.flight_no,
            flight.status.to_value(),
            target.to_value()
        )));
    }

    let flight_no = flight.flight_no.clone();
    let from = flight.status.clone();

    let mut active: flight::ActiveModel = flight.into();
    active.status = Set(target);
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        flight = %flight_no,
        from = %from.to_value(),
        to = %updated.status.to_value(),
        "Flight status changed"
    );
    Ok(updated)
}

/// A flight must depart before it arrives.
pub fn validate_schedule(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> AppResult<()> {
    if departure >= arrival {
        return Err(AppError::Validation(
            "Scheduled departure must be before scheduled arrival".to_string(),
        ));
    }
    Ok(())
}

/// Airport codes are three ASCII letters, stored uppercase.
pub fn normalize_airport_code(code: &str) -> AppResult<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation(format!(
            "{:?} is not a valid airport code",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn flight_row(status: FlightStatus) -> flight::Model {
        let departure = Utc::now();
        flight::Model {
            id: 1,
            flight_no: "AA101".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            scheduled_departure: departure.into(),
            scheduled_arrival: (departure + chrono::Duration::hours(6)).into(),
            aircraft_type: "B738".to_string(),
            status,
            gate_id: None,
            created_at: departure.into(),
            updated_at: departure.into(),
        }
    }

    #[tokio::test]
    async fn test_advance_happy_path() {
        let boarding = flight_row(FlightStatus::Boarding);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![flight_row(FlightStatus::Scheduled)],
                vec![boarding],
            ])
            .into_connection();

        let updated = advance(&db, 1, FlightStatus::Boarding).await.unwrap();
        assert_eq!(updated.status, FlightStatus::Boarding);
    }

    #[tokio::test]
    async fn test_departed_flight_cannot_be_cancelled() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight_row(FlightStatus::Departed)]])
            .into_connection();

        let err = advance(&db, 1, FlightStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_terminal_flight_rejects_all_changes() {
        for terminal in [FlightStatus::Arrived, FlightStatus::Cancelled] {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![flight_row(terminal)]])
                .into_connection();

            let err = advance(&db, 1, FlightStatus::Boarding).await.unwrap_err();
            assert!(matches!(err, AppError::TerminalState(_)));
        }
    }

    #[tokio::test]
    async fn test_advance_missing_flight_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<flight::Model>::new()])
            .into_connection();

        let err = advance(&db, 404, FlightStatus::Boarding).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_schedule_must_depart_before_arrival() {
        let departure = Utc::now();
        assert!(validate_schedule(departure, departure + chrono::Duration::hours(2)).is_ok());
        assert!(validate_schedule(departure, departure).is_err());
        assert!(validate_schedule(departure, departure - chrono::Duration::hours(2)).is_err());
    }

    #[test]
    fn test_airport_code_normalization() {
        assert_eq!(normalize_airport_code("jfk").unwrap(), "JFK");
        assert_eq!(normalize_airport_code(" LAX ").unwrap(), "LAX");
        assert!(normalize_airport_code("JFKX").is_err());
        assert!(normalize_airport_code("J1K").is_err());
        assert!(normalize_airport_code("").is_err());
    }
}
