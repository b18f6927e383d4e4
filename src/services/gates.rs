use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};

use crate::config::GateDeactivationPolicy;
use crate::entities::flight::{self, FlightStatus};
use crate::entities::gate;
use crate::error::{AppError, AppResult};

/// Create a gate with a unique name. Names are trimmed as entered; case is
/// preserved and significant.
pub async fn create_gate(db: &DatabaseConnection, name: &str) -> AppResult<gate::Model> {
    let name = validate_gate_name(name)?;

    let txn = db.begin().await?;
    ensure_name_free(&txn, &name, None).await?;

    let model = gate::ActiveModel {
        gate_name: Set(name.clone()),
        is_active: Set(true),
        ..Default::default()
    };

    let inserted = model
        .insert(&txn)
        .await
        .map_err(|err| map_name_violation(err, &name))?;
    txn.commit().await?;

    tracing::info!(gate = %inserted.gate_name, "Gate created");
    Ok(inserted)
}

pub async fn rename_gate(
    db: &DatabaseConnection,
    gate_id: i32,
    new_name: &str,
) -> AppResult<gate::Model> {
    let new_name = validate_gate_name(new_name)?;

    let txn = db.begin().await?;

    let gate = gate::Entity::find_by_id(gate_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gate {} not found", gate_id)))?;

    if gate.gate_name == new_name {
        txn.commit().await?;
        return Ok(gate);
    }

    ensure_name_free(&txn, &new_name, Some(gate.id)).await?;

    let old_name = gate.gate_name.clone();
    let mut active: gate::ActiveModel = gate.into();
    active.gate_name = Set(new_name.clone());

    let updated = active
        .update(&txn)
        .await
        .map_err(|err| map_name_violation(err, &new_name))?;
    txn.commit().await?;

    tracing::info!(from = %old_name, to = %updated.gate_name, "Gate renamed");
    Ok(updated)
}

/// Toggle a gate's active flag.
///
/// Deactivating a gate that scheduled or boarding flights still point at is
/// a conflict; the configured policy decides whether that rejects the
/// request or silently unassigns those flights first.
pub async fn set_active(
    db: &DatabaseConnection,
    gate_id: i32,
    active: bool,
    policy: GateDeactivationPolicy,
) -> AppResult<gate::Model> {
    let txn = db.begin().await?;

    let gate = gate::Entity::find_by_id(gate_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gate {} not found", gate_id)))?;

    if gate.is_active == active {
        txn.commit().await?;
        return Ok(gate);
    }

    if !active {
        let holding = flight::Entity::find()
            .filter(flight::Column::GateId.eq(gate.id))
            .filter(
                flight::Column::Status
                    .is_in([FlightStatus::Scheduled, FlightStatus::Boarding]),
            )
            .all(&txn)
            .await?;

        if !holding.is_empty() {
            match policy {
                GateDeactivationPolicy::Reject => {
                    return Err(AppError::GateInUse(format!(
                        "Gate {} is referenced by {} upcoming flight(s)",
                        gate.gate_name,
                        holding.len()
                    )));
                }
                GateDeactivationPolicy::Unassign => {
                    let cleared = holding.len();
                    for held in holding {
                        let mut flight_active: flight::ActiveModel = held.into();
                        flight_active.gate_id = Set(None);
                        flight_active.updated_at = Set(Utc::now().into());
                        flight_active.update(&txn).await?;
                    }
                    tracing::info!(
                        gate = %gate.gate_name,
                        flights = cleared,
                        "Unassigned upcoming flights before gate deactivation"
                    );
                }
            }
        }
    }

    let gate_name = gate.gate_name.clone();
    let mut gate_active: gate::ActiveModel = gate.into();
    gate_active.is_active = Set(active);

    let updated = gate_active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(gate = %gate_name, active, "Gate active flag changed");
    Ok(updated)
}

/// Point a flight at a gate. The gate must exist and be active, and the
/// flight must still be on the ground side of its lifecycle.
pub async fn assign_to_flight(
    db: &DatabaseConnection,
    flight_id: i32,
    gate_id: i32,
) -> AppResult<flight::Model> {
    let txn = db.begin().await?;

    let flight = flight::Entity::find_by_id(flight_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", flight_id)))?;

    if flight.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Flight {} is no longer active; gates cannot be assigned",
            flight.flight_no
        )));
    }

    let gate = gate::Entity::find_by_id(gate_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gate {} not found", gate_id)))?;

    if !gate.is_active {
        return Err(AppError::Conflict(format!(
            "Gate {} is inactive",
            gate.gate_name
        )));
    }

    let flight_no = flight.flight_no.clone();
    let mut active: flight::ActiveModel = flight.into();
    active.gate_id = Set(Some(gate.id));
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(flight = %flight_no, gate = %gate.gate_name, "Gate assigned to flight");
    Ok(updated)
}

/// Clear a flight's gate association. Clearing a flight with no gate is a
/// no-op success.
pub async fn release_from_flight(
    db: &DatabaseConnection,
    flight_id: i32,
) -> AppResult<flight::Model> {
    let txn = db.begin().await?;

    let flight = flight::Entity::find_by_id(flight_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", flight_id)))?;

    if flight.gate_id.is_none() {
        txn.commit().await?;
        return Ok(flight);
    }

    let flight_no = flight.flight_no.clone();
    let mut active: flight::ActiveModel = flight.into();
    active.gate_id = Set(None);
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(flight = %flight_no, "Gate released from flight");
    Ok(updated)
}

fn validate_gate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Gate name must not be blank".to_string(),
        ));
    }
    Ok(name.to_string())
}

async fn ensure_name_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    exclude_gate: Option<i32>,
) -> AppResult<()> {
    let mut query = gate::Entity::find().filter(gate::Column::GateName.eq(name));
    if let Some(gate_id) = exclude_gate {
        query = query.filter(gate::Column::Id.ne(gate_id));
    }

    if query.one(conn).await?.is_some() {
        return Err(AppError::DuplicateName(format!(
            "Gate name {} is already in use",
            name
        )));
    }
    Ok(())
}

fn map_name_violation(err: DbErr, name: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateName(format!(
            "Gate name {} was taken by a concurrent operation",
            name
        )),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn gate_row(id: i32, name: &str, is_active: bool) -> gate::Model {
        gate::Model {
            id,
            gate_name: name.to_string(),
            is_active,
            created_at: Utc::now().into(),
        }
    }

    fn flight_row(id: i32, status: FlightStatus, gate_id: Option<i32>) -> flight::Model {
        let departure = Utc::now();
        flight::Model {
            id,
            flight_no: "AA101".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            scheduled_departure: departure.into(),
            scheduled_arrival: (departure + chrono::Duration::hours(6)).into(),
            aircraft_type: "B738".to_string(),
            status,
            gate_id,
            created_at: departure.into(),
            updated_at: departure.into(),
        }
    }

    #[tokio::test]
    async fn test_create_gate_rejects_duplicate_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![gate_row(1, "G12", true)]])
            .into_connection();

        let err = create_gate(&db, "G12").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_create_gate_trims_name() {
        let created = gate_row(1, "G12", true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<gate::Model>::new(), vec![created]])
            .into_connection();

        let gate = create_gate(&db, "  G12  ").await.unwrap();
        assert_eq!(gate.gate_name, "G12");
        assert!(gate.is_active);
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![gate_row(1, "G12", true)],
                vec![gate_row(2, "G13", true)],
            ])
            .into_connection();

        let err = rename_gate(&db, 1, "G13").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_deactivate_unreferenced_gate_succeeds() {
        let deactivated = gate_row(1, "G12", false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![gate_row(1, "G12", true)]])
            .append_query_results([Vec::<flight::Model>::new()])
            .append_query_results([vec![deactivated]])
            .into_connection();

        let gate = set_active(&db, 1, false, GateDeactivationPolicy::Reject)
            .await
            .unwrap();
        assert!(!gate.is_active);
    }

    #[tokio::test]
    async fn test_deactivate_held_gate_rejected_under_reject_policy() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![gate_row(1, "G12", true)]])
            .append_query_results([vec![flight_row(3, FlightStatus::Boarding, Some(1))]])
            .into_connection();

        let err = set_active(&db, 1, false, GateDeactivationPolicy::Reject)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GateInUse(_)));
    }

    #[tokio::test]
    async fn test_deactivate_held_gate_unassigns_under_unassign_policy() {
        let deactivated = gate_row(1, "G12", false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![gate_row(1, "G12", true)]])
            .append_query_results([vec![flight_row(3, FlightStatus::Boarding, Some(1))]])
            .append_query_results([vec![flight_row(3, FlightStatus::Boarding, None)]])
            .append_query_results([vec![deactivated]])
            .into_connection();

        let gate = set_active(&db, 1, false, GateDeactivationPolicy::Unassign)
            .await
            .unwrap();
        assert!(!gate.is_active);
    }

    #[tokio::test]
    async fn test_toggle_to_current_state_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![gate_row(1, "G12", true)]])
            .into_connection();

        let gate = set_active(&db, 1, true, GateDeactivationPolicy::Reject)
            .await
            .unwrap();
        assert!(gate.is_active);
    }

    #[tokio::test]
    async fn test_assign_inactive_gate_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight_row(3, FlightStatus::Scheduled, None)]])
            .append_query_results([vec![gate_row(1, "G12", false)]])
            .into_connection();

        let err = assign_to_flight(&db, 3, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_assign_gate_to_flight() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight_row(3, FlightStatus::Scheduled, None)]])
            .append_query_results([vec![gate_row(1, "G12", true)]])
            .append_query_results([vec![flight_row(3, FlightStatus::Scheduled, Some(1))]])
            .into_connection();

        let updated = assign_to_flight(&db, 3, 1).await.unwrap();
        assert_eq!(updated.gate_id, Some(1));
    }

    #[tokio::test]
    async fn test_assign_gate_to_finished_flight_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight_row(3, FlightStatus::Arrived, None)]])
            .into_connection();

        let err = assign_to_flight(&db, 3, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_release_without_gate_is_noop() {
        let flight = flight_row(3, FlightStatus::Scheduled, None);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight.clone()]])
            .into_connection();

        let result = release_from_flight(&db, 3).await.unwrap();
        assert_eq!(result, flight);
    }
}
