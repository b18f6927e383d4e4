use sea_orm::{ActiveEnum, ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::config::BaggageCheckinPolicy;
use crate::entities::baggage::{self, BaggageStatus, BaggageType};
use crate::entities::booking::{self, CheckInStatus};
use crate::error::{AppError, AppResult};
use crate::services::idgen;

pub struct NewBaggage {
    pub booking_id: i32,
    pub weight_kg: f64,
    pub baggage_type: BaggageType,
}

/// Register a bag against a booking and issue its tag.
///
/// The tag comes from the sequence inside the same transaction as the
/// insert and never changes afterwards. Whether the owning booking must
/// already be checked in is a deployment policy.
pub async fn register(
    db: &DatabaseConnection,
    new: NewBaggage,
    policy: BaggageCheckinPolicy,
) -> AppResult<baggage::Model> {
    if !(new.weight_kg > 0.0) {
        return Err(AppError::Validation(
            "Baggage weight must be positive".to_string(),
        ));
    }

    let txn = db.begin().await?;

    let booking = booking::Entity::find_by_id(new.booking_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", new.booking_id)))?;

    if booking.check_in_status != CheckInStatus::CheckedIn {
        match policy {
            BaggageCheckinPolicy::Strict => {
                return Err(AppError::Conflict(format!(
                    "Booking {} has not checked in yet",
                    booking.booking_reference
                )));
            }
            BaggageCheckinPolicy::Log => {
                tracing::warn!(
                    booking_id = booking.id,
                    reference = %booking.booking_reference,
                    "Registering baggage for a booking that has not checked in"
                );
            }
        }
    }

    let tag = idgen::next_baggage_tag(&txn).await?;

    let model = baggage::ActiveModel {
        booking_id: Set(booking.id),
        weight_kg: Set(new.weight_kg),
        baggage_tag: Set(tag),
        baggage_type: Set(new.baggage_type),
        status: Set(BaggageStatus::CheckedIn),
        ..Default::default()
    };

    let inserted = model.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        baggage_id = inserted.id,
        tag = %inserted.baggage_tag,
        booking_id = inserted.booking_id,
        "Baggage registered"
    );
    Ok(inserted)
}

/// Move a bag to the requested lifecycle state.
///
/// Terminal bags reject everything; anything the transition table does not
/// allow is an invalid transition, never a silent write.
pub async fn advance(
    db: &DatabaseConnection,
    baggage_id: i32,
    target: BaggageStatus,
) -> AppResult<baggage::Model> {
    let txn = db.begin().await?;

    let item = baggage::Entity::find_by_id(baggage_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Baggage {} not found", baggage_id)))?;

    if item.status.is_terminal() {
        return Err(AppError::TerminalState(format!(
            "Baggage {} is {} and cannot change state",
            item.baggage_tag,
            item.status.to_value()
        )));
    }

    if !item.status.can_transition_to(&target) {
        return Err(AppError::InvalidTransition(format!(
            "Baggage {} cannot move from {} to {}",
            item.baggage_tag,
            item.status.to_value(),
            target.to_value()
        )));
    }

    let tag = item.baggage_tag.clone();
    let from = item.status.clone();

    let mut active: baggage::ActiveModel = item.into();
    active.status = Set(target);

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        tag = %tag,
        from = %from.to_value(),
        to = %updated.status.to_value(),
        "Baggage advanced"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn baggage_row(id: i32, status: BaggageStatus) -> baggage::Model {
        baggage::Model {
            id,
            booking_id: 7,
            weight_kg: 23.5,
            baggage_tag: format!("BG{:06}", id),
            baggage_type: BaggageType::Checked,
            status,
            created_at: Utc::now().into(),
        }
    }

    fn booking_row(id: i32, status: CheckInStatus) -> booking::Model {
        booking::Model {
            id,
            flight_id: 1,
            passenger_name: "J. Doe".to_string(),
            seat_number: Some("14C".to_string()),
            booking_reference: "BK000042".to_string(),
            passport_no: None,
            check_in_status: status,
            check_in_time: None,
            created_at: Utc::now().into(),
        }
    }

    fn sequence_row(value: i64) -> BTreeMap<&'static str, Value> {
        let mut row = BTreeMap::new();
        row.insert("value", Value::BigInt(Some(value)));
        row
    }

    fn new_bag(booking_id: i32, weight_kg: f64) -> NewBaggage {
        NewBaggage {
            booking_id,
            weight_kg,
            baggage_type: BaggageType::Checked,
        }
    }

    #[tokio::test]
    async fn test_register_rejects_non_positive_weight() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        for weight in [0.0, -3.2, f64::NAN] {
            let err = register(&db, new_bag(7, weight), BaggageCheckinPolicy::Strict)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_register_rejects_missing_booking() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<booking::Model>::new()])
            .into_connection();

        let err = register(&db, new_bag(404, 20.0), BaggageCheckinPolicy::Strict)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_strict_policy_requires_checked_in_booking() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking_row(7, CheckInStatus::NotCheckedIn)]])
            .into_connection();

        let err = register(&db, new_bag(7, 20.0), BaggageCheckinPolicy::Strict)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_log_policy_allows_unchecked_booking() {
        let inserted = baggage_row(1, BaggageStatus::CheckedIn);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking_row(7, CheckInStatus::NotCheckedIn)]])
            .append_query_results([vec![sequence_row(1)]])
            .append_query_results([vec![inserted]])
            .into_connection();

        let bag = register(&db, new_bag(7, 20.0), BaggageCheckinPolicy::Log)
            .await
            .unwrap();
        assert_eq!(bag.status, BaggageStatus::CheckedIn);
    }

    #[tokio::test]
    async fn test_register_issues_sequence_tag() {
        let inserted = baggage_row(17, BaggageStatus::CheckedIn);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking_row(7, CheckInStatus::CheckedIn)]])
            .append_query_results([vec![sequence_row(17)]])
            .append_query_results([vec![inserted]])
            .into_connection();

        let bag = register(&db, new_bag(7, 23.5), BaggageCheckinPolicy::Strict)
            .await
            .unwrap();
        assert_eq!(bag.baggage_tag, "BG000017");
    }

    #[tokio::test]
    async fn test_advance_happy_path() {
        let loaded = baggage_row(1, BaggageStatus::Loaded);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![baggage_row(1, BaggageStatus::CheckedIn)],
                vec![loaded],
            ])
            .into_connection();

        let updated = advance(&db, 1, BaggageStatus::Loaded).await.unwrap();
        assert_eq!(updated.status, BaggageStatus::Loaded);
    }

    #[tokio::test]
    async fn test_advance_rejects_skipped_state() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![baggage_row(1, BaggageStatus::CheckedIn)]])
            .into_connection();

        let err = advance(&db, 1, BaggageStatus::Delivered).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_advance_rejects_terminal_states() {
        for terminal in [BaggageStatus::Delivered, BaggageStatus::Lost] {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![baggage_row(1, terminal)]])
                .into_connection();

            let err = advance(&db, 1, BaggageStatus::Loaded).await.unwrap_err();
            assert!(matches!(err, AppError::TerminalState(_)));
        }
    }

    #[tokio::test]
    async fn test_bag_can_be_declared_lost_mid_journey() {
        let lost = baggage_row(1, BaggageStatus::Lost);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![baggage_row(1, BaggageStatus::InTransit)],
                vec![lost],
            ])
            .into_connection();

        let updated = advance(&db, 1, BaggageStatus::Lost).await.unwrap();
        assert_eq!(updated.status, BaggageStatus::Lost);
    }

    #[tokio::test]
    async fn test_advance_missing_bag_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<baggage::Model>::new()])
            .into_connection();

        let err = advance(&db, 404, BaggageStatus::Loaded).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
