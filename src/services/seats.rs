use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr};

use crate::entities::booking;
use crate::error::{AppError, AppResult};

/// A seat is available iff no other booking on the same flight holds that
/// exact seat number. Comparison is case-sensitive; "14c" and "14C" differ.
pub async fn is_seat_available<C: ConnectionTrait>(
    conn: &C,
    flight_id: i32,
    seat_number: &str,
    exclude_booking: Option<i32>,
) -> AppResult<bool> {
    let mut query = booking::Entity::find()
        .filter(booking::Column::FlightId.eq(flight_id))
        .filter(booking::Column::SeatNumber.eq(seat_number));

    if let Some(booking_id) = exclude_booking {
        query = query.filter(booking::Column::Id.ne(booking_id));
    }

    Ok(query.one(conn).await?.is_none())
}

/// Advisory pre-check; the unique index on (flight_id, seat_number) remains
/// the actual guarantee under concurrency.
pub async fn ensure_seat_available<C: ConnectionTrait>(
    conn: &C,
    flight_id: i32,
    seat_number: &str,
    exclude_booking: Option<i32>,
) -> AppResult<()> {
    if !is_seat_available(conn, flight_id, seat_number, exclude_booking).await? {
        return Err(AppError::SeatConflict(format!(
            "Seat {} is already taken on this flight",
            seat_number
        )));
    }
    Ok(())
}

pub fn validate_seat_number(seat_number: &str) -> AppResult<()> {
    if seat_number.trim().is_empty() {
        return Err(AppError::Validation(
            "Seat number must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Put a booking on a seat, inside the caller's transaction.
///
/// Re-assigning the seat the booking already holds is a no-op success. A
/// racing assignment that slips past the advisory check is caught by the
/// store's unique index and reported as a SeatConflict.
pub async fn assign_seat<C: ConnectionTrait>(
    conn: &C,
    booking: booking::Model,
    seat_number: &str,
) -> AppResult<booking::Model> {
    validate_seat_number(seat_number)?;

    if booking.seat_number.as_deref() == Some(seat_number) {
        return Ok(booking);
    }

    ensure_seat_available(conn, booking.flight_id, seat_number, Some(booking.id)).await?;

    let mut active: booking::ActiveModel = booking.into();
    active.seat_number = Set(Some(seat_number.to_string()));

    active
        .update(conn)
        .await
        .map_err(|err| map_seat_violation(err, seat_number))
}

/// Remap a unique-index violation on the seat column to the typed conflict.
pub fn map_seat_violation(err: DbErr, seat_number: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::SeatConflict(format!(
            "Seat {} was taken by a concurrent operation",
            seat_number
        )),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entities::booking::CheckInStatus;

    use super::*;

    fn booking_row(id: i32, flight_id: i32, seat: Option<&str>) -> booking::Model {
        booking::Model {
            id,
            flight_id,
            passenger_name: "J. Doe".to_string(),
            seat_number: seat.map(str::to_string),
            booking_reference: format!("BK{:06}", id),
            passport_no: None,
            check_in_status: CheckInStatus::NotCheckedIn,
            check_in_time: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_seat_free_when_no_booking_holds_it() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<booking::Model>::new()])
            .into_connection();

        assert!(is_seat_available(&db, 1, "14C", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_seat_taken_when_another_booking_holds_it() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![booking_row(7, 1, Some("14C"))],
                vec![booking_row(7, 1, Some("14C"))],
            ])
            .into_connection();

        assert!(!is_seat_available(&db, 1, "14C", None).await.unwrap());

        let err = ensure_seat_available(&db, 1, "14C", None).await.unwrap_err();
        assert!(matches!(err, AppError::SeatConflict(_)));
    }

    #[tokio::test]
    async fn test_reassigning_same_seat_is_noop() {
        // No query results appended: a store round-trip would fail the test
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let booking = booking_row(7, 1, Some("14C"));
        let result = assign_seat(&db, booking.clone(), "14C").await.unwrap();
        assert_eq!(result, booking);
    }

    #[tokio::test]
    async fn test_assigning_free_seat_updates_booking() {
        let moved = booking_row(7, 1, Some("15A"));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<booking::Model>::new(),  // availability probe: free
                vec![moved.clone()],           // update returning
            ])
            .into_connection();

        let result = assign_seat(&db, booking_row(7, 1, Some("14C")), "15A")
            .await
            .unwrap();
        assert_eq!(result.seat_number.as_deref(), Some("15A"));
    }

    #[tokio::test]
    async fn test_blank_seat_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = assign_seat(&db, booking_row(7, 1, None), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_occupied_seat_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking_row(9, 1, Some("15A"))]])
            .into_connection();

        let err = assign_seat(&db, booking_row(7, 1, Some("14C")), "15A")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SeatConflict(_)));
    }
}
