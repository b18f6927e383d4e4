use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::entities::booking::{self, CheckInStatus};
use crate::entities::flight;
use crate::error::{AppError, AppResult};
use crate::services::{idgen, seats};

pub struct NewBooking {
    pub flight_id: i32,
    pub passenger_name: String,
    pub passport_no: Option<String>,
    pub seat_number: Option<String>,
}

/// Create a booking against an existing flight.
///
/// The booking reference comes from the sequence inside the same transaction
/// as the insert; a seat given here is a pre-assignment, the passenger still
/// has to check in.
pub async fn create_booking(
    db: &DatabaseConnection,
    new: NewBooking,
) -> AppResult<booking::Model> {
    let passenger_name = new.passenger_name.trim();
    if passenger_name.is_empty() {
        return Err(AppError::Validation(
            "Passenger name must not be blank".to_string(),
        ));
    }
    if let Some(seat) = &new.seat_number {
        seats::validate_seat_number(seat)?;
    }

    let txn = db.begin().await?;

    flight::Entity::find_by_id(new.flight_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", new.flight_id)))?;

    if let Some(seat) = &new.seat_number {
        seats::ensure_seat_available(&txn, new.flight_id, seat, None).await?;
    }

    let reference = idgen::next_booking_reference(&txn).await?;

    let model = booking::ActiveModel {
        flight_id: Set(new.flight_id),
        passenger_name: Set(passenger_name.to_string()),
        seat_number: Set(new.seat_number.clone()),
        booking_reference: Set(reference),
        passport_no: Set(new.passport_no),
        check_in_status: Set(CheckInStatus::NotCheckedIn),
        check_in_time: Set(None),
        ..Default::default()
    };

    let inserted = model.insert(&txn).await.map_err(|err| match &new.seat_number {
        Some(seat) => seats::map_seat_violation(err, seat),
        None => err.into(),
    })?;

    txn.commit().await?;

    tracing::info!(
        booking_id = inserted.id,
        reference = %inserted.booking_reference,
        flight_id = inserted.flight_id,
        "Booking created"
    );
    Ok(inserted)
}

/// Check a passenger in on a seat.
///
/// Already checked in with the same seat: no-op success. Already checked in
/// with a different seat: the seat moves after re-validation, the original
/// check-in time stands. Otherwise the booking takes the seat, becomes
/// checked in and is stamped with the transition instant. A seat conflict
/// leaves the booking untouched.
pub async fn check_in(
    db: &DatabaseConnection,
    booking_id: i32,
    seat_number: &str,
) -> AppResult<booking::Model> {
    seats::validate_seat_number(seat_number)?;

    let txn = db.begin().await?;

    let booking = booking::Entity::find_by_id(booking_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

    if booking.check_in_status == CheckInStatus::CheckedIn {
        if booking.seat_number.as_deref() == Some(seat_number) {
            txn.commit().await?;
            return Ok(booking);
        }

        let updated = seats::assign_seat(&txn, booking, seat_number).await?;
        txn.commit().await?;

        tracing::info!(
            booking_id,
            seat = seat_number,
            "Seat moved on an already checked-in booking"
        );
        return Ok(updated);
    }

    seats::ensure_seat_available(&txn, booking.flight_id, seat_number, Some(booking.id)).await?;

    let mut active: booking::ActiveModel = booking.into();
    active.seat_number = Set(Some(seat_number.to_string()));
    active.check_in_status = Set(CheckInStatus::CheckedIn);
    active.check_in_time = Set(Some(Utc::now().into()));

    let updated = active
        .update(&txn)
        .await
        .map_err(|err| seats::map_seat_violation(err, seat_number))?;

    txn.commit().await?;

    tracing::info!(booking_id, seat = seat_number, "Passenger checked in");
    Ok(updated)
}

/// Administrative override: undo a check-in.
///
/// Not part of the desk workflow; the seat stays on the booking as a
/// pre-assignment, only the status and timestamp are cleared.
pub async fn revoke_check_in(
    db: &DatabaseConnection,
    booking_id: i32,
) -> AppResult<booking::Model> {
    let txn = db.begin().await?;

    let booking = booking::Entity::find_by_id(booking_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

    if booking.check_in_status == CheckInStatus::NotCheckedIn {
        txn.commit().await?;
        return Ok(booking);
    }

    let mut active: booking::ActiveModel = booking.into();
    active.check_in_status = Set(CheckInStatus::NotCheckedIn);
    active.check_in_time = Set(None);

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(booking_id, "Check-in revoked");
    Ok(updated)
}
