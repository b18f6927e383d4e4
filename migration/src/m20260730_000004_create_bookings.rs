use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20260730_000003_create_flights::Flight;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create check-in status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(CheckInStatus::Enum)
                    .values([CheckInStatus::NotCheckedIn, CheckInStatus::CheckedIn])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(integer(Booking::FlightId).not_null())
                    .col(string_len(Booking::PassengerName, 100).not_null())
                    .col(string_len_null(Booking::SeatNumber, 10))
                    .col(
                        string_len(Booking::BookingReference, 12)
                            .not_null()
                            .unique_key(),
                    )
                    .col(string_len_null(Booking::PassportNo, 20))
                    .col(
                        ColumnDef::new(Booking::CheckInStatus)
                            .custom(CheckInStatus::Enum)
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(Booking::CheckInTime))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_flight")
                            .from(Booking::Table, Booking::FlightId)
                            .to(Flight::Table, Flight::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One seat per flight; NULL seats (not yet assigned) are exempt
        manager
            .create_index(
                Index::create()
                    .name("uq_bookings_flight_seat")
                    .table(Booking::Table)
                    .col(Booking::FlightId)
                    .col(Booking::SeatNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Booking references come from a sequence, never from row counts
        manager
            .get_connection()
            .execute_unprepared("CREATE SEQUENCE booking_ref_seq START WITH 1")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP SEQUENCE IF EXISTS booking_ref_seq")
            .await?;

        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(CheckInStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    #[sea_orm(iden = "bookings")]
    Table,
    Id,
    FlightId,
    PassengerName,
    SeatNumber,
    BookingReference,
    PassportNo,
    CheckInStatus,
    CheckInTime,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum CheckInStatus {
    #[sea_orm(iden = "check_in_status")]
    Enum,
    #[sea_orm(iden = "not_checked_in")]
    NotCheckedIn,
    #[sea_orm(iden = "checked_in")]
    CheckedIn,
}
