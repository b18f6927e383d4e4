use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20260730_000002_create_gates::Gate;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create flight status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(FlightStatus::Enum)
                    .values([
                        FlightStatus::Scheduled,
                        FlightStatus::Boarding,
                        FlightStatus::Departed,
                        FlightStatus::Arrived,
                        FlightStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Flight::Table)
                    .if_not_exists()
                    .col(pk_auto(Flight::Id))
                    .col(string_len(Flight::FlightNo, 10).not_null())
                    .col(string_len(Flight::Origin, 3).not_null())
                    .col(string_len(Flight::Destination, 3).not_null())
                    .col(timestamp_with_time_zone(Flight::ScheduledDeparture).not_null())
                    .col(timestamp_with_time_zone(Flight::ScheduledArrival).not_null())
                    .col(string_len(Flight::AircraftType, 50).not_null())
                    .col(
                        ColumnDef::new(Flight::Status)
                            .custom(FlightStatus::Enum)
                            .not_null(),
                    )
                    .col(integer_null(Flight::GateId))
                    .col(
                        timestamp_with_time_zone(Flight::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Flight::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_gate")
                            .from(Flight::Table, Flight::GateId)
                            .to(Gate::Table, Gate::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Flight numbers repeat across days; indexed for lookup, not unique
        manager
            .create_index(
                Index::create()
                    .name("idx_flights_flight_no")
                    .table(Flight::Table)
                    .col(Flight::FlightNo)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Flight::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(FlightStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Flight {
    #[sea_orm(iden = "flights")]
    Table,
    Id,
    FlightNo,
    Origin,
    Destination,
    ScheduledDeparture,
    ScheduledArrival,
    AircraftType,
    Status,
    GateId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum FlightStatus {
    #[sea_orm(iden = "flight_status")]
    Enum,
    #[sea_orm(iden = "scheduled")]
    Scheduled,
    #[sea_orm(iden = "boarding")]
    Boarding,
    #[sea_orm(iden = "departed")]
    Departed,
    #[sea_orm(iden = "arrived")]
    Arrived,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
