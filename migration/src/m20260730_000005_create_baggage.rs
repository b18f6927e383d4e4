use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20260730_000004_create_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create baggage type enum
        manager
            .create_type(
                Type::create()
                    .as_enum(BaggageType::Enum)
                    .values([
                        BaggageType::Checked,
                        BaggageType::CarryOn,
                        BaggageType::Oversized,
                        BaggageType::Fragile,
                    ])
                    .to_owned(),
            )
            .await?;

        // Create baggage status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(BaggageStatus::Enum)
                    .values([
                        BaggageStatus::CheckedIn,
                        BaggageStatus::Loaded,
                        BaggageStatus::InTransit,
                        BaggageStatus::Delivered,
                        BaggageStatus::Lost,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Baggage::Table)
                    .if_not_exists()
                    .col(pk_auto(Baggage::Id))
                    .col(integer(Baggage::BookingId).not_null())
                    .col(double(Baggage::WeightKg).not_null())
                    .col(string_len(Baggage::BaggageTag, 12).not_null().unique_key())
                    .col(
                        ColumnDef::new(Baggage::BaggageType)
                            .custom(BaggageType::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Baggage::Status)
                            .custom(BaggageStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Baggage::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_baggage_booking")
                            .from(Baggage::Table, Baggage::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tag numbers come from a sequence; uniqueness backed by the column constraint
        manager
            .get_connection()
            .execute_unprepared("CREATE SEQUENCE baggage_tag_seq START WITH 1")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP SEQUENCE IF EXISTS baggage_tag_seq")
            .await?;

        manager
            .drop_table(Table::drop().table(Baggage::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BaggageStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BaggageType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Baggage {
    #[sea_orm(iden = "baggage")]
    Table,
    Id,
    BookingId,
    WeightKg,
    BaggageTag,
    BaggageType,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum BaggageType {
    #[sea_orm(iden = "baggage_type")]
    Enum,
    #[sea_orm(iden = "checked")]
    Checked,
    #[sea_orm(iden = "carry_on")]
    CarryOn,
    #[sea_orm(iden = "oversized")]
    Oversized,
    #[sea_orm(iden = "fragile")]
    Fragile,
}

#[derive(DeriveIden)]
pub enum BaggageStatus {
    #[sea_orm(iden = "baggage_status")]
    Enum,
    #[sea_orm(iden = "checked_in")]
    CheckedIn,
    #[sea_orm(iden = "loaded")]
    Loaded,
    #[sea_orm(iden = "in_transit")]
    InTransit,
    #[sea_orm(iden = "delivered")]
    Delivered,
    #[sea_orm(iden = "lost")]
    Lost,
}
