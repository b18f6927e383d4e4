use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gate::Table)
                    .if_not_exists()
                    .col(pk_auto(Gate::Id))
                    .col(string_len(Gate::GateName, 20).not_null().unique_key())
                    .col(boolean(Gate::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Gate::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Gate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Gate {
    #[sea_orm(iden = "gates")]
    Table,
    Id,
    GateName,
    IsActive,
    CreatedAt,
}
