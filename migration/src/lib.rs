pub use sea_orm_migration::prelude::*;

mod m20260730_000001_create_users;
mod m20260730_000002_create_gates;
mod m20260730_000003_create_flights;
mod m20260730_000004_create_bookings;
mod m20260730_000005_create_baggage;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260730_000001_create_users::Migration),
            Box::new(m20260730_000002_create_gates::Migration),
            Box::new(m20260730_000003_create_flights::Migration),
            Box::new(m20260730_000004_create_bookings::Migration),
            Box::new(m20260730_000005_create_baggage::Migration),
        ]
    }
}
