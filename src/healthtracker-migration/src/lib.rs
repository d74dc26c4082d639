pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_packets;
pub mod m20261001_000002_workouts;
pub mod m20261001_000003_sleep;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_packets::Migration),
            Box::new(m20261001_000002_workouts::Migration),
            Box::new(m20261001_000003_sleep::Migration),
        ]
    }
}
