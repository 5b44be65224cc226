pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_directory_tables;
mod m20250301_000002_create_host_machines;
mod m20250301_000003_create_providers;
mod m20250301_000004_create_incidents;

/// Schema migrations for the incident database, applied in order at startup.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_directory_tables::Migration),
            Box::new(m20250301_000002_create_host_machines::Migration),
            Box::new(m20250301_000003_create_providers::Migration),
            Box::new(m20250301_000004_create_incidents::Migration),
        ]
    }
}
