pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_supplier_tables;
mod m20250901_000002_create_menu_tables;
mod m20250901_000003_create_costing_tables;
mod m20250901_000004_create_production_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_supplier_tables::Migration),
            Box::new(m20250901_000002_create_menu_tables::Migration),
            Box::new(m20250901_000003_create_costing_tables::Migration),
            Box::new(m20250901_000004_create_production_tables::Migration),
        ]
    }
}
