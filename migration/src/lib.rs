pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_academic_tables;
mod m20250302_000001_create_campus_tables;
mod m20250303_000001_create_finance_hr_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_academic_tables::Migration),
            Box::new(m20250302_000001_create_campus_tables::Migration),
            Box::new(m20250303_000001_create_finance_hr_tables::Migration),
        ]
    }
}
