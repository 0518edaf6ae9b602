pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_and_roles;
mod m20250301_000002_create_profiles;
mod m20250301_000003_create_cases_table;
mod m20250301_000004_create_documents_table;
mod m20250302_000001_add_indexes;
mod m20250303_000001_add_rating_to_cases;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_and_roles::Migration),
            Box::new(m20250301_000002_create_profiles::Migration),
            Box::new(m20250301_000003_create_cases_table::Migration),
            Box::new(m20250301_000004_create_documents_table::Migration),
            Box::new(m20250302_000001_add_indexes::Migration),
            Box::new(m20250303_000001_add_rating_to_cases::Migration),
        ]
    }
}
