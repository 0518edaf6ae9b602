pub mod cases;
pub mod documents;
pub mod lawyers;
pub mod roles;
pub mod users;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Create a SeaORM connection pool for `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Apply pending migrations and seed the fixed role set.
pub async fn prepare(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await?;
    roles::ensure_default_roles(db).await
}
