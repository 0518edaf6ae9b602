use sea_orm::*;
use uuid::Uuid;

use crate::models::roles::{self, RoleName};

/// Insert any of `admin`, `lawyer`, `client` that do not exist yet.
pub async fn ensure_default_roles<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    for name in RoleName::ALL {
        if find_by_name(db, name).await?.is_none() {
            roles::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name),
            }
            .insert(db)
            .await?;
            tracing::info!(role = name.as_str(), "Created role");
        }
    }
    Ok(())
}

/// Fetch a role by its unique name.
pub async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: RoleName,
) -> Result<Option<roles::Model>, DbErr> {
    roles::Entity::find()
        .filter(roles::Column::Name.eq(name))
        .one(db)
        .await
}
