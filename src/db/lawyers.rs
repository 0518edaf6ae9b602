use sea_orm::*;
use uuid::Uuid;

use crate::models::lawyers;
use crate::models::users;

/// Fetch a single lawyer profile by user ID.
pub async fn get_lawyer_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<lawyers::Model>, DbErr> {
    lawyers::Entity::find_by_id(id).one(db).await
}

/// Lawyers with exactly this specialization, paired with their user rows.
pub async fn find_by_specialization<C: ConnectionTrait>(
    db: &C,
    specialization: &str,
) -> Result<Vec<(lawyers::Model, users::Model)>, DbErr> {
    let rows = lawyers::Entity::find()
        .filter(lawyers::Column::Specialization.eq(specialization))
        .find_also_related(users::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(lawyer, user)| user.map(|user| (lawyer, user)))
        .collect())
}
