use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::cases as case_db;
use crate::db::lawyers as lawyer_db;
use crate::error::AppError;
use crate::models::users::UserType;
use crate::models::{cases, lawyers};

/// Load a case the caller may read: its client, its assigned lawyer, or an admin.
pub async fn verify_case_party(
    db: &DatabaseConnection,
    case_id: Uuid,
    user: &AuthenticatedUser,
) -> Result<cases::Model, AppError> {
    let case = find_case(db, case_id).await?;

    if !case.is_party(user.id) && !user.is_admin() {
        tracing::warn!(case_id = %case_id, user_id = %user.id, "Rejected access to case");
        return Err(AppError::forbidden("You are not a party to this case"));
    }

    Ok(case)
}

/// Load a case the caller may write to as its counsel: the assigned lawyer or an admin.
pub async fn verify_case_assignee(
    db: &DatabaseConnection,
    case_id: Uuid,
    user: &AuthenticatedUser,
) -> Result<cases::Model, AppError> {
    let case = find_case(db, case_id).await?;

    if case.lawyer_id != Some(user.id) && !user.is_admin() {
        tracing::warn!(case_id = %case_id, user_id = %user.id, "Rejected status change by non-assignee");
        return Err(AppError::forbidden("Only the assigned lawyer can update this case"));
    }

    Ok(case)
}

/// The caller's lawyer profile.
pub async fn require_lawyer(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
) -> Result<lawyers::Model, AppError> {
    if user.claims.user_type != UserType::Lawyer {
        return Err(AppError::not_found("Lawyer not found"));
    }

    lawyer_db::get_lawyer_by_id(db, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Lawyer not found"))
}

/// Reject callers whose token does not belong to a client.
pub fn require_client(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.claims.user_type == UserType::Client || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::not_found("Client not found"))
    }
}

async fn find_case(db: &DatabaseConnection, case_id: Uuid) -> Result<cases::Model, AppError> {
    case_db::get_case_by_id(db, case_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {case_id} not found")))
}
