use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{require_lawyer, verify_case_assignee};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::cases::{self as case_db, Assignment, StatusChange};
use crate::db::users as user_db;
use crate::error::{AppError, AppResult};
use crate::models::cases::{CaseStatus, CaseSummary, UpdateCaseStatus};
use crate::models::lawyers::UpdateLawyerProfile;
use crate::response;

/// GET /api/lawyer/handle-cases/{case_id} — claim a pending case.
pub async fn handle_case(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let case_id = path.into_inner();
    let lawyer = require_lawyer(db.get_ref(), &user).await?;

    match case_db::assign_case(db.get_ref(), case_id, lawyer.id).await? {
        Assignment::Assigned { case, lawyer } => Ok(response::ok(
            format!("Case {case_id} has been assigned to Lawyer {}", lawyer.id),
            serde_json::json!({
                "case": CaseSummary::new(case, None, None),
                "lawyer_active_cases": lawyer.active_cases,
            }),
        )),
        Assignment::CaseNotFound => Err(AppError::not_found("Case not found")),
        Assignment::LawyerNotFound => Err(AppError::not_found("Lawyer not found")),
        Assignment::Unavailable(case) => {
            tracing::warn!(case_id = %case.id, status = %case.status, "Claim on unavailable case");
            Err(AppError::validation("Case is already assigned or not available"))
        }
    }
}

/// GET /api/lawyer/available-case — pending cases nobody has claimed.
pub async fn available_cases(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    require_lawyer(db.get_ref(), &user).await?;

    let cases = case_db::get_available_cases(db.get_ref()).await?;
    if cases.is_empty() {
        return Err(AppError::not_found("No available cases at the moment"));
    }

    let summaries = case_db::summarize(db.get_ref(), cases).await?;
    Ok(response::ok(
        "Available cases retrieved successfully",
        serde_json::json!({ "available_cases": summaries }),
    ))
}

/// GET /api/lawyer/assigned-cases — the caller's own cases.
pub async fn assigned_cases(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let lawyer = require_lawyer(db.get_ref(), &user).await?;

    let cases = case_db::get_cases_by_lawyer(db.get_ref(), lawyer.id).await?;
    if cases.is_empty() {
        return Err(AppError::not_found("No cases assigned to this lawyer"));
    }

    let summaries = case_db::summarize(db.get_ref(), cases).await?;
    Ok(response::ok(
        "Assigned cases retrieved successfully",
        serde_json::json!({ "assigned_cases": summaries }),
    ))
}

/// PUT /api/lawyer/cases/{case_id}/status — move a case through its lifecycle.
///
/// Only the assigned lawyer (or an admin) may do this. The literal is
/// checked before the case is looked up.
pub async fn update_case_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCaseStatus>,
) -> AppResult<HttpResponse> {
    let case_id = path.into_inner();
    let requested = body.into_inner().status;

    if CaseStatus::parse(&requested).is_none() {
        return Err(invalid_status(&requested));
    }

    verify_case_assignee(db.get_ref(), case_id, &user).await?;

    match case_db::update_status(db.get_ref(), case_id, &requested).await? {
        StatusChange::Updated(case) => Ok(response::ok(
            format!("Case status updated to {}", case.status),
            CaseSummary::new(case, None, None),
        )),
        StatusChange::InvalidStatus => Err(invalid_status(&requested)),
        StatusChange::CaseNotFound => Err(AppError::not_found("Case not found")),
    }
}

/// PUT /api/lawyer/profile — change the caller's specialization.
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateLawyerProfile>,
) -> AppResult<HttpResponse> {
    require_lawyer(db.get_ref(), &user).await?;
    let input = body.into_inner();

    if input.specialization.is_none() {
        return Err(AppError::validation("No fields to update"));
    }

    let lawyer = user_db::update_lawyer_profile(db.get_ref(), user.id, input)
        .await?
        .ok_or_else(|| AppError::not_found("Lawyer not found"))?;
    tracing::info!(user_id = %user.id, "Lawyer profile updated");

    Ok(response::ok("Profile updated successfully", lawyer))
}

fn invalid_status(requested: &str) -> AppError {
    let allowed: Vec<&str> = CaseStatus::ALL.iter().map(|s| s.as_str()).collect();
    AppError::validation(format!(
        "Invalid status '{requested}'. Must be one of: {}",
        allowed.join(", ")
    ))
}
