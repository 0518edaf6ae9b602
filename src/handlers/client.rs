use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_client;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::cases::{self as case_db, Rating};
use crate::db::lawyers as lawyer_db;
use crate::db::users as user_db;
use crate::error::{AppError, AppResult};
use crate::handlers::multipart::{FormData, read_form};
use crate::models::accounts::LawyerListing;
use crate::models::cases::NewCase;
use crate::models::clients::UpdateClientProfile;
use crate::models::documents::{NewDocument, is_allowed_attachment};
use crate::models::lawyers::{LawyerSearch, RateLawyer};
use crate::response;
use crate::storage::{UploadStore, sanitize_file_name};

/// Multipart fields a submission cannot do without, by wire name.
const REQUIRED_CASE_FIELDS: [&str; 4] = ["title", "description", "urgencyLevel", "communicationMethod"];

/// POST /api/client/case-submit/{user_id} — open a new case, with optional attachments.
///
/// Files under `documents` are attached when their extension is allowed;
/// anything else is skipped.
pub async fn submit_case(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let client_id = path.into_inner();
    user.ensure_self_or_admin(client_id)?;

    let form = read_form(payload).await?;
    if form.fields.is_empty() {
        return Err(AppError::validation("No data provided"));
    }

    let input = new_case_from_form(&form)?;

    if user_db::get_client_by_id(db.get_ref(), client_id).await?.is_none() {
        return Err(AppError::not_found("Client not found"));
    }

    let attachments: Vec<NewDocument> = form
        .files_named("documents")
        .filter_map(|file| {
            let file_name = sanitize_file_name(&file.file_name);
            is_allowed_attachment(&file_name).then(|| NewDocument {
                file_name,
                file_data: file.data.clone(),
            })
        })
        .collect();

    let (case, documents) = case_db::submit_case(db.get_ref(), client_id, input, attachments).await?;

    Ok(response::created(
        "Case submitted successfully",
        serde_json::json!({
            "case_id": case.id,
            "documents": documents,
        }),
    ))
}

/// Build a submission from the form, reporting every missing required field.
pub fn new_case_from_form(form: &FormData) -> Result<NewCase, AppError> {
    let missing: Vec<&str> = REQUIRED_CASE_FIELDS
        .into_iter()
        .filter(|name| form.text(name).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(NewCase {
        title: form.text("title").unwrap_or_default(),
        description: form.text("description").unwrap_or_default(),
        category: form.text("category"),
        urgency: form.text("urgencyLevel").unwrap_or_default(),
        communication_method: form.text("communicationMethod").unwrap_or_default(),
        special_requirements: form.text("specialRequirements"),
    })
}

/// GET /api/client/cases/{user_id} — every case the client has opened.
pub async fn get_client_cases(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let client_id = path.into_inner();
    user.ensure_self_or_admin(client_id)?;

    if user_db::get_client_by_id(db.get_ref(), client_id).await?.is_none() {
        return Err(AppError::not_found("Client not found"));
    }

    let cases = case_db::get_cases_by_client(db.get_ref(), client_id).await?;
    let summaries = case_db::summarize(db.get_ref(), cases).await?;

    Ok(response::ok("Cases retrieved successfully", summaries))
}

/// POST /api/client/get-lawyers — lawyers with a given specialization.
pub async fn get_lawyers(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadStore>,
    body: web::Json<LawyerSearch>,
) -> AppResult<HttpResponse> {
    let specialization = body
        .into_inner()
        .specialization
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Missing required field: specialization"))?;

    let lawyers: Vec<LawyerListing> = lawyer_db::find_by_specialization(db.get_ref(), &specialization)
        .await?
        .into_iter()
        .map(|(lawyer, user)| LawyerListing::new(user, lawyer, &uploads))
        .collect();

    Ok(response::ok(
        "list of lawyers by specialization",
        serde_json::json!({ "lawyers": lawyers }),
    ))
}

/// PUT /api/client/profile — update the caller's contact details.
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateClientProfile>,
) -> AppResult<HttpResponse> {
    require_client(&user)?;
    let input = body.into_inner();

    if input.phone.is_none() && input.address.is_none() && input.location.is_none() {
        return Err(AppError::validation("No fields to update"));
    }

    let client = user_db::update_client_profile(db.get_ref(), user.id, input)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;
    tracing::info!(user_id = %user.id, "Client profile updated");

    Ok(response::ok("Profile updated successfully", client))
}

/// POST /api/client/cases/{case_id}/rate — rate the lawyer who handled a closed case.
pub async fn rate_case_lawyer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<RateLawyer>,
) -> AppResult<HttpResponse> {
    let case_id = path.into_inner();
    let value = body.rating;

    if !value.is_finite() || !(1.0..=5.0).contains(&value) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }

    let case = case_db::get_case_by_id(db.get_ref(), case_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {case_id} not found")))?;

    if case.client_id != user.id && !user.is_admin() {
        return Err(AppError::forbidden("Only the client who opened this case can rate it"));
    }

    let lawyer = match case_db::rate_case(db.get_ref(), case_id, value).await? {
        Rating::Rated { lawyer, .. } => lawyer,
        Rating::CaseNotFound => {
            return Err(AppError::not_found(format!("Case {case_id} not found")));
        }
        Rating::NotRateable => {
            return Err(AppError::validation(
                "Only closed cases with an assigned lawyer can be rated",
            ));
        }
        Rating::AlreadyRated => {
            return Err(AppError::conflict("This case has already been rated"));
        }
        Rating::LawyerNotFound => return Err(AppError::not_found("Lawyer not found")),
    };

    Ok(response::ok(
        "Lawyer rated successfully",
        serde_json::json!({
            "lawyer_id": lawyer.id,
            "rating": lawyer.rating,
        }),
    ))
}
