use actix_multipart::Multipart;
use actix_web::http::header::ContentDisposition;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::authorization::verify_case_party;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::documents as document_db;
use crate::db::users as user_db;
use crate::error::{AppError, AppResult};
use crate::handlers::multipart::read_form;
use crate::models::accounts::UserResponse;
use crate::models::cases::CaseSummary;
use crate::models::documents::{DocumentMeta, NewDocument, is_allowed_attachment};
use crate::response;
use crate::storage::{UploadStore, sanitize_file_name};

/// A case with both parties and its attachment metadata.
#[derive(Debug, Serialize)]
pub struct CaseDetails {
    pub case: CaseSummary,
    pub client: Option<UserResponse>,
    pub lawyer: Option<UserResponse>,
    pub documents: Vec<DocumentMeta>,
}

/// GET /api/cases/{case_id}
pub async fn get_case(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadStore>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let case_id = path.into_inner();
    let case = verify_case_party(db.get_ref(), case_id, &user).await?;

    let client = user_db::get_account(db.get_ref(), case.client_id)
        .await?
        .map(|account| UserResponse::new(account, &uploads));

    let lawyer = match case.lawyer_id {
        Some(lawyer_id) => user_db::get_account(db.get_ref(), lawyer_id)
            .await?
            .map(|account| UserResponse::new(account, &uploads)),
        None => None,
    };

    let documents = document_db::list_for_case(db.get_ref(), case_id).await?;

    let summary = CaseSummary::new(
        case,
        client.as_ref().map(|c| format!("{} {}", c.firstname, c.lastname)),
        lawyer.as_ref().map(|l| format!("{} {}", l.firstname, l.lastname)),
    );

    Ok(response::ok(
        "Case retrieved successfully",
        CaseDetails {
            case: summary,
            client,
            lawyer,
            documents,
        },
    ))
}

/// POST /api/cases/{case_id}/documents — attach files to an existing case.
///
/// Every file under `documents` must have an allowed extension; otherwise
/// nothing is stored. The batch is written in one transaction.
pub async fn upload_documents(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let case_id = path.into_inner();
    verify_case_party(db.get_ref(), case_id, &user).await?;

    let form = read_form(payload).await?;
    let mut attachments = Vec::new();
    for file in form.files_named("documents") {
        let file_name = sanitize_file_name(&file.file_name);
        if !is_allowed_attachment(&file_name) {
            return Err(AppError::validation(format!(
                "File type not allowed: {}",
                file.file_name
            )));
        }
        attachments.push(NewDocument {
            file_name,
            file_data: file.data.clone(),
        });
    }

    if attachments.is_empty() {
        return Err(AppError::validation("No documents provided"));
    }

    let stored = document_db::add_documents(db.get_ref(), case_id, attachments, user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {case_id} not found")))?;

    Ok(response::created("Documents uploaded successfully", stored))
}

/// GET /api/cases/{case_id}/documents/{document_id} — the raw file.
pub async fn download_document(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (case_id, document_id) = path.into_inner();
    verify_case_party(db.get_ref(), case_id, &user).await?;

    let document = document_db::get_document(db.get_ref(), case_id, document_id)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))?;

    let data = document
        .file_data
        .ok_or_else(|| AppError::not_found("Document has no content"))?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(ContentDisposition::attachment(document.file_name))
        .body(data))
}
