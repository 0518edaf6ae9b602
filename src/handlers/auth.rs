use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::jwt::{TokenIssuer, TokenType};
use crate::auth::middleware::{AuthenticatedUser, RefreshUser};
use crate::auth::password;
use crate::db::users as user_db;
use crate::db::users::Registration;
use crate::error::{AppError, AppResult};
use crate::handlers::multipart::read_form;
use crate::models::accounts::{NewAccount, NewProfile, UserResponse};
use crate::models::users::{LoginRequest, RegisterRequest, normalize_email};
use crate::response;
use crate::storage::{UploadStore, is_allowed_image, sanitize_file_name};

/// POST /api/auth/register — create a client or lawyer account and log it in.
///
/// Required fields are checked in a fixed order and the first missing one is
/// reported by its wire name. Lawyers also need a `barNumber`.
pub async fn register(
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    uploads: web::Data<UploadStore>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let first_name = required(body.first_name, "firstName")?;
    let last_name = required(body.last_name, "lastName")?;
    let email = normalize_email(&required(body.email, "email")?);
    let plain_password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::validation("Missing required field: password"))?;
    let user_type = required(body.user_type, "userType")?;

    let details = match user_type.to_lowercase().as_str() {
        "client" => NewProfile::Client {
            phone: body.phone,
            address: body.address,
            location: body.location,
        },
        "lawyer" => NewProfile::Lawyer {
            bar_number: required(body.bar_number, "barNumber")?,
            specialization: body.specialization,
        },
        _ => {
            return Err(AppError::validation(
                "Invalid userType. Must be 'client' or 'lawyer'",
            ));
        }
    };

    if user_db::find_by_email(db.get_ref(), &email).await?.is_some() {
        return Err(AppError::conflict("Email already registered"));
    }

    let input = NewAccount {
        email,
        first_name,
        last_name,
        password_hash: password::hash(&plain_password)?,
        details,
    };

    let account = match user_db::register(db.get_ref(), input).await? {
        Registration::Created(account) => account,
        Registration::EmailTaken => return Err(AppError::conflict("Email already registered")),
        Registration::BarNumberTaken => {
            return Err(AppError::conflict("Bar number already registered"));
        }
        Registration::RoleMissing(role) => {
            return Err(AppError::internal(format!("Role '{}' not found", role.as_str())));
        }
    };

    let tokens = issuer.issue_pair(&account)?;

    Ok(response::created(
        "User registered successfully",
        serde_json::json!({
            "user": UserResponse::new(account, &uploads),
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
        }),
    ))
}

/// POST /api/auth/login — exchange email and password for a token pair.
///
/// Unknown emails and wrong passwords get the same 401 body.
pub async fn login(
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    uploads: web::Data<UploadStore>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let (Some(email), Some(plain_password)) = (
        body.email.filter(|e| !e.trim().is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Email and password are required"));
    };

    let email = normalize_email(&email);

    let Some(user) = user_db::find_by_email(db.get_ref(), &email).await? else {
        tracing::warn!(email = %email, "Login attempt for unknown email");
        return Err(AppError::invalid_credentials());
    };

    if !user.verify_password(&plain_password) {
        tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AppError::invalid_credentials());
    }

    let account = user_db::load_account(db.get_ref(), user).await?;
    let tokens = issuer.issue_pair(&account)?;
    tracing::info!(user_id = %account.id(), "User logged in");

    Ok(response::ok(
        "Login successful",
        serde_json::json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
            "user": UserResponse::new(account, &uploads),
        }),
    ))
}

/// POST /api/auth/refresh — mint a new access token from a refresh token.
pub async fn refresh(
    user: RefreshUser,
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
) -> AppResult<HttpResponse> {
    let account = user_db::get_account(db.get_ref(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let access_token = issuer.issue(&account, TokenType::Access)?;

    Ok(response::ok(
        "Token refreshed",
        serde_json::json!({ "access_token": access_token }),
    ))
}

/// GET /api/auth/me — the authenticated user's profile.
pub async fn me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadStore>,
) -> AppResult<HttpResponse> {
    let account = user_db::get_account(db.get_ref(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(response::ok(
        "User retrieved successfully",
        UserResponse::new(account, &uploads),
    ))
}

/// PUT /api/auth/me/profile-image — replace the caller's profile picture.
///
/// Expects a multipart body with one file under `image`.
pub async fn upload_profile_image(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadStore>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(payload).await?;
    let image = form
        .files_named("image")
        .next()
        .ok_or_else(|| AppError::validation("No image file provided"))?;

    if !is_allowed_image(&sanitize_file_name(&image.file_name)) {
        return Err(AppError::validation(
            "Profile image must be a png, jpg, jpeg, gif or webp file",
        ));
    }

    let current = user_db::get_user_by_id(db.get_ref(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let previous = current.profile_image.clone();

    let stored = uploads
        .store_profile_image(user.id, &image.file_name, &image.data)
        .await
        .map_err(|e| AppError::internal(format!("Failed to store profile image: {e}")))?;

    // The old file goes only once the row points at the new one.
    let updated = match user_db::set_profile_image(db.get_ref(), current, stored.clone()).await {
        Ok(updated) => updated,
        Err(e) => {
            uploads
                .remove_profile_image(Some(&stored), previous.as_deref())
                .await;
            return Err(e.into());
        }
    };
    uploads
        .remove_profile_image(previous.as_deref(), updated.profile_image.as_deref())
        .await;
    tracing::info!(user_id = %user.id, file = ?updated.profile_image, "Profile image updated");

    Ok(response::ok(
        "Profile image updated",
        serde_json::json!({
            "profile_image": uploads.image_url(updated.profile_image.as_deref()),
        }),
    ))
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing required field: {name}")))
}
