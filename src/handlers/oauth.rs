use actix_web::{HttpResponse, http::header, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::auth::google::{AuthIntent, GoogleOAuth, PendingAuth, frontend_redirect, same_origin};
use crate::auth::jwt::TokenIssuer;
use crate::auth::password;
use crate::config::AppConfig;
use crate::db::users as user_db;
use crate::db::users::{OAuthLogin, Registration};
use crate::error::{AppError, AppResult};
use crate::models::users::normalize_email;

#[derive(Debug, Deserialize)]
pub struct GoogleLoginQuery {
    #[serde(default)]
    pub auth_type: AuthIntent,
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /api/auth/google — start the consent flow.
pub async fn google_login(
    google: Option<web::Data<GoogleOAuth>>,
    config: web::Data<AppConfig>,
    query: web::Query<GoogleLoginQuery>,
) -> AppResult<HttpResponse> {
    let google = google.ok_or_else(not_configured)?;
    let query = query.into_inner();

    if let Some(redirect_uri) = &query.redirect_uri {
        if !same_origin(&config.frontend_url, redirect_uri) {
            tracing::warn!(redirect_uri = %redirect_uri, "Rejected OAuth redirect to foreign origin");
            return Err(AppError::validation(
                "redirect_uri must match the frontend origin",
            ));
        }
    }

    let url = google
        .begin(PendingAuth {
            intent: query.auth_type,
            redirect_uri: query.redirect_uri,
        })
        .await
        .map_err(AppError::internal)?;

    Ok(redirect(&url))
}

/// GET /api/auth/google/callback — finish the flow and hand tokens to the frontend.
pub async fn google_callback(
    google: Option<web::Data<GoogleOAuth>>,
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    config: web::Data<AppConfig>,
    query: web::Query<GoogleCallbackQuery>,
) -> AppResult<HttpResponse> {
    let google = google.ok_or_else(not_configured)?;
    let query = query.into_inner();

    let (Some(code), Some(state)) = (query.code, query.state) else {
        return Err(AppError::validation("Missing code or state"));
    };

    let Some(pending) = google.take_pending(&state).await else {
        tracing::warn!("OAuth callback with unknown or expired state");
        return Err(AppError::Unauthorized {
            code: "invalid_state",
            message: "Invalid or expired OAuth state".to_string(),
        });
    };

    let profile = google.fetch_profile(&code).await.map_err(|e| {
        tracing::error!(error = %e, "Google profile fetch failed");
        AppError::Unauthorized {
            code: "oauth_failed",
            message: "Failed to get user info from Google".to_string(),
        }
    })?;

    let (Some(email), Some(first_name)) = (profile.email, profile.given_name) else {
        return Err(AppError::validation("Email and name are required from Google"));
    };

    let signup_password_hash = match pending.intent {
        AuthIntent::Signup => Some(password::unusable()?),
        AuthIntent::Login => None,
    };

    let account = match user_db::find_or_provision_oauth(
        db.get_ref(),
        normalize_email(&email),
        first_name,
        profile.family_name.unwrap_or_default(),
        signup_password_hash,
    )
    .await?
    {
        OAuthLogin::Existing(account) => account,
        OAuthLogin::Provisioned(Registration::Created(account)) => {
            tracing::info!(user_id = %account.id(), "Provisioned account from Google signup");
            account
        }
        OAuthLogin::Provisioned(Registration::EmailTaken | Registration::BarNumberTaken) => {
            return Err(AppError::conflict("Email already registered"));
        }
        OAuthLogin::Provisioned(Registration::RoleMissing(role)) => {
            return Err(AppError::internal(format!("Role '{}' not found", role.as_str())));
        }
        OAuthLogin::NotRegistered => {
            return Err(AppError::not_found("User not found. Please sign up first."));
        }
    };

    let tokens = issuer.issue_pair(&account)?;
    // Re-checked in case the frontend origin changed while the state was pending.
    let target = pending
        .redirect_uri
        .filter(|uri| same_origin(&config.frontend_url, uri))
        .unwrap_or_else(|| config.frontend_url.clone());
    let url = frontend_redirect(&target, &tokens.access_token, &tokens.refresh_token)
        .map_err(AppError::validation)?;

    Ok(redirect(&url))
}

fn redirect(url: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish()
}

fn not_configured() -> AppError {
    AppError::Unavailable("Google sign-in is not configured".to_string())
}
