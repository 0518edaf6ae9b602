use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::errors::ErrorKind;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::auth::jwt::{Claims, TokenIssuer, TokenType};
use crate::error::AppError;
use crate::models::roles::RoleName;

/// Caller identified by a valid access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub claims: Claims,
}

/// Caller identified by a valid refresh token.
#[derive(Debug, Clone)]
pub struct RefreshUser {
    pub id: Uuid,
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.claims.has_role(RoleName::Admin)
    }

    /// Path-supplied user ids must name the caller, unless the caller is an admin.
    pub fn ensure_self_or_admin(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.id == user_id || self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(caller = %self.id, target = %user_id, "Rejected access to another user's resources");
            Err(AppError::forbidden(
                "You can only access your own resources",
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let (id, claims) = authenticate(&req, TokenType::Access).await?;
            Ok(AuthenticatedUser { id, claims })
        })
    }
}

impl FromRequest for RefreshUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let (id, claims) = authenticate(&req, TokenType::Refresh).await?;
            Ok(RefreshUser { id, claims })
        })
    }
}

async fn authenticate(req: &HttpRequest, expected: TokenType) -> Result<(Uuid, Claims), AppError> {
    // 1. Extract the Bearer token from the Authorization header.
    let bearer = BearerAuth::extract(req).await.map_err(|_| {
        tracing::warn!(path = %req.path(), "Missing or malformed Authorization header");
        AppError::missing_token()
    })?;

    // 2. Get the token issuer from app data.
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::internal("Token issuer not configured"))?;

    // 3. Validate signature and expiry.
    let claims = issuer.decode(bearer.token()).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::token_expired(),
        _ => {
            tracing::warn!(error = %e, "Token validation failed");
            AppError::invalid_token()
        }
    })?;

    // 4. A refresh token is not an access token, and vice versa.
    if claims.token_type != expected {
        tracing::warn!(expected = ?expected, got = ?claims.token_type, "Wrong token type");
        return Err(AppError::invalid_token());
    }

    let id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a UUID");
        AppError::invalid_token()
    })?;

    Ok((id, claims))
}
