use std::env;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

const DEFAULT_PROFILE_IMAGE: &str = "https://example.com/default-profile.png";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Deployment profile selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    /// Unknown names fall back to development.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" => Environment::Production,
            "testing" => Environment::Testing,
            _ => Environment::Development,
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        match self {
            Environment::Production => Duration::minutes(15),
            _ => Duration::hours(1),
        }
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(30)
    }
}

/// Google OAuth client settings. OAuth routes are disabled without them.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub default_profile_image: String,
    pub frontend_url: String,
    pub google: Option<GoogleConfig>,
}

impl AppConfig {
    /// Read configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::parse(&env::var("APP_ENV").unwrap_or_default());

        let database_url = match environment {
            Environment::Testing => required("TEST_DATABASE_URL")
                .or_else(|_| required("DATABASE_URL"))?,
            _ => required("DATABASE_URL")?,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 8080,
        };

        let google = match (
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
        ) {
            (Ok(client_id), Ok(client_secret)) => Some(GoogleConfig {
                client_id,
                client_secret,
                redirect_uri: env::var("GOOGLE_REDIRECT_URI").unwrap_or_else(|_| {
                    format!("http://localhost:{port}/api/auth/google/callback")
                }),
            }),
            _ => None,
        };

        Ok(Self {
            environment,
            database_url,
            port,
            jwt_secret: required("JWT_SECRET_KEY")?,
            upload_dir: PathBuf::from(
                env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "uploads".to_string()),
            ),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            default_profile_image: env::var("DEFAULT_PROFILE_IMAGE")
                .unwrap_or_else(|_| DEFAULT_PROFILE_IMAGE.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            google,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}
