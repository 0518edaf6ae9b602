use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::auth::password;

/// Discriminant for the joined profile table a user row is specialised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "lawyer")]
    Lawyer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Client => "client",
            UserType::Lawyer => "lawyer",
            UserType::Admin => "admin",
        }
    }
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub profile_image: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_roles::Entity")]
    UserRoles,
    #[sea_orm(has_one = "super::clients::Entity")]
    Client,
    #[sea_orm(has_one = "super::lawyers::Entity")]
    Lawyer,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_roles::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_roles::Relation::User.def().rev())
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::lawyers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lawyer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The stored hash is write-only: this is the only way to check a password against it.
    pub fn verify_password(&self, candidate: &str) -> bool {
        password::verify(candidate, &self.password_hash)
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Body of `POST /api/auth/register`.
///
/// Every field is optional at the serde level so the handler can report the
/// first missing one by its wire name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_type: Option<String>,
    pub bar_number: Option<String>,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Normalise an email for lookup and storage.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
