use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;
use uuid::Uuid;

use super::roles::RoleName;
use super::users::UserType;
use super::{clients, lawyers, users};
use crate::storage::UploadStore;

/// Role-specific half of an account, selected by `users.user_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Client(clients::Model),
    Lawyer(lawyers::Model),
    Admin,
}

/// A user row together with its roles and its specialised profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub user: users::Model,
    pub roles: Vec<RoleName>,
    pub profile: Profile,
}

impl Account {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// New account input, already validated by the registration handler.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub details: NewProfile,
}

#[derive(Debug, Clone)]
pub enum NewProfile {
    Client {
        phone: Option<String>,
        address: Option<String>,
        location: Option<String>,
    },
    Lawyer {
        bar_number: String,
        specialization: Option<String>,
    },
}

impl NewProfile {
    pub fn user_type(&self) -> UserType {
        match self {
            NewProfile::Client { .. } => UserType::Client,
            NewProfile::Lawyer { .. } => UserType::Lawyer,
        }
    }

    pub fn role(&self) -> RoleName {
        match self {
            NewProfile::Client { .. } => RoleName::Client,
            NewProfile::Lawyer { .. } => RoleName::Lawyer,
        }
    }
}

/// A safe user representation for API responses (never leaks the password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub user_type: UserType,
    pub roles: Vec<RoleName>,
    pub profile_image: String,
    pub created_at: DateTimeUtc,
    #[serde(flatten)]
    pub profile: Option<ProfileResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Client {
        phone: Option<String>,
        address: Option<String>,
        location: Option<String>,
    },
    Lawyer {
        specialization: Option<String>,
        bar_number: Option<String>,
        active_cases: i32,
        rating: f64,
    },
}

impl UserResponse {
    pub fn new(account: Account, uploads: &UploadStore) -> Self {
        let profile = match account.profile {
            Profile::Client(c) => Some(ProfileResponse::Client {
                phone: c.phone,
                address: c.address,
                location: c.location,
            }),
            Profile::Lawyer(l) => Some(ProfileResponse::Lawyer {
                specialization: l.specialization,
                bar_number: l.bar_number,
                active_cases: l.active_cases,
                rating: l.rating,
            }),
            Profile::Admin => None,
        };

        Self {
            id: account.user.id,
            profile_image: uploads.image_url(account.user.profile_image.as_deref()),
            email: account.user.email,
            firstname: account.user.first_name,
            lastname: account.user.last_name,
            user_type: account.user.user_type,
            roles: account.roles,
            created_at: account.user.created_at,
            profile,
        }
    }
}

/// Public view of a lawyer for the specialization search.
#[derive(Debug, Clone, Serialize)]
pub struct LawyerListing {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub specialization: Option<String>,
    pub active_cases: i32,
    pub rating: f64,
    pub profile_image: String,
}

impl LawyerListing {
    pub fn new(user: users::Model, lawyer: lawyers::Model, uploads: &UploadStore) -> Self {
        Self {
            id: user.id,
            profile_image: uploads.image_url(user.profile_image.as_deref()),
            firstname: user.first_name,
            lastname: user.last_name,
            specialization: lawyer.specialization,
            active_cases: lawyer.active_cases,
            rating: lawyer.rating,
        }
    }
}
