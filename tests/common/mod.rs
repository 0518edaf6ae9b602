//! Row fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use caselaw_backend::models::accounts::{Account, Profile};
use caselaw_backend::models::cases::{self, CaseStatus};
use caselaw_backend::models::roles::{self, RoleName};
use caselaw_backend::models::users::{self, UserType};
use caselaw_backend::models::{clients, lawyers};

pub const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

pub fn user(id: Uuid, user_type: UserType, password_hash: &str) -> users::Model {
    let now = Utc::now();
    users::Model {
        id,
        email: format!("{}@example.com", user_type.as_str()),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password_hash: password_hash.to_string(),
        profile_image: None,
        user_type,
        created_at: now,
        updated_at: now,
    }
}

pub fn role(name: RoleName) -> roles::Model {
    roles::Model {
        id: Uuid::new_v4(),
        name,
    }
}

pub fn client(id: Uuid) -> clients::Model {
    clients::Model {
        id,
        phone: Some("555-0100".to_string()),
        address: None,
        location: Some("Nairobi".to_string()),
    }
}

pub fn lawyer(id: Uuid, active_cases: i32, rating: f64) -> lawyers::Model {
    lawyers::Model {
        id,
        specialization: Some("Family".to_string()),
        bar_number: Some(format!("BAR-{}", id.simple())),
        active_cases,
        rating,
    }
}

pub fn case(client_id: Uuid, lawyer_id: Option<Uuid>, status: CaseStatus) -> cases::Model {
    let now = Utc::now();
    cases::Model {
        id: Uuid::new_v4(),
        title: "Tenancy dispute".to_string(),
        description: "Landlord kept the deposit".to_string(),
        category: Some("Property".to_string()),
        status,
        urgency: "high".to_string(),
        communication_method: "Email".to_string(),
        special_requirements: None,
        created_at: now,
        updated_at: now,
        client_id,
        lawyer_id,
        rating: None,
    }
}

pub fn client_account(id: Uuid) -> Account {
    Account {
        user: user(id, UserType::Client, "unused"),
        roles: vec![RoleName::Client],
        profile: Profile::Client(client(id)),
    }
}

pub fn lawyer_account(id: Uuid) -> Account {
    Account {
        user: user(id, UserType::Lawyer, "unused"),
        roles: vec![RoleName::Lawyer],
        profile: Profile::Lawyer(lawyer(id, 0, 0.0)),
    }
}
