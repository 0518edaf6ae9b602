use sea_orm::*;
use uuid::Uuid;

use crate::db::roles as role_db;
use crate::models::accounts::{Account, NewAccount, NewProfile, Profile};
use crate::models::clients::{self, UpdateClientProfile};
use crate::models::lawyers::{self, UpdateLawyerProfile};
use crate::models::roles::{self, RoleName};
use crate::models::user_roles;
use crate::models::users::{self, UserType};

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum Registration {
    Created(Account),
    EmailTaken,
    BarNumberTaken,
    RoleMissing(RoleName),
}

/// Outcome of resolving a Google identity to a local account.
#[derive(Debug)]
pub enum OAuthLogin {
    Existing(Account),
    Provisioned(Registration),
    NotRegistered,
}

/// Fetch a user by (already normalised) email.
pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch a client profile by user ID.
pub async fn get_client_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find_by_id(id).one(db).await
}

/// Load a user's roles and the profile row selected by its `user_type`.
pub async fn load_account<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
) -> Result<Account, DbErr> {
    let roles = user
        .find_related(roles::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|role| role.name)
        .collect();

    let profile = match user.user_type {
        UserType::Client => Profile::Client(
            clients::Entity::find_by_id(user.id)
                .one(db)
                .await?
                .ok_or_else(|| missing_profile("client", user.id))?,
        ),
        UserType::Lawyer => Profile::Lawyer(
            lawyers::Entity::find_by_id(user.id)
                .one(db)
                .await?
                .ok_or_else(|| missing_profile("lawyer", user.id))?,
        ),
        UserType::Admin => Profile::Admin,
    };

    Ok(Account {
        user,
        roles,
        profile,
    })
}

/// Fetch a user by ID together with roles and profile.
pub async fn get_account<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<Account>, DbErr> {
    match get_user_by_id(db, id).await? {
        Some(user) => load_account(db, user).await.map(Some),
        None => Ok(None),
    }
}

/// Create the user row, its profile row and its single role link atomically.
///
/// Any failure drops the transaction, rolling back every row written so far.
pub async fn register(
    db: &DatabaseConnection,
    input: NewAccount,
) -> Result<Registration, DbErr> {
    let txn = db.begin().await?;

    let role_name = input.details.role();
    let Some(role) = role_db::find_by_name(&txn, role_name).await? else {
        return Ok(Registration::RoleMissing(role_name));
    };

    match insert_account(&txn, input, role).await {
        Ok(account) => {
            txn.commit().await?;
            tracing::info!(user_id = %account.id(), user_type = account.user.user_type.as_str(), "Registered user");
            Ok(Registration::Created(account))
        }
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("bar_number") => {
                Ok(Registration::BarNumberTaken)
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => Ok(Registration::EmailTaken),
            _ => Err(e),
        },
    }
}

/// Find the account for an OAuth email, creating a client account on signup.
///
/// `signup_password_hash` is `Some` only for the signup intent; a login with
/// no matching account reports `NotRegistered`.
pub async fn find_or_provision_oauth(
    db: &DatabaseConnection,
    email: String,
    first_name: String,
    last_name: String,
    signup_password_hash: Option<String>,
) -> Result<OAuthLogin, DbErr> {
    if let Some(user) = find_by_email(db, &email).await? {
        return load_account(db, user).await.map(OAuthLogin::Existing);
    }

    let Some(password_hash) = signup_password_hash else {
        return Ok(OAuthLogin::NotRegistered);
    };

    let input = NewAccount {
        email,
        first_name,
        last_name,
        password_hash,
        details: NewProfile::Client {
            phone: None,
            address: None,
            location: None,
        },
    };

    register(db, input).await.map(OAuthLogin::Provisioned)
}

async fn insert_account(
    txn: &DatabaseTransaction,
    input: NewAccount,
    role: roles::Model,
) -> Result<Account, DbErr> {
    let now = chrono::Utc::now();
    let id = Uuid::new_v4();

    let user = users::ActiveModel {
        id: Set(id),
        email: Set(input.email),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        password_hash: Set(input.password_hash),
        profile_image: Set(None),
        user_type: Set(input.details.user_type()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    let profile = match input.details {
        NewProfile::Client {
            phone,
            address,
            location,
        } => Profile::Client(
            clients::ActiveModel {
                id: Set(id),
                phone: Set(phone),
                address: Set(address),
                location: Set(location),
            }
            .insert(txn)
            .await?,
        ),
        NewProfile::Lawyer {
            bar_number,
            specialization,
        } => Profile::Lawyer(
            lawyers::ActiveModel {
                id: Set(id),
                specialization: Set(specialization),
                bar_number: Set(Some(bar_number)),
                active_cases: Set(0),
                rating: Set(0.0),
            }
            .insert(txn)
            .await?,
        ),
    };

    user_roles::Entity::insert(user_roles::ActiveModel {
        user_id: Set(id),
        role_id: Set(role.id),
    })
    .exec_without_returning(txn)
    .await?;

    Ok(Account {
        user,
        roles: vec![role.name],
        profile,
    })
}

/// Set a new stored profile image file name.
pub async fn set_profile_image<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
    file_name: String,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.profile_image = Set(Some(file_name));
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await
}

/// Update a client's contact fields. Absent fields are left untouched.
pub async fn update_client_profile<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: UpdateClientProfile,
) -> Result<Option<clients::Model>, DbErr> {
    let Some(client) = clients::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: clients::ActiveModel = client.into();

    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = input.address {
        active.address = Set(Some(address));
    }
    if let Some(location) = input.location {
        active.location = Set(Some(location));
    }

    active.update(db).await.map(Some)
}

/// Update a lawyer's specialization.
pub async fn update_lawyer_profile<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: UpdateLawyerProfile,
) -> Result<Option<lawyers::Model>, DbErr> {
    let Some(lawyer) = lawyers::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: lawyers::ActiveModel = lawyer.into();

    if let Some(specialization) = input.specialization {
        active.specialization = Set(Some(specialization));
    }

    active.update(db).await.map(Some)
}

fn missing_profile(kind: &str, id: Uuid) -> DbErr {
    DbErr::RecordNotFound(format!("{kind} profile for user {id} not found"))
}
