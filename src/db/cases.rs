use sea_orm::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::db::documents::insert_document;
use crate::models::cases::{self, CaseStatus, CaseSummary, NewCase};
use crate::models::documents::{DocumentMeta, NewDocument};
use crate::models::lawyers::{self, next_rating};
use crate::models::users;

/// Outcome of a lawyer claiming a case.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Assigned {
        case: cases::Model,
        lawyer: lawyers::Model,
    },
    CaseNotFound,
    LawyerNotFound,
    /// The case is not pending or already has a lawyer. Nothing was changed.
    Unavailable(cases::Model),
}

/// Outcome of a client rating the lawyer of one of their cases.
#[derive(Debug, Clone, PartialEq)]
pub enum Rating {
    Rated {
        case: cases::Model,
        lawyer: lawyers::Model,
    },
    CaseNotFound,
    /// The case is not closed or has no lawyer. Nothing was changed.
    NotRateable,
    /// The case already carries a rating. Nothing was changed.
    AlreadyRated,
    LawyerNotFound,
}

/// Outcome of a status transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    Updated(cases::Model),
    /// Not one of the five status literals. Nothing was read or written.
    InvalidStatus,
    CaseNotFound,
}

/// Create a pending, unassigned case and its attachments in one transaction.
pub async fn submit_case(
    db: &DatabaseConnection,
    client_id: Uuid,
    input: NewCase,
    attachments: Vec<NewDocument>,
) -> Result<(cases::Model, Vec<DocumentMeta>), DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let case = cases::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        category: Set(input.category),
        status: Set(CaseStatus::Pending),
        urgency: Set(input.urgency),
        communication_method: Set(input.communication_method),
        special_requirements: Set(input.special_requirements),
        created_at: Set(now),
        updated_at: Set(now),
        client_id: Set(client_id),
        lawyer_id: Set(None),
        rating: Set(None),
    }
    .insert(&txn)
    .await?;

    let mut documents = Vec::with_capacity(attachments.len());
    for attachment in attachments {
        let document = insert_document(&txn, case.id, attachment, client_id).await?;
        documents.push(DocumentMeta::from(document));
    }

    txn.commit().await?;
    tracing::info!(case_id = %case.id, client_id = %client_id, documents = documents.len(), "Case submitted");

    Ok((case, documents))
}

/// Fetch a single case by ID.
pub async fn get_case_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<cases::Model>, DbErr> {
    cases::Entity::find_by_id(id).one(db).await
}

/// All cases owned by a client, newest first.
pub async fn get_cases_by_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<Vec<cases::Model>, DbErr> {
    cases::Entity::find()
        .filter(cases::Column::ClientId.eq(client_id))
        .order_by_desc(cases::Column::CreatedAt)
        .all(db)
        .await
}

/// All cases assigned to a lawyer, newest first.
pub async fn get_cases_by_lawyer<C: ConnectionTrait>(
    db: &C,
    lawyer_id: Uuid,
) -> Result<Vec<cases::Model>, DbErr> {
    cases::Entity::find()
        .filter(cases::Column::LawyerId.eq(lawyer_id))
        .order_by_desc(cases::Column::CreatedAt)
        .all(db)
        .await
}

/// Pending cases nobody has claimed, oldest first.
pub async fn get_available_cases<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<cases::Model>, DbErr> {
    cases::Entity::find()
        .filter(cases::Column::LawyerId.is_null())
        .filter(cases::Column::Status.eq(CaseStatus::Pending))
        .order_by_asc(cases::Column::CreatedAt)
        .all(db)
        .await
}

/// Give a pending, unassigned case to a lawyer.
///
/// The case row is locked before the lawyer row, the same order every
/// case transaction uses, so of two concurrent claims on one case the second
/// sees it assigned.
pub async fn assign_case(
    db: &DatabaseConnection,
    case_id: Uuid,
    lawyer_id: Uuid,
) -> Result<Assignment, DbErr> {
    let txn = db.begin().await?;

    let Some(case) = cases::Entity::find_by_id(case_id)
        .lock_exclusive()
        .one(&txn)
        .await?
    else {
        return Ok(Assignment::CaseNotFound);
    };

    if !case.is_assignable() {
        return Ok(Assignment::Unavailable(case));
    }

    let Some(lawyer) = lawyers::Entity::find_by_id(lawyer_id)
        .lock_exclusive()
        .one(&txn)
        .await?
    else {
        return Ok(Assignment::LawyerNotFound);
    };

    let mut active_case: cases::ActiveModel = case.into();
    active_case.lawyer_id = Set(Some(lawyer_id));
    active_case.status = Set(CaseStatus::UnderReview);
    active_case.updated_at = Set(chrono::Utc::now());
    let case = active_case.update(&txn).await?;

    let active_cases = lawyer.active_cases_after_claim();
    let mut active_lawyer: lawyers::ActiveModel = lawyer.into();
    active_lawyer.active_cases = Set(active_cases);
    let lawyer = active_lawyer.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(case_id = %case_id, lawyer_id = %lawyer_id, active_cases, "Case assigned");

    Ok(Assignment::Assigned { case, lawyer })
}

/// Move a case to `new_status`.
///
/// Entering `Closed` from any other status releases the assigned lawyer:
/// their active-case counter drops by one, never below zero.
pub async fn update_status(
    db: &DatabaseConnection,
    case_id: Uuid,
    new_status: &str,
) -> Result<StatusChange, DbErr> {
    let Some(next) = CaseStatus::parse(new_status) else {
        return Ok(StatusChange::InvalidStatus);
    };

    let txn = db.begin().await?;

    let Some(case) = cases::Entity::find_by_id(case_id)
        .lock_exclusive()
        .one(&txn)
        .await?
    else {
        return Ok(StatusChange::CaseNotFound);
    };

    if let Some(lawyer_id) = case.lawyer_released_by(next) {
        let lawyer = lawyers::Entity::find_by_id(lawyer_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        if let Some(lawyer) = lawyer.filter(|l| l.active_cases > 0) {
            let active_cases = lawyer.active_cases_after_close();
            let mut active_lawyer: lawyers::ActiveModel = lawyer.into();
            active_lawyer.active_cases = Set(active_cases);
            active_lawyer.update(&txn).await?;
            tracing::info!(lawyer_id = %lawyer_id, active_cases, "Released lawyer from closed case");
        }
    }

    let previous = case.status;
    let mut active_case: cases::ActiveModel = case.into();
    active_case.status = Set(next);
    active_case.updated_at = Set(chrono::Utc::now());
    let case = active_case.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(case_id = %case_id, from = %previous, to = %next, "Case status changed");

    Ok(StatusChange::Updated(case))
}

/// Rate the lawyer of a closed case, at most once per case.
///
/// The value is folded into the lawyer's running average over their closed
/// cases and recorded on the case in the same transaction. It is not
/// range-checked here.
pub async fn rate_case(
    db: &DatabaseConnection,
    case_id: Uuid,
    value: f64,
) -> Result<Rating, DbErr> {
    let txn = db.begin().await?;

    let Some(case) = cases::Entity::find_by_id(case_id)
        .lock_exclusive()
        .one(&txn)
        .await?
    else {
        return Ok(Rating::CaseNotFound);
    };

    if case.rating.is_some() {
        return Ok(Rating::AlreadyRated);
    }
    let Some(lawyer_id) = case.lawyer_id.filter(|_| case.is_rateable()) else {
        return Ok(Rating::NotRateable);
    };

    let Some(lawyer) = lawyers::Entity::find_by_id(lawyer_id)
        .lock_exclusive()
        .one(&txn)
        .await?
    else {
        return Ok(Rating::LawyerNotFound);
    };

    let closed_cases = cases::Entity::find()
        .filter(cases::Column::LawyerId.eq(lawyer_id))
        .filter(cases::Column::Status.eq(CaseStatus::Closed))
        .count(&txn)
        .await?;

    let rating = next_rating(lawyer.rating, closed_cases, value);
    let mut active_lawyer: lawyers::ActiveModel = lawyer.into();
    active_lawyer.rating = Set(rating);
    let lawyer = active_lawyer.update(&txn).await?;

    let mut active_case: cases::ActiveModel = case.into();
    active_case.rating = Set(Some(value));
    let case = active_case.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(case_id = %case_id, lawyer_id = %lawyer_id, closed_cases, rating, "Rated lawyer");

    Ok(Rating::Rated { case, lawyer })
}

/// Resolve client and lawyer names for a batch of cases.
pub async fn summarize<C: ConnectionTrait>(
    db: &C,
    cases: Vec<cases::Model>,
) -> Result<Vec<CaseSummary>, DbErr> {
    let party_ids: HashSet<Uuid> = cases
        .iter()
        .flat_map(|c| std::iter::once(c.client_id).chain(c.lawyer_id))
        .collect();

    let names: HashMap<Uuid, String> = if party_ids.is_empty() {
        HashMap::new()
    } else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(party_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect()
    };

    Ok(cases
        .into_iter()
        .map(|case| {
            let client = names.get(&case.client_id).cloned();
            let lawyer = case.lawyer_id.and_then(|id| names.get(&id).cloned());
            CaseSummary::new(case, client, lawyer)
        })
        .collect())
}
