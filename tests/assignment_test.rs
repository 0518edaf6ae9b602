//! Storage-level case operations against SeaORM's mock database.
//!
//! Mock results are consumed in query order, so each test also pins down
//! which rows an operation reads and writes.
mod common;

use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Transaction, Value};
use uuid::Uuid;

use caselaw_backend::db::cases::{
    Assignment, Rating, StatusChange, assign_case, rate_case, submit_case, update_status,
};
use caselaw_backend::models::cases::{self, CaseStatus, NewCase};
use caselaw_backend::models::documents::{self, NewDocument};
use caselaw_backend::models::lawyers;

use common::{case, lawyer};

fn no_cases() -> Vec<cases::Model> {
    Vec::new()
}

fn no_lawyers() -> Vec<lawyers::Model> {
    Vec::new()
}

fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// A `SELECT COUNT(*)` result row.
fn count(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
    vec![BTreeMap::from([("num_items", Value::BigInt(Some(n)))])]
}

/// The value bound to `$1` by every statement starting with `prefix`.
fn first_bound(log: &[Transaction], prefix: &str) -> Vec<Value> {
    log.iter()
        .flat_map(|txn| txn.statements())
        .filter(|stmt| stmt.sql.starts_with(prefix))
        .filter_map(|stmt| stmt.values.as_ref().and_then(|v| v.0.first().cloned()))
        .collect()
}

fn sql_of(txn: &Transaction) -> Vec<&str> {
    txn.statements().iter().map(|stmt| stmt.sql.as_str()).collect()
}

const ACTIVE_CASES_WRITE: &str = r#"UPDATE "lawyers" SET "active_cases" = $1"#;

#[tokio::test]
async fn test_assign_pending_case() {
    let lawyer_id = Uuid::new_v4();
    let pending = case(Uuid::new_v4(), None, CaseStatus::Pending);

    let mut assigned = pending.clone();
    assigned.lawyer_id = Some(lawyer_id);
    assigned.status = CaseStatus::UnderReview;

    let db: DatabaseConnection = mock()
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![lawyer(lawyer_id, 1, 4.5)]])
        .append_query_results([vec![assigned.clone()]])
        .append_query_results([vec![lawyer(lawyer_id, 2, 4.5)]])
        .into_connection();

    let outcome = assign_case(&db, pending.id, lawyer_id).await.unwrap();

    match outcome {
        Assignment::Assigned { case, lawyer } => {
            assert_eq!(case.lawyer_id, Some(lawyer_id));
            assert_eq!(case.status, CaseStatus::UnderReview);
            assert_eq!(lawyer.active_cases, 2);
        }
        other => panic!("expected assignment, got {other:?}"),
    }

    let log = db.into_transaction_log();
    assert_eq!(first_bound(&log, ACTIVE_CASES_WRITE), vec![Value::from(2i32)]);
}

#[tokio::test]
async fn test_assign_locks_case_before_lawyer() {
    let lawyer_id = Uuid::new_v4();
    let pending = case(Uuid::new_v4(), None, CaseStatus::Pending);
    let mut assigned = pending.clone();
    assigned.lawyer_id = Some(lawyer_id);
    assigned.status = CaseStatus::UnderReview;

    let db = mock()
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![lawyer(lawyer_id, 0, 0.0)]])
        .append_query_results([vec![assigned]])
        .append_query_results([vec![lawyer(lawyer_id, 1, 0.0)]])
        .into_connection();

    assign_case(&db, pending.id, lawyer_id).await.unwrap();

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let sql = sql_of(&log[0]);
    assert_eq!(sql.first(), Some(&"BEGIN"));
    assert!(sql[1].contains(r#"FROM "cases""#) && sql[1].ends_with("FOR UPDATE"), "{}", sql[1]);
    assert!(sql[2].contains(r#"FROM "lawyers""#) && sql[2].ends_with("FOR UPDATE"), "{}", sql[2]);
    assert!(sql[3].starts_with(r#"UPDATE "cases""#));
    assert!(sql[4].starts_with(r#"UPDATE "lawyers""#));
    assert_eq!(sql.last(), Some(&"COMMIT"));
}

#[tokio::test]
async fn test_assign_already_claimed_case_is_unavailable() {
    let lawyer_id = Uuid::new_v4();
    let claimed = case(Uuid::new_v4(), Some(Uuid::new_v4()), CaseStatus::UnderReview);

    // Rejected before the lawyer row is touched.
    let db = mock()
        .append_query_results([vec![claimed.clone()]])
        .into_connection();

    let outcome = assign_case(&db, claimed.id, lawyer_id).await.unwrap();

    assert_eq!(outcome, Assignment::Unavailable(claimed));
}

#[tokio::test]
async fn test_assign_closed_unassigned_case_is_unavailable() {
    let lawyer_id = Uuid::new_v4();
    let closed = case(Uuid::new_v4(), None, CaseStatus::Closed);

    let db = mock()
        .append_query_results([vec![closed.clone()]])
        .into_connection();

    let outcome = assign_case(&db, closed.id, lawyer_id).await.unwrap();

    assert_eq!(outcome, Assignment::Unavailable(closed));
}

#[tokio::test]
async fn test_assign_unknown_lawyer() {
    let pending = case(Uuid::new_v4(), None, CaseStatus::Pending);
    let db = mock()
        .append_query_results([vec![pending.clone()]])
        .append_query_results([no_lawyers()])
        .into_connection();

    let outcome = assign_case(&db, pending.id, Uuid::new_v4()).await.unwrap();

    assert_eq!(outcome, Assignment::LawyerNotFound);
}

#[tokio::test]
async fn test_assign_unknown_case() {
    let db = mock().append_query_results([no_cases()]).into_connection();

    let outcome = assign_case(&db, Uuid::new_v4(), Uuid::new_v4()).await.unwrap();

    assert_eq!(outcome, Assignment::CaseNotFound);
}

#[tokio::test]
async fn test_invalid_status_touches_nothing() {
    // No mock results: any query would fail the test.
    let db = mock().into_connection();

    let outcome = update_status(&db, Uuid::new_v4(), "Archived").await.unwrap();

    assert_eq!(outcome, StatusChange::InvalidStatus);
}

#[tokio::test]
async fn test_status_change_on_unknown_case() {
    let db = mock().append_query_results([no_cases()]).into_connection();

    let outcome = update_status(&db, Uuid::new_v4(), "Resolved").await.unwrap();

    assert_eq!(outcome, StatusChange::CaseNotFound);
}

#[tokio::test]
async fn test_closing_decrements_the_lawyer() {
    let lawyer_id = Uuid::new_v4();
    let open = case(Uuid::new_v4(), Some(lawyer_id), CaseStatus::InProgress);
    let mut closed = open.clone();
    closed.status = CaseStatus::Closed;

    let db = mock()
        .append_query_results([vec![open.clone()]])
        .append_query_results([vec![lawyer(lawyer_id, 2, 0.0)]])
        .append_query_results([vec![lawyer(lawyer_id, 1, 0.0)]])
        .append_query_results([vec![closed.clone()]])
        .into_connection();

    let outcome = update_status(&db, open.id, "Closed").await.unwrap();

    assert_eq!(outcome, StatusChange::Updated(closed));

    let log = db.into_transaction_log();
    assert_eq!(first_bound(&log, ACTIVE_CASES_WRITE), vec![Value::from(1i32)]);
}

#[tokio::test]
async fn test_closing_with_idle_lawyer_skips_the_decrement() {
    let lawyer_id = Uuid::new_v4();
    let open = case(Uuid::new_v4(), Some(lawyer_id), CaseStatus::Resolved);
    let mut closed = open.clone();
    closed.status = CaseStatus::Closed;

    // Lawyer read, but no lawyer write before the case update.
    let db = mock()
        .append_query_results([vec![open.clone()]])
        .append_query_results([vec![lawyer(lawyer_id, 0, 0.0)]])
        .append_query_results([vec![closed.clone()]])
        .into_connection();

    let outcome = update_status(&db, open.id, "Closed").await.unwrap();

    assert_eq!(outcome, StatusChange::Updated(closed));

    let log = db.into_transaction_log();
    assert!(first_bound(&log, ACTIVE_CASES_WRITE).is_empty());
}

#[tokio::test]
async fn test_reclosing_does_not_touch_the_lawyer() {
    let closed = case(Uuid::new_v4(), Some(Uuid::new_v4()), CaseStatus::Closed);

    let db = mock()
        .append_query_results([vec![closed.clone()]])
        .append_query_results([vec![closed.clone()]])
        .into_connection();

    let outcome = update_status(&db, closed.id, "Closed").await.unwrap();

    assert_eq!(outcome, StatusChange::Updated(closed));
}

#[tokio::test]
async fn test_non_closing_transition_has_no_side_effects() {
    let lawyer_id = Uuid::new_v4();
    let review = case(Uuid::new_v4(), Some(lawyer_id), CaseStatus::UnderReview);
    let mut progress = review.clone();
    progress.status = CaseStatus::InProgress;

    let db = mock()
        .append_query_results([vec![review.clone()]])
        .append_query_results([vec![progress.clone()]])
        .into_connection();

    let outcome = update_status(&db, review.id, "In Progress").await.unwrap();

    assert_eq!(outcome, StatusChange::Updated(progress));
}

#[tokio::test]
async fn test_submit_case_writes_pending_unassigned_case_with_documents() {
    let client_id = Uuid::new_v4();
    let stored = case(client_id, None, CaseStatus::Pending);
    let now = chrono::Utc::now();
    let document = |name: &str| documents::Model {
        id: Uuid::new_v4(),
        file_name: name.to_string(),
        file_data: Some(b"%PDF".to_vec()),
        case_id: stored.id,
        uploaded_by: client_id,
        uploaded_at: now,
    };

    let db = mock()
        .append_query_results([vec![stored.clone()]])
        .append_query_results([vec![document("brief.pdf")]])
        .append_query_results([vec![document("notes.txt")]])
        .into_connection();

    let input = NewCase {
        title: "Tenancy dispute".to_string(),
        description: "Landlord kept the deposit".to_string(),
        category: None,
        urgency: "high".to_string(),
        communication_method: "Email".to_string(),
        special_requirements: None,
    };
    let attachments = ["brief.pdf", "notes.txt"]
        .map(|name| NewDocument {
            file_name: name.to_string(),
            file_data: b"%PDF".to_vec(),
        })
        .to_vec();

    let (case, metas) = submit_case(&db, client_id, input, attachments).await.unwrap();
    assert_eq!(case.id, stored.id);
    assert_eq!(metas.len(), 2);

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1, "case and documents share one transaction");
    let statements = log[0].statements();
    let sql = sql_of(&log[0]);
    assert_eq!(sql.first(), Some(&"BEGIN"));
    assert!(sql[1].starts_with(r#"INSERT INTO "cases""#));
    assert!(sql[2].starts_with(r#"INSERT INTO "documents""#));
    assert!(sql[3].starts_with(r#"INSERT INTO "documents""#));
    assert_eq!(sql.last(), Some(&"COMMIT"));

    let case_values = &statements[1].values.as_ref().unwrap().0;
    assert!(case_values.contains(&Value::from("Pending")));
    assert!(case_values.contains(&Value::from(client_id)));
    assert!(case_values.contains(&Value::from(None::<Uuid>)), "lawyer_id must be NULL");

    for stmt in &statements[2..4] {
        assert!(stmt.values.as_ref().unwrap().0.contains(&Value::from(stored.id)));
    }
}

#[tokio::test]
async fn test_rating_folds_into_closed_case_average() {
    let lawyer_id = Uuid::new_v4();
    let closed = case(Uuid::new_v4(), Some(lawyer_id), CaseStatus::Closed);
    let mut rated = closed.clone();
    rated.rating = Some(5.0);

    // Two closed cases, current average 4.0: (4.0 * 1 + 5.0) / 2.
    let db = mock()
        .append_query_results([vec![closed.clone()]])
        .append_query_results([vec![lawyer(lawyer_id, 0, 4.0)]])
        .append_query_results([count(2)])
        .append_query_results([vec![lawyer(lawyer_id, 0, 4.5)]])
        .append_query_results([vec![rated.clone()]])
        .into_connection();

    let outcome = rate_case(&db, closed.id, 5.0).await.unwrap();

    match outcome {
        Rating::Rated { case, lawyer } => {
            assert_eq!(case.rating, Some(5.0));
            assert_eq!(lawyer.rating, 4.5);
        }
        other => panic!("expected a rating, got {other:?}"),
    }

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    assert!(sql_of(&log[0])[1].contains(r#"FROM "cases""#), "case row is locked first");
    assert_eq!(
        first_bound(&log, r#"UPDATE "lawyers" SET "rating" = $1"#),
        vec![Value::from(4.5f64)]
    );
    assert_eq!(
        first_bound(&log, r#"UPDATE "cases" SET "rating" = $1"#),
        vec![Value::from(5.0f64)]
    );
    assert_eq!(sql_of(&log[0]).last(), Some(&"COMMIT"));
}

#[tokio::test]
async fn test_rating_a_case_twice_is_refused() {
    let mut rated = case(Uuid::new_v4(), Some(Uuid::new_v4()), CaseStatus::Closed);
    rated.rating = Some(3.0);

    let db = mock().append_query_results([vec![rated.clone()]]).into_connection();

    let outcome = rate_case(&db, rated.id, 5.0).await.unwrap();
    assert_eq!(outcome, Rating::AlreadyRated);

    let log = db.into_transaction_log();
    assert!(first_bound(&log, "UPDATE").is_empty());
}

#[tokio::test]
async fn test_rating_an_open_case_is_refused() {
    let open = case(Uuid::new_v4(), Some(Uuid::new_v4()), CaseStatus::InProgress);

    let db = mock().append_query_results([vec![open.clone()]]).into_connection();

    let outcome = rate_case(&db, open.id, 4.0).await.unwrap();

    assert_eq!(outcome, Rating::NotRateable);
}

#[tokio::test]
async fn test_rating_unknown_case() {
    let db = mock().append_query_results([no_cases()]).into_connection();

    let outcome = rate_case(&db, Uuid::new_v4(), 4.0).await.unwrap();

    assert_eq!(outcome, Rating::CaseNotFound);
}
