use sea_orm::*;
use uuid::Uuid;

use crate::models::cases;
use crate::models::documents::{self, DocumentMeta, NewDocument};

/// Insert a document row for a case known to exist.
pub async fn insert_document<C: ConnectionTrait>(
    db: &C,
    case_id: Uuid,
    input: NewDocument,
    uploaded_by: Uuid,
) -> Result<documents::Model, DbErr> {
    let new_document = documents::ActiveModel {
        id: Set(Uuid::new_v4()),
        file_name: Set(input.file_name),
        file_data: Set(Some(input.file_data)),
        case_id: Set(case_id),
        uploaded_by: Set(uploaded_by),
        uploaded_at: Set(chrono::Utc::now()),
    };

    new_document.insert(db).await
}

/// Attach a batch of files to a case in one transaction, storing payloads inline.
///
/// Returns `None` when the case does not exist; nothing is written then.
pub async fn add_documents(
    db: &DatabaseConnection,
    case_id: Uuid,
    inputs: Vec<NewDocument>,
    uploaded_by: Uuid,
) -> Result<Option<Vec<DocumentMeta>>, DbErr> {
    let txn = db.begin().await?;

    if cases::Entity::find_by_id(case_id).one(&txn).await?.is_none() {
        return Ok(None);
    }

    let mut stored = Vec::with_capacity(inputs.len());
    for input in inputs {
        let document = insert_document(&txn, case_id, input, uploaded_by).await?;
        stored.push(DocumentMeta::from(document));
    }

    txn.commit().await?;
    tracing::info!(case_id = %case_id, uploaded_by = %uploaded_by, documents = stored.len(), "Attached documents");

    Ok(Some(stored))
}

/// Document metadata for a case, oldest first. Payloads are not loaded.
pub async fn list_for_case<C: ConnectionTrait>(
    db: &C,
    case_id: Uuid,
) -> Result<Vec<DocumentMeta>, DbErr> {
    documents::Entity::find()
        .select_only()
        .columns([
            documents::Column::Id,
            documents::Column::FileName,
            documents::Column::CaseId,
            documents::Column::UploadedBy,
            documents::Column::UploadedAt,
        ])
        .filter(documents::Column::CaseId.eq(case_id))
        .order_by_asc(documents::Column::UploadedAt)
        .into_model::<DocumentMeta>()
        .all(db)
        .await
}

/// Fetch one document of a case, payload included.
pub async fn get_document<C: ConnectionTrait>(
    db: &C,
    case_id: Uuid,
    document_id: Uuid,
) -> Result<Option<documents::Model>, DbErr> {
    documents::Entity::find_by_id(document_id)
        .filter(documents::Column::CaseId.eq(case_id))
        .one(db)
        .await
}
