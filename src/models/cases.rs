use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Case lifecycle status, stored and serialized as its display literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CaseStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Under Review")]
    #[serde(rename = "Under Review")]
    UnderReview,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Resolved")]
    Resolved,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl CaseStatus {
    /// The valid statuses, in lifecycle order.
    pub const ALL: [CaseStatus; 5] = [
        CaseStatus::Pending,
        CaseStatus::UnderReview,
        CaseStatus::InProgress,
        CaseStatus::Resolved,
        CaseStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "Pending",
            CaseStatus::UnderReview => "Under Review",
            CaseStatus::InProgress => "In Progress",
            CaseStatus::Resolved => "Resolved",
            CaseStatus::Closed => "Closed",
        }
    }

    /// Exact, case-sensitive match against the five literals.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SeaORM entity for the `cases` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: Option<String>,
    pub status: CaseStatus,
    pub urgency: String,
    pub communication_method: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_requirements: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub client_id: Uuid,
    pub lawyer_id: Option<Uuid>,
    /// The client's rating of the lawyer for this case, set at most once.
    pub rating: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::lawyers::Entity",
        from = "Column::LawyerId",
        to = "super::lawyers::Column::Id"
    )]
    Lawyer,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
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

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A case can be claimed only while it is pending and nobody holds it.
    pub fn is_assignable(&self) -> bool {
        self.status == CaseStatus::Pending && self.lawyer_id.is_none()
    }

    /// The lawyer whose active-case counter must drop if this case moves to `next`.
    ///
    /// Only the transition into `Closed` from any other status releases the
    /// assignee; re-closing a closed case releases nobody.
    pub fn lawyer_released_by(&self, next: CaseStatus) -> Option<Uuid> {
        if next == CaseStatus::Closed && self.status != CaseStatus::Closed {
            self.lawyer_id
        } else {
            None
        }
    }

    /// A closed case with a lawyer that has not been rated yet.
    pub fn is_rateable(&self) -> bool {
        self.status == CaseStatus::Closed && self.lawyer_id.is_some() && self.rating.is_none()
    }

    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.lawyer_id == Some(user_id)
    }
}

// ── DTOs ──

/// Validated input for a new case submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCase {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub urgency: String,
    pub communication_method: String,
    pub special_requirements: Option<String>,
}

/// Body of `PUT /api/lawyer/cases/{case_id}/status`.
///
/// Kept as a raw string so an unknown literal is reported by the lifecycle
/// check rather than by the JSON extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCaseStatus {
    pub status: String,
}

/// Case as it appears in listings, with party names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub status: CaseStatus,
    pub urgency: String,
    pub communication_method: String,
    pub special_requirements: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated: DateTimeUtc,
    pub rating: Option<f64>,
    pub client: Option<String>,
    pub lawyer: Option<String>,
}

impl CaseSummary {
    pub fn new(case: Model, client: Option<String>, lawyer: Option<String>) -> Self {
        Self {
            id: case.id,
            title: case.title,
            description: case.description,
            category: case.category,
            status: case.status,
            urgency: case.urgency,
            communication_method: case.communication_method,
            special_requirements: case.special_requirements,
            created_at: case.created_at,
            updated: case.updated_at,
            rating: case.rating,
            client,
            lawyer,
        }
    }
}
