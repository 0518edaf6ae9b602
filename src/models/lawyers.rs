use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `lawyers` table. `id` is the owning user's id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lawyers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub specialization: Option<String>,
    #[sea_orm(unique)]
    pub bar_number: Option<String>,
    /// Cases currently assigned and not yet closed. Never negative.
    pub active_cases: i32,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Id",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::cases::Entity")]
    Cases,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Counter value after taking on one more case.
    pub fn active_cases_after_claim(&self) -> i32 {
        self.active_cases + 1
    }

    /// Counter value after one of this lawyer's cases closes, floored at zero.
    pub fn active_cases_after_close(&self) -> i32 {
        (self.active_cases - 1).max(0)
    }
}

/// Running average over closed cases.
///
/// `closed_cases` already includes the case being rated. With no closed cases
/// the new value replaces the current rating outright.
pub fn next_rating(current: f64, closed_cases: u64, value: f64) -> f64 {
    if closed_cases == 0 {
        return value;
    }
    let n = closed_cases as f64;
    (current * (n - 1.0) + value) / n
}

// ── DTOs ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLawyerProfile {
    pub specialization: Option<String>,
}

/// Body of `POST /api/client/get-lawyers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LawyerSearch {
    pub specialization: Option<String>,
}

/// Body of `POST /api/client/cases/{case_id}/rate`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLawyer {
    pub rating: f64,
}
