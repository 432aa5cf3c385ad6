use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdvanceStatus {
    Pending,
    Approved,
    Rejected,
}

/// A salary advance. Only `approved` advances reduce net payable, exactly
/// once, in the month stored in `payroll_month` (set at approval time).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Advance {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 5000.0)]
    pub amount: f64,

    pub status: AdvanceStatus,

    #[schema(example = "2026-01-10", value_type = String, format = "date")]
    pub date_requested: NaiveDate,

    #[schema(example = "2026-01-12", value_type = Option<String>, format = "date")]
    pub date_processed: Option<NaiveDate>,

    /// First day of the month this advance is charged against.
    #[schema(example = "2026-01-01", value_type = Option<String>, format = "date")]
    pub payroll_month: Option<NaiveDate>,
}
