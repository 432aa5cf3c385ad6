use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::geofence::{GeofenceKind, GeofenceVerdict};

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
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    CheckedIn,
    CheckedOut,
}

/// One check-in/check-out pair for one employee on one calendar day.
/// Created at check-in, mutated exactly once at close (live checkout or the
/// stale-session closer), never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceEvent {
    #[schema(example = "7b0c6c1e-2f34-4b4e-9b6e-1f0a7a2d9c11")]
    pub id: String,

    #[schema(example = 1)]
    pub company_id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    pub status: SessionStatus,

    #[schema(value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<DateTime<Utc>>,

    pub check_in_lat: Option<f64>,
    pub check_in_lng: Option<f64>,
    pub check_in_accuracy: Option<f64>,

    pub check_out_lat: Option<f64>,
    pub check_out_lng: Option<f64>,
    pub check_out_accuracy: Option<f64>,

    /// Verdict for the check-in location.
    pub is_within_geofence: GeofenceVerdict,

    /// Verdict for the check-out location, evaluated independently of the
    /// check-in verdict.
    pub is_within_geofence_checkout: GeofenceVerdict,

    pub matched_geofence_type: Option<GeofenceKind>,

    /// `check_out_time − check_in_time` in hours, set on close, never
    /// negative.
    pub total_hours: Option<f64>,

    /// Free text; auto-populated by the stale-session closer when the
    /// employee never wrote one.
    pub work_report: Option<String>,

    /// Set when the record needs a human look (e.g. clock skew clamped the
    /// duration to zero).
    pub needs_review: bool,

    pub check_in_photo: Option<String>,
    pub check_out_photo: Option<String>,
}

impl AttendanceEvent {
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::CheckedIn
    }
}
