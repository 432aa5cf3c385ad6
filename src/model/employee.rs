use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::geofence::{Geofence, GeofenceKind};

/// Fallback when an employee record has no explicit daily-hours figure.
pub const DEFAULT_STANDARD_DAILY_HOURS: f64 = 8.0;

/// Payroll-relevant slice of the employee directory record. Read-only input
/// to the attendance and payroll cores.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1001,
        "company_id": 1,
        "user_id": 42,
        "full_name": "John Doe",
        "base_salary": 30000.0,
        "standard_daily_hours": 8.0,
        "joining_date": "2024-01-01"
    })
)]
pub struct Employee {
    #[schema(example = 1001)]
    pub id: u64,

    #[schema(example = 1)]
    pub company_id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "John Doe")]
    pub full_name: String,

    /// Monthly base salary, currency-agnostic.
    #[schema(example = 30000.0)]
    pub base_salary: f64,

    #[schema(example = 8.0, nullable = true)]
    pub standard_daily_hours: Option<f64>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub joining_date: NaiveDate,

    pub remote_lat: Option<f64>,
    pub remote_lng: Option<f64>,
    pub remote_radius_m: Option<f64>,
}

impl Employee {
    pub fn standard_daily_hours(&self) -> f64 {
        self.standard_daily_hours
            .unwrap_or(DEFAULT_STANDARD_DAILY_HOURS)
    }

    /// Personal remote-work zone, if one is configured for this employee.
    pub fn remote_zone(&self) -> Option<Geofence> {
        match (self.remote_lat, self.remote_lng, self.remote_radius_m) {
            (Some(center_lat), Some(center_lng), Some(radius_meters)) => Some(Geofence {
                kind: GeofenceKind::Remote,
                center_lat,
                center_lng,
                radius_meters,
            }),
            _ => None,
        }
    }
}
