use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::geofence::{Geofence, GeofenceKind};

/// How a day's presence converts to earned pay.
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
pub enum SalaryPolicy {
    /// Deduct the hourly rate for every standard hour not worked.
    HourlyDeduction,
    /// Binary per day: any completed check-in/check-out pair earns the full
    /// daily share regardless of duration.
    CheckInOut,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CompanySettings {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Acme Ltd")]
    pub name: String,

    pub office_lat: Option<f64>,
    pub office_lng: Option<f64>,
    pub office_radius_m: Option<f64>,

    pub salary_calculation_mode: SalaryPolicy,
}

impl CompanySettings {
    /// The canonical workplace zone, if the company configured one.
    pub fn office_zone(&self) -> Option<Geofence> {
        match (self.office_lat, self.office_lng, self.office_radius_m) {
            (Some(center_lat), Some(center_lng), Some(radius_meters)) => Some(Geofence {
                kind: GeofenceKind::Office,
                center_lat,
                center_lng,
                radius_meters,
            }),
            _ => None,
        }
    }
}
