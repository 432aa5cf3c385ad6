use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which zone validated an attendance event.
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
pub enum GeofenceKind {
    Office,
    Remote,
}

/// Tri-state containment verdict. `Unknown` means the device supplied no
/// location; it must never collapse into `Outside` downstream.
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
pub enum GeofenceVerdict {
    Inside,
    Outside,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = 23.8103)]
    pub latitude: f64,

    #[schema(example = 90.4125)]
    pub longitude: f64,

    /// Reported GPS accuracy in meters, if the device provided one.
    #[schema(example = 12.5, nullable = true)]
    pub accuracy: Option<f64>,
}

/// A named circular zone. Office zones belong to a company, remote zones to
/// an individual employee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub kind: GeofenceKind,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_meters: f64,
}
