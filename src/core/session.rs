//! Per-employee, per-day attendance state machine:
//! `Away → CheckedIn → CheckedOut`, terminal for the day. The decisions here
//! are pure; the store layer owns the read-then-conditionally-write that
//! makes them stick under concurrency.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::AttendanceError;
use crate::core::geofence;
use crate::model::attendance::{AttendanceEvent, SessionStatus};
use crate::model::company::CompanySettings;
use crate::model::employee::Employee;
use crate::model::geofence::{GeoPoint, Geofence, GeofenceVerdict};

/// Zones applicable to one employee: the company office zone plus the
/// employee's personal remote zone, when configured.
pub fn applicable_zones(company: &CompanySettings, employee: &Employee) -> Vec<Geofence> {
    let mut zones = Vec::with_capacity(2);
    if let Some(zone) = company.office_zone() {
        zones.push(zone);
    }
    if let Some(zone) = employee.remote_zone() {
        zones.push(zone);
    }
    zones
}

/// Builds the `CheckedIn` event for a fresh check-in. The store's guarded
/// insert is what makes the single-open-session invariant durable; this
/// function only assembles the row.
pub fn open_session(
    company: &CompanySettings,
    employee: &Employee,
    now: DateTime<Utc>,
    location: Option<GeoPoint>,
    photo: Option<String>,
) -> AttendanceEvent {
    let zones = applicable_zones(company, employee);
    let eval = geofence::evaluate(location.as_ref(), &zones);
    tracing::debug!(
        employee_id = employee.id,
        verdict = %eval.verdict,
        distances_m = ?eval.distances_m,
        "Evaluated check-in geofence"
    );

    AttendanceEvent {
        id: Uuid::new_v4().to_string(),
        company_id: company.id,
        employee_id: employee.id,
        user_id: employee.user_id,
        status: SessionStatus::CheckedIn,
        check_in_time: now,
        check_out_time: None,
        check_in_lat: location.map(|l| l.latitude),
        check_in_lng: location.map(|l| l.longitude),
        check_in_accuracy: location.and_then(|l| l.accuracy),
        check_out_lat: None,
        check_out_lng: None,
        check_out_accuracy: None,
        is_within_geofence: eval.verdict,
        is_within_geofence_checkout: GeofenceVerdict::Unknown,
        matched_geofence_type: eval.matched_kind,
        total_hours: None,
        work_report: None,
        needs_review: false,
        check_in_photo: photo,
        check_out_photo: None,
    }
}

/// Everything a checkout writes back to the open event.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionClose {
    pub check_out_time: DateTime<Utc>,
    pub total_hours: f64,
    pub verdict: GeofenceVerdict,
    pub location: Option<GeoPoint>,
    pub photo: Option<String>,
    /// Clock skew clamped the duration; record goes to manual review.
    pub needs_review: bool,
}

/// Closes an open session. The checkout geofence verdict is evaluated
/// independently of the check-in verdict; an employee may check in inside
/// and check out outside. Refuses to double-close.
pub fn close_session(
    event: &AttendanceEvent,
    company: &CompanySettings,
    employee: &Employee,
    now: DateTime<Utc>,
    location: Option<GeoPoint>,
    photo: Option<String>,
) -> Result<SessionClose, AttendanceError> {
    if !event.is_open() {
        return Err(AttendanceError::NoOpenSession);
    }

    let zones = applicable_zones(company, employee);
    let eval = geofence::evaluate(location.as_ref(), &zones);
    tracing::debug!(
        employee_id = employee.id,
        event_id = %event.id,
        verdict = %eval.verdict,
        distances_m = ?eval.distances_m,
        "Evaluated check-out geofence"
    );

    let elapsed_secs = (now - event.check_in_time).num_seconds();
    // clock skew: clamp rather than fail, the checkout must still be recorded
    let skewed = elapsed_secs < 0;
    let total_hours = if skewed {
        0.0
    } else {
        elapsed_secs as f64 / 3600.0
    };

    Ok(SessionClose {
        check_out_time: now,
        total_hours,
        verdict: eval.verdict,
        location,
        photo,
        needs_review: skewed,
    })
}

/// Applies a close to its event, mirroring the store's conditional update.
pub fn apply_close(event: &mut AttendanceEvent, close: &SessionClose) {
    event.status = SessionStatus::CheckedOut;
    event.check_out_time = Some(close.check_out_time);
    event.total_hours = Some(close.total_hours);
    event.is_within_geofence_checkout = close.verdict;
    event.check_out_lat = close.location.map(|l| l.latitude);
    event.check_out_lng = close.location.map(|l| l.longitude);
    event.check_out_accuracy = close.location.and_then(|l| l.accuracy);
    event.check_out_photo = close.photo.clone();
    event.needs_review = event.needs_review || close.needs_review;
}
