use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::core::error::AttendanceError;
use crate::core::session;
use crate::model::attendance::AttendanceEvent;
use crate::model::geofence::GeoPoint;
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct AttendancePunch {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 23.8103, nullable = true)]
    pub latitude: Option<f64>,

    #[schema(example = 90.4125, nullable = true)]
    pub longitude: Option<f64>,

    #[schema(example = 12.5, nullable = true)]
    pub accuracy: Option<f64>,

    #[schema(example = "photos/2026-01-05/1001-in.jpg", nullable = true)]
    pub photo_ref: Option<String>,
}

impl AttendancePunch {
    /// Both coordinates or nothing; a lone latitude is treated as no
    /// location so the geofence verdict stays `unknown`.
    fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
                accuracy: self.accuracy,
            }),
            _ => None,
        }
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = AttendancePunch,
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceEvent),
        (status = 400, description = "Already checked in", body = Object, example = json!({
            "message": "already checked in today"
        })),
        (status = 404, description = "Employee or company not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    payload: web::Json<AttendancePunch>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;

    let employee = store::get_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": AttendanceError::EmployeeNotFound(employee_id).to_string()
            })));
        }
    };

    let company = store::get_company_settings(pool.get_ref(), employee.company_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, company_id = employee.company_id, "Failed to fetch company settings");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let company = match company {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": AttendanceError::CompanyNotFound(employee.company_id).to_string()
            })));
        }
    };

    let event = session::open_session(
        &company,
        &employee,
        Utc::now(),
        payload.location(),
        payload.photo_ref.clone(),
    );

    // the insert is conditional on no open session existing, so two racing
    // check-ins resolve to exactly one inserted row
    let rows = store::insert_event_if_no_open(pool.get_ref(), &event)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Check-in failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if rows == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": AttendanceError::AlreadyCheckedIn.to_string()
        })));
    }

    tracing::info!(
        employee_id,
        event_id = %event.id,
        verdict = %event.is_within_geofence,
        "Checked in"
    );
    Ok(HttpResponse::Ok().json(event))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = AttendancePunch,
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceEvent),
        (status = 400, description = "No open session", body = Object, example = json!({
            "message": "no open session to check out of"
        })),
        (status = 404, description = "Employee or company not found"),
        (status = 409, description = "Session was closed concurrently"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    pool: web::Data<MySqlPool>,
    payload: web::Json<AttendancePunch>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;

    let employee = store::get_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": AttendanceError::EmployeeNotFound(employee_id).to_string()
            })));
        }
    };

    let company = store::get_company_settings(pool.get_ref(), employee.company_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, company_id = employee.company_id, "Failed to fetch company settings");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let company = match company {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": AttendanceError::CompanyNotFound(employee.company_id).to_string()
            })));
        }
    };

    let open = store::find_open_session(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to look up open session");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let mut event = match open {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": AttendanceError::NoOpenSession.to_string()
            })));
        }
    };

    let close = match session::close_session(
        &event,
        &company,
        &employee,
        Utc::now(),
        payload.location(),
        payload.photo_ref.clone(),
    ) {
        Ok(c) => c,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    let rows = store::close_session(pool.get_ref(), &event.id, &close)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, event_id = %event.id, "Check-out failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // another writer (batch closer or duplicate request) got there first
    if rows == 0 {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "Session was already closed"
        })));
    }

    session::apply_close(&mut event, &close);
    tracing::info!(
        employee_id,
        event_id = %event.id,
        total_hours = close.total_hours,
        verdict = %close.verdict,
        "Checked out"
    );
    Ok(HttpResponse::Ok().json(event))
}
