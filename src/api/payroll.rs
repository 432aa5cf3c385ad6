use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::core::calendar::{self, Calendar};
use crate::core::error::AttendanceError;
use crate::core::payroll;
use crate::model::payroll::MonthlyPayrollReport;
use crate::store;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 1)]
    pub month: u32,
}

/// Monthly payroll report, recomputed from the event log on every call.
#[utoipa::path(
    get,
    path = "/api/payroll/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Payroll report", body = MonthlyPayrollReport),
        (status = 400, description = "Invalid reporting month"),
        (status = 404, description = "Employee or company not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn monthly_report(
    pool: web::Data<MySqlPool>,
    cal: web::Data<Calendar>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = query.employee_id;

    let (month_start, window) = match (
        calendar::month_start(query.year, query.month),
        cal.month_window(query.year, query.month),
    ) {
        (Some(s), Some(w)) => (s, w),
        _ => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid reporting month"
            })));
        }
    };

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

    let events = store::list_month_sessions(pool.get_ref(), employee_id, window.0, window.1)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch month sessions");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let advances = store::list_approved_advances(pool.get_ref(), employee_id, month_start)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch advances");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let next_month_start = month_start + chrono::Months::new(1);
    let holidays = store::list_holidays(
        pool.get_ref(),
        employee.company_id,
        month_start,
        next_month_start,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, company_id = employee.company_id, "Failed to fetch holidays");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let report = payroll::calculate(
        &employee,
        query.year,
        query.month,
        &events,
        company.salary_calculation_mode,
        &advances,
        &holidays,
        cal.get_ref(),
    );

    Ok(HttpResponse::Ok().json(report))
}
