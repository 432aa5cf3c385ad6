//! All sqlx queries live here, shared by the HTTP handlers and the
//! stale-session closer. Writes against open sessions are conditional on
//! `status = 'checked_in'` so concurrent closers (a live checkout racing the
//! batch job) resolve to exactly one winner; the loser observes zero
//! affected rows and must no-op.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySql, MySqlPool};

use crate::core::session::SessionClose;
use crate::model::advance::Advance;
use crate::model::attendance::AttendanceEvent;
use crate::model::company::CompanySettings;
use crate::model::employee::Employee;

const EVENT_COLUMNS: &str = "id, company_id, employee_id, user_id, status, \
     check_in_time, check_out_time, \
     check_in_lat, check_in_lng, check_in_accuracy, \
     check_out_lat, check_out_lng, check_out_accuracy, \
     is_within_geofence, is_within_geofence_checkout, matched_geofence_type, \
     total_hours, work_report, needs_review, check_in_photo, check_out_photo";

/// Latest open session for an employee, regardless of day. The single-open-
/// session invariant means there is at most one.
pub async fn find_open_session(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<AttendanceEvent>, sqlx::Error> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM attendance_events \
         WHERE employee_id = ? AND status = 'checked_in' \
         ORDER BY check_in_time DESC LIMIT 1"
    );
    sqlx::query_as::<_, AttendanceEvent>(&sql)
        .bind(employee_id)
        .fetch_optional(pool)
        .await
}

/// Insert statement guarded against a concurrent check-in: the row is only
/// written when the employee has no open session, making the write itself
/// enforce the single-open-session invariant rather than the preceding read.
fn guarded_insert_sql() -> String {
    format!(
        "INSERT INTO attendance_events ({EVENT_COLUMNS}) \
         SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ? \
         FROM DUAL \
         WHERE NOT EXISTS (SELECT 1 FROM attendance_events \
                           WHERE employee_id = ? AND status = 'checked_in')"
    )
}

/// Records a fresh check-in. Returns the number of rows written: 0 means
/// another check-in for the same employee won the race and the caller must
/// reject with `AlreadyCheckedIn`.
pub async fn insert_event_if_no_open(
    pool: &MySqlPool,
    event: &AttendanceEvent,
) -> Result<u64, sqlx::Error> {
    let sql = guarded_insert_sql();
    let result = sqlx::query(&sql)
        .bind(&event.id)
        .bind(event.company_id)
        .bind(event.employee_id)
        .bind(event.user_id)
        .bind(event.status)
        .bind(event.check_in_time)
        .bind(event.check_out_time)
        .bind(event.check_in_lat)
        .bind(event.check_in_lng)
        .bind(event.check_in_accuracy)
        .bind(event.check_out_lat)
        .bind(event.check_out_lng)
        .bind(event.check_out_accuracy)
        .bind(event.is_within_geofence)
        .bind(event.is_within_geofence_checkout)
        .bind(event.matched_geofence_type)
        .bind(event.total_hours)
        .bind(event.work_report.as_deref())
        .bind(event.needs_review)
        .bind(event.check_in_photo.as_deref())
        .bind(event.check_out_photo.as_deref())
        .bind(event.employee_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Live checkout. Returns the number of rows closed: 0 means another writer
/// (the batch closer, or a duplicate request) already closed the session.
pub async fn close_session(
    pool: &MySqlPool,
    event_id: &str,
    close: &SessionClose,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE attendance_events SET \
             status = 'checked_out', check_out_time = ?, total_hours = ?, \
             is_within_geofence_checkout = ?, \
             check_out_lat = ?, check_out_lng = ?, check_out_accuracy = ?, \
             check_out_photo = ?, needs_review = needs_review OR ? \
         WHERE id = ? AND status = 'checked_in'",
    )
    .bind(close.check_out_time)
    .bind(close.total_hours)
    .bind(close.verdict)
    .bind(close.location.map(|l| l.latitude))
    .bind(close.location.map(|l| l.longitude))
    .bind(close.location.and_then(|l| l.accuracy))
    .bind(close.photo.as_deref())
    .bind(close.needs_review)
    .bind(event_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Batch-job close with a synthesized checkout time and auto work report.
/// Takes any executor so the closer can run it inside a per-company
/// transaction. Conditional on `checked_in` like the live path.
pub async fn force_close_session<'e, E>(
    executor: E,
    event_id: &str,
    check_out_time: DateTime<Utc>,
    total_hours: f64,
    work_report: &str,
) -> Result<u64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        "UPDATE attendance_events SET \
             status = 'checked_out', check_out_time = ?, total_hours = ?, work_report = ? \
         WHERE id = ? AND status = 'checked_in'",
    )
    .bind(check_out_time)
    .bind(total_hours)
    .bind(work_report)
    .bind(event_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Completed sessions whose check-in falls inside `[start, end)`.
pub async fn list_month_sessions(
    pool: &MySqlPool,
    employee_id: u64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM attendance_events \
         WHERE employee_id = ? AND status = 'checked_out' \
           AND check_in_time >= ? AND check_in_time < ? \
         ORDER BY check_in_time"
    );
    sqlx::query_as::<_, AttendanceEvent>(&sql)
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
}

/// Sessions still open that started before `cutoff` (start of today): the
/// stale set the batch closer sweeps. Not bounded below, so sessions missed
/// by an earlier run are still picked up.
pub async fn list_stale_sessions(
    pool: &MySqlPool,
    company_id: u64,
    cutoff: DateTime<Utc>,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM attendance_events \
         WHERE company_id = ? AND status = 'checked_in' AND check_in_time < ? \
         ORDER BY check_in_time"
    );
    sqlx::query_as::<_, AttendanceEvent>(&sql)
        .bind(company_id)
        .bind(cutoff)
        .fetch_all(pool)
        .await
}

pub async fn get_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, company_id, user_id, full_name, base_salary, \
                standard_daily_hours, joining_date, remote_lat, remote_lng, remote_radius_m \
         FROM employees WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_company_settings(
    pool: &MySqlPool,
    company_id: u64,
) -> Result<Option<CompanySettings>, sqlx::Error> {
    sqlx::query_as::<_, CompanySettings>(
        "SELECT id, name, office_lat, office_lng, office_radius_m, salary_calculation_mode \
         FROM companies WHERE id = ?",
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_company_ids(pool: &MySqlPool) -> Result<Vec<u64>, sqlx::Error> {
    sqlx::query_scalar::<_, u64>("SELECT id FROM companies ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Approved advances charged against the month starting at `month_start`.
pub async fn list_approved_advances(
    pool: &MySqlPool,
    employee_id: u64,
    month_start: NaiveDate,
) -> Result<Vec<Advance>, sqlx::Error> {
    sqlx::query_as::<_, Advance>(
        "SELECT id, employee_id, amount, status, date_requested, date_processed, payroll_month \
         FROM advances \
         WHERE employee_id = ? AND status = 'approved' AND payroll_month = ?",
    )
    .bind(employee_id)
    .bind(month_start)
    .fetch_all(pool)
    .await
}

pub async fn list_holidays(
    pool: &MySqlPool,
    company_id: u64,
    month_start: NaiveDate,
    next_month_start: NaiveDate,
) -> Result<Vec<NaiveDate>, sqlx::Error> {
    sqlx::query_scalar::<_, NaiveDate>(
        "SELECT holiday_date FROM holidays \
         WHERE company_id = ? AND holiday_date >= ? AND holiday_date < ? \
         ORDER BY holiday_date",
    )
    .bind(company_id)
    .bind(month_start)
    .bind(next_month_start)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_in_insert_is_conditional_on_no_open_session() {
        // two concurrent check-ins must not both insert; the statement
        // itself has to reject the loser, not the read before it
        let sql = guarded_insert_sql();
        assert!(sql.contains("WHERE NOT EXISTS"));
        assert!(sql.contains("status = 'checked_in'"));
        assert!(sql.contains("employee_id = ?"));

        // 21 column binds plus the guard's employee_id bind
        assert_eq!(sql.matches('?').count(), 22);
    }
}
