//! Daily sweep that force-closes sessions left `checked_in` overnight.
//!
//! One company is one unit of work: its closures commit in a single
//! transaction, and a failure there is reported in the run summary without
//! touching any other company's batch. A session already closed by a live
//! checkout loses the conditional update race and is simply skipped.

use std::time::Duration as StdDuration;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::core::calendar::Calendar;
use crate::core::error::AttendanceError;
use crate::model::attendance::AttendanceEvent;
use crate::store;

/// Work report text stamped on force-closed sessions.
pub const AUTO_WORK_REPORT: &str = "<auto-generated: employee did not check out>";

const COMMIT_RETRY_BACKOFF: StdDuration = StdDuration::from_millis(500);

/// Per-run summary returned to the scheduler trigger. Failures are counted,
/// not thrown, so every run sweeps every company.
#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct RunReport {
    pub companies_processed: u32,
    pub companies_failed: u32,
    pub sessions_closed: u32,
    pub employees_skipped: u32,
}

#[derive(Debug, Default)]
struct CompanyOutcome {
    closed: u32,
    skipped: u32,
}

/// Synthesized checkout for a stale session: check-in plus the employee's
/// standard daily hours.
pub fn synthesize_close(
    event: &AttendanceEvent,
    standard_daily_hours: f64,
) -> (DateTime<Utc>, f64) {
    let check_out_time =
        event.check_in_time + Duration::seconds((standard_daily_hours * 3600.0).round() as i64);
    (check_out_time, standard_daily_hours)
}

/// One full sweep. Stale means `checked_in` with a check-in before the start
/// of today in the reference timezone — deliberately unbounded below, so a
/// session missed during an outage still gets closed on the next run.
/// Idempotent: everything this run closes is `checked_out` afterwards and
/// never matches again.
pub async fn run(pool: &MySqlPool, calendar: &Calendar, now: DateTime<Utc>) -> RunReport {
    let cutoff = calendar.start_of_today(now);
    let mut report = RunReport::default();

    let company_ids = match store::list_company_ids(pool).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "Stale-session sweep could not list companies");
            report.companies_failed = 1;
            return report;
        }
    };

    for company_id in company_ids {
        match close_company(pool, company_id, cutoff).await {
            Ok(outcome) => {
                report.companies_processed += 1;
                report.sessions_closed += outcome.closed;
                report.employees_skipped += outcome.skipped;
            }
            Err(e) => {
                tracing::error!(error = %e, company_id, "Stale-session batch failed for company");
                report.companies_failed += 1;
            }
        }
    }

    tracing::info!(
        companies_processed = report.companies_processed,
        companies_failed = report.companies_failed,
        sessions_closed = report.sessions_closed,
        employees_skipped = report.employees_skipped,
        "Stale-session sweep finished"
    );
    report
}

async fn close_company(
    pool: &MySqlPool,
    company_id: u64,
    cutoff: DateTime<Utc>,
) -> anyhow::Result<CompanyOutcome> {
    let stale = store::list_stale_sessions(pool, company_id, cutoff)
        .await
        .context("listing stale sessions")?;

    if stale.is_empty() {
        return Ok(CompanyOutcome::default());
    }

    let mut outcome = CompanyOutcome::default();
    let mut closures: Vec<(String, DateTime<Utc>, f64)> = Vec::with_capacity(stale.len());

    for event in &stale {
        match store::get_employee(pool, event.employee_id)
            .await
            .context("resolving employee")?
        {
            Some(employee) => {
                let (check_out_time, total_hours) =
                    synthesize_close(event, employee.standard_daily_hours());
                closures.push((event.id.clone(), check_out_time, total_hours));
            }
            None => {
                tracing::warn!(
                    employee_id = event.employee_id,
                    event_id = %event.id,
                    company_id,
                    "Skipping stale session: employee record not found"
                );
                outcome.skipped += 1;
            }
        }
    }

    if closures.is_empty() {
        return Ok(outcome);
    }

    // all-or-nothing per company, retried once before the company is marked
    // failed for this run
    outcome.closed = match commit_closures(pool, &closures).await {
        Ok(n) => n,
        Err(first) => {
            tracing::warn!(error = %first, company_id, "Batch commit failed, retrying once");
            tokio::time::sleep(COMMIT_RETRY_BACKOFF).await;
            commit_closures(pool, &closures)
                .await
                .map_err(|e| AttendanceError::CommitFailure(e.to_string()))?
        }
    };

    Ok(outcome)
}

async fn commit_closures(
    pool: &MySqlPool,
    closures: &[(String, DateTime<Utc>, f64)],
) -> Result<u32, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut closed = 0u32;

    for (event_id, check_out_time, total_hours) in closures {
        let rows = store::force_close_session(
            &mut *tx,
            event_id,
            *check_out_time,
            *total_hours,
            AUTO_WORK_REPORT,
        )
        .await?;
        // zero rows: a live checkout won the race after our read; leave it be
        closed += rows as u32;
    }

    tx.commit().await?;
    Ok(closed)
}

/// Interval driver spawned at startup; the sweep itself is also reachable via
/// the manual trigger endpoint for external schedulers.
pub async fn run_forever(pool: MySqlPool, calendar: Calendar, period: StdDuration) {
    tracing::info!(period_secs = period.as_secs(), "Stale-session closer started");
    let mut ticker = tokio::time::interval(period);

    loop {
        ticker.tick().await;
        run(&pool, &calendar, Utc::now()).await;
    }
}
