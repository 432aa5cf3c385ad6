//! Monthly payroll aggregation: one employee, one reporting month, a slice of
//! the event log, and the company salary policy in; a derived report out.
//! Pure and deterministic, never cached here.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::core::calendar::{self, Calendar};
use crate::model::advance::{Advance, AdvanceStatus};
use crate::model::attendance::{AttendanceEvent, SessionStatus};
use crate::model::company::SalaryPolicy;
use crate::model::employee::Employee;
use crate::model::payroll::MonthlyPayrollReport;

pub fn calculate(
    employee: &Employee,
    year: i32,
    month: u32,
    events: &[AttendanceEvent],
    policy: SalaryPolicy,
    advances: &[Advance],
    holidays: &[NaiveDate],
    calendar: &Calendar,
) -> MonthlyPayrollReport {
    let base_salary = employee.base_salary;
    let standard_daily_hours = employee.standard_daily_hours();

    let working_days = calendar::working_days_in_month(year, month, holidays);
    let total_standard_hours = standard_daily_hours * working_days as f64;

    // completed sessions attributed to the local date they started on
    let completed: Vec<(&AttendanceEvent, NaiveDate)> = events
        .iter()
        .filter(|e| e.status == SessionStatus::CheckedOut)
        .map(|e| (e, calendar.local_date(e.check_in_time)))
        .filter(|(_, date)| date.year() == year && date.month() == month)
        .collect();

    // a session that started on a Sunday contributes nothing
    let total_actual_hours: f64 = completed
        .iter()
        .filter(|(_, date)| date.weekday() != Weekday::Sun)
        .map(|(event, _)| event.total_hours.unwrap_or(0.0))
        .sum();

    let calculated_deductions = match policy {
        SalaryPolicy::HourlyDeduction => {
            let divisor = standard_daily_hours * working_days as f64;
            let hourly_rate = if divisor > 0.0 {
                base_salary / divisor
            } else {
                0.0
            };
            let missing_hours = (total_standard_hours - total_actual_hours).max(0.0);
            (missing_hours * hourly_rate).min(base_salary)
        }
        SalaryPolicy::CheckInOut => {
            if working_days == 0 {
                0.0
            } else {
                let per_day = base_salary / working_days as f64;
                let days_present: BTreeSet<NaiveDate> = completed
                    .iter()
                    .filter(|(_, date)| calendar::is_working_day(*date, holidays))
                    .map(|(_, date)| *date)
                    .collect();
                let earned = days_present.len() as f64 * per_day;
                (base_salary - earned).max(0.0)
            }
        }
    };

    let total_approved_advances: f64 = advances
        .iter()
        .filter(|a| a.status == AdvanceStatus::Approved)
        .map(|a| a.amount)
        .sum();

    // a report never shows negative pay
    let final_net_payable =
        (base_salary - calculated_deductions - total_approved_advances).max(0.0);

    MonthlyPayrollReport {
        employee_id: employee.id,
        employee_name: employee.full_name.clone(),
        year,
        month,
        base_salary,
        total_standard_hours_for_month: total_standard_hours,
        total_actual_hours_worked: total_actual_hours,
        calculated_deductions,
        total_approved_advances,
        final_net_payable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geofence::GeofenceVerdict;
    use chrono::{DateTime, Duration, Utc};

    fn employee(base_salary: f64) -> Employee {
        Employee {
            id: 1001,
            company_id: 1,
            user_id: 42,
            full_name: "John Doe".into(),
            base_salary,
            standard_daily_hours: Some(8.0),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            remote_lat: None,
            remote_lng: None,
            remote_radius_m: None,
        }
    }

    fn completed_session(check_in: &str, hours: f64) -> AttendanceEvent {
        let check_in_time: DateTime<Utc> = check_in.parse().unwrap();
        AttendanceEvent {
            id: uuid::Uuid::new_v4().to_string(),
            company_id: 1,
            employee_id: 1001,
            user_id: 42,
            status: SessionStatus::CheckedOut,
            check_in_time,
            check_out_time: Some(check_in_time + Duration::minutes((hours * 60.0) as i64)),
            check_in_lat: None,
            check_in_lng: None,
            check_in_accuracy: None,
            check_out_lat: None,
            check_out_lng: None,
            check_out_accuracy: None,
            is_within_geofence: GeofenceVerdict::Unknown,
            is_within_geofence_checkout: GeofenceVerdict::Unknown,
            matched_geofence_type: None,
            total_hours: Some(hours),
            work_report: None,
            needs_review: false,
            check_in_photo: None,
            check_out_photo: None,
        }
    }

    fn approved_advance(amount: f64) -> Advance {
        Advance {
            id: 1,
            employee_id: 1001,
            amount,
            status: AdvanceStatus::Approved,
            date_requested: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            date_processed: Some(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()),
            payroll_month: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        }
    }

    // June 2026: 30 days, Sundays on 7/14/21/28, so 26 working days.

    #[test]
    fn standard_hours_exclude_sundays_and_holidays() {
        let holiday = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let report = calculate(
            &employee(30000.0),
            2026,
            6,
            &[],
            SalaryPolicy::HourlyDeduction,
            &[],
            &[holiday],
            &Calendar::utc(),
        );
        assert_eq!(report.total_standard_hours_for_month, 25.0 * 8.0);
    }

    #[test]
    fn full_attendance_has_no_deduction() {
        // one 8h session on every working day of June 2026
        let events: Vec<AttendanceEvent> = calendar::month_days(2026, 6)
            .into_iter()
            .filter(|d| calendar::is_working_day(*d, &[]))
            .map(|d| completed_session(&format!("{d}T09:00:00Z"), 8.0))
            .collect();

        let report = calculate(
            &employee(30000.0),
            2026,
            6,
            &events,
            SalaryPolicy::HourlyDeduction,
            &[],
            &[],
            &Calendar::utc(),
        );
        assert_eq!(report.total_actual_hours_worked, 26.0 * 8.0);
        assert_eq!(report.calculated_deductions, 0.0);
        assert_eq!(report.final_net_payable, 30000.0);
    }

    #[test]
    fn hourly_deduction_charges_missing_hours_at_hourly_rate() {
        // half a day short: 4 hours missing out of 208
        let mut events: Vec<AttendanceEvent> = calendar::month_days(2026, 6)
            .into_iter()
            .filter(|d| calendar::is_working_day(*d, &[]))
            .map(|d| completed_session(&format!("{d}T09:00:00Z"), 8.0))
            .collect();
        events.pop();
        events.push(completed_session("2026-06-30T09:00:00Z", 4.0));

        let report = calculate(
            &employee(31200.0),
            2026,
            6,
            &events,
            SalaryPolicy::HourlyDeduction,
            &[],
            &[],
            &Calendar::utc(),
        );
        // hourly rate = 31200 / 208 = 150; 4 missing hours = 600
        assert!((report.calculated_deductions - 600.0).abs() < 1e-9);
        assert!((report.final_net_payable - 30600.0).abs() < 1e-9);
    }

    #[test]
    fn sunday_sessions_contribute_zero_hours() {
        // 2026-06-07 is a Sunday
        let events = vec![
            completed_session("2026-06-07T09:00:00Z", 8.0),
            completed_session("2026-06-08T09:00:00Z", 8.0),
        ];
        let report = calculate(
            &employee(30000.0),
            2026,
            6,
            &events,
            SalaryPolicy::HourlyDeduction,
            &[],
            &[],
            &Calendar::utc(),
        );
        assert_eq!(report.total_actual_hours_worked, 8.0);
    }

    #[test]
    fn check_in_out_policy_pays_per_present_day() {
        // scenario C: 5 completed sessions across 26 working days
        let days = ["01", "02", "03", "04", "05"];
        let events: Vec<AttendanceEvent> = days
            .iter()
            .map(|d| completed_session(&format!("2026-06-{d}T09:00:00Z"), 1.5))
            .collect();

        let base = 26000.0;
        let report = calculate(
            &employee(base),
            2026,
            6,
            &events,
            SalaryPolicy::CheckInOut,
            &[],
            &[],
            &Calendar::utc(),
        );
        // earned = 5/26 of base, regardless of the short durations
        let earned = 5.0 / 26.0 * base;
        assert!((report.calculated_deductions - (base - earned)).abs() < 1e-9);
        assert!((report.final_net_payable - earned).abs() < 1e-9);
    }

    #[test]
    fn check_in_out_counts_a_day_once_despite_multiple_sessions() {
        let events = vec![
            completed_session("2026-06-01T09:00:00Z", 2.0),
            completed_session("2026-06-01T14:00:00Z", 3.0),
        ];
        let base = 26000.0;
        let report = calculate(
            &employee(base),
            2026,
            6,
            &events,
            SalaryPolicy::CheckInOut,
            &[],
            &[],
            &Calendar::utc(),
        );
        let earned = 1.0 / 26.0 * base;
        assert!((report.final_net_payable - earned).abs() < 1e-9);
    }

    #[test]
    fn approved_advance_reduces_net_payable() {
        // scenario D: full attendance, zero deductions, one 5000 advance
        let events: Vec<AttendanceEvent> = calendar::month_days(2026, 6)
            .into_iter()
            .filter(|d| calendar::is_working_day(*d, &[]))
            .map(|d| completed_session(&format!("{d}T09:00:00Z"), 8.0))
            .collect();

        let report = calculate(
            &employee(30000.0),
            2026,
            6,
            &events,
            SalaryPolicy::HourlyDeduction,
            &[approved_advance(5000.0)],
            &[],
            &Calendar::utc(),
        );
        assert_eq!(report.calculated_deductions, 0.0);
        assert_eq!(report.total_approved_advances, 5000.0);
        assert_eq!(report.final_net_payable, 25000.0);
    }

    #[test]
    fn net_payable_is_floored_at_zero() {
        // no attendance at all plus a large advance
        let report = calculate(
            &employee(30000.0),
            2026,
            6,
            &[],
            SalaryPolicy::HourlyDeduction,
            &[approved_advance(50000.0)],
            &[],
            &Calendar::utc(),
        );
        assert!((report.calculated_deductions - 30000.0).abs() < 1e-6);
        assert_eq!(report.final_net_payable, 0.0);
    }

    #[test]
    fn identical_inputs_yield_identical_reports() {
        let events = vec![completed_session("2026-06-02T09:00:00Z", 8.0)];
        let advances = vec![approved_advance(1000.0)];
        let emp = employee(30000.0);
        let cal = Calendar::utc();

        let a = calculate(
            &emp,
            2026,
            6,
            &events,
            SalaryPolicy::CheckInOut,
            &advances,
            &[],
            &cal,
        );
        let b = calculate(
            &emp,
            2026,
            6,
            &events,
            SalaryPolicy::CheckInOut,
            &advances,
            &[],
            &cal,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn events_outside_the_month_are_ignored() {
        let events = vec![
            completed_session("2026-05-29T09:00:00Z", 8.0),
            completed_session("2026-06-01T09:00:00Z", 8.0),
            completed_session("2026-07-01T09:00:00Z", 8.0),
        ];
        let report = calculate(
            &employee(30000.0),
            2026,
            6,
            &events,
            SalaryPolicy::HourlyDeduction,
            &[],
            &[],
            &Calendar::utc(),
        );
        assert_eq!(report.total_actual_hours_worked, 8.0);
    }
}
