//! Single home for day-boundary and working-day arithmetic. The state
//! machine, the stale-session closer and the payroll aggregator all consume
//! this module so "today", "yesterday" and Sunday-exclusion mean the same
//! thing everywhere.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// Server reference timezone, applied to every local-date decision.
#[derive(Debug, Clone, Copy)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// `offset_minutes` east of UTC; out-of-range values fall back to UTC.
    pub fn new(offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(0)
    }

    /// Calendar date of `now` in the reference timezone.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Half-open `[midnight, next midnight)` of `date`, as UTC instants.
    pub fn day_window(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let start_naive = local_midnight - Duration::seconds(self.offset.local_minus_utc() as i64);
        let start = Utc.from_utc_datetime(&start_naive);
        (start, start + Duration::days(1))
    }

    pub fn start_of_today(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.day_window(self.local_date(now)).0
    }

    /// Half-open window covering the whole reporting month, as UTC instants.
    /// `None` for an invalid `(year, month)` pair.
    pub fn month_window(&self, year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = month_start(year, month)?;
        let next = next_month_start(year, month)?;
        Some((self.day_window(first).0, self.day_window(next).0))
    }
}

pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn next_month_start(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = month_start(year, month)?;
    let next = next_month_start(year, month)?;
    Some((next - first).num_days() as u32)
}

/// Every calendar date of the month, in order.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    match (month_start(year, month), days_in_month(year, month)) {
        (Some(first), Some(n)) => (0..n)
            .map(|d| first + Duration::days(d as i64))
            .collect(),
        _ => Vec::new(),
    }
}

/// Sunday is a hard-coded non-working day; holidays come from the caller.
pub fn is_working_day(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    date.weekday() != Weekday::Sun && !holidays.contains(&date)
}

pub fn working_days_in_month(year: i32, month: u32, holidays: &[NaiveDate]) -> u32 {
    month_days(year, month)
        .into_iter()
        .filter(|d| is_working_day(*d, holidays))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_window_respects_offset() {
        // UTC+6: local midnight is 18:00 UTC the previous day
        let cal = Calendar::new(6 * 60);
        let (start, end) = cal.day_window(date(2026, 1, 15));
        assert_eq!(start.to_rfc3339(), "2026-01-14T18:00:00+00:00");
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn local_date_rolls_over_at_local_midnight() {
        let cal = Calendar::new(6 * 60);
        let just_before = "2026-01-14T17:59:00Z".parse::<DateTime<Utc>>().unwrap();
        let just_after = "2026-01-14T18:01:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(cal.local_date(just_before), date(2026, 1, 14));
        assert_eq!(cal.local_date(just_after), date(2026, 1, 15));
    }

    #[test]
    fn start_of_today_is_local_midnight() {
        let cal = Calendar::new(6 * 60);
        let now = "2026-01-15T03:00:00Z".parse::<DateTime<Utc>>().unwrap();
        // 03:00 UTC is 09:00 local; local midnight was 18:00 UTC yesterday
        assert_eq!(
            cal.start_of_today(now).to_rfc3339(),
            "2026-01-14T18:00:00+00:00"
        );
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2026, 1), Some(31));
        assert_eq!(days_in_month(2026, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29)); // leap year
        assert_eq!(days_in_month(2026, 13), None);
    }

    #[test]
    fn working_days_exclude_sundays_and_holidays() {
        // January 2026 has 31 days, 4 Sundays (4, 11, 18, 25)
        assert_eq!(working_days_in_month(2026, 1, &[]), 27);

        // a holiday on a weekday shrinks the count; one on a Sunday does not
        let holidays = [date(2026, 1, 1), date(2026, 1, 4)];
        assert_eq!(working_days_in_month(2026, 1, &holidays), 26);
    }

    #[test]
    fn sunday_is_never_a_working_day() {
        assert!(!is_working_day(date(2026, 1, 4), &[]));
        assert!(is_working_day(date(2026, 1, 5), &[]));
    }

    #[test]
    fn month_window_spans_first_to_next_first() {
        let cal = Calendar::utc();
        let (start, end) = cal.month_window(2026, 1).unwrap();
        assert_eq!(cal.local_date(start), date(2026, 1, 1));
        assert_eq!(cal.local_date(end), date(2026, 2, 1));
        assert!(cal.month_window(2026, 0).is_none());
    }
}
