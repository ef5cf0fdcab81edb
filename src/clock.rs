use chrono::{DateTime, Days, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike};

/// Source of "now" for every time-relative query and scheduling decision.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// First instant of `date` on the local calendar.
///
/// Midnight may not exist on DST transition days, in which case the first
/// valid hour of that day is used.
pub fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    start_of_day_in(&Local, date)
}

/// [`start_of_day`] in an arbitrary zone.
pub fn start_of_day_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    for hour in 0..24 {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        if let Some(dt) = tz.from_local_datetime(&date.and_time(time)).earliest() {
            return dt;
        }
    }
    tz.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Half-open `[start, end)` bounds of the local day containing `date`.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Local>, DateTime<Local>) {
    day_bounds_in(&Local, date)
}

pub fn day_bounds_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (DateTime<Tz>, DateTime<Tz>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day_in(tz, date), start_of_day_in(tz, next))
}

/// `days` calendar days after `from`. When the same wall-clock time does
/// not exist on the target day, falls back to `days * 24h`. `None` when
/// the result is beyond the representable range.
pub fn add_days<Tz: TimeZone>(from: &DateTime<Tz>, days: u32) -> Option<DateTime<Tz>> {
    from.clone()
        .checked_add_days(Days::new(u64::from(days)))
        .or_else(|| from.clone().checked_add_signed(Duration::days(i64::from(days))))
}

/// Drop seconds and sub-seconds.
pub fn truncate_to_minute(dt: DateTime<Local>) -> DateTime<Local> {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_the_minute() {
        let dt = Local.with_ymd_and_hms(2026, 3, 10, 14, 27, 59).unwrap();
        let truncated = truncate_to_minute(dt);
        assert_eq!(truncated, Local.with_ymd_and_hms(2026, 3, 10, 14, 27, 0).unwrap());
    }

    #[test]
    fn day_bounds_span_one_calendar_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.date_naive(), date);
        assert_eq!(end.date_naive(), date.succ_opt().unwrap());
        assert!(start < end);
    }

    #[test]
    fn missing_midnight_starts_the_day_at_one() {
        // Sao Paulo moved clocks from 00:00 to 01:00 on 2018-11-04.
        let tz = chrono_tz::America::Sao_Paulo;
        let date = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        let start = start_of_day_in(&tz, date);
        assert_eq!(start.date_naive(), date);
        assert_eq!(start.format("%H:%M").to_string(), "01:00");

        let (start, end) = day_bounds_in(&tz, date);
        assert_eq!(end - start, Duration::hours(23));
    }

    #[test]
    fn spring_forward_day_is_23_hours() {
        let tz = chrono_tz::America::New_York;
        let (start, end) = day_bounds_in(&tz, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        assert_eq!(start.format("%H:%M").to_string(), "00:00");
        assert_eq!(end - start, Duration::hours(23));
    }

    #[test]
    fn add_days_keeps_wall_clock_time_across_dst() {
        let tz = chrono_tz::America::New_York;
        let before = tz.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap();
        let after = add_days(&before, 1).unwrap();
        assert_eq!(after.format("%m-%d %H:%M").to_string(), "03-08 09:00");
        assert_eq!(after - before, Duration::hours(23));
    }

    #[test]
    fn add_days_into_a_gap_falls_back_to_whole_days() {
        let tz = chrono_tz::America::New_York;
        let before = tz.with_ymd_and_hms(2026, 3, 7, 2, 30, 0).unwrap();
        let after = add_days(&before, 1).unwrap();
        assert_eq!(after - before, Duration::hours(24));
        assert_eq!(after.format("%H:%M").to_string(), "03:30");
    }

    #[test]
    fn add_days_beyond_range_is_none() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(add_days(&now, u32::MAX), None);
        assert_eq!(add_days(&now, 0), Some(now));
    }
}
