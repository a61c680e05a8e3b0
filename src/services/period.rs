//! Inclusive date ranges used by every dashboard query.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of the range the dashboard opens with.
pub const DEFAULT_RANGE_DAYS: u64 = 7;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range start {from} is after range end {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] when `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, RangeError> {
        if from > to {
            return Err(RangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// The `days` days before `today`, through `today`.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let from = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    /// Midnight starting `from` on the `tz` wall clock.
    #[must_use]
    pub fn start_instant(&self, tz: &FixedOffset) -> DateTime<Utc> {
        local_midnight(self.from, tz)
    }

    /// Midnight after `to` on the `tz` wall clock. Exclusive upper bound.
    #[must_use]
    pub fn end_exclusive(&self, tz: &FixedOffset) -> DateTime<Utc> {
        local_midnight(self.to.succ_opt().unwrap_or(NaiveDate::MAX), tz)
    }
}

fn local_midnight(date: NaiveDate, tz: &FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(*tz)
        .earliest()
        .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc))
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both optional.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    /// Fill missing ends from the default range ending `today`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] when the resulting start is after the end.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, RangeError> {
        let to = self.to.unwrap_or(today);
        let from = self
            .from
            .unwrap_or_else(|| DateRange::last_days(to, DEFAULT_RANGE_DAYS).from);
        DateRange::new(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn last_days_spans_back_from_today() {
        let r = DateRange::last_days(d(2025, 3, 10), 7);
        assert_eq!(r.from, d(2025, 3, 3));
        assert_eq!(r.to, d(2025, 3, 10));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(d(2025, 3, 10), d(2025, 3, 1)).unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn query_defaults_to_last_week() {
        let r = RangeQuery::default().resolve(d(2025, 1, 3)).unwrap();
        assert_eq!(r, DateRange { from: d(2024, 12, 27), to: d(2025, 1, 3) });
    }

    #[test]
    fn query_with_only_to_anchors_default_start() {
        let q = RangeQuery { from: None, to: Some(d(2025, 2, 10)) };
        assert_eq!(q.resolve(d(2025, 6, 1)).unwrap().from, d(2025, 2, 3));
    }

    #[test]
    fn query_from_after_today_is_inverted() {
        let q = RangeQuery { from: Some(d(2025, 7, 1)), to: None };
        assert!(q.resolve(d(2025, 6, 1)).is_err());
    }

    #[test]
    fn instants_cover_whole_days() {
        let r = DateRange::new(d(2025, 3, 1), d(2025, 3, 2)).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(r.start_instant(&utc).to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert_eq!(r.end_exclusive(&utc).to_rfc3339(), "2025-03-03T00:00:00+00:00");
    }

    #[test]
    fn instants_follow_the_wall_clock_offset() {
        let r = DateRange::new(d(2025, 3, 1), d(2025, 3, 9)).unwrap();
        let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(r.start_instant(&sao_paulo).to_rfc3339(), "2025-03-01T03:00:00+00:00");
        assert_eq!(r.end_exclusive(&sao_paulo).to_rfc3339(), "2025-03-10T03:00:00+00:00");
    }

    #[test]
    fn query_deserializes_iso_dates() {
        let q: RangeQuery = serde_json::from_str(r#"{"from":"2025-03-01","to":"2025-03-05"}"#).unwrap();
        assert_eq!(q.from, Some(d(2025, 3, 1)));
        assert_eq!(q.to, Some(d(2025, 3, 5)));
    }
}
