//! Analysis-window date handling
//!
//! The window defaults mirror the run invocation contract: the end date
//! falls back to yesterday (and is capped there, since there is no data
//! for today), and the start date falls back to one year before the end.

use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Length of the default analysis window
const DEFAULT_WINDOW_DAYS: u64 = 365;

/// Errors from resolving an analysis window
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Resolve the analysis window from optional user-supplied bounds
pub fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), DateRangeError> {
    let yesterday = today.pred_opt().unwrap_or(today);
    let end = end.map_or(yesterday, |d| d.min(yesterday));
    let start = start.unwrap_or_else(|| {
        end.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
            .unwrap_or(end)
    });

    if start > end {
        return Err(DateRangeError::StartAfterEnd { start, end });
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_defaults_to_trailing_year() {
        let (start, end) = resolve_window(None, None, date("2026-08-07")).unwrap();
        assert_eq!(end, date("2026-08-06"));
        assert_eq!(start, date("2025-08-06"));
    }

    #[test]
    fn test_end_date_capped_at_yesterday() {
        let (_, end) =
            resolve_window(None, Some(date("2026-12-31")), date("2026-08-07")).unwrap();
        assert_eq!(end, date("2026-08-06"));
    }

    #[test]
    fn test_explicit_window_preserved() {
        let (start, end) = resolve_window(
            Some(date("2026-01-01")),
            Some(date("2026-06-30")),
            date("2026-08-07"),
        )
        .unwrap();
        assert_eq!(start, date("2026-01-01"));
        assert_eq!(end, date("2026-06-30"));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = resolve_window(
            Some(date("2026-07-01")),
            Some(date("2026-06-30")),
            date("2026-08-07"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DateRangeError::StartAfterEnd {
                start: date("2026-07-01"),
                end: date("2026-06-30"),
            }
        );
    }
}
