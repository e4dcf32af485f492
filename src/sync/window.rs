use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::SyncError;

/// Minimum look-back. Even a run scheduled right on time re-examines at
/// least this much history, so scheduler jitter can never lose a like
/// event; downstream deduplication absorbs the overlap.
pub const MINIMUM_MARGIN_HOURS: i64 = 26;

/// Look-back used when no usable high-water mark is available.
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

/// Where the effective window start came from; the CLI reports fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    /// The supplied last-run timestamp, already outside the safety margin.
    LastRun,
    /// The last-run timestamp was too recent and was clamped to
    /// `now - MINIMUM_MARGIN_HOURS`.
    MarginClamp,
    /// No last-run timestamp was supplied; default look-back applied.
    MissingFallback,
    /// The last-run timestamp did not parse; default look-back applied.
    MalformedFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub source: WindowSource,
}

/// Computes the effective window start for an incremental run:
/// `min(last_run, now - MINIMUM_MARGIN_HOURS)`, UTC.
///
/// A missing or malformed `last_run` falls back to
/// `now - DEFAULT_LOOKBACK_HOURS`; that is reported through the window's
/// source tag, never treated as fatal.
pub fn resolve_window(last_run: Option<&str>, now: DateTime<Utc>) -> SyncWindow {
    let margin_floor = now - Duration::hours(MINIMUM_MARGIN_HOURS);
    let fallback = now - Duration::hours(DEFAULT_LOOKBACK_HOURS);

    match last_run {
        None => SyncWindow {
            start: fallback,
            source: WindowSource::MissingFallback,
        },
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => {
                let parsed = parsed.with_timezone(&Utc);
                if parsed < margin_floor {
                    SyncWindow {
                        start: parsed,
                        source: WindowSource::LastRun,
                    }
                } else {
                    SyncWindow {
                        start: margin_floor,
                        source: WindowSource::MarginClamp,
                    }
                }
            }
            Err(_) => SyncWindow {
                start: fallback,
                source: WindowSource::MalformedFallback,
            },
        },
    }
}

/// Parses an explicit backfill start date (`YYYY-MM-DD`, UTC midnight).
/// Unlike the incremental high-water mark, a malformed value here is fatal
/// before any remote call.
pub fn parse_backlog_date(input: &str) -> Result<DateTime<Utc>, SyncError> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| SyncError::InvalidDate {
        input: input.to_string(),
    })?;

    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Default backfill start when no date is given: the first month the
/// Chronicle playlists cover.
pub fn backlog_epoch() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2022, 11, 1)
        .unwrap()
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
}
