use chrono::{DateTime, Duration, TimeZone, Utc};

use chronicli::error::SyncError;
use chronicli::sync::window::*;

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

#[test]
fn test_recent_last_run_is_clamped_to_margin() {
    // Runs scheduled more recently than the safety margin must still look
    // back the full 26 hours, so scheduler jitter cannot lose a like.
    let now = at("2024-03-10T12:00:00Z");
    let last_run = now - Duration::hours(2);

    let window = resolve_window(Some(&last_run.to_rfc3339()), now);

    assert_eq!(window.start, now - Duration::hours(MINIMUM_MARGIN_HOURS));
    assert_eq!(window.source, WindowSource::MarginClamp);
}

#[test]
fn test_old_last_run_passes_through() {
    let now = at("2024-03-10T12:00:00Z");
    let last_run = now - Duration::hours(72);

    let window = resolve_window(Some(&last_run.to_rfc3339()), now);

    assert_eq!(window.start, last_run);
    assert_eq!(window.source, WindowSource::LastRun);
}

#[test]
fn test_exactly_at_margin_is_clamped() {
    // At exactly 26 hours the clamp applies; the boundary instant is
    // covered either way and the result is identical.
    let now = at("2024-03-10T12:00:00Z");
    let last_run = now - Duration::hours(MINIMUM_MARGIN_HOURS);

    let window = resolve_window(Some(&last_run.to_rfc3339()), now);

    assert_eq!(window.start, last_run);
    assert_eq!(window.source, WindowSource::MarginClamp);
}

#[test]
fn test_missing_last_run_falls_back_to_default_lookback() {
    let now = at("2024-03-10T12:00:00Z");

    let window = resolve_window(None, now);

    assert_eq!(window.start, now - Duration::hours(DEFAULT_LOOKBACK_HOURS));
    assert_eq!(window.source, WindowSource::MissingFallback);
}

#[test]
fn test_malformed_last_run_falls_back_to_default_lookback() {
    let now = at("2024-03-10T12:00:00Z");

    for bad in ["yesterday", "2024-03-09", "2024-03-09 12:00:00", ""] {
        let window = resolve_window(Some(bad), now);
        assert_eq!(window.start, now - Duration::hours(DEFAULT_LOOKBACK_HOURS));
        assert_eq!(window.source, WindowSource::MalformedFallback);
    }
}

#[test]
fn test_last_run_with_offset_is_normalized_to_utc() {
    let now = at("2024-03-10T12:00:00Z");

    let window = resolve_window(Some("2024-03-01T02:00:00+02:00"), now);

    assert_eq!(window.start, at("2024-03-01T00:00:00Z"));
    assert_eq!(window.source, WindowSource::LastRun);
}

#[test]
fn test_backlog_date_parses_to_utc_midnight() {
    let parsed = parse_backlog_date("2024-01-15").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
}

#[test]
fn test_malformed_backlog_date_is_rejected() {
    for bad in ["15-01-2024", "2024/01/15", "2024-13-01", "soon", ""] {
        match parse_backlog_date(bad) {
            Err(SyncError::InvalidDate { input }) => assert_eq!(input, bad),
            other => panic!("expected InvalidDate for {:?}, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_backlog_epoch() {
    assert_eq!(
        backlog_epoch(),
        Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap()
    );
}
