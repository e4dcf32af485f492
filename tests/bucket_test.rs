use chrono::{DateTime, Utc};

use chronicli::sync::bucket::bucket_by_month;
use chronicli::types::{LikedEntry, MonthKey};

fn liked(uri: &str, at: &str) -> LikedEntry {
    LikedEntry {
        uri: uri.to_string(),
        added_at: at.parse::<DateTime<Utc>>().unwrap(),
    }
}

#[test]
fn test_groups_by_utc_calendar_month() {
    let entries = vec![
        liked("spotify:track:a", "2024-01-15T10:00:00Z"),
        liked("spotify:track:b", "2024-01-31T23:59:59Z"),
        liked("spotify:track:c", "2024-02-01T00:00:00Z"),
    ];

    let buckets = bucket_by_month(&entries);

    assert_eq!(buckets.len(), 2);
    assert_eq!(
        buckets[&MonthKey {
            year: 2024,
            month: 1
        }],
        vec!["spotify:track:a", "spotify:track:b"]
    );
    assert_eq!(
        buckets[&MonthKey {
            year: 2024,
            month: 2
        }],
        vec!["spotify:track:c"]
    );
}

#[test]
fn test_duplicates_within_a_month_collapse_to_first_occurrence() {
    let entries = vec![
        liked("spotify:track:a", "2024-01-02T00:00:00Z"),
        liked("spotify:track:b", "2024-01-03T00:00:00Z"),
        liked("spotify:track:a", "2024-01-20T00:00:00Z"),
    ];

    let buckets = bucket_by_month(&entries);

    assert_eq!(
        buckets[&MonthKey {
            year: 2024,
            month: 1
        }],
        vec!["spotify:track:a", "spotify:track:b"]
    );
}

#[test]
fn test_same_track_liked_in_two_months_stays_in_both() {
    let entries = vec![
        liked("spotify:track:a", "2024-01-02T00:00:00Z"),
        liked("spotify:track:a", "2024-02-02T00:00:00Z"),
    ];

    let buckets = bucket_by_month(&entries);

    assert_eq!(buckets.len(), 2);
    for tracks in buckets.values() {
        assert_eq!(tracks, &vec!["spotify:track:a".to_string()]);
    }
}

#[test]
fn test_months_come_out_in_chronological_order() {
    let entries = vec![
        liked("spotify:track:a", "2024-02-01T00:00:00Z"),
        liked("spotify:track:b", "2023-12-25T00:00:00Z"),
        liked("spotify:track:c", "2024-01-10T00:00:00Z"),
    ];

    let keys: Vec<MonthKey> = bucket_by_month(&entries).into_keys().collect();

    assert_eq!(
        keys,
        vec![
            MonthKey {
                year: 2023,
                month: 12
            },
            MonthKey {
                year: 2024,
                month: 1
            },
            MonthKey {
                year: 2024,
                month: 2
            },
        ]
    );
}

#[test]
fn test_empty_input_yields_no_buckets() {
    assert!(bucket_by_month(&[]).is_empty());
}

#[test]
fn test_playlist_name_template() {
    let jan = MonthKey {
        year: 2024,
        month: 1,
    };
    assert_eq!(jan.playlist_name(), "January 2024 - Chronicle");
    assert_eq!(jan.to_string(), "2024-01");

    let dec = MonthKey {
        year: 2023,
        month: 12,
    };
    assert_eq!(dec.playlist_name(), "December 2023 - Chronicle");
    assert_eq!(dec.month_name(), "December");
}
