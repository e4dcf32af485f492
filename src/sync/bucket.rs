use std::collections::{BTreeMap, HashSet};

use crate::types::{LikedEntry, MonthKey};

/// Groups liked entries by the UTC calendar month they were liked in.
///
/// Pure and deterministic. Duplicate URIs within the same month collapse to
/// their first occurrence; the same URI liked in two different months stays
/// in both buckets. Months come out in chronological order.
pub fn bucket_by_month(entries: &[LikedEntry]) -> BTreeMap<MonthKey, Vec<String>> {
    let mut buckets: BTreeMap<MonthKey, Vec<String>> = BTreeMap::new();
    let mut seen: BTreeMap<MonthKey, HashSet<String>> = BTreeMap::new();

    for entry in entries {
        let key = MonthKey::from_datetime(&entry.added_at);
        if seen.entry(key).or_default().insert(entry.uri.clone()) {
            buckets.entry(key).or_default().push(entry.uri.clone());
        }
    }

    buckets
}
