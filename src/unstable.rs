//! Ranking of tests that fail across days

use crate::UnstableTest;
use std::collections::{BTreeSet, HashMap};

/// Count, per test name, the number of days on which it failed.
///
/// `daily_failures` holds one list of failing test names per day; a name
/// repeated within one day counts once for that day. The result is sorted by
/// failure count (descending), then name, and truncated to `limit`.
pub fn rank_unstable(daily_failures: &[Vec<String>], limit: usize) -> Vec<UnstableTest> {
    if limit == 0 {
        return Vec::new();
    }

    let mut failures: HashMap<&str, u64> = HashMap::new();
    for day in daily_failures {
        let unique: BTreeSet<&str> = day.iter().map(String::as_str).collect();
        for name in unique {
            *failures.entry(name).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<UnstableTest> = failures
        .into_iter()
        .map(|(name, failures)| UnstableTest {
            name: name.to_string(),
            failures,
        })
        .collect();
    ranked.sort_by(|a, b| b.failures.cmp(&a.failures).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}
