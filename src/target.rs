//! Date-effective daily study targets.
//!
//! A target saved on day D applies to every day from D onwards until a later
//! entry supersedes it. Entries are keyed by local calendar date, so there is
//! at most one per day and iteration is always in ascending date order.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::util;

pub const MAX_TARGET_HOURS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntry {
    pub date_key: NaiveDate,
    pub target_seconds: u32,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetHistory {
    entries: BTreeMap<NaiveDate, TargetEntry>,
}

impl TargetHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted entries; a later duplicate date wins.
    pub fn from_entries(entries: impl IntoIterator<Item = TargetEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.date_key, e)).collect(),
        }
    }

    /// Insert or overwrite the entry for `date`.
    pub fn set_effective(
        &mut self,
        date: NaiveDate,
        target_seconds: u32,
        saved_at: DateTime<Utc>,
    ) -> &TargetEntry {
        let entry = TargetEntry {
            date_key: date,
            target_seconds,
            saved_at,
        };
        info!(
            "target {} effective from {}",
            util::seconds_to_hm(target_seconds as u64),
            util::format_date_key(date)
        );
        self.entries.insert(date, entry);
        &self.entries[&date]
    }

    pub fn set_effective_today(&mut self, target_seconds: u32) -> &TargetEntry {
        self.set_effective(util::today(), target_seconds, Utc::now())
    }

    /// Effective target for `date`: the latest entry dated on or before it.
    pub fn resolve(&self, date: NaiveDate) -> Option<u32> {
        self.entries
            .range(..=date)
            .next_back()
            .map(|(_, e)| e.target_seconds)
    }

    pub fn clear(&mut self) {
        info!("clearing {} target history entries", self.entries.len());
        self.entries.clear();
    }

    /// Ascending by date.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &TargetEntry> {
        self.entries.values()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &TargetEntry> {
        self.entries.values().rev()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&TargetEntry> {
        self.entries.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convert an hours/minutes input into seconds, clamping hours to `0..=24`
/// and minutes to `0..=59`.
pub fn target_seconds_from_hm(hours: u32, minutes: u32) -> u32 {
    hours.min(MAX_TARGET_HOURS) * 3600 + minutes.min(59) * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        util::parse_date_key(s).unwrap()
    }

    #[test]
    fn resolve_carries_forward() {
        let mut h = TargetHistory::new();
        h.set_effective(d("2024-01-10"), 7200, Utc::now());
        h.set_effective(d("2024-01-01"), 3600, Utc::now());

        assert_eq!(h.resolve(d("2024-01-05")), Some(3600));
        assert_eq!(h.resolve(d("2024-01-10")), Some(7200));
        assert_eq!(h.resolve(d("2024-02-01")), Some(7200));
        assert_eq!(h.resolve(d("2023-12-31")), None);
    }

    #[test]
    fn resolve_on_empty_history() {
        assert_eq!(TargetHistory::new().resolve(d("2024-01-01")), None);
    }

    #[test]
    fn same_day_overwrites() {
        let mut h = TargetHistory::new();
        h.set_effective_today(1800);
        h.set_effective_today(5400);
        assert_eq!(h.len(), 1);
        assert_eq!(h.resolve(util::today()), Some(5400));
    }

    #[test]
    fn entries_stay_sorted() {
        let mut h = TargetHistory::new();
        for (k, v) in [("2024-03-01", 1), ("2024-01-01", 2), ("2024-02-01", 3)] {
            h.set_effective(d(k), v, Utc::now());
        }
        let keys: Vec<String> = h.entries().map(|e| util::format_date_key(e.date_key)).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
        let newest = h.newest_first().next().unwrap();
        assert_eq!(newest.date_key, d("2024-03-01"));
    }

    #[test]
    fn clear_erases_everything() {
        let mut h = TargetHistory::new();
        h.set_effective(d("2024-01-01"), 3600, Utc::now());
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.resolve(d("2030-01-01")), None);
    }

    #[test]
    fn from_entries_deduplicates_by_date() {
        let now = Utc::now();
        let h = TargetHistory::from_entries(vec![
            TargetEntry { date_key: d("2024-01-01"), target_seconds: 60, saved_at: now },
            TargetEntry { date_key: d("2024-01-01"), target_seconds: 120, saved_at: now },
        ]);
        assert_eq!(h.len(), 1);
        assert_eq!(h.resolve(d("2024-01-01")), Some(120));
    }

    #[test]
    fn hm_input_is_clamped() {
        assert_eq!(target_seconds_from_hm(1, 30), 5400);
        assert_eq!(target_seconds_from_hm(30, 0), 24 * 3600);
        assert_eq!(target_seconds_from_hm(0, 90), 59 * 60);
    }

    #[test]
    fn entry_serializes_date_key() {
        let e = TargetEntry {
            date_key: d("2024-01-05"),
            target_seconds: 3600,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["dateKey"], "2024-01-05");
        assert_eq!(json["targetSeconds"], 3600);
    }
}
