//! Aggregations over the session log: daily target vs. actual, topic and
//! mode breakdowns, home-screen stats.
//!
//! All day bucketing uses the local calendar date of a session's start.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use itertools::Itertools;

use crate::error::RangeError;
use crate::masters::MasterList;
use crate::session::SessionRecord;
use crate::target::TargetHistory;
use crate::util;

pub const MAX_RANGE_DAYS: i64 = 31;
pub const DEFAULT_RANGE_DAYS: u32 = 7;
pub const MAX_STREAK_DAYS: u32 = 3650;
pub const MISSING_LABEL: &str = "—";

/// Inclusive range of calendar days, at most [`MAX_RANGE_DAYS`] long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::EndBeforeStart);
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(RangeError::TooLong { days });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start = util::parse_date_key(start).ok_or_else(|| RangeError::InvalidDate(start.trim().to_string()))?;
        let end = util::parse_date_key(end).ok_or_else(|| RangeError::InvalidDate(end.trim().to_string()))?;
        Self::new(start, end)
    }

    /// The `n` days ending on `today`, clamped to `1..=31`.
    pub fn last_days(today: NaiveDate, n: u32) -> Self {
        let n = (n as i64).clamp(1, MAX_RANGE_DAYS);
        Self {
            start: today - Duration::days(n - 1),
            end: today,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.days()).map(move |i| start + Duration::days(i))
    }

    /// Same length, moved by `days` (negative moves back).
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicFilter {
    #[default]
    All,
    Topic(String),
}

impl TopicFilter {
    pub fn matches(&self, record: &SessionRecord) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Topic(name) => record.topic == *name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TopicFilter::All => "All topics",
            TopicFilter::Topic(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOption {
    pub name: String,
    pub active: bool,
}

impl TopicOption {
    pub fn label(&self) -> String {
        if self.active {
            self.name.clone()
        } else {
            format!("{} (inactive)", self.name)
        }
    }
}

/// Union of catalog topics and topics used by `sessions`, sorted by name.
/// Topics that are not in the catalog count as active.
pub fn topic_filter_options<'a>(
    topics: &MasterList,
    sessions: impl IntoIterator<Item = &'a SessionRecord>,
) -> Vec<TopicOption> {
    let mut map: BTreeMap<String, bool> = topics
        .items()
        .iter()
        .map(|t| (t.name.clone(), t.active))
        .collect();
    for s in sessions {
        if !s.topic.is_empty() {
            map.entry(s.topic.clone()).or_insert(true);
        }
    }
    map.into_iter()
        .map(|(name, active)| TopicOption { name, active })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub label: String,
    pub target_minutes: u64,
    pub actual_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendReport {
    pub range: DateRange,
    pub filter: TopicFilter,
    pub daily: Vec<DailyPoint>,
    /// Active study seconds per topic, largest first.
    pub topics: Vec<(String, u64)>,
    pub modes: Vec<(String, u64)>,
    pub sessions_in_range: usize,
}

impl TrendReport {
    pub fn build(
        sessions: &[SessionRecord],
        targets: &TargetHistory,
        range: DateRange,
        filter: &TopicFilter,
    ) -> Self {
        let in_range = sessions_in_range(sessions, &range).collect_vec();
        let filtered = in_range.iter().copied().filter(|s| filter.matches(*s)).collect_vec();

        let by_day = study_seconds_by_day(filtered.iter().copied());
        let daily = range
            .iter_days()
            .map(|date| DailyPoint {
                date,
                label: util::format_dd_mon(date),
                target_minutes: targets
                    .resolve(date)
                    .map_or(0, |t| util::round_minutes(t as u64)),
                actual_minutes: util::round_minutes(by_day.get(&date).copied().unwrap_or(0)),
            })
            .collect();

        Self {
            range,
            filter: filter.clone(),
            daily,
            topics: breakdown(&filtered, |s| s.topic.as_str()),
            modes: breakdown(&filtered, |s| s.mode.as_str()),
            sessions_in_range: in_range.len(),
        }
    }

    pub fn total_actual_minutes(&self) -> u64 {
        self.daily.iter().map(|p| p.actual_minutes).sum()
    }
}

pub fn sessions_in_range<'a>(
    sessions: &'a [SessionRecord],
    range: &'a DateRange,
) -> impl Iterator<Item = &'a SessionRecord> + 'a {
    sessions
        .iter()
        .filter(move |s| range.contains(util::date_key(s.started_at)))
}

/// Active study seconds per local start date.
pub fn study_seconds_by_day<'a>(
    sessions: impl IntoIterator<Item = &'a SessionRecord>,
) -> HashMap<NaiveDate, u64> {
    let mut map = HashMap::new();
    for s in sessions {
        *map.entry(util::date_key(s.started_at)).or_insert(0) += s.active_study_seconds as u64;
    }
    map
}

fn breakdown<F>(sessions: &[&SessionRecord], key: F) -> Vec<(String, u64)>
where
    F: Fn(&SessionRecord) -> &str,
{
    let mut map: HashMap<String, u64> = HashMap::new();
    for s in sessions {
        let k = key(*s).trim();
        let k = if k.is_empty() { MISSING_LABEL } else { k };
        *map.entry(k.to_string()).or_insert(0) += s.active_study_seconds as u64;
    }
    map.into_iter()
        .filter(|(_, v)| *v > 0)
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStat {
    pub date: NaiveDate,
    pub study_seconds: u64,
    pub target_seconds: Option<u32>,
}

impl DayStat {
    /// Completion in whole percent, capped at 100. `None` without a positive
    /// target.
    pub fn percent(&self) -> Option<u8> {
        match self.target_seconds {
            Some(t) if t > 0 => {
                let pct = (self.study_seconds as f64 / t as f64 * 100.0).round();
                Some(pct.min(100.0) as u8)
            }
            _ => None,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.percent().map_or(0.0, |p| p as f64 / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeStats {
    pub today: DayStat,
    pub yesterday: DayStat,
    pub streak: u32,
}

impl HomeStats {
    pub fn compute(sessions: &[SessionRecord], targets: &TargetHistory, today: NaiveDate) -> Self {
        let by_day = study_seconds_by_day(sessions);
        let day = |date: NaiveDate| DayStat {
            date,
            study_seconds: by_day.get(&date).copied().unwrap_or(0),
            target_seconds: targets.resolve(date),
        };
        Self {
            today: day(today),
            yesterday: day(today - Duration::days(1)),
            streak: streak(&by_day, today),
        }
    }
}

/// Consecutive days ending on `today` with positive study time.
pub fn streak(by_day: &HashMap<NaiveDate, u64>, today: NaiveDate) -> u32 {
    (0..MAX_STREAK_DAYS)
        .take_while(|i| {
            let date = today - Duration::days(*i as i64);
            by_day.get(&date).copied().unwrap_or(0) > 0
        })
        .count() as u32
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounts {
    pub topics: HashMap<String, usize>,
    pub modes: HashMap<String, usize>,
}

impl UsageCounts {
    pub fn topic(&self, name: &str) -> usize {
        self.topics.get(name).copied().unwrap_or(0)
    }

    pub fn mode(&self, name: &str) -> usize {
        self.modes.get(name).copied().unwrap_or(0)
    }
}

/// Number of logged sessions per topic and per mode.
pub fn usage_counts(sessions: &[SessionRecord]) -> UsageCounts {
    UsageCounts {
        topics: sessions.iter().map(|s| s.topic.clone()).counts(),
        modes: sessions.iter().map(|s| s.mode.clone()).counts(),
    }
}
