use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::masters::MasterList;

pub const MIN_TOTAL_SECS: u32 = 60;
pub const MIN_STUDY_SECS: u32 = 60;

/// Validated configuration of one study/break cycle.
///
/// Only constructible through [`SessionConfig::new`], so a value of this type
/// always satisfies `study_secs <= total_secs` and the minimum lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    total_secs: u32,
    study_secs: u32,
    break_secs: u32,
    topic: String,
    mode: String,
}

impl SessionConfig {
    pub fn new(
        total_secs: u32,
        study_secs: u32,
        break_secs: u32,
        topic: impl Into<String>,
        mode: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if total_secs < MIN_TOTAL_SECS {
            return Err(ConfigError::TotalTooShort);
        }
        if study_secs < MIN_STUDY_SECS {
            return Err(ConfigError::StudyTooShort);
        }
        if study_secs > total_secs {
            return Err(ConfigError::StudyExceedsTotal);
        }
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(ConfigError::MissingTopic);
        }
        let mode = mode.into().trim().to_string();
        if mode.is_empty() {
            return Err(ConfigError::MissingMode);
        }

        Ok(Self {
            total_secs,
            study_secs,
            break_secs,
            topic,
            mode,
        })
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn study_secs(&self) -> u32 {
        self.study_secs
    }

    pub fn break_secs(&self) -> u32 {
        self.break_secs
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }
}

/// Raw setup form: minute counts plus dropdown selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    pub total_minutes: u32,
    pub study_minutes: u32,
    pub break_minutes: u32,
    pub topic: Option<String>,
    pub mode: Option<String>,
}

impl Default for SessionSetup {
    fn default() -> Self {
        Self {
            total_minutes: 60,
            study_minutes: 25,
            break_minutes: 5,
            topic: None,
            mode: None,
        }
    }
}

impl SessionSetup {
    /// Validate against the active master lists and produce a config.
    pub fn build(&self, topics: &MasterList, modes: &MasterList) -> Result<SessionConfig, ConfigError> {
        if self.total_minutes < 1 {
            return Err(ConfigError::TotalTooShort);
        }
        if self.study_minutes < 1 {
            return Err(ConfigError::StudyTooShort);
        }
        if self.study_minutes > self.total_minutes {
            return Err(ConfigError::StudyExceedsTotal);
        }

        let mode = match self.mode.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => return Err(ConfigError::MissingMode),
        };
        let topic = match self.topic.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(ConfigError::MissingTopic),
        };
        if !modes.contains_active(mode) {
            return Err(ConfigError::InactiveMode(mode.to_string()));
        }
        if !topics.contains_active(topic) {
            return Err(ConfigError::InactiveTopic(topic.to_string()));
        }

        SessionConfig::new(
            self.total_minutes.saturating_mul(60),
            self.study_minutes.saturating_mul(60),
            self.break_minutes.saturating_mul(60),
            topic,
            mode,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Completed,
    Stopped,
}

impl SessionStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(SessionStatus::Idle),
            "completed" => Some(SessionStatus::Completed),
            "stopped" => Some(SessionStatus::Stopped),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Completed => "Completed",
            SessionStatus::Stopped => "Stopped",
        }
    }
}

/// One finished (or stopped) session, as appended to the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub planned_total_seconds: u32,
    pub planned_study_seconds: u32,
    pub planned_break_seconds: u32,
    pub active_study_seconds: u32,
    pub active_break_seconds: u32,
    pub total_active_seconds: u32,
    pub paused_total_seconds: u32,
    pub topic: String,
    pub mode: String,
}
