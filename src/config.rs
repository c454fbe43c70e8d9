use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::analytics::DEFAULT_RANGE_DAYS;
use crate::app_dirs::AppDirs;
use crate::session::SessionSetup;

/// User preferences persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub total_minutes: u32,
    pub study_minutes: u32,
    pub break_minutes: u32,
    /// ring the terminal bell on start, phase change and completion
    pub alerts: bool,
    /// length of the default analytics window ending today
    pub range_days: u32,
    pub last_topic: Option<String>,
    pub last_mode: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let setup = SessionSetup::default();
        Self {
            total_minutes: setup.total_minutes,
            study_minutes: setup.study_minutes,
            break_minutes: setup.break_minutes,
            alerts: true,
            range_days: DEFAULT_RANGE_DAYS,
            last_topic: None,
            last_mode: None,
        }
    }
}

impl Config {
    /// Setup form prefilled from the saved preferences
    pub fn session_setup(&self) -> SessionSetup {
        SessionSetup {
            total_minutes: self.total_minutes,
            study_minutes: self.study_minutes,
            break_minutes: self.break_minutes,
            topic: self.last_topic.clone(),
            mode: self.last_mode.clone(),
        }
    }

    /// Remember the setup that was last used to start a session
    pub fn remember_setup(&mut self, setup: &SessionSetup) {
        self.total_minutes = setup.total_minutes;
        self.study_minutes = setup.study_minutes;
        self.break_minutes = setup.break_minutes;
        self.last_topic = setup.topic.clone();
        self.last_mode = setup.mode.clone();
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("studymate_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring unreadable config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, data)
    }
}
