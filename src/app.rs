//! Interactive application state: which view is shown, form contents and the
//! key bindings that drive the timer, the store and the analytics.
//!
//! Everything here is terminal independent so it can be driven headlessly by
//! feeding [`AppEvent`]s to [`App::handle_event`].

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info, warn};

use crate::alert::{AlertKind, Alerter};
use crate::analytics::{self, DateRange, HomeStats, TopicFilter, TrendReport};
use crate::config::{Config, ConfigStore};
use crate::export::{self, ExportFormat};
use crate::masters::{MasterKind, MasterList};
use crate::runtime::AppEvent;
use crate::session::{SessionRecord, SessionSetup};
use crate::store::StudyDb;
use crate::target::{self, TargetHistory, MAX_TARGET_HOURS};
use crate::timer::{Timer, TimerEvent};
use crate::util;

const MAX_SETUP_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum View {
    Home,
    Setup,
    Run,
    Analytics,
    Targets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsTab {
    Log,
    Trends,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetsTab {
    Target,
    Masters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Total,
    Study,
    Break,
    Topic,
    Mode,
}

impl SetupField {
    pub const ALL: [SetupField; 5] = [
        SetupField::Total,
        SetupField::Study,
        SetupField::Break,
        SetupField::Topic,
        SetupField::Mode,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SetupField::Total => "Total time (min)",
            SetupField::Study => "Study session (min)",
            SetupField::Break => "Break (min)",
            SetupField::Topic => "Topic",
            SetupField::Mode => "Study mode",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    Hours,
    Minutes,
}

/// Modal prompt drawn on top of the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    ConfirmStop,
    ConfirmClearLog,
    ConfirmClearTargets,
    NewMaster(MasterKind, String),
    /// `YYYY-MM-DD YYYY-MM-DD`
    EditRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

pub struct App {
    pub view: View,
    pub analytics_tab: AnalyticsTab,
    pub targets_tab: TargetsTab,
    pub prompt: Option<Prompt>,
    pub notice: Option<Notice>,
    pub should_quit: bool,

    pub config: Config,
    pub setup: SessionSetup,
    pub setup_field: SetupField,
    pub timer: Timer,

    pub sessions: Vec<SessionRecord>,
    pub targets: TargetHistory,
    pub topics: MasterList,
    pub modes: MasterList,

    pub range: DateRange,
    pub topic_filter: TopicFilter,
    pub report: TrendReport,
    pub log_cursor: usize,

    pub target_hours: u32,
    pub target_minutes: u32,
    pub target_field: TargetField,

    pub master_kind: MasterKind,
    pub master_cursor: usize,

    db: StudyDb,
    config_store: Box<dyn ConfigStore>,
    alerter: Box<dyn Alerter>,
    timer_events: Receiver<TimerEvent>,
    export_dir: Option<PathBuf>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("view", &self.view)
            .field("prompt", &self.prompt)
            .field("timer", &self.timer)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl App {
    pub fn new(
        db: StudyDb,
        config_store: Box<dyn ConfigStore>,
        alerter: Box<dyn Alerter>,
    ) -> anyhow::Result<Self> {
        let config = config_store.load();
        let sessions = db.sessions().context("failed to load session log")?;
        let targets = db.target_history().context("failed to load target history")?;
        let topics = db.master_list(MasterKind::Topic).context("failed to load topics")?;
        let modes = db.master_list(MasterKind::Mode).context("failed to load modes")?;

        let today = util::today();
        let range = DateRange::last_days(today, config.range_days);
        let report = TrendReport::build(&sessions, &targets, range, &TopicFilter::All);
        let (target_hours, target_minutes) = split_hm(targets.resolve(today).unwrap_or(0));
        let export_dir = db.path().and_then(|p| p.parent()).map(|p| p.to_path_buf());

        let mut timer = Timer::new();
        let timer_events = timer.subscribe();

        let mut app = Self {
            view: View::Home,
            analytics_tab: AnalyticsTab::Log,
            targets_tab: TargetsTab::Target,
            prompt: None,
            notice: None,
            should_quit: false,
            setup: config.session_setup(),
            setup_field: SetupField::Total,
            config,
            timer,
            sessions,
            targets,
            topics,
            modes,
            range,
            topic_filter: TopicFilter::All,
            report,
            log_cursor: 0,
            target_hours,
            target_minutes,
            target_field: TargetField::Hours,
            master_kind: MasterKind::Topic,
            master_cursor: 0,
            db,
            config_store,
            alerter,
            timer_events,
            export_dir,
        };
        app.sanitize_setup_selection();
        Ok(app)
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = Some(dir);
        self
    }

    pub fn db(&self) -> &StudyDb {
        &self.db
    }

    pub fn home_stats(&self) -> HomeStats {
        HomeStats::compute(&self.sessions, &self.targets, util::today())
    }

    pub fn masters(&self, kind: MasterKind) -> &MasterList {
        match kind {
            MasterKind::Topic => &self.topics,
            MasterKind::Mode => &self.modes,
        }
    }

    /// Hint shown on the setup form when a master list has no active entry.
    pub fn setup_hint(&self) -> Option<&'static str> {
        match (self.topics.active_names().is_empty(), self.modes.active_names().is_empty()) {
            (true, true) => Some("Add a topic and a study mode under Targets > Masters to start."),
            (true, false) => Some("Add a topic under Targets > Masters to start."),
            (false, true) => Some("Add a study mode under Targets > Masters to start."),
            (false, false) => None,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize => {}
        }
    }

    pub fn on_tick(&mut self) {
        self.timer.tick();
        self.drain_timer_events();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.prompt.is_some() {
            self.on_prompt_key(key);
            return;
        }
        self.notice = None;

        match self.view {
            View::Home => self.on_home_key(key),
            View::Setup => self.on_setup_key(key),
            View::Run => self.on_run_key(key),
            View::Analytics => self.on_analytics_key(key),
            View::Targets => self.on_targets_key(key),
        }
    }

    /// Leave the app. A running session is stopped and saved first.
    pub fn quit(&mut self) {
        if self.timer.is_running() {
            info!("quitting with a running session, saving it as stopped");
            self.timer.stop();
            self.drain_timer_events();
        }
        self.should_quit = true;
    }

    fn drain_timer_events(&mut self) {
        let events: Vec<TimerEvent> = self.timer_events.try_iter().collect();
        for event in events {
            if let Some(kind) = AlertKind::for_event(&event) {
                self.alerter.alert(kind);
            }
            match event {
                TimerEvent::Completed(record) | TimerEvent::Stopped(record) => {
                    self.record_finished(record)
                }
                _ => {}
            }
        }
    }

    fn record_finished(&mut self, record: SessionRecord) {
        if let Err(e) = self.db.append_session(&record) {
            error!("failed to save session {}: {e}", record.id);
            self.notice = Some(Notice::Error(format!("Session could not be saved: {e}")));
        }
        self.sessions.insert(0, record);

        self.view = View::Analytics;
        self.analytics_tab = AnalyticsTab::Log;
        self.log_cursor = 0;
        self.range = DateRange::last_days(util::today(), self.config.range_days);
        self.refresh_report();
    }

    /// Rebuild the trend report for the current range and filter. A filter
    /// naming a topic that no longer appears falls back to all topics.
    pub fn refresh_report(&mut self) {
        if let TopicFilter::Topic(name) = &self.topic_filter {
            let in_range = analytics::sessions_in_range(&self.sessions, &self.range);
            let known = analytics::topic_filter_options(&self.topics, in_range)
                .iter()
                .any(|o| &o.name == name);
            if !known {
                self.topic_filter = TopicFilter::All;
            }
        }
        self.report = TrendReport::build(&self.sessions, &self.targets, self.range, &self.topic_filter);
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config_store.save(&self.config) {
            warn!("failed to save config: {e}");
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') | KeyCode::Enter => self.open_setup(),
            KeyCode::Char('a') => self.view = View::Analytics,
            KeyCode::Char('t') => self.view = View::Targets,
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    fn open_setup(&mut self) {
        if self.timer.is_running() {
            self.view = View::Run;
            return;
        }
        self.sanitize_setup_selection();
        self.view = View::Setup;
    }

    /// Drop topic/mode selections that are no longer active.
    fn sanitize_setup_selection(&mut self) {
        if let Some(t) = &self.setup.topic {
            if !self.topics.contains_active(t) {
                self.setup.topic = None;
            }
        }
        if let Some(m) = &self.setup.mode {
            if !self.modes.contains_active(m) {
                self.setup.mode = None;
            }
        }
    }

    fn on_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.view = View::Home,
            KeyCode::Down | KeyCode::Tab => self.setup_field = self.setup_field.next(),
            KeyCode::Up | KeyCode::BackTab => self.setup_field = self.setup_field.prev(),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => self.adjust_setup(1),
            KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => self.adjust_setup(-1),
            KeyCode::PageUp => self.adjust_setup(5),
            KeyCode::PageDown => self.adjust_setup(-5),
            KeyCode::Enter => self.start_session(),
            _ => {}
        }
    }

    fn adjust_setup(&mut self, delta: i32) {
        let bump = |v: u32, min: u32| (v as i64 + delta as i64).clamp(min as i64, MAX_SETUP_MINUTES as i64) as u32;
        match self.setup_field {
            SetupField::Total => self.setup.total_minutes = bump(self.setup.total_minutes, 1),
            SetupField::Study => self.setup.study_minutes = bump(self.setup.study_minutes, 1),
            SetupField::Break => self.setup.break_minutes = bump(self.setup.break_minutes, 0),
            SetupField::Topic => {
                self.setup.topic = cycle(&self.topics.active_names(), self.setup.topic.as_deref(), delta)
            }
            SetupField::Mode => {
                self.setup.mode = cycle(&self.modes.active_names(), self.setup.mode.as_deref(), delta)
            }
        }
    }

    pub fn start_session(&mut self) {
        let config = match self.setup.build(&self.topics, &self.modes) {
            Ok(c) => c,
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return;
            }
        };
        if let Err(e) = self.timer.start(config) {
            self.notice = Some(Notice::Error(e.to_string()));
            return;
        }

        self.config.remember_setup(&self.setup);
        self.save_config();
        self.view = View::Run;
        self.drain_timer_events();
    }

    fn on_run_key(&mut self, key: KeyEvent) {
        if !self.timer.is_running() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.view = View::Home;
            }
            return;
        }
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                self.timer.toggle_pause();
                self.drain_timer_events();
            }
            KeyCode::Char('s') | KeyCode::Esc => self.prompt = Some(Prompt::ConfirmStop),
            _ => {}
        }
    }

    fn on_analytics_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.view = View::Home;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.analytics_tab = match self.analytics_tab {
                    AnalyticsTab::Log => AnalyticsTab::Trends,
                    AnalyticsTab::Trends => AnalyticsTab::Log,
                };
                return;
            }
            KeyCode::Char('1') => {
                self.analytics_tab = AnalyticsTab::Log;
                return;
            }
            KeyCode::Char('2') => {
                self.analytics_tab = AnalyticsTab::Trends;
                return;
            }
            _ => {}
        }

        match self.analytics_tab {
            AnalyticsTab::Log => match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.log_cursor + 1 < self.sessions.len() {
                        self.log_cursor += 1;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => self.log_cursor = self.log_cursor.saturating_sub(1),
                KeyCode::Home => self.log_cursor = 0,
                KeyCode::End => self.log_cursor = self.sessions.len().saturating_sub(1),
                KeyCode::Char('c') if !self.sessions.is_empty() => {
                    self.prompt = Some(Prompt::ConfirmClearLog)
                }
                KeyCode::Char('e') => self.export_log(),
                _ => {}
            },
            AnalyticsTab::Trends => match key.code {
                KeyCode::Char('[') | KeyCode::Left => self.shift_range(-1),
                KeyCode::Char(']') | KeyCode::Right => self.shift_range(1),
                KeyCode::Char('f') => self.cycle_topic_filter(1),
                KeyCode::Char('F') => self.cycle_topic_filter(-1),
                KeyCode::Char('r') => {
                    let current = format!(
                        "{} {}",
                        util::format_date_key(self.range.start()),
                        util::format_date_key(self.range.end())
                    );
                    self.prompt = Some(Prompt::EditRange(current));
                }
                KeyCode::Char('d') => {
                    self.range = DateRange::last_days(util::today(), self.config.range_days);
                    self.refresh_report();
                }
                _ => {}
            },
        }
    }

    fn shift_range(&mut self, direction: i64) {
        self.range = self.range.shifted(direction * self.range.days());
        self.refresh_report();
    }

    fn cycle_topic_filter(&mut self, delta: i32) {
        let in_range = analytics::sessions_in_range(&self.sessions, &self.range);
        let names: Vec<String> = analytics::topic_filter_options(&self.topics, in_range)
            .into_iter()
            .map(|o| o.name)
            .collect();
        let current = match &self.topic_filter {
            TopicFilter::All => None,
            TopicFilter::Topic(name) => Some(name.as_str()),
        };
        // `None` stands for "all topics" and sits before the first name.
        let mut slots: Vec<Option<&str>> = vec![None];
        slots.extend(names.iter().map(|n| Some(n.as_str())));
        let idx = slots.iter().position(|s| *s == current).unwrap_or(0) as i64;
        let next = (idx + delta as i64).rem_euclid(slots.len() as i64) as usize;
        self.topic_filter = match slots[next] {
            None => TopicFilter::All,
            Some(n) => TopicFilter::Topic(n.to_string()),
        };
        self.refresh_report();
    }

    /// Apply a range typed as `YYYY-MM-DD YYYY-MM-DD`. On error the previous
    /// range and chart stay in place.
    pub fn apply_range_input(&mut self, input: &str) {
        let mut parts = input.split_whitespace();
        let (start, end) = (parts.next().unwrap_or(""), parts.next().unwrap_or(""));
        match DateRange::parse(start, end) {
            Ok(range) => {
                self.range = range;
                self.refresh_report();
                self.notice = Some(Notice::Info(format!("Showing {} day(s).", range.days())));
            }
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }

    fn export_log(&mut self) {
        let Some(dir) = self.export_dir.clone() else {
            self.notice = Some(Notice::Error("No export directory available.".into()));
            return;
        };
        let format = ExportFormat::Json;
        let path = dir.join(format!(
            "studymate-sessions-{}.{}",
            util::format_date_key(util::today()),
            format.extension()
        ));
        let result = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))
            .and_then(|f| export::export(format, &self.sessions, BufWriter::new(f)));
        self.notice = Some(match result {
            Ok(()) => {
                info!("exported {} sessions to {}", self.sessions.len(), path.display());
                Notice::Info(format!("Exported {} sessions to {}", self.sessions.len(), path.display()))
            }
            Err(e) => {
                error!("export failed: {e:#}");
                Notice::Error(format!("Export failed: {e}"))
            }
        });
    }

    fn on_targets_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.view = View::Home;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.targets_tab = match self.targets_tab {
                    TargetsTab::Target => TargetsTab::Masters,
                    TargetsTab::Masters => TargetsTab::Target,
                };
                return;
            }
            KeyCode::Char('1') => {
                self.targets_tab = TargetsTab::Target;
                return;
            }
            KeyCode::Char('2') => {
                self.targets_tab = TargetsTab::Masters;
                return;
            }
            _ => {}
        }

        match self.targets_tab {
            TargetsTab::Target => self.on_target_form_key(key),
            TargetsTab::Masters => self.on_masters_key(key),
        }
    }

    fn on_target_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.target_field = match self.target_field {
                    TargetField::Hours => TargetField::Minutes,
                    TargetField::Minutes => TargetField::Hours,
                }
            }
            KeyCode::Right | KeyCode::Char('+') => self.adjust_target(1),
            KeyCode::Left | KeyCode::Char('-') => self.adjust_target(-1),
            KeyCode::Enter => self.save_target(),
            KeyCode::Char('c') if !self.targets.is_empty() => {
                self.prompt = Some(Prompt::ConfirmClearTargets)
            }
            _ => {}
        }
    }

    fn adjust_target(&mut self, delta: i32) {
        match self.target_field {
            TargetField::Hours => {
                self.target_hours = (self.target_hours as i32 + delta).clamp(0, MAX_TARGET_HOURS as i32) as u32
            }
            TargetField::Minutes => {
                self.target_minutes = (self.target_minutes as i32 + delta * 5).clamp(0, 59) as u32
            }
        }
    }

    /// Save the form value as today's effective target.
    pub fn save_target(&mut self) {
        let secs = target::target_seconds_from_hm(self.target_hours, self.target_minutes);
        // Only a persisted entry reaches the in-memory history.
        let mut targets = self.targets.clone();
        let entry = targets.set_effective_today(secs).clone();
        if let Err(e) = self.db.upsert_target(&entry) {
            error!("failed to save target: {e}");
            self.notice = Some(Notice::Error(format!("Target could not be saved: {e}")));
            return;
        }
        self.targets = targets;
        self.refresh_report();
        self.notice = Some(Notice::Info(format!(
            "Target {} effective from {}.",
            util::seconds_to_hm(secs as u64),
            util::format_date_key(entry.date_key)
        )));
    }

    fn on_masters_key(&mut self, key: KeyEvent) {
        let len = self.masters(self.master_kind).len();
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char('m') => {
                self.master_kind = match self.master_kind {
                    MasterKind::Topic => MasterKind::Mode,
                    MasterKind::Mode => MasterKind::Topic,
                };
                self.master_cursor = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.master_cursor + 1 < len {
                    self.master_cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.master_cursor = self.master_cursor.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_master(),
            KeyCode::Char('a') => self.prompt = Some(Prompt::NewMaster(self.master_kind, String::new())),
            _ => {}
        }
    }

    fn toggle_selected_master(&mut self) {
        let kind = self.master_kind;
        let Some(id) = self
            .masters(kind)
            .sorted()
            .get(self.master_cursor)
            .map(|item| item.id.clone())
        else {
            return;
        };
        let mut list = self.masters(kind).clone();
        let Some(active) = list.toggle(&id).map(|item| item.active) else {
            return;
        };
        if let Err(e) = self.db.set_master_active(&id, active) {
            error!("failed to update {kind}: {e}");
            self.notice = Some(Notice::Error(format!("Could not update {kind}: {e}")));
            return;
        }
        self.replace_masters(kind, list);
        self.sanitize_setup_selection();
        self.refresh_report();
    }

    /// Add a master entry from the prompt.
    pub fn add_master(&mut self, kind: MasterKind, name: &str) {
        let mut list = self.masters(kind).clone();
        let item = match list.add(name) {
            Ok(item) => item.clone(),
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return;
            }
        };
        if let Err(e) = self.db.insert_master_item(kind, &item) {
            error!("failed to save {kind} {}: {e}", item.name);
            self.notice = Some(Notice::Error(format!("Could not save {kind}: {e}")));
            return;
        }
        self.replace_masters(kind, list);
        self.notice = Some(Notice::Info(format!("Added {} '{}'.", kind.label(), item.name)));
    }

    fn replace_masters(&mut self, kind: MasterKind, list: MasterList) {
        match kind {
            MasterKind::Topic => self.topics = list,
            MasterKind::Mode => self.modes = list,
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt {
            Prompt::ConfirmStop | Prompt::ConfirmClearLog | Prompt::ConfirmClearTargets => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm(prompt),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                    // keep asking
                    _ => self.prompt = Some(prompt),
                }
            }
            Prompt::NewMaster(kind, mut buf) => match key.code {
                KeyCode::Enter => self.add_master(kind, &buf),
                KeyCode::Esc => {}
                KeyCode::Backspace => {
                    buf.pop();
                    self.prompt = Some(Prompt::NewMaster(kind, buf));
                }
                KeyCode::Char(c) => {
                    buf.push(c);
                    self.prompt = Some(Prompt::NewMaster(kind, buf));
                }
                _ => self.prompt = Some(Prompt::NewMaster(kind, buf)),
            },
            Prompt::EditRange(mut buf) => match key.code {
                KeyCode::Enter => self.apply_range_input(&buf),
                KeyCode::Esc => {}
                KeyCode::Backspace => {
                    buf.pop();
                    self.prompt = Some(Prompt::EditRange(buf));
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == ' ' => {
                    buf.push(c);
                    self.prompt = Some(Prompt::EditRange(buf));
                }
                _ => self.prompt = Some(Prompt::EditRange(buf)),
            },
        }
    }

    fn confirm(&mut self, prompt: Prompt) {
        match prompt {
            Prompt::ConfirmStop => {
                self.timer.stop();
                self.drain_timer_events();
            }
            Prompt::ConfirmClearLog => match self.db.clear_sessions() {
                Ok(()) => {
                    self.sessions.clear();
                    self.log_cursor = 0;
                    self.refresh_report();
                    self.notice = Some(Notice::Info("Study log cleared.".into()));
                }
                Err(e) => self.notice = Some(Notice::Error(format!("Could not clear log: {e}"))),
            },
            Prompt::ConfirmClearTargets => match self.db.clear_target_history() {
                Ok(()) => {
                    self.targets.clear();
                    self.refresh_report();
                    self.notice = Some(Notice::Info("Target history cleared.".into()));
                }
                Err(e) => {
                    self.notice = Some(Notice::Error(format!("Could not clear target history: {e}")))
                }
            },
            Prompt::NewMaster(..) | Prompt::EditRange(_) => {}
        }
    }
}

fn split_hm(secs: u32) -> (u32, u32) {
    (secs / 3600, (secs % 3600) / 60)
}

/// Step through `names` starting from `current`. An unknown or missing
/// selection starts at the first (or last, going backwards) name.
fn cycle(names: &[String], current: Option<&str>, delta: i32) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let len = names.len() as i64;
    let next = match current.and_then(|c| names.iter().position(|n| n == c)) {
        Some(idx) => (idx as i64 + delta.signum() as i64).rem_euclid(len),
        None if delta < 0 => len - 1,
        None => 0,
    };
    Some(names[next as usize].clone())
}
