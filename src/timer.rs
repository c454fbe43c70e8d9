//! Study/break cycle state machine.
//!
//! The timer owns its state and is advanced by exactly one logical second per
//! [`Timer::tick`] call. Observers receive [`TimerEvent`]s through channels
//! obtained from [`Timer::subscribe`]; the timer never touches rendering or
//! audio itself.

use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use crate::error::TimerError;
use crate::session::{SessionConfig, SessionRecord, SessionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Idle,
    Study,
    Break,
    Done,
}

/// Source of wall-clock timestamps for `started_at` / `ended_at`.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Read-only view of a timer, cheap to clone for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    pub total_secs: u32,
    pub study_secs: u32,
    pub break_secs: u32,
    pub elapsed_secs: u32,
    pub phase_elapsed_secs: u32,
    pub active_study_secs: u32,
    pub active_break_secs: u32,
    pub paused_total_secs: u32,
    pub is_paused: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub topic: String,
    pub mode: String,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            total_secs: 0,
            study_secs: 0,
            break_secs: 0,
            elapsed_secs: 0,
            phase_elapsed_secs: 0,
            active_study_secs: 0,
            active_break_secs: 0,
            paused_total_secs: 0,
            is_paused: false,
            started_at: None,
            ended_at: None,
            status: SessionStatus::Idle,
            topic: String::new(),
            mode: String::new(),
        }
    }
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Study | Phase::Break)
    }

    pub fn phase_len(&self) -> u32 {
        match self.phase {
            Phase::Study => self.study_secs,
            Phase::Break => self.break_secs,
            Phase::Idle | Phase::Done => 0,
        }
    }

    pub fn total_remaining_secs(&self) -> u32 {
        self.total_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn phase_remaining_secs(&self) -> u32 {
        if self.is_running() {
            self.phase_len().saturating_sub(self.phase_elapsed_secs)
        } else {
            0
        }
    }

    /// Fraction of the current phase already spent, in `0.0..=1.0`.
    pub fn phase_progress(&self) -> f64 {
        let len = self.phase_len();
        if !self.is_running() || len == 0 {
            return 0.0;
        }
        (self.phase_elapsed_secs as f64 / len as f64).clamp(0.0, 1.0)
    }

    pub fn total_active_secs(&self) -> u32 {
        self.active_study_secs + self.active_break_secs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Started(TimerState),
    PhaseChanged { from: Phase, to: Phase },
    Ticked(TimerState),
    Paused,
    Resumed,
    Completed(SessionRecord),
    Stopped(SessionRecord),
}

impl TimerEvent {
    /// Whether this event should sound the two-tone alert.
    pub fn wants_alert(&self) -> bool {
        match self {
            TimerEvent::Started(_) | TimerEvent::Completed(_) => true,
            TimerEvent::PhaseChanged { from, to } => matches!(
                (from, to),
                (Phase::Study, Phase::Break) | (Phase::Break, Phase::Study)
            ),
            _ => false,
        }
    }
}

pub struct Timer {
    state: TimerState,
    clock: Box<dyn Clock>,
    subscribers: Vec<Sender<TimerEvent>>,
    last_record: Option<SessionRecord>,
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            state: TimerState::default(),
            clock,
            subscribers: Vec::new(),
            last_record: None,
        }
    }

    /// Register an observer. Dropped receivers are pruned on the next emit.
    pub fn subscribe(&mut self) -> Receiver<TimerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn snapshot(&self) -> TimerState {
        self.state.clone()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The record produced by the most recent completion or stop.
    pub fn last_record(&self) -> Option<&SessionRecord> {
        self.last_record.as_ref()
    }

    /// Begin a new run. Always enters `Study` first.
    pub fn start(&mut self, config: SessionConfig) -> Result<(), TimerError> {
        if self.is_running() {
            return Err(TimerError::AlreadyRunning);
        }

        self.state = TimerState {
            total_secs: config.total_secs(),
            study_secs: config.study_secs(),
            break_secs: config.break_secs(),
            started_at: Some(self.clock.now()),
            topic: config.topic().to_string(),
            mode: config.mode().to_string(),
            ..TimerState::default()
        };
        self.last_record = None;
        info!(
            "session started: topic={} mode={} total={}s study={}s break={}s",
            self.state.topic,
            self.state.mode,
            self.state.total_secs,
            self.state.study_secs,
            self.state.break_secs
        );

        self.set_phase(Phase::Study);
        self.emit(TimerEvent::Started(self.state.clone()));
        Ok(())
    }

    /// Advance logical time by one second.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        if self.state.is_paused {
            self.state.paused_total_secs += 1;
            self.emit(TimerEvent::Ticked(self.state.clone()));
            return;
        }

        self.state.elapsed_secs += 1;
        self.state.phase_elapsed_secs += 1;
        match self.state.phase {
            Phase::Study => self.state.active_study_secs += 1,
            Phase::Break => self.state.active_break_secs += 1,
            Phase::Idle | Phase::Done => {}
        }

        // Total completion wins over a phase boundary on the same tick.
        if self.state.elapsed_secs >= self.state.total_secs {
            self.state.elapsed_secs = self.state.total_secs;
            self.emit(TimerEvent::Ticked(self.state.clone()));
            let record = self.finish(SessionStatus::Completed);
            self.emit(TimerEvent::Completed(record));
            return;
        }

        let phase_len = self.state.phase_len();
        let phase = self.state.phase;
        match phase {
            Phase::Break if self.state.break_secs == 0 => self.set_phase(Phase::Study),
            Phase::Study if phase_len > 0 && self.state.phase_elapsed_secs >= phase_len => {
                if self.state.break_secs > 0 {
                    self.set_phase(Phase::Break);
                } else {
                    self.set_phase(Phase::Study);
                }
            }
            Phase::Break if phase_len > 0 && self.state.phase_elapsed_secs >= phase_len => {
                self.set_phase(Phase::Study)
            }
            _ => {}
        }

        self.emit(TimerEvent::Ticked(self.state.clone()));
    }

    pub fn pause(&mut self) {
        if self.is_running() && !self.state.is_paused {
            self.state.is_paused = true;
            debug!("session paused at {}s", self.state.elapsed_secs);
            self.emit(TimerEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.is_running() && self.state.is_paused {
            self.state.is_paused = false;
            debug!("session resumed at {}s", self.state.elapsed_secs);
            self.emit(TimerEvent::Resumed);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Manual stop. Returns `None` when no session is running.
    pub fn stop(&mut self) -> Option<SessionRecord> {
        if !self.is_running() {
            return None;
        }
        let record = self.finish(SessionStatus::Stopped);
        self.emit(TimerEvent::Stopped(record.clone()));
        Some(record)
    }

    fn set_phase(&mut self, next: Phase) {
        let prev = self.state.phase;
        self.state.phase = next;
        self.state.phase_elapsed_secs = 0;
        debug!("phase {prev} -> {next} at {}s", self.state.elapsed_secs);
        self.emit(TimerEvent::PhaseChanged {
            from: prev,
            to: next,
        });
    }

    fn finish(&mut self, status: SessionStatus) -> SessionRecord {
        let ended_at = self.clock.now();
        self.state.is_paused = false;
        self.state.phase = Phase::Done;
        self.state.ended_at = Some(ended_at);
        self.state.status = status;

        let s = &self.state;
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            started_at: s.started_at.unwrap_or(ended_at),
            ended_at,
            status,
            planned_total_seconds: s.total_secs,
            planned_study_seconds: s.study_secs,
            planned_break_seconds: s.break_secs,
            active_study_seconds: s.active_study_secs,
            active_break_seconds: s.active_break_secs,
            total_active_seconds: s.total_active_secs(),
            paused_total_seconds: s.paused_total_secs,
            topic: s.topic.clone(),
            mode: s.mode.clone(),
        };
        info!(
            "session {status}: active={}s (study {}s, break {}s) paused={}s",
            record.total_active_seconds,
            record.active_study_seconds,
            record.active_break_seconds,
            record.paused_total_seconds
        );
        self.last_record = Some(record.clone());
        record
    }

    fn emit(&mut self, event: TimerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config(total: u32, study: u32, brk: u32) -> SessionConfig {
        SessionConfig::new(total, study, brk, "Math", "Pomodoro").unwrap()
    }

    fn started(total: u32, study: u32, brk: u32) -> Timer {
        let mut timer = Timer::new();
        timer.start(config(total, study, brk)).unwrap();
        timer
    }

    fn tick_n(timer: &mut Timer, n: u32) {
        for _ in 0..n {
            timer.tick();
        }
    }

    #[test]
    fn new_timer_is_idle() {
        let timer = Timer::new();
        let s = timer.snapshot();
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.status, SessionStatus::Idle);
        assert!(!timer.is_running());
    }

    #[test]
    fn start_enters_study_even_with_zero_break() {
        let timer = started(120, 60, 0);
        assert_eq!(timer.state().phase, Phase::Study);
        assert!(timer.state().started_at.is_some());
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut timer = started(120, 60, 0);
        assert_matches!(timer.start(config(120, 60, 0)), Err(TimerError::AlreadyRunning));
    }

    #[test]
    fn ticks_on_idle_timer_are_ignored() {
        let mut timer = Timer::new();
        timer.tick();
        assert_eq!(timer.state().elapsed_secs, 0);
        assert_eq!(timer.state().paused_total_secs, 0);
    }

    #[test]
    fn study_break_cycle() {
        let mut timer = started(600, 300, 120);
        tick_n(&mut timer, 299);
        assert_eq!(timer.state().phase, Phase::Study);
        timer.tick();
        assert_eq!(timer.state().phase, Phase::Break);
        assert_eq!(timer.state().phase_elapsed_secs, 0);
        tick_n(&mut timer, 120);
        assert_eq!(timer.state().phase, Phase::Study);
        assert_eq!(timer.state().active_study_secs, 300);
        assert_eq!(timer.state().active_break_secs, 120);
    }

    #[test]
    fn zero_break_self_loops_study() {
        let mut timer = started(600, 60, 0);
        let rx = timer.subscribe();
        tick_n(&mut timer, 60);
        let s = timer.snapshot();
        assert_eq!(s.phase, Phase::Study);
        assert_eq!(s.phase_elapsed_secs, 0);
        assert_eq!(s.active_break_secs, 0);

        let changes: Vec<TimerEvent> = rx
            .try_iter()
            .filter(|e| matches!(e, TimerEvent::PhaseChanged { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![TimerEvent::PhaseChanged {
                from: Phase::Study,
                to: Phase::Study
            }]
        );
        assert!(!changes[0].wants_alert());
    }

    #[test]
    fn paused_ticks_only_count_pause_time() {
        let mut timer = started(600, 300, 60);
        tick_n(&mut timer, 10);
        timer.pause();
        let before = timer.snapshot();
        tick_n(&mut timer, 25);
        let after = timer.snapshot();
        assert_eq!(after.elapsed_secs, before.elapsed_secs);
        assert_eq!(after.phase_elapsed_secs, before.phase_elapsed_secs);
        assert_eq!(after.active_study_secs, before.active_study_secs);
        assert_eq!(after.phase, before.phase);
        assert_eq!(after.paused_total_secs, 25);

        timer.resume();
        timer.tick();
        assert_eq!(timer.state().elapsed_secs, 11);
    }

    #[test]
    fn completion_takes_priority_over_phase_boundary() {
        let mut timer = started(300, 300, 60);
        let rx = timer.subscribe();
        tick_n(&mut timer, 300);
        let s = timer.snapshot();
        assert_eq!(s.phase, Phase::Done);
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.active_break_secs, 0);
        assert!(!rx
            .try_iter()
            .any(|e| matches!(e, TimerEvent::PhaseChanged { to: Phase::Break, .. })));
    }

    #[test]
    fn done_is_terminal() {
        let mut timer = started(60, 60, 0);
        tick_n(&mut timer, 60);
        tick_n(&mut timer, 10);
        let s = timer.snapshot();
        assert_eq!(s.elapsed_secs, 60);
        assert_eq!(s.paused_total_secs, 0);
        assert!(timer.stop().is_none());
    }

    #[test]
    fn stop_produces_record_with_accumulated_totals() {
        let mut timer = started(600, 120, 60);
        tick_n(&mut timer, 150);
        timer.pause();
        tick_n(&mut timer, 5);
        let record = timer.stop().unwrap();
        assert_eq!(record.status, SessionStatus::Stopped);
        assert_eq!(record.active_study_seconds, 120);
        assert_eq!(record.active_break_seconds, 30);
        assert_eq!(record.total_active_seconds, 150);
        assert_eq!(record.paused_total_seconds, 5);
        assert_eq!(record.planned_total_seconds, 600);
        assert_eq!(timer.state().phase, Phase::Done);
        assert!(!timer.state().is_paused);
        assert_eq!(timer.last_record(), Some(&record));
    }

    #[test]
    fn alert_policy() {
        let mut timer = Timer::new();
        let rx = timer.subscribe();
        timer.start(config(180, 60, 60)).unwrap();
        tick_n(&mut timer, 60);
        tick_n(&mut timer, 60);
        timer.stop();

        let alerts: Vec<TimerEvent> = rx.try_iter().filter(TimerEvent::wants_alert).collect();
        assert_eq!(alerts.len(), 3);
        assert_matches!(alerts[0], TimerEvent::Started(_));
        assert_matches!(
            alerts[1],
            TimerEvent::PhaseChanged { from: Phase::Study, to: Phase::Break }
        );
        assert_matches!(
            alerts[2],
            TimerEvent::PhaseChanged { from: Phase::Break, to: Phase::Study }
        );
    }

    #[test]
    fn completion_event_alerts() {
        let mut timer = started(60, 60, 0);
        let rx = timer.subscribe();
        tick_n(&mut timer, 60);
        let completed: Vec<TimerEvent> = rx
            .try_iter()
            .filter(|e| matches!(e, TimerEvent::Completed(_)))
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].wants_alert());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut timer = Timer::new();
        drop(timer.subscribe());
        let rx = timer.subscribe();
        timer.start(config(60, 60, 0)).unwrap();
        assert_eq!(timer.subscribers.len(), 1);
        assert!(rx.try_iter().count() >= 2);
    }

    #[test]
    fn derived_views() {
        let mut timer = started(600, 300, 120);
        tick_n(&mut timer, 150);
        let s = timer.snapshot();
        assert_eq!(s.total_remaining_secs(), 450);
        assert_eq!(s.phase_remaining_secs(), 150);
        assert!((s.phase_progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn restart_after_done_resets_counters() {
        let mut timer = started(60, 60, 0);
        tick_n(&mut timer, 60);
        timer.start(config(120, 60, 0)).unwrap();
        let s = timer.snapshot();
        assert_eq!(s.elapsed_secs, 0);
        assert_eq!(s.status, SessionStatus::Idle);
        assert!(timer.last_record().is_none());
    }

    /// Advances one minute on every read, starting at a fixed instant.
    struct SteppingClock {
        base: DateTime<Utc>,
        reads: std::cell::Cell<i64>,
    }

    impl SteppingClock {
        fn new() -> Self {
            Self {
                base: DateTime::parse_from_rfc3339("2024-03-10T09:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
                reads: std::cell::Cell::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let n = self.reads.get();
            self.reads.set(n + 1);
            self.base + chrono::Duration::minutes(n)
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn stop_stamps_record_from_clock() {
        let mut timer = Timer::with_clock(Box::new(SteppingClock::new()));
        timer.start(config(300, 60, 30)).unwrap();
        assert_eq!(timer.state().started_at, Some(at("2024-03-10T09:00:00Z")));
        assert_eq!(timer.state().ended_at, None);

        tick_n(&mut timer, 10);
        let record = timer.stop().unwrap();
        assert_eq!(record.started_at, at("2024-03-10T09:00:00Z"));
        assert_eq!(record.ended_at, at("2024-03-10T09:01:00Z"));
        assert!(record.ended_at >= record.started_at);
        assert_eq!(timer.state().ended_at, Some(record.ended_at));
    }

    #[test]
    fn completion_stamps_record_from_clock() {
        let mut timer = Timer::with_clock(Box::new(SteppingClock::new()));
        timer.start(config(120, 60, 0)).unwrap();
        tick_n(&mut timer, 120);
        let record = timer.last_record().unwrap();
        assert_eq!(record.status, SessionStatus::Completed);
        assert_eq!(record.started_at, at("2024-03-10T09:00:00Z"));
        assert_eq!(record.ended_at, at("2024-03-10T09:01:00Z"));
        assert_eq!(timer.state().started_at, Some(record.started_at));
    }
}
