use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use studymate::alert::{AlertKind, RecordingAlerter};
use studymate::app::{App, View};
use studymate::config::{ConfigStore, FileConfigStore};
use studymate::masters::MasterKind;
use studymate::runtime::{AppEvent, ChannelEventSource, FixedTicker, Runner};
use studymate::session::SessionSetup;
use studymate::store::StudyDb;
use studymate::SessionStatus;

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn new_app(dir: &tempfile::TempDir) -> (App, RecordingAlerter) {
    let db = StudyDb::open(dir.path().join("study.db")).unwrap();
    let store = FileConfigStore::with_path(dir.path().join("config.json"));
    let alerts = RecordingAlerter::default();
    let mut app = App::new(db, Box::new(store), Box::new(alerts.clone())).unwrap();
    app.add_master(MasterKind::Topic, "Math");
    app.add_master(MasterKind::Mode, "Pomodoro");
    (app, alerts)
}

// Drives the app the way the binary does, but with a fast ticker and a channel
// instead of a terminal.
#[test]
fn headless_session_completes_and_lands_in_log() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, alerts) = new_app(&dir);
    app.setup = SessionSetup {
        total_minutes: 2,
        study_minutes: 1,
        break_minutes: 1,
        topic: Some("Math".into()),
        mode: Some("Pomodoro".into()),
    };

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key(KeyCode::Char('s'))).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();

    let mut ticks = 0u32;
    for _ in 0..1000u32 {
        let event = runner.step();
        if event == AppEvent::Tick {
            ticks += 1;
        }
        app.handle_event(event);
        if app.view == View::Analytics {
            break;
        }
    }

    assert_eq!(app.view, View::Analytics, "session never finished ({ticks} ticks)");
    assert_eq!(app.sessions.len(), 1);
    let record = &app.sessions[0];
    assert_eq!(record.status, SessionStatus::Completed);
    assert_eq!(record.total_active_seconds, 120);
    assert_eq!(record.active_study_seconds, 60);
    assert_eq!(record.active_break_seconds, 60);

    assert_eq!(
        alerts.played(),
        vec![AlertKind::Start, AlertKind::PhaseChange, AlertKind::Completion]
    );

    // persisted, not just kept in memory
    let stored = app.db().sessions().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, record.id);
}

#[test]
fn headless_keyboard_setup_pause_and_stop() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, alerts) = new_app(&dir);

    // Home -> Setup, pick the first topic and mode with the arrows.
    for code in [
        KeyCode::Char('s'),
        KeyCode::Down,
        KeyCode::Down,
        KeyCode::Down,
        KeyCode::Right,
        KeyCode::Down,
        KeyCode::Right,
        KeyCode::Enter,
    ] {
        app.handle_event(key(code));
    }
    assert_eq!(app.view, View::Run);
    assert!(app.timer.is_running());

    for _ in 0..5 {
        app.handle_event(AppEvent::Tick);
    }
    app.handle_event(key(KeyCode::Char(' ')));
    for _ in 0..3 {
        app.handle_event(AppEvent::Tick);
    }

    app.handle_event(key(KeyCode::Char('s')));
    assert!(app.prompt.is_some());
    app.handle_event(key(KeyCode::Char('n')));
    assert!(app.timer.is_running(), "declining keeps the session");

    app.handle_event(key(KeyCode::Char('s')));
    app.handle_event(key(KeyCode::Char('y')));

    assert_eq!(app.view, View::Analytics);
    let record = &app.sessions[0];
    assert_eq!(record.status, SessionStatus::Stopped);
    assert_eq!(record.topic, "Math");
    assert_eq!(record.mode, "Pomodoro");
    assert_eq!(record.total_active_seconds, 5);
    assert_eq!(record.paused_total_seconds, 3);
    assert_eq!(alerts.played(), vec![AlertKind::Start]);

    // the choice is remembered for next time
    let reopened = FileConfigStore::with_path(dir.path().join("config.json"));
    let config = reopened.load();
    assert_eq!(config.last_topic.as_deref(), Some("Math"));
    assert_eq!(config.last_mode.as_deref(), Some("Pomodoro"));
}

#[test]
fn headless_runner_keeps_ticking_after_input_closes() {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let mut runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );
    drop(tx);
    for _ in 0..5 {
        assert_eq!(runner.step(), AppEvent::Tick);
    }
}
