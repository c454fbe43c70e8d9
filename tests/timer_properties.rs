use assert_matches::assert_matches;

use studymate::{ConfigError, Phase, SessionConfig, SessionStatus, Timer, TimerEvent};

fn started(total: u32, study: u32, brk: u32) -> Timer {
    let mut timer = Timer::new();
    timer
        .start(SessionConfig::new(total, study, brk, "Math", "Pomodoro").unwrap())
        .unwrap();
    timer
}

#[test]
fn study_longer_than_total_never_builds_a_config() {
    for (total, study) in [(60, 61), (600, 601), (600, 6000)] {
        assert_matches!(
            SessionConfig::new(total, study, 0, "Math", "Pomodoro"),
            Err(ConfigError::StudyExceedsTotal)
        );
    }
}

#[test]
fn elapsed_equals_active_sum_after_every_tick() {
    let mut timer = started(900, 120, 45);
    for i in 0..1000u32 {
        // pause in irregular stretches
        if i % 97 == 0 {
            timer.toggle_pause();
        }
        timer.tick();
        let s = timer.snapshot();
        assert_eq!(s.elapsed_secs, s.active_study_secs + s.active_break_secs);
        assert!(s.elapsed_secs <= s.total_secs);
    }
}

#[test]
fn paused_ticks_only_move_pause_counter() {
    let mut timer = started(600, 300, 120);
    for _ in 0..310 {
        timer.tick();
    }
    timer.pause();
    let before = timer.snapshot();
    for _ in 0..500 {
        timer.tick();
    }
    let after = timer.snapshot();
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.elapsed_secs, before.elapsed_secs);
    assert_eq!(after.active_study_secs, before.active_study_secs);
    assert_eq!(after.active_break_secs, before.active_break_secs);
    assert_eq!(after.paused_total_secs, before.paused_total_secs + 500);
}

#[test]
fn reference_cycle_600_300_120() {
    let mut timer = started(600, 300, 120);
    for _ in 0..300 {
        timer.tick();
    }
    assert_eq!(timer.state().phase, Phase::Break);
    for _ in 300..420 {
        timer.tick();
    }
    assert_eq!(timer.state().phase, Phase::Study);
    for _ in 420..600 {
        timer.tick();
    }
    let s = timer.snapshot();
    assert_eq!(s.phase, Phase::Done);
    assert_eq!(s.status, SessionStatus::Completed);
    assert_eq!(s.active_study_secs + s.active_break_secs, 600);
    assert_eq!(s.active_break_secs, 120);
}

#[test]
fn zero_break_never_enters_break() {
    let mut timer = started(300, 60, 0);
    let rx = timer.subscribe();
    for tick in 1..=299u32 {
        timer.tick();
        let s = timer.snapshot();
        assert_ne!(s.phase, Phase::Break);
        if tick % 60 == 0 {
            assert_eq!(s.phase_elapsed_secs, 0);
        }
    }
    assert!(!rx
        .try_iter()
        .any(|e| matches!(e, TimerEvent::PhaseChanged { to: Phase::Break, .. })));
}

#[test]
fn stop_at_any_point_reports_accumulated_totals() {
    for stop_at in [0u32, 1, 59, 60, 61, 150, 299] {
        let mut timer = started(300, 60, 30);
        for _ in 0..stop_at {
            timer.tick();
        }
        let s = timer.snapshot();
        let record = timer.stop().unwrap();
        assert_eq!(record.status, SessionStatus::Stopped);
        assert_eq!(
            record.total_active_seconds,
            s.active_study_secs + s.active_break_secs
        );
        assert_eq!(record.total_active_seconds, stop_at);
    }
}

#[test]
fn stop_while_paused_keeps_pause_time() {
    let mut timer = started(300, 60, 30);
    timer.tick();
    timer.pause();
    timer.tick();
    timer.tick();
    let record = timer.stop().unwrap();
    assert_eq!(record.total_active_seconds, 1);
    assert_eq!(record.paused_total_seconds, 2);
}

#[test]
fn stop_emits_no_alerting_event() {
    let mut timer = started(300, 60, 30);
    let rx = timer.subscribe();
    timer.tick();
    timer.stop();
    let events: Vec<TimerEvent> = rx.try_iter().collect();
    assert_matches!(events.last(), Some(TimerEvent::Stopped(_)));
    assert!(events.iter().all(|e| !e.wants_alert()));
}
