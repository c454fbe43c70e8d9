use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::timer::{Phase, TimerEvent};

const PULSE_GAP: Duration = Duration::from_millis(240);
const BEL: &[u8] = b"\x07";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AlertKind {
    Start,
    PhaseChange,
    Completion,
}

impl AlertKind {
    /// Map a timer event to the alert it should play, if any.
    pub fn for_event(event: &TimerEvent) -> Option<Self> {
        if !event.wants_alert() {
            return None;
        }
        match event {
            TimerEvent::Started(_) => Some(AlertKind::Start),
            TimerEvent::Completed(_) => Some(AlertKind::Completion),
            TimerEvent::PhaseChanged { from, to } if from != to && *to != Phase::Done => {
                Some(AlertKind::PhaseChange)
            }
            _ => None,
        }
    }
}

/// Output sink for audible alerts.
pub trait Alerter {
    fn alert(&mut self, kind: AlertKind);
}

/// Two short terminal bell pulses. Playback happens on a detached thread so
/// the tick loop is never delayed.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    fn ring() -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(BEL)?;
        out.flush()?;
        thread::sleep(PULSE_GAP);
        out.write_all(BEL)?;
        out.flush()
    }
}

impl Alerter for TerminalBell {
    fn alert(&mut self, kind: AlertKind) {
        debug!("alert: {kind}");
        thread::spawn(|| {
            if let Err(e) = TerminalBell::ring() {
                debug!("terminal bell failed: {e}");
            }
        });
    }
}

#[derive(Debug, Default)]
pub struct Silent;

impl Alerter for Silent {
    fn alert(&mut self, _kind: AlertKind) {}
}

/// Records alerts instead of playing them. Clones share one log.
#[derive(Debug, Default, Clone)]
pub struct RecordingAlerter {
    played: Rc<RefCell<Vec<AlertKind>>>,
}

impl RecordingAlerter {
    pub fn played(&self) -> Vec<AlertKind> {
        self.played.borrow().clone()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&mut self, kind: AlertKind) {
        self.played.borrow_mut().push(kind);
    }
}

/// Pick the sink matching the `alerts` config flag.
pub fn from_flag(enabled: bool) -> Box<dyn Alerter> {
    if enabled {
        Box::new(TerminalBell)
    } else {
        Box::new(Silent)
    }
}
