use ratatui::{layout::Rect, Frame};

use crate::app::{AnalyticsTab, App, TargetsTab, View};
use crate::ui::{analytics, home, run, setup, targets};

/// A UI Screen boundary: renders one view and describes its key bindings
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
    fn legend(&self, app: &App) -> String;
}

pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        home::render(app, f, area);
    }

    fn legend(&self, _app: &App) -> String {
        "(s)tart session / (a)nalytics / (t)argets & masters / (q)uit".into()
    }
}

pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        setup::render(app, f, area);
    }

    fn legend(&self, _app: &App) -> String {
        "↑/↓ field / ←/→ adjust / PgUp/PgDn ±5 / (enter) start / (esc) back".into()
    }
}

pub struct RunScreen;

impl Screen for RunScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        run::render(app, f, area);
    }

    fn legend(&self, app: &App) -> String {
        if !app.timer.is_running() {
            "(enter) home".into()
        } else if app.timer.state().is_paused {
            "(space) resume / (s)top".into()
        } else {
            "(space) pause / (s)top".into()
        }
    }
}

pub struct AnalyticsScreen;

impl Screen for AnalyticsScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        analytics::render(app, f, area);
    }

    fn legend(&self, app: &App) -> String {
        match app.analytics_tab {
            AnalyticsTab::Log => "(tab) trends / ↑/↓ scroll / (e)xport json / (c)lear log / (esc) home".into(),
            AnalyticsTab::Trends => {
                "(tab) log / [ ] shift range / (r)ange / (d)efault / (f)ilter topic / (esc) home".into()
            }
        }
    }
}

pub struct TargetsScreen;

impl Screen for TargetsScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        targets::render(app, f, area);
    }

    fn legend(&self, app: &App) -> String {
        match app.targets_tab {
            TargetsTab::Target => {
                "(tab) masters / ↑/↓ field / ←/→ adjust / (enter) save / (c)lear history / (esc) home".into()
            }
            TargetsTab::Masters => {
                "(tab) target / ←/→ topics|modes / ↑/↓ select / (space) toggle / (a)dd / (esc) home".into()
            }
        }
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: View) -> Box<dyn Screen> {
    match view {
        View::Home => Box::new(HomeScreen),
        View::Setup => Box::new(SetupScreen),
        View::Run => Box::new(RunScreen),
        View::Analytics => Box::new(AnalyticsScreen),
        View::Targets => Box::new(TargetsScreen),
    }
}
