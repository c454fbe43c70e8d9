pub mod analytics;
pub mod charting;
pub mod home;
pub mod run;
pub mod screen;
pub mod setup;
pub mod targets;

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Prompt, View};
use crate::masters::MasterKind;
use crate::util;

const HORIZONTAL_MARGIN: u16 = 2;

pub fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub fn italic() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
}

/// Top-level draw: header, the active view, footer and any modal prompt.
pub fn draw(app: &App, f: &mut Frame) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .areas(f.area());

    render_header(app, f, header);
    screen::current_screen(app.view).render(app, f, body);
    render_footer(app, f, footer);

    if let Some(prompt) = &app.prompt {
        render_prompt(app, prompt, f);
    }
}

fn render_header(app: &App, f: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled("studymate", bold().fg(Color::Cyan)), Span::raw("  ")];
    spans.push(Span::styled(app.view.to_string(), bold()));
    if app.view != View::Run && app.timer.is_running() {
        let s = app.timer.state();
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} {} left", s.phase, util::mmss(s.total_remaining_secs())),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(app: &App, f: &mut Frame, area: Rect) {
    let [notice_area, legend_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    if let Some(notice) = &app.notice {
        let style = if notice.is_error() {
            bold().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        f.render_widget(Paragraph::new(Span::styled(notice.text(), style)), notice_area);
    }

    let legend = screen::current_screen(app.view).legend(app);
    f.render_widget(Paragraph::new(Span::styled(legend, italic())), legend_area);
}

/// Two-tab strip used by the Analytics and Targets views.
pub fn tab_bar<'a>(titles: [&'a str; 2], selected: usize) -> Tabs<'a> {
    Tabs::new(titles.to_vec())
        .select(selected)
        .highlight_style(bold().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED))
        .divider("|")
}

fn render_prompt(app: &App, prompt: &Prompt, f: &mut Frame) {
    let (title, body) = match prompt {
        Prompt::ConfirmStop => {
            let s = app.timer.state();
            (
                "Stop session?",
                format!(
                    "Your active time so far (excluding pauses) will be saved.\n\
                     Active time: {} (Study: {}, Break: {})\n\n(y)es / (n)o",
                    util::mmss(s.total_active_secs()),
                    util::mmss(s.active_study_secs),
                    util::mmss(s.active_break_secs)
                ),
            )
        }
        Prompt::ConfirmClearLog => (
            "Clear study log?",
            format!(
                "All {} logged sessions will be deleted.\n\n(y)es / (n)o",
                app.sessions.len()
            ),
        ),
        Prompt::ConfirmClearTargets => (
            "Clear target history?",
            "This erases every saved target permanently.\n\n(y)es / (n)o".to_string(),
        ),
        Prompt::NewMaster(kind, buf) => (
            match kind {
                MasterKind::Topic => "New topic",
                MasterKind::Mode => "New study mode",
            },
            format!("{buf}_\n\n(enter) save / (esc) cancel"),
        ),
        Prompt::EditRange(buf) => (
            "Date range (start end)",
            format!("{buf}_\n\nYYYY-MM-DD YYYY-MM-DD, at most 31 days"),
        ),
    };

    let area = centered(f.area(), 60, 7);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title, bold())),
            ),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
