use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::analytics::DayStat;
use crate::app::App;
use crate::ui::{bold, dim};
use crate::util;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let stats = app.home_stats();

    let [cards, streak, hint] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .areas(area);
    let [yesterday, today] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(cards);

    render_day(f, yesterday, "Yesterday", &stats.yesterday, false);
    render_day(f, today, "Today", &stats.today, true);

    let streak_widget = Paragraph::new(vec![
        Line::from(Span::styled(stats.streak.to_string(), bold().fg(Color::Yellow))),
        Line::from(Span::styled(
            if stats.streak == 1 { "day streak" } else { "days streak" },
            dim(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Streak"));
    f.render_widget(streak_widget, streak);

    if let Some(h) = app.setup_hint() {
        f.render_widget(
            Paragraph::new(Span::styled(h, Style::default().fg(Color::Yellow))).alignment(Alignment::Center),
            hint,
        );
    }
}

fn render_day(f: &mut Frame, area: Rect, title: &str, day: &DayStat, is_today: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{title} · {}", util::format_date_key(day.date)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [big, gauge, meta] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(Span::styled(util::hhmm(day.study_seconds), bold())).alignment(Alignment::Center),
        big,
    );

    let pct_label = day.percent().map_or("—%".to_string(), |p| format!("{p}%"));
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(if is_today { Color::Green } else { Color::Blue }))
            .ratio(day.ratio())
            .label(pct_label),
        gauge,
    );

    let meta_text = match (day.target_seconds, is_today) {
        (None, true) => "Target: — (set one under Targets)".to_string(),
        (None, false) => "Target: — · —%".to_string(),
        (Some(t), true) => format!(
            "Target: {} · Studied: {}",
            util::seconds_to_hm(t as u64),
            util::seconds_to_hm(day.study_seconds)
        ),
        (Some(t), false) => format!(
            "Target: {} · {}",
            util::seconds_to_hm(t as u64),
            day.percent().map_or("—%".to_string(), |p| format!("{p}%"))
        ),
    };
    f.render_widget(
        Paragraph::new(Span::styled(meta_text, dim())).alignment(Alignment::Center),
        meta,
    );
}
