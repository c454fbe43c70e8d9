use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::analytics::TrendReport;
use crate::app::{AnalyticsTab, App};
use crate::session::{SessionRecord, SessionStatus};
use crate::ui::{bold, charting, dim, tab_bar};
use crate::util;

const TARGET_COLOR: Color = Color::DarkGray;
const ACTUAL_COLOR: Color = Color::Green;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let [tabs, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
    let selected = match app.analytics_tab {
        AnalyticsTab::Log => 0,
        AnalyticsTab::Trends => 1,
    };
    f.render_widget(tab_bar(["Study log", "Trends"], selected), tabs);

    match app.analytics_tab {
        AnalyticsTab::Log => render_log(app, f, body),
        AnalyticsTab::Trends => render_trends(&app.report, f, body),
    }
}

/// Pure presenter for one session log row
pub fn present_row(s: &SessionRecord) -> Row<'static> {
    let status_color = match s.status {
        SessionStatus::Completed => Color::Green,
        SessionStatus::Stopped => Color::Yellow,
        SessionStatus::Idle => Color::Gray,
    };
    let topic = match s.topic.trim() {
        "" => "—".to_string(),
        t => t.to_string(),
    };
    let mode = match s.mode.trim() {
        "" => "—".to_string(),
        m => m.to_string(),
    };
    let started = s
        .started_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string();

    Row::new(vec![
        Cell::from(started),
        Cell::from(topic),
        Cell::from(mode),
        Cell::from(util::mmss(s.active_study_seconds)),
        Cell::from(util::mmss(s.active_break_seconds)),
        Cell::from(util::mmss(s.paused_total_seconds)),
        Cell::from(s.status.label()).style(Style::default().fg(status_color)),
    ])
}

fn render_log(app: &App, f: &mut Frame, area: Rect) {
    if app.sessions.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No sessions logged yet.", dim()))
                .block(Block::default().borders(Borders::ALL).title("Study log")),
            area,
        );
        return;
    }

    let header = Row::new(vec!["Started", "Topic", "Mode", "Study", "Break", "Paused", "Status"])
        .style(bold().fg(Color::Cyan));
    let rows: Vec<Row> = app.sessions.iter().map(present_row).collect();
    let widths = [
        Constraint::Length(17),
        Constraint::Min(10),
        Constraint::Min(10),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Study log ({} sessions)", app.sessions.len())),
        );
    let mut state = TableState::default().with_selected(Some(app.log_cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_trends(report: &TrendReport, f: &mut Frame, area: Rect) {
    let [info, daily, breakdowns] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(10),
    ])
    .areas(area);

    let info_line = Line::from(vec![
        Span::styled(
            format!(
                "{} → {}",
                util::format_date_key(report.range.start()),
                util::format_date_key(report.range.end())
            ),
            bold(),
        ),
        Span::styled(format!("  {} day(s)", report.range.days()), dim()),
        Span::raw("   Topic: "),
        Span::styled(report.filter.label().to_string(), bold().fg(Color::Cyan)),
        Span::styled(format!("   {} min studied", report.total_actual_minutes()), dim()),
    ]);
    f.render_widget(Paragraph::new(info_line), info);

    render_daily_chart(report, f, daily);

    let [topics, modes] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(breakdowns);
    render_breakdown(f, topics, "Topics by time", &report.topics);
    render_breakdown(f, modes, "Modes by time", &report.modes);
}

fn render_daily_chart(report: &TrendReport, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(Line::from(vec![
        Span::raw("Daily minutes: "),
        Span::styled("target", Style::default().fg(TARGET_COLOR)),
        Span::raw(" vs "),
        Span::styled("actual", Style::default().fg(ACTUAL_COLOR)),
    ]));
    let inner_width = block.inner(area).width;
    let width = charting::bar_width(inner_width, report.daily.len());

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(width)
        .bar_gap(0)
        .group_gap(1)
        .max(charting::daily_chart_max(&report.daily));
    for p in &report.daily {
        let bars = [
            Bar::default()
                .value(p.target_minutes)
                .text_value(String::new())
                .style(Style::default().fg(TARGET_COLOR)),
            Bar::default()
                .value(p.actual_minutes)
                .text_value(if width >= 3 { p.actual_minutes.to_string() } else { String::new() })
                .style(Style::default().fg(ACTUAL_COLOR)),
        ];
        let label = if width >= 3 { p.label.clone() } else { p.label[..2].to_string() };
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }
    f.render_widget(chart, area);
}

fn render_breakdown(f: &mut Frame, area: Rect, title: &str, items: &[(String, u64)]) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if items.is_empty() {
        f.render_widget(Paragraph::new(Span::styled("No study time in range.", dim())), inner);
        return;
    }

    let label_cols = 14usize;
    let bar_cols = (inner.width as usize).saturating_sub(label_cols + 16).max(1);
    let lines: Vec<Line> = charting::share_rows(items, bar_cols)
        .into_iter()
        .take(inner.height as usize)
        .map(|row| {
            let mut label: String = row.label.chars().take(label_cols - 1).collect();
            while label.chars().count() < label_cols {
                label.push(' ');
            }
            Line::from(vec![
                Span::raw(label),
                Span::styled("█".repeat(row.bar_len), Style::default().fg(ACTUAL_COLOR)),
                Span::styled(
                    format!(" {} ({}%)", util::seconds_to_hm(row.seconds), charting::format_label(row.percent)),
                    dim(),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
