use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::timer::{Phase, TimerState};
use crate::ui::{bold, dim};
use crate::util;

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Study => Color::Green,
        Phase::Break => Color::Blue,
        Phase::Done => Color::Magenta,
        Phase::Idle => Color::Gray,
    }
}

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let s = app.timer.state();

    let [labels, clock, phase_gauge, total_gauge, counters] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let topic_line = Line::from(vec![
        Span::styled(s.topic.as_str(), bold()),
        Span::styled(" · ", dim()),
        Span::styled(s.mode.as_str(), dim()),
    ]);
    f.render_widget(Paragraph::new(topic_line).alignment(Alignment::Center), labels);

    let status = if s.is_paused {
        Span::styled("PAUSED", bold().fg(Color::Yellow))
    } else {
        Span::styled(s.phase.to_string().to_uppercase(), bold().fg(phase_color(s.phase)))
    };
    let big = if s.is_running() {
        util::mmss(s.phase_remaining_secs())
    } else {
        util::mmss(s.total_active_secs())
    };
    f.render_widget(
        Paragraph::new(vec![Line::from(status), Line::from(Span::styled(big, bold()))])
            .alignment(Alignment::Center),
        clock,
    );

    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Phase"))
            .gauge_style(Style::default().fg(phase_color(s.phase)))
            .ratio(s.phase_progress())
            .label(format!(
                "{} / {}",
                util::mmss(s.phase_elapsed_secs),
                util::mmss(s.phase_len())
            )),
        phase_gauge,
    );

    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Session"))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(total_ratio(s))
            .label(format!("{} remaining", util::mmss(s.total_remaining_secs()))),
        total_gauge,
    );

    let counter_lines = vec![
        Line::from(format!(
            "Active study {}   Active break {}   Paused {}",
            util::mmss(s.active_study_secs),
            util::mmss(s.active_break_secs),
            util::mmss(s.paused_total_secs)
        )),
        Line::from(Span::styled(
            format!(
                "Plan: {} total, {} study, {} break",
                util::seconds_to_hm(s.total_secs as u64),
                util::seconds_to_hm(s.study_secs as u64),
                util::seconds_to_hm(s.break_secs as u64)
            ),
            dim(),
        )),
    ];
    f.render_widget(Paragraph::new(counter_lines).alignment(Alignment::Center), counters);
}

fn total_ratio(s: &TimerState) -> f64 {
    if s.total_secs == 0 {
        return 0.0;
    }
    (s.elapsed_secs as f64 / s.total_secs as f64).clamp(0.0, 1.0)
}
