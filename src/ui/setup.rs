use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SetupField};
use crate::ui::{bold, dim};

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let [form, preview] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);

    let lines: Vec<Line> = SetupField::ALL
        .iter()
        .map(|field| {
            let selected = *field == app.setup_field;
            let value = field_value(app, *field);
            let marker = if selected { "▸ " } else { "  " };
            let value_style = if selected {
                bold().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
            } else {
                bold()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<22}", field.label()), dim()),
                Span::styled(format!("◂ {value} ▸"), value_style),
            ])
        })
        .collect();

    let mut body = lines;
    if let Some(hint) = app.setup_hint() {
        body.push(Line::raw(""));
        body.push(Line::from(Span::styled(hint, Style::default().fg(Color::Yellow))));
    }

    f.render_widget(
        Paragraph::new(body).block(Block::default().borders(Borders::ALL).title("New session")),
        form,
    );

    let s = &app.setup;
    let cycles = if s.study_minutes == 0 {
        0
    } else {
        s.total_minutes.div_ceil(s.study_minutes + s.break_minutes)
    };
    let preview_lines = vec![
        Line::from(format!("Total:  {} min", s.total_minutes)),
        Line::from(format!("Study:  {} min", s.study_minutes)),
        Line::from(format!("Break:  {} min", s.break_minutes)),
        Line::from(format!("Cycles: ~{cycles}")),
        Line::from(format!("Topic:  {}", s.topic.as_deref().unwrap_or("—"))),
        Line::from(format!("Mode:   {}", s.mode.as_deref().unwrap_or("—"))),
    ];
    f.render_widget(
        Paragraph::new(preview_lines).block(Block::default().borders(Borders::ALL).title("Preview")),
        preview,
    );
}

fn field_value(app: &App, field: SetupField) -> String {
    let s = &app.setup;
    match field {
        SetupField::Total => s.total_minutes.to_string(),
        SetupField::Study => s.study_minutes.to_string(),
        SetupField::Break => s.break_minutes.to_string(),
        SetupField::Topic => s.topic.clone().unwrap_or_else(|| "Select topic".into()),
        SetupField::Mode => s.mode.clone().unwrap_or_else(|| "Select mode".into()),
    }
}
