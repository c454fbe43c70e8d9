use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::analytics;
use crate::app::{App, TargetField, TargetsTab};
use crate::masters::MasterKind;
use crate::ui::{bold, dim, tab_bar};
use crate::util;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let [tabs, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
    let selected = match app.targets_tab {
        TargetsTab::Target => 0,
        TargetsTab::Masters => 1,
    };
    f.render_widget(tab_bar(["Daily target", "Masters"], selected), tabs);

    match app.targets_tab {
        TargetsTab::Target => render_target(app, f, body),
        TargetsTab::Masters => render_masters(app, f, body),
    }
}

fn render_target(app: &App, f: &mut Frame, area: Rect) {
    let [form, history] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    let field = |label: &str, value: u32, this: TargetField| {
        let style = if app.target_field == this {
            bold().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
        } else {
            bold()
        };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), dim()),
            Span::styled(format!("◂ {value:>2} ▸"), style),
        ])
    };
    let current = app
        .targets
        .resolve(util::today())
        .map_or("—".to_string(), |t| util::seconds_to_hm(t as u64));
    let lines = vec![
        Line::from(vec![Span::raw("Effective today: "), Span::styled(current, bold())]),
        Line::raw(""),
        field("Hours", app.target_hours, TargetField::Hours),
        field("Minutes", app.target_minutes, TargetField::Minutes),
        Line::raw(""),
        Line::from(Span::styled(
            "Saving applies from today onwards; past days keep their target.",
            dim(),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Set daily target")),
        form,
    );

    let block = Block::default().borders(Borders::ALL).title("Target history");
    if app.targets.is_empty() {
        f.render_widget(Paragraph::new(Span::styled("No target history yet.", dim())).block(block), history);
        return;
    }
    let rows: Vec<Row> = app
        .targets
        .newest_first()
        .map(|e| {
            Row::new(vec![
                Cell::from(util::format_date_key(e.date_key)),
                Cell::from(util::seconds_to_hm(e.target_seconds as u64)),
            ])
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(8)])
        .header(Row::new(vec!["Effective", "Target"]).style(bold().fg(Color::Cyan)))
        .block(block);
    f.render_widget(table, history);
}

fn render_masters(app: &App, f: &mut Frame, area: Rect) {
    let [topics, modes] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let usage = analytics::usage_counts(&app.sessions);
    render_master_list(app, f, topics, MasterKind::Topic, &|name| usage.topic(name));
    render_master_list(app, f, modes, MasterKind::Mode, &|name| usage.mode(name));
}

fn render_master_list(
    app: &App,
    f: &mut Frame,
    area: Rect,
    kind: MasterKind,
    uses: &dyn Fn(&str) -> usize,
) {
    let focused = app.master_kind == kind;
    let list = app.masters(kind);
    let title = format!("{}s ({})", kind.label(), list.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
        .title(title);

    if list.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(format!("No {kind}s yet. Press (a) to add one."), dim())).block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = list
        .sorted()
        .into_iter()
        .map(|item| {
            let (status, color) = if item.active {
                ("active", Color::Green)
            } else {
                ("inactive", Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(item.name.clone()),
                Cell::from(status).style(Style::default().fg(color)),
                Cell::from(uses(&item.name).to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Min(10), Constraint::Length(9), Constraint::Length(6)],
    )
    .header(Row::new(vec!["Name", "Status", "Used"]).style(bold().fg(Color::Cyan)))
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .block(block);

    let mut state = TableState::default().with_selected(focused.then_some(app.master_cursor));
    f.render_stateful_widget(table, area, &mut state);
}
