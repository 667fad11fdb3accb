//! Layout components (step header, status bar)

use super::components::{render_step_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::forms::STEPS;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into step header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Step header
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw one box per wizard step, highlighting the current one
pub fn draw_step_header(frame: &mut Frame, area: Rect, app: &App) {
    let constraints: Vec<Constraint> = STEPS
        .iter()
        .map(|_| Constraint::Ratio(1, STEPS.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let current = app.wizard.step();
    let registered = matches!(app.state.current_view, View::Registered);

    for (idx, step) in STEPS.iter().enumerate() {
        render_step_button(
            frame,
            chunks[idx],
            idx,
            step.title,
            !registered && idx == current,
            registered || idx < current,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" ● {} ({}) ", app.session.username, app.session.role.label()),
        Style::default().fg(Color::Green),
    )];

    spans.push(Span::styled(
        get_view_hints(&app.state.current_view),
        Style::default().fg(Color::Gray),
    ));

    let pending = app.wizard.pending_checks();
    if pending > 0 {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("checking {pending}…"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let errors = app.wizard.errors();
    if !errors.is_empty() {
        let fields: Vec<&str> = errors.iter().map(|(field, _)| field.label()).collect();
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} field error(s): {}", errors.len(), fields.join(", ")),
            Style::default().fg(Color::Red),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> &'static str {
    match view {
        View::Wizard => "Tab:field  ^N/PgDn:next  ^P/PgUp:back  ^S:submit",
        View::Registered => "Enter:register another  q:quit",
    }
}
