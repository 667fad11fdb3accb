//! Field rendering utilities for the wizard

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Height of one bordered field
pub const FIELD_HEIGHT: u16 = 3;

/// How a field is edited, which decides its decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select,
    ReadOnly,
}

/// Draw a bordered field. An error turns the border red and is shown on the
/// bottom border.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    kind: FieldKind,
    is_active: bool,
    error: Option<&str>,
) {
    let accent = match (error, is_active) {
        (Some(_), _) => Color::Red,
        (None, true) => Color::Cyan,
        (None, false) => Color::DarkGray,
    };

    let value_style = match kind {
        FieldKind::ReadOnly => Style::default().fg(Color::DarkGray),
        _ if is_active => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    };

    let placeholder = match kind {
        FieldKind::Select => "(select)",
        FieldKind::ReadOnly => "(derived)",
        FieldKind::Text => "(empty)",
    };
    let display_value = if value.is_empty() && !(is_active && kind == FieldKind::Text) {
        placeholder
    } else {
        value
    };

    let mut spans = Vec::new();
    if kind == FieldKind::Select && is_active {
        spans.push(Span::styled("◀ ", Style::default().fg(Color::Cyan)));
    }
    spans.push(Span::styled(display_value, value_style));
    match kind {
        FieldKind::Text if is_active => {
            spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
        }
        FieldKind::Select if is_active => {
            spans.push(Span::styled(" ▶", Style::default().fg(Color::Cyan)));
        }
        _ => {}
    }

    let mut block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    if let Some(error) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

/// Draw help text at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}
