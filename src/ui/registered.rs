//! Confirmation shown after a successful registration

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(Span::styled(
            "Internet user registered",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(user) = &app.state.registered {
        content.push(Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
            Span::raw(user.id.to_string()),
        ]));
        content.push(Line::from(vec![
            Span::styled("Username: ", Style::default().fg(Color::DarkGray)),
            Span::raw(&user.username),
        ]));
        if !user.name.is_empty() {
            content.push(Line::from(vec![
                Span::styled("Name: ", Style::default().fg(Color::DarkGray)),
                Span::raw(&user.name),
            ]));
        }
        if let Some(created_at) = user.created_at {
            content.push(Line::from(vec![
                Span::styled("Created: ", Style::default().fg(Color::DarkGray)),
                Span::raw(created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
            ]));
        }
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::raw("Press "),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" to register another user or "),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::raw(" to quit."),
    ]));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Registration complete ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
