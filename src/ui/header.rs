use crate::app::App;
use crate::app::view::NavItem;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::loading::render_loading;

/// Renders the navigation tabs, the search box and the loading spinner
pub fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),    // Navigation
            Constraint::Length(36), // Search
            Constraint::Length(16), // Loading
        ])
        .split(area);

    let active = app.controller.state().active_nav;
    let mut spans = vec![
        Span::styled(
            " PHIM ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    for (i, nav) in NavItem::ALL.iter().enumerate() {
        let style = if active == Some(*nav) {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("({}) {}", i + 1, nav.label()), style));
        spans.push(Span::raw("  "));
    }

    let nav = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(nav, chunks[0]);

    render_search_box(frame, app, chunks[1]);
    render_loading(frame, app, chunks[2]);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.searching {
        (format!("{}▏", app.search_term), Style::default().fg(Color::White))
    } else {
        ("(/) Tìm kiếm phim...".to_string(), Style::default().fg(Color::DarkGray))
    };

    let border_style = if app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search = Paragraph::new(Span::styled(text, style)).block(
        Block::default()
            .title("Tìm kiếm")
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(search, area);
}
