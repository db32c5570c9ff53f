use crate::app::App;
use crate::app::view::{DETAIL_FAILED_MESSAGE, DETAIL_FAILED_TITLE, DetailView, Modal};
use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};

/// Area covered by the detail popup inside `area`
pub fn popup_area(area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(8),
            Constraint::Percentage(84),
            Constraint::Percentage(8),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(8),
            Constraint::Percentage(84),
            Constraint::Percentage(8),
        ])
        .split(vertical[1])[1]
}

/// Renders the movie detail popup over the content
pub fn render_movie_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let popup = popup_area(area);
    app.modal_area = Some(popup);
    frame.render_widget(Clear, popup);

    match app.controller.modal() {
        Some(Modal::Loading { slug }) => render_loading_state(frame, popup, slug),
        Some(Modal::Failed) => render_error_state(frame, popup),
        Some(Modal::Ready(view)) => render_movie_info(frame, popup, view, &mut app.poster_protocol),
        None => {}
    }
}

fn spinner() -> char {
    let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
    let spinner_idx = (Utc::now().timestamp_millis() / 100) as usize % spinner_chars.len();
    spinner_chars[spinner_idx]
}

/// Renders loading state with spinner
fn render_loading_state(frame: &mut Frame, area: Rect, slug: &str) {
    let loading_block = Block::default()
        .title(format!("Chi tiết phim - {slug}"))
        .borders(Borders::ALL)
        .style(Style::default());

    let loading_text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Đang tải chi tiết phim...", spinner()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];

    let loading_paragraph = Paragraph::new(loading_text)
        .block(loading_block)
        .alignment(Alignment::Center);

    frame.render_widget(loading_paragraph, area);
}

/// Renders the fixed error panel shown when a detail lookup fails
fn render_error_state(frame: &mut Frame, area: Rect) {
    let error_block = Block::default()
        .title(DETAIL_FAILED_TITLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let error_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            DETAIL_FAILED_TITLE,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(DETAIL_FAILED_MESSAGE, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled("(Esc) đóng", Style::default().fg(Color::Gray))),
    ];

    let error_paragraph = Paragraph::new(error_text)
        .block(error_block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

/// Renders the poster section
fn render_poster_section(frame: &mut Frame, area: Rect, protocol: &mut Option<StatefulProtocol>) {
    let poster_block = Block::default().borders(Borders::ALL).title("Poster");

    match protocol {
        Some(protocol) => {
            let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));
            let inner_area = poster_block.inner(area);
            frame.render_widget(poster_block, area);
            frame.render_stateful_widget(image, inner_area, protocol);
        }
        None => {
            let placeholder_text = vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled("Không có ảnh", Style::default().fg(Color::Gray))),
            ];

            let placeholder_paragraph = Paragraph::new(placeholder_text)
                .alignment(Alignment::Center)
                .block(poster_block);

            frame.render_widget(placeholder_paragraph, area);
        }
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn tags(values: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    for value in values.iter().filter(|v| !v.is_empty()) {
        spans.push(Span::styled(
            format!(" {value} "),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ])
}

/// Renders movie information
fn render_movie_info(
    frame: &mut Frame,
    area: Rect,
    movie: &DetailView,
    protocol: &mut Option<StatefulProtocol>,
) {
    let outer_block = Block::default()
        .title(format!("Chi tiết phim - {}", movie.name))
        .borders(Borders::ALL)
        .style(Style::default());

    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Poster
            Constraint::Min(20),        // Info
        ])
        .split(inner_area);

    render_poster_section(frame, columns[0], protocol);

    let content = vec![
        Line::from(Span::styled(
            movie.name.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(movie.original_line.clone(), Style::default().fg(Color::Cyan))),
        tags(&[movie.quality.clone(), movie.language.clone()]),
        Line::from(""),
        heading("Nội dung phim"),
        Line::from(Span::styled(movie.synopsis.clone(), Style::default().fg(Color::White))),
        Line::from(""),
        heading("Thể loại"),
        tags(&movie.genres),
        Line::from(""),
        heading("Quốc gia"),
        tags(&movie.countries),
        Line::from(""),
        heading("Đạo diễn & Diễn viên"),
        labelled("Đạo diễn", &movie.directors),
        labelled("Diễn viên", &movie.actors),
        Line::from(""),
        Line::from(Span::styled("(Esc) đóng", Style::default().fg(Color::Gray))),
    ];

    let content_paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::LEFT).style(Style::default()))
        .wrap(Wrap { trim: true });

    frame.render_widget(content_paragraph, columns[1]);
}
