use crate::app::view::{Grid, HERO_CALL_TO_ACTION, HeroView};
use crate::app::{App, Focus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};
use tui_big_text::{BigText, PixelSize};

const HERO_HEIGHT: u16 = 9;
const OPTIONS_HEIGHT: u16 = 6;
const PREVIEW_WIDTH: u16 = 28;
const BACKDROP_WIDTH: u16 = 24;

/// Renders the titled content area: hero banner, option row and movie grid
pub fn render_main_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let outer_block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.controller.state().title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let inner = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let has_hero = app.controller.hero().is_some();
    let has_options = !app.controller.options().is_empty();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if has_hero { HERO_HEIGHT } else { 0 }),
            Constraint::Length(if has_options { OPTIONS_HEIGHT } else { 0 }),
            Constraint::Min(3),
        ])
        .split(inner);

    if let Some(hero) = app.controller.hero() {
        let focused = app.focus == Focus::Hero;
        render_hero(frame, hero, focused, &mut app.backdrop_protocol, chunks[0]);
    }
    if has_options {
        render_options(frame, app, chunks[1]);
    }
    render_grid(frame, app, chunks[2]);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_hero(
    frame: &mut Frame,
    hero: &HeroView,
    focused: bool,
    backdrop: &mut Option<StatefulProtocol>,
    area: Rect,
) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", hero.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(focus_border(focused));
    let mut inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(backdrop) = backdrop {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(BACKDROP_WIDTH), Constraint::Min(10)])
            .split(inner);
        frame.render_stateful_widget(
            StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None)),
            columns[0],
            backdrop,
        );
        inner = columns[1];
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Name
            Constraint::Min(1),    // Blurb
            Constraint::Length(1), // Call to action
        ])
        .split(inner);

    // font8x8 has no Vietnamese glyphs
    if hero.name.is_ascii() {
        let big_text = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .lines(vec![hero.name.clone().into()])
            .build();
        frame.render_widget(big_text, chunks[0]);
    } else {
        let name = Paragraph::new(Line::from(Span::styled(
            hero.name.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(name, chunks[0]);
    }

    let blurb = Paragraph::new(Span::styled(hero.blurb.clone(), Style::default().fg(Color::Gray)))
        .wrap(Wrap { trim: true });
    frame.render_widget(blurb, chunks[1]);

    let cta_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let cta = Paragraph::new(Span::styled(format!(" ▶ {HERO_CALL_TO_ACTION} "), cta_style));
    frame.render_widget(cta, chunks[2]);
}

fn option_style(selected: bool, under_cursor: bool) -> Style {
    let mut style = if selected {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    if under_cursor {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    style
}

fn render_options(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Options;
    let active = app.controller.state().active_option.as_deref();

    let mut spans = Vec::new();
    for (i, button) in app.controller.options().iter().enumerate() {
        let selected = active == Some(button.slug.as_str());
        let under_cursor = focused && i == app.option_index;
        spans.push(Span::styled(
            format!(" {} ", button.label),
            option_style(selected, under_cursor),
        ));
        spans.push(Span::raw(" "));
    }

    let options = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(focused)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(options, area);
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Grid;
    let border_style = focus_border(focused);

    let cards = match app.controller.grid() {
        Grid::Cards(cards) => cards,
        other => {
            let block = Block::default().borders(Borders::ALL).border_style(border_style);
            let message = match (other, other.message()) {
                (Grid::Failed, Some(text)) => {
                    Span::styled(text, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                }
                (_, Some(text)) => Span::styled(text, Style::default().fg(Color::Gray)),
                (_, None) => Span::raw(""),
            };
            let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let title = format!("Phim ({})", cards.len());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(PREVIEW_WIDTH)])
        .split(area);

    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let mut content = vec![Line::from(Span::styled(
                card.name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))];
            if let Some(year) = card.year {
                content.push(Line::from(Span::styled(
                    format!("  {year}"),
                    Style::default().fg(Color::Gray),
                )));
            }
            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, columns[0], &mut app.grid_state);
    render_preview(frame, columns[1], &mut app.preview_protocol);
}

/// Poster of the highlighted card
fn render_preview(frame: &mut Frame, area: Rect, protocol: &mut Option<StatefulProtocol>) {
    let block = Block::default()
        .title("Poster")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    match protocol {
        Some(protocol) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_stateful_widget(
                StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None)),
                inner,
                protocol,
            );
        }
        None => {
            let placeholder = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Không có ảnh", Style::default().fg(Color::Gray))),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(placeholder, area);
        }
    }
}
