use crate::app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, WhichUse};

/// Renders the spinner while any request is in flight
pub fn render_loading(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.controller.is_loading() {
        return;
    }

    let label = match app.controller.loading().outstanding() {
        1 => "Đang tải".to_string(),
        n => format!("Đang tải ({n})"),
    };

    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    frame.render_stateful_widget(throbber, inner, &mut app.throbber_state);
}
