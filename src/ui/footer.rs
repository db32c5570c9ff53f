use crate::app::{App, Focus};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Text,
    widgets::{Block, Borders, Paragraph},
};

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    if app.searching {
        "(Enter) tìm kiếm, (Esc) huỷ"
    } else if app.controller.modal().is_some() {
        "(Esc) đóng, (q) thoát"
    } else {
        match app.focus {
            Focus::Hero => "(Enter) xem chi tiết, (Tab) chuyển vùng, (1-4) menu, (/) tìm kiếm, (q) thoát",
            Focus::Options => "(←→/↑↓) chọn, (Enter) lọc, (Tab) chuyển vùng, (1-4) menu, (/) tìm kiếm, (q) thoát",
            Focus::Grid => "(↑↓/jk) cuộn, (Enter) chi tiết, (Tab) chuyển vùng, (1-4) menu, (/) tìm kiếm, (q) thoát",
        }
    }
}

/// Renders the footer with instructions at the bottom of the screen
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bottom_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let instruction_text = get_instruction_text(app);
    let bottom = Paragraph::new(Text::styled(instruction_text, Style::default()))
        .block(bottom_block);

    frame.render_widget(bottom, area);
}
