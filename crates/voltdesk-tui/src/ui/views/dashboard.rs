//! Authenticated landing page. Static content only.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::ui::styles;

pub const TITLE: &str = "Dashboard";
pub const WELCOME: &str = "Welcome to your admin area!";

pub fn render(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(TITLE, styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(WELCOME, styles::list_item_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .padding(Padding::uniform(1));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
