//! Login form: email, password and a submit button.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use voltdesk_core::api::Authenticator;

use crate::app::{App, LoginFocus};
use crate::ui::styles;

/// Visible width of the text fields
const FIELD_WIDTH: usize = 24;

pub fn render<A: Authenticator>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let form = centered_rect_fixed(46, 11, area);
    frame.render_widget(Clear, form);

    let mut lines = vec![
        Line::from(Span::styled("   Sign in", styles::title_style())),
        Line::from(""),
    ];

    lines.push(field_line(
        "Email:    ",
        &tail(&app.login_email, FIELD_WIDTH),
        app.login_focus == LoginFocus::Email,
    ));

    let masked = "*".repeat(app.login_password.chars().count().min(FIELD_WIDTH));
    lines.push(field_line(
        "Password: ",
        &masked,
        app.login_focus == LoginFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if button_focused { " ▶ Sign in ◀ " } else { "   Sign in   " };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    if app.pending_logins > 0 {
        lines.push(Line::from(Span::styled(
            "   Signing in...",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), form);
}

fn field_line(label: &'static str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { " " };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<width$}{}", value, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Keep the end of long input visible, where the cursor is
fn tail(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(max_chars)).collect()
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
