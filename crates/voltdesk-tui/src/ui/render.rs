use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use voltdesk_core::api::Authenticator;

use crate::app::{App, AppState, Route};

use super::styles;
use super::views::{dashboard, login, login::centered_rect_fixed};

/// `signed_in` is the user name read through the session scope before drawing.
pub fn render<A: Authenticator>(frame: &mut Frame, app: &App<A>, signed_in: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, signed_in, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingAlert) {
        if let Some(ref message) = app.alert {
            render_alert_overlay(frame, message);
        }
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar<A: Authenticator>(
    frame: &mut Frame,
    app: &App<A>,
    signed_in: Option<&str>,
    area: Rect,
) {
    let title = "  voltdesk";
    let right = match signed_in {
        Some(name) => format!("{}  {} ", app.route.path(), name),
        None => format!("{} ", app.route.path()),
    };

    let padding = (area.width as usize)
        .saturating_sub(title.chars().count() + right.chars().count());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content<A: Authenticator>(frame: &mut Frame, app: &App<A>, area: Rect) {
    match app.route {
        Route::Login => login::render(frame, app, area),
        Route::Dashboard => dashboard::render(frame, area),
    }
}

fn render_status_bar<A: Authenticator>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let shortcuts = match app.route {
        Route::Login => " [Tab] next field | [Enter] sign in | [Esc] quit ",
        Route::Dashboard => " [l]og out | [q]uit ",
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(shortcuts, styles::muted_style())))
        .style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Blocking notice; any key dismisses it
fn render_alert_overlay(frame: &mut Frame, message: &str) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", message), styles::error_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("any key", styles::help_key_style()),
            Span::styled(" to continue", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{test_app, FakeAuthenticator};
    use crate::app::LOGIN_FAILED_MESSAGE;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App<FakeAuthenticator>, signed_in: Option<&str>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app, signed_in)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_login_route_renders_form() {
        let app = test_app(FakeAuthenticator::rejecting());
        let text = rendered(&app, None);
        assert!(text.contains("/login"));
        assert!(text.contains("Email:"));
        assert!(text.contains("Password:"));
    }

    #[test]
    fn test_dashboard_route_shows_user_in_title() {
        let mut app = test_app(FakeAuthenticator::rejecting());
        app.navigate(Route::Dashboard);
        let text = rendered(&app, Some("Maria"));
        assert!(text.contains("/dashboard  Maria"));
        assert!(text.contains(dashboard::WELCOME));
        assert!(text.contains("[l]og out"));
    }

    #[test]
    fn test_alert_overlay() {
        let mut app = test_app(FakeAuthenticator::rejecting());
        app.show_alert(LOGIN_FAILED_MESSAGE);
        let text = rendered(&app, None);
        assert!(text.contains(LOGIN_FAILED_MESSAGE));
        assert!(text.contains("any key"));
    }
}
