//! Application state management for voltdesk.
//!
//! This module contains the core `App` struct: the current route, the login
//! form, the blocking alert, and the channel that carries login results from
//! background requests back to the UI loop.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use voltdesk_core::api::Authenticator;
use voltdesk_core::auth::{SessionError, SessionScope};
use voltdesk_core::config::Config;
use voltdesk_core::models::LoginResponse;

use crate::ui::views::dashboard;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the login outcome channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for email input (the backend's column width).
const MAX_EMAIL_LENGTH: usize = 120;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Alert shown for every failed login, whatever the cause
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid credentials";

/// Where a successful login lands
pub const AUTHENTICATED_ROUTE: Route = Route::Dashboard;

// ============================================================================
// Navigation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingAlert,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Result of one background login request
enum LoginOutcome<U> {
    Authenticated(LoginResponse<U>),
    Rejected(anyhow::Error),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App<A: Authenticator> {
    pub config: Config,
    /// Where `last_email` is saved after a login; `None` keeps config in memory
    config_path: Option<PathBuf>,
    pub session: SessionScope<A::User>,
    auth: A,

    // UI State
    pub route: Route,
    pub state: AppState,
    pub alert: Option<String>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    /// Requests sent but not yet answered
    pub pending_logins: usize,

    login_tx: mpsc::Sender<LoginOutcome<A::User>>,
    login_rx: mpsc::Receiver<LoginOutcome<A::User>>,
}

impl<A: Authenticator> App<A> {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        auth: A,
        session: SessionScope<A::User>,
    ) -> Self {
        let (login_tx, login_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let login_email = config.last_email.clone().unwrap_or_default();

        let mut app = Self {
            config,
            config_path,
            session,
            auth,

            route: Route::Login,
            state: AppState::Normal,
            alert: None,

            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            pending_logins: 0,

            login_tx,
            login_rx,
        };
        app.start_login();
        app
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Replace the current route. Transient view state does not survive.
    pub fn navigate(&mut self, route: Route) {
        debug!(from = self.route.path(), to = route.path(), "Navigating");
        self.route = route;
        self.state = AppState::Normal;
        self.alert = None;
        if route == Route::Login {
            self.start_login();
        }
    }

    pub fn show_alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
        self.state = AppState::ShowingAlert;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Reset login form focus: straight to the password if the email is known
    pub fn start_login(&mut self) {
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
    }

    /// Send the form's credentials, exactly as typed, in a background task.
    /// Submitting again before the first answer sends another request.
    pub fn submit_login(&mut self) {
        let email = self.login_email.clone();
        let password = self.login_password.clone();
        let auth = self.auth.clone();
        let tx = self.login_tx.clone();

        self.pending_logins += 1;
        debug!(pending = self.pending_logins, "Submitting login");

        // The request runs as its own task so a panic inside the
        // authenticator still reports back and `pending_logins` drains.
        let request = tokio::spawn(async move { auth.authenticate(&email, &password).await });
        tokio::spawn(async move {
            let outcome = match request.await {
                Ok(Ok(response)) => LoginOutcome::Authenticated(response),
                Ok(Err(e)) => LoginOutcome::Rejected(e),
                Err(e) => LoginOutcome::Rejected(anyhow::anyhow!("Login task failed: {}", e)),
            };
            if tx.send(outcome).await.is_err() {
                debug!("Login finished after the app closed");
            }
        });
    }

    /// Apply any login results that have arrived
    pub fn check_background_tasks(&mut self) -> Result<(), SessionError> {
        while let Ok(outcome) = self.login_rx.try_recv() {
            self.apply_login_outcome(outcome)?;
        }
        Ok(())
    }

    /// Wait until every submitted login has been answered and applied
    pub async fn wait_for_logins(&mut self) -> Result<(), SessionError> {
        while self.pending_logins > 0 {
            match self.login_rx.recv().await {
                Some(outcome) => self.apply_login_outcome(outcome)?,
                None => break,
            }
        }
        Ok(())
    }

    fn apply_login_outcome(&mut self, outcome: LoginOutcome<A::User>) -> Result<(), SessionError> {
        self.pending_logins = self.pending_logins.saturating_sub(1);

        match outcome {
            LoginOutcome::Authenticated(LoginResponse { user, token }) => {
                self.session.session()?.borrow_mut().login(user, token);
                self.login_password.clear();
                self.remember_email();
                info!("Login successful");
                self.navigate(AUTHENTICATED_ROUTE);
            }
            LoginOutcome::Rejected(e) => {
                debug!(error = %e, "Login rejected");
                self.show_alert(LOGIN_FAILED_MESSAGE);
            }
        }
        Ok(())
    }

    fn remember_email(&mut self) {
        if self.config.last_email.as_deref() == Some(self.login_email.as_str()) {
            return;
        }
        self.config.last_email = Some(self.login_email.clone());
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.session.session()?.borrow_mut().logout();
        self.navigate(Route::Login);
        Ok(())
    }

    /// Line-mode login (used for `--login`)
    pub async fn login_interactive(&mut self) -> Result<()> {
        println!("\n=== voltdesk login ===\n");

        let email = if self.login_email.is_empty() {
            Self::prompt("Email: ")?
        } else {
            let input = Self::prompt(&format!("Email [{}]: ", self.login_email))?;
            if input.is_empty() {
                self.login_email.clone()
            } else {
                input
            }
        };
        self.login_email = email;
        self.login_password = rpassword::prompt_password("Password: ")?;

        self.submit_login();
        self.wait_for_logins().await?;

        if self.route == AUTHENTICATED_ROUTE {
            println!("\n{}\n{}\n", dashboard::TITLE, dashboard::WELCOME);
        } else {
            let message = self.alert.take().unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
            eprintln!("{}", message);
        }
        Ok(())
    }

    fn prompt(label: &str) -> Result<String> {
        print!("{}", label);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

impl<A: Authenticator<User = voltdesk_core::models::User>> App<A> {
    /// Name of the signed-in user, for the title bar
    pub fn current_user_name(&self) -> Result<Option<String>, SessionError> {
        let session = self.session.session()?;
        let session = session.borrow();
        Ok(session.user().map(|u| u.display_name().to_string()))
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Test support
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
