use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use super::SessionStore;

/// Session handle shared by every view in a scope. Only the UI thread
/// touches it.
pub type SharedSession<U> = Rc<RefCell<SessionStore<U>>>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session accessed outside of a session provider")]
    NotProvided,
}

/// The slice of the view tree that can reach a session store.
///
/// The application root calls `provide` once and passes `child()` scopes
/// down to its views. A scope built with `unprovided` has no store and every
/// lookup through it fails.
pub struct SessionScope<U> {
    session: Option<SharedSession<U>>,
}

impl<U> SessionScope<U> {
    pub fn unprovided() -> Self {
        Self { session: None }
    }

    pub fn provide(store: SessionStore<U>) -> Self {
        Self {
            session: Some(Rc::new(RefCell::new(store))),
        }
    }

    /// Scope for a descendant view, sharing this scope's store if any
    pub fn child(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }

    pub fn is_provided(&self) -> bool {
        self.session.is_some()
    }

    /// The session state and its `login`/`logout` mutators
    pub fn session(&self) -> Result<SharedSession<U>, SessionError> {
        self.session.clone().ok_or(SessionError::NotProvided)
    }
}

impl<U> Default for SessionScope<U> {
    fn default() -> Self {
        Self::unprovided()
    }
}

impl<U> Clone for SessionScope<U> {
    fn clone(&self) -> Self {
        self.child()
    }
}
