use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

/// Durable storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// In-memory session plus its durable token entry.
///
/// User and token are only ever set together by `login` and cleared together
/// by `logout`. Both mutators are infallible: storage failures are logged and
/// the in-memory state is updated regardless.
pub struct SessionStore<U> {
    storage: Box<dyn KeyValueStore>,
    user: Option<U>,
    token: Option<String>,
}

impl<U> SessionStore<U> {
    /// Start anonymous. Any token left in storage by an earlier run is not
    /// picked up.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            user: None,
            token: None,
        }
    }

    pub fn login(&mut self, user: U, token: String) {
        if let Err(e) = self.storage.set_item(TOKEN_KEY, &token) {
            warn!(error = %e, "Failed to persist session token");
        }
        self.user = Some(user);
        self.token = Some(token);
        info!("Session started");
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove persisted session token");
        }
        self.user = None;
        self.token = None;
        info!("Session ended");
    }

    pub fn user(&self) -> Option<&U> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Read the durable token entry back
    pub fn stored_token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "Failed to read persisted session token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserId};
    use crate::storage::{FileStorage, MemoryStorage, StorageError};

    /// Storage whose every operation fails
    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(broken())
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(broken())
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(broken())
        }
    }

    fn broken() -> StorageError {
        StorageError::Io {
            path: "/dev/full".into(),
            source: std::io::Error::other("disk full"),
        }
    }

    fn user(id: i64, name: &str) -> User {
        User {
            id: UserId::Numeric(id),
            name: name.to_string(),
            email: None,
        }
    }

    fn memory_store() -> SessionStore<User> {
        SessionStore::new(Box::new(MemoryStorage::default()))
    }

    #[test]
    fn test_new_store_is_anonymous() {
        let store = memory_store();
        assert_eq!(store.user(), None);
        assert_eq!(store.token(), None);
        assert_eq!(store.state(), SessionState::Anonymous);
        assert_eq!(store.stored_token(), None);
    }

    #[test]
    fn test_login_sets_user_token_and_storage() {
        let mut store = memory_store();
        store.login(user(1, "A"), "abc123".to_string());

        assert_eq!(store.user(), Some(&user(1, "A")));
        assert_eq!(store.token(), Some("abc123"));
        assert_eq!(store.state(), SessionState::Authenticated);
        assert_eq!(store.stored_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut store = memory_store();
        store.login(user(1, "A"), "abc123".to_string());
        store.logout();

        assert_eq!(store.user(), None);
        assert_eq!(store.token(), None);
        assert_eq!(store.state(), SessionState::Anonymous);
        assert_eq!(store.stored_token(), None);
    }

    #[test]
    fn test_second_login_replaces_first() {
        let mut store = memory_store();
        store.login(user(1, "A"), "first".to_string());
        store.login(user(2, "B"), "second".to_string());

        assert_eq!(store.user(), Some(&user(2, "B")));
        assert_eq!(store.stored_token().as_deref(), Some("second"));
    }

    #[test]
    fn test_logout_when_anonymous_is_harmless() {
        let mut store = memory_store();
        store.logout();
        assert_eq!(store.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_token_is_stored_verbatim() {
        // No shape validation: empty and odd tokens are kept as given
        let mut store = memory_store();
        store.login(user(1, "A"), String::new());
        assert_eq!(store.token(), Some(""));
        assert_eq!(store.stored_token().as_deref(), Some(""));
    }

    #[test]
    fn test_storage_failure_does_not_fail_login_or_logout() {
        let mut store: SessionStore<User> = SessionStore::new(Box::new(BrokenStorage));

        store.login(user(1, "A"), "abc123".to_string());
        assert_eq!(store.token(), Some("abc123"));
        assert_eq!(store.stored_token(), None);

        store.logout();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_file_backed_token_outlives_store_but_is_not_restored() {
        let dir = tempfile::TempDir::new().unwrap();

        let mut store: SessionStore<User> =
            SessionStore::new(Box::new(FileStorage::in_dir(dir.path())));
        store.login(user(1, "A"), "abc123".to_string());
        drop(store);

        let reopened: SessionStore<User> =
            SessionStore::new(Box::new(FileStorage::in_dir(dir.path())));
        assert_eq!(reopened.stored_token().as_deref(), Some("abc123"));
        assert_eq!(reopened.state(), SessionState::Anonymous);
    }
}
