use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend user ids are UUIDs; some deployments and fixtures use integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Numeric(id) => write!(f, "{}", id),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// The signed-in user as reported by the authentication endpoint.
/// Fields the client does not use are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Name to show in the title bar, falling back to the email for users
    /// created without one.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else {
            self.email.as_deref().unwrap_or("")
        }
    }
}

/// Successful login body: the user record and its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse<U> {
    pub user: U,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response_numeric_id() {
        let json = r#"{"user":{"id":1,"name":"A"},"token":"abc123"}"#;
        let resp: LoginResponse<User> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.id, UserId::Numeric(1));
        assert_eq!(resp.user.name, "A");
        assert_eq!(resp.user.email, None);
        assert_eq!(resp.token, "abc123");
    }

    #[test]
    fn test_parse_user_uuid_id_and_extra_fields() {
        let json = r#"{
            "id": "22b210e3-d325-41be-b761-31e18bfe2c73",
            "name": "Maria Souza",
            "email": "maria@example.com",
            "is_active": true,
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(
            user.id,
            UserId::Text("22b210e3-d325-41be-b761-31e18bfe2c73".to_string())
        );
        assert_eq!(user.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn test_login_response_missing_token_is_rejected() {
        let json = r#"{"user":{"id":1,"name":"A"}}"#;
        assert!(serde_json::from_str::<LoginResponse<User>>(json).is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            id: UserId::Numeric(7),
            name: "  ".to_string(),
            email: Some("a@b.com".to_string()),
        };
        assert_eq!(user.display_name(), "a@b.com");
        assert_eq!(user.id.to_string(), "7");
    }
}
