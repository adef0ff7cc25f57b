use thiserror::Error;

/// Why the backend refused or failed a request. The login view never shows
/// these; they end up in the debug log.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 403: the account exists but may not sign in (e.g. deactivated)
    #[error("Account not allowed to sign in: {0}")]
    AccessDenied(String),

    /// 401: email and password did not match an account
    #[error("Login rejected - email or password not recognised")]
    Unauthorized,

    /// 404: usually a wrong `api_url`
    #[error("Endpoint not found (check the API URL): {0}")]
    NotFound(String),

    #[error("Too many login attempts - try again later")]
    RateLimited,

    #[error("Backend error: {0}")]
    ServerError(String),

    #[error("Could not reach the backend: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Cut a response body down to something fit for a log line
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Map a non-2xx status and its body to an error
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "inactive"),
            ApiError::AccessDenied(ref b) if b == "inactive"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "{}"),
            ApiError::InvalidResponse(ref m) if m.starts_with("Status 422")
        ));
    }

    #[test]
    fn test_unauthorized_message_names_the_credentials() {
        let message = ApiError::from_status(StatusCode::UNAUTHORIZED, "").to_string();
        assert_eq!(message, "Login rejected - email or password not recognised");
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "é".repeat(400); // 800 bytes, multi-byte chars
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
        assert!(truncated.len() < body.len());
    }
}
