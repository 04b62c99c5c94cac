use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to server. Please check your internet connection.";

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401: the session is no longer valid
    #[error("unauthorized{}", suffix(.message))]
    Unauthorized { message: Option<String> },

    /// Non-success HTTP status other than 401
    #[error("server returned {status}{}", suffix(.message))]
    Server { status: u16, message: Option<String> },

    /// 2xx response whose envelope reports `success: false`
    #[error("request rejected{}", suffix(.message))]
    Rejected { message: Option<String> },

    /// No response was received
    #[error("connection failed: {0}")]
    Connectivity(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Message reported by the server, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Server { message, .. }
            | ApiError::Rejected { message } => message.as_deref().filter(|m| !m.is_empty()),
            ApiError::Connectivity(_) | ApiError::Decode(_) => None,
        }
    }

    /// User-facing text: the server's message verbatim when present, the
    /// connectivity text when nothing answered, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str, connectivity: &str) -> String {
        if let ApiError::Connectivity(_) = self {
            return connectivity.to_string();
        }
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Connectivity(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ApiError::Server {
            status: 409,
            message: Some("Property already booked for these dates".into()),
        };
        assert_eq!(
            err.user_message("Booking failed. Please try again.", CONNECTIVITY_MESSAGE),
            "Property already booked for these dates"
        );
    }

    #[test]
    fn falls_back_when_server_is_silent() {
        let err = ApiError::Server { status: 500, message: Some(String::new()) };
        assert_eq!(
            err.user_message("Booking failed. Please try again.", CONNECTIVITY_MESSAGE),
            "Booking failed. Please try again."
        );

        let offline = ApiError::Connectivity("refused".into());
        assert_eq!(offline.user_message("x", CONNECTIVITY_MESSAGE), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn display_includes_message() {
        let err = ApiError::Unauthorized { message: Some("Token expired".into()) };
        assert_eq!(err.to_string(), "unauthorized: Token expired");
        assert!(err.is_unauthorized());
    }
}
