// Client error types
use serde_json::Value;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the API client and the wrappers built on it
#[derive(Debug, Error)]
pub enum ClientError {
    /// An endpoint that needs credentials was called with no access token stored.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {}", summarize_body(.body))]
    Http { status: u16, body: Value },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the persistent key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("HOME environment variable not set")]
    NoHome,
}

impl ClientError {
    pub fn http(status: u16, body: Value) -> Self {
        ClientError::Http { status, body }
    }

    /// HTTP status when the error came from a backend response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated) || self.status_code() == Some(401)
    }

    /// Stable error code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::ConfigMissing(_) => "CONFIG_MISSING",
            ClientError::InvalidUrl { .. } => "INVALID_URL",
            ClientError::Http { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                429 => "TOO_MANY_REQUESTS",
                500..=599 => "SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            ClientError::Transport(err) if err.is_timeout() => "TIMEOUT",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Backend-supplied message, when the error body carries one (`detail`, `message` or `error`)
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { body, .. } => ["detail", "message", "error"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str))
                .or_else(|| body.as_str()),
            _ => None,
        }
    }
}

fn summarize_body(body: &Value) -> String {
    match body {
        Value::Null => "empty response body".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_codes() {
        assert_eq!(ClientError::http(401, Value::Null).error_code(), "UNAUTHORIZED");
        assert_eq!(ClientError::http(404, Value::Null).error_code(), "NOT_FOUND");
        assert_eq!(ClientError::http(503, Value::Null).error_code(), "SERVER_ERROR");
        assert_eq!(ClientError::http(418, Value::Null).error_code(), "HTTP_ERROR");
        assert_eq!(ClientError::NotAuthenticated.error_code(), "NOT_AUTHENTICATED");
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ClientError::NotAuthenticated.is_unauthorized());
        assert!(ClientError::http(401, Value::Null).is_unauthorized());
        assert!(!ClientError::http(403, Value::Null).is_unauthorized());
    }

    #[test]
    fn test_server_message_and_display() {
        let err = ClientError::http(400, json!({"detail": "Phone already registered"}));
        assert_eq!(err.server_message(), Some("Phone already registered"));
        assert_eq!(err.to_string(), r#"HTTP 400: {"detail":"Phone already registered"}"#);

        let err = ClientError::http(502, Value::String("Bad Gateway".into()));
        assert_eq!(err.server_message(), Some("Bad Gateway"));
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");

        assert_eq!(ClientError::http(500, Value::Null).server_message(), None);
    }
}
