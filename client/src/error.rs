use reqwest::StatusCode;

use crate::responses::ErrorResponse;

/// Text returned by [`ClientError::message`] when nothing better is available.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Status {
        status: StatusCode,
        path: String,
        /// Parsed body, when the server sent JSON.
        body: Option<serde_json::Value>,
        raw: String,
    },
    #[error("Request failed: {0}")]
    Reqwest(reqwest::Error),
    #[error("{0}")]
    Middleware(anyhow::Error),
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Reqwest(err)
    }
}

impl From<reqwest_middleware::Error> for ClientError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => ClientError::Reqwest(err),
            reqwest_middleware::Error::Middleware(err) => ClientError::Middleware(err),
        }
    }
}

impl ClientError {
    /// HTTP status of the failed exchange, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Reqwest(err) => err.status(),
            _ => None,
        }
    }

    /// Best human-readable message for this error.
    ///
    /// Prefers the server's `detail` field, then its `message` field, then the
    /// error's own text, then [`FALLBACK_ERROR_MESSAGE`].
    pub fn message(&self) -> String {
        if let ClientError::Status {
            body: Some(body), ..
        } = self
        {
            if let Some(text) = ErrorResponse::from_value(body).and_then(|e| e.text()) {
                return text;
            }
        }

        let own = self.to_string();
        if own.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            own
        }
    }

    /// True when a request went out but no response ever came back.
    pub fn is_network_error(&self) -> bool {
        match self {
            ClientError::Reqwest(err) => {
                err.status().is_none() && (err.is_connect() || err.is_timeout() || err.is_request())
            }
            _ => false,
        }
    }

    /// True when the request was aborted by the client-side timeout.
    ///
    /// Transport errors are classified by reqwest alone; their text embeds the
    /// request URL, which may contain anything.
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Reqwest(err) => err.is_timeout(),
            ClientError::Status { .. } => false,
            other => other.to_string().contains("timeout"),
        }
    }
}
