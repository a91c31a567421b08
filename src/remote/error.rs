use reqwest::StatusCode;

use crate::model::HttpResponseBody;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{label}: request failed: {source}")]
    Transport {
        label: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{label}: server responded {status}{}", message_suffix(.body))]
    Status {
        label: String,
        status: StatusCode,
        body: Option<HttpResponseBody>,
    },

    #[error("{label}: unexpected response body: {source}")]
    Decode {
        label: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{label}: no token returned in the {header} header")]
    MissingToken { label: String, header: &'static str },

    #[error(transparent)]
    Local(#[from] anyhow::Error),
}

fn message_suffix(body: &Option<HttpResponseBody>) -> String {
    match body.as_ref().and_then(HttpResponseBody::message) {
        Some(msg) => format!(" ({})", msg),
        None => String::new(),
    }
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } | ApiError::Decode { source, .. } => {
                source.status()
            }
            _ => None,
        }
    }

    /// Message carried in the server's error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.as_ref().and_then(HttpResponseBody::message),
            _ => None,
        }
    }

    /// Bad credentials, or a token the server no longer accepts.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}
