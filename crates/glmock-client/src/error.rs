use crate::CallInfo;
use glmock_model::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally; no request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned {}: {}", .info.status, api_message(.info, .error))]
    Api {
        info: CallInfo,
        error: Option<ErrorResponse>,
    },
    #[error("failed to decode response body ({}): {source}", .info.status)]
    Decode {
        info: CallInfo,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Status and raw body of the call, when a response was received.
    pub fn call_info(&self) -> Option<&CallInfo> {
        match self {
            ClientError::Api { info, .. } | ClientError::Decode { info, .. } => Some(info),
            ClientError::InvalidArgument(_) | ClientError::Transport(_) => None,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        self.call_info().map(|info| info.status)
    }

    /// Decoded error envelope, when the server sent one.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            ClientError::Api { error, .. } => error.as_ref(),
            _ => None,
        }
    }
}

fn api_message<'a>(info: &'a CallInfo, error: &'a Option<ErrorResponse>) -> &'a str {
    error
        .as_ref()
        .map_or(info.body.as_str(), |error| error.message.as_str())
}

pub(crate) fn require_name(value: &str, what: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(ClientError::InvalidArgument(format!("{what} is empty")));
    }
    Ok(())
}
