use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::submission::limits::ValidationError;

/// The backend call a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Token,
    Upload,
    Record,
}

impl Stage {
    fn failure_prefix(self) -> &'static str {
        match self {
            Stage::Token => "Failed to obtain access token",
            Stage::Upload => "Failed to upload file",
            Stage::Record => "Failed to create record",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Token => write!(f, "token"),
            Stage::Upload => write!(f, "upload"),
            Stage::Record => write!(f, "record"),
        }
    }
}

#[derive(Debug)]
pub enum SubmitError {
    Invalid(ValidationError),
    Malformed(String),
    Timeout(Stage),
    Connect { proxy: Option<String>, detail: String },
    Http { stage: Stage, status: u16 },
    Backend { stage: Stage, message: String },
    Transport { stage: Stage, detail: String },
    Upload { file_name: String, source: Box<SubmitError> },
    Internal(String),
}

impl SubmitError {
    /// Classify a reqwest failure raised while talking to the backend.
    pub fn from_reqwest(stage: Stage, err: reqwest::Error, proxy: Option<&str>) -> Self {
        if err.is_timeout() {
            SubmitError::Timeout(stage)
        } else if err.is_connect() {
            SubmitError::Connect {
                proxy: proxy.map(str::to_string),
                detail: err.to_string(),
            }
        } else {
            SubmitError::Transport {
                stage,
                detail: err.to_string(),
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            SubmitError::Timeout(_) => true,
            SubmitError::Upload { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Invalid(err) => write!(f, "{err}"),
            SubmitError::Malformed(msg) => write!(f, "Invalid form data: {msg}"),
            SubmitError::Timeout(Stage::Token) => write!(
                f,
                "Connection to the Bitable server timed out, check your network or proxy settings"
            ),
            SubmitError::Timeout(Stage::Upload) => {
                write!(f, "File upload timed out, check your network")
            }
            SubmitError::Timeout(Stage::Record) => {
                write!(f, "Creating the record timed out, check your network")
            }
            SubmitError::Connect {
                proxy: Some(proxy),
                ..
            } => write!(f, "Connection refused, check the proxy settings (proxy: {proxy})"),
            SubmitError::Connect { proxy: None, detail } => {
                write!(f, "Could not connect to the Bitable server: {detail}")
            }
            SubmitError::Http { stage, status } => {
                write!(f, "{}: HTTP error, status {status}", stage.failure_prefix())
            }
            SubmitError::Backend { stage, message } => {
                write!(f, "{}: {message}", stage.failure_prefix())
            }
            SubmitError::Transport { stage, detail } => {
                write!(f, "{}: {detail}", stage.failure_prefix())
            }
            SubmitError::Upload { file_name, source } => {
                write!(f, "File upload failed: {file_name} - {source}")
            }
            SubmitError::Internal(msg) if msg.is_empty() => write!(f, "Internal Server Error"),
            SubmitError::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Invalid(err)
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = ?self, "Submission failed: {message}");

        // Every failure category shares one status; the message carries the detail.
        let body = json!({ "success": false, "message": message });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
