pub mod fields;
pub mod limits;
pub mod parser;
pub mod pipeline;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One feedback submission as it travels from the form to the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionForm {
    pub nickname: String,
    pub contact: String,
    pub idea: String,
    pub files: Vec<Attachment>,
}

/// A file picked in the form, held in memory for the duration of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// JSON envelope returned by `POST /api/submit-idea`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
