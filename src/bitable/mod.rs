pub mod feishu;
pub mod wire;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SubmitError;
use crate::submission::Attachment;

pub use feishu::FeishuBitable;

/// Short-lived bearer credential. Fetched per submission, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    /// Lifetime in seconds as declared by the server.
    pub expires_in: Option<u64>,
}

/// Opaque backend reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileToken {
    pub file_token: String,
}

/// Column values of one table record. Keys must match the Bitable's column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFields {
    #[serde(rename = "Nickname")]
    pub nickname: String,
    #[serde(rename = "Contact")]
    pub contact: String,
    #[serde(rename = "Idea")]
    pub idea: String,
    #[serde(rename = "Attachment", skip_serializing_if = "Vec::is_empty")]
    pub attachment: Vec<FileToken>,
}

/// The three backend operations one submission is made of.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn tenant_access_token(&self) -> Result<AccessToken, SubmitError>;

    async fn upload_media(&self, token: &AccessToken, file: &Attachment) -> Result<FileToken, SubmitError>;

    /// Returns the id of the created record.
    async fn create_record(&self, token: &AccessToken, fields: &RecordFields) -> Result<String, SubmitError>;
}
