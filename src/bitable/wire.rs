//! Request and response bodies of the Feishu open API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Stage, SubmitError};

use super::RecordFields;

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub app_id: &'a str,
    pub app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub tenant_access_token: Option<String>,
    #[serde(default)]
    pub expire: Option<u64>,
}

/// Envelope shared by the data-carrying endpoints. Error replies carry an
/// empty or partial `data`, so it is decoded only once `code` is zero.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn into_data<T: DeserializeOwned>(self, stage: Stage) -> Result<T, SubmitError> {
        if self.code != 0 {
            tracing::error!(code = self.code, msg = ?self.msg, "Bitable returned an error code ({stage})");
            return Err(SubmitError::Backend {
                stage,
                message: message_or_unknown(self.msg),
            });
        }

        let data = self.data.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(data).map_err(|e| SubmitError::Transport {
            stage,
            detail: format!("Unexpected response body: {e}"),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadData {
    pub file_token: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRecordRequest<'a> {
    pub fields: &'a RecordFields,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordData {
    pub record: RecordData,
}

#[derive(Debug, Deserialize)]
pub struct RecordData {
    pub record_id: String,
}

pub(crate) fn message_or_unknown(msg: Option<String>) -> String {
    msg.filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}
