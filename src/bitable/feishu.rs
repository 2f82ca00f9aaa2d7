use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::{FeishuConfig, Timeouts};
use crate::error::{Stage, SubmitError};
use crate::submission::Attachment;

use super::wire::{
    message_or_unknown, ApiResponse, CreateRecordData, CreateRecordRequest, TokenRequest,
    TokenResponse, UploadData,
};
use super::{AccessToken, FileToken, RecordFields, RecordStore};

const UPLOAD_PARENT_TYPE: &str = "bitable_file";

/// [`RecordStore`] backed by the Feishu open API.
pub struct FeishuBitable {
    client: reqwest::Client,
    config: FeishuConfig,
    proxy_url: Option<String>,
    timeouts: Timeouts,
}

impl FeishuBitable {
    pub fn new(config: FeishuConfig, proxy_url: Option<String>, timeouts: Timeouts) -> Result<Self, String> {
        let builder = reqwest::Client::builder();
        let builder = match proxy_url.as_deref() {
            Some(url) => builder.proxy(
                reqwest::Proxy::all(url).map_err(|e| format!("Invalid proxy URL '{url}': {e}"))?,
            ),
            // Keep reqwest from picking up proxies from the environment on its own.
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            config,
            proxy_url,
            timeouts,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn fail(&self, stage: Stage, err: reqwest::Error) -> SubmitError {
        SubmitError::from_reqwest(stage, err, self.proxy_url.as_deref())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        stage: Stage,
        resp: reqwest::Response,
    ) -> Result<T, SubmitError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(SubmitError::Http {
                stage,
                status: status.as_u16(),
            });
        }
        resp.json().await.map_err(|e| self.fail(stage, e))
    }
}

#[async_trait]
impl RecordStore for FeishuBitable {
    async fn tenant_access_token(&self) -> Result<AccessToken, SubmitError> {
        tracing::debug!("Requesting tenant access token");

        let resp = self
            .client
            .post(self.url("/auth/v3/tenant_access_token/internal"))
            .timeout(self.timeouts.token)
            .json(&TokenRequest {
                app_id: &self.config.app_id,
                app_secret: &self.config.app_secret,
            })
            .send()
            .await
            .map_err(|e| self.fail(Stage::Token, e))?;

        let body: TokenResponse = self.read_json(Stage::Token, resp).await?;

        match body.tenant_access_token {
            Some(value) if body.code == 0 && !value.is_empty() => Ok(AccessToken {
                value,
                expires_in: body.expire,
            }),
            _ => Err(SubmitError::Backend {
                stage: Stage::Token,
                message: message_or_unknown(body.msg),
            }),
        }
    }

    async fn upload_media(&self, token: &AccessToken, file: &Attachment) -> Result<FileToken, SubmitError> {
        let mut part = Part::stream_with_length(file.bytes.clone(), file.size() as u64)
            .file_name(file.name.clone());
        if let Some(ct) = file.content_type.as_deref() {
            part = part.mime_str(ct).map_err(|e| self.fail(Stage::Upload, e))?;
        }

        let form = Form::new()
            .text("file_name", file.name.clone())
            .text("parent_type", UPLOAD_PARENT_TYPE)
            .text("parent_node", self.config.app_token.clone())
            .text("size", file.size().to_string())
            .part("file", part);

        let resp = self
            .client
            .post(self.url("/drive/v1/medias/upload_all"))
            .timeout(self.timeouts.upload)
            .bearer_auth(&token.value)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.fail(Stage::Upload, e))?;

        let body: ApiResponse = self.read_json(Stage::Upload, resp).await?;
        let data: UploadData = body.into_data(Stage::Upload)?;

        Ok(FileToken {
            file_token: data.file_token,
        })
    }

    async fn create_record(&self, token: &AccessToken, fields: &RecordFields) -> Result<String, SubmitError> {
        let path = format!(
            "/bitable/v1/apps/{}/tables/{}/records",
            self.config.app_token, self.config.table_id
        );

        let resp = self
            .client
            .post(self.url(&path))
            .timeout(self.timeouts.record)
            .bearer_auth(&token.value)
            .json(&CreateRecordRequest { fields })
            .send()
            .await
            .map_err(|e| self.fail(Stage::Record, e))?;

        let body: ApiResponse = self.read_json(Stage::Record, resp).await?;
        let data: CreateRecordData = body.into_data(Stage::Record)?;

        Ok(data.record.record_id)
    }
}
