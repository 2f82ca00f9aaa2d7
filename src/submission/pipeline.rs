use tracing::Instrument;
use uuid::Uuid;

use crate::bitable::{FileToken, RecordStore};
use crate::error::SubmitError;
use crate::submission::limits::Limits;

use super::fields;
use super::SubmissionForm;

pub struct PipelineResult {
    pub submission_id: Uuid,
    pub record_id: String,
    pub attachments: usize,
}

/// Forward one submission to the record store.
///
/// Strictly sequential: limits (when `limits` is given), then token, then
/// each non-empty file in order, then the record. The first failure ends the
/// run. Files uploaded before a later failure stay orphaned in the backend.
pub async fn run(
    store: &dyn RecordStore,
    limits: Option<&Limits>,
    form: SubmissionForm,
) -> Result<PipelineResult, SubmitError> {
    let submission_id = Uuid::now_v7();
    let span = tracing::info_span!("submission", id = %submission_id);

    async move {
        tracing::info!(
            nickname_len = form.nickname.chars().count(),
            contact_len = form.contact.chars().count(),
            idea_len = form.idea.chars().count(),
            file_count = form.files.len(),
            files = ?form.files.iter().map(|f| (f.name.as_str(), f.size())).collect::<Vec<_>>(),
            "Processing submission"
        );

        if let Some(limits) = limits {
            limits.check(&form)?;
        }

        let token = store.tenant_access_token().await?;
        tracing::info!(expires_in = ?token.expires_in, "Got tenant access token");

        let mut file_tokens: Vec<FileToken> = Vec::with_capacity(form.files.len());
        for file in form.files.iter().filter(|f| f.size() > 0) {
            tracing::info!("Uploading file {} ({} bytes)", file.name, file.size());

            let file_token = store
                .upload_media(&token, file)
                .await
                .map_err(|e| SubmitError::Upload {
                    file_name: file.name.clone(),
                    source: Box::new(e),
                })?;

            tracing::info!("File uploaded: {}, token: {}", file.name, file_token.file_token);
            file_tokens.push(file_token);
        }

        let attachments = file_tokens.len();
        let record = fields::build_record_fields(&form, file_tokens);
        tracing::debug!(?record, "Creating record");

        let record_id = store.create_record(&token, &record).await?;
        tracing::info!(record_id = %record_id, attachments, "Record created");

        Ok(PipelineResult {
            submission_id,
            record_id,
            attachments,
        })
    }
    .instrument(span)
    .await
}
