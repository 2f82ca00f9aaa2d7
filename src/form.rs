//! Client side of the feedback form: the state a user edits before sending,
//! and the HTTP client that posts it to `/api/submit-idea`.

use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use crate::submission::limits::{Limits, ValidationError};
use crate::submission::{Attachment, SubmissionForm, SubmitResponse};

/// How long a file validation message stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

pub const NETWORK_ERROR: &str = "Network error";
pub const SUBMISSION_FAILED: &str = "Submission failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Error(String),
}

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct FeedbackForm {
    pub nickname: String,
    pub contact: String,
    pub idea: String,
    files: Vec<Attachment>,
    limits: Limits,
    status: FormStatus,
    notice: Option<Notice>,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self::with_limits(Limits::default())
    }
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            nickname: String::new(),
            contact: String::new(),
            idea: String::new(),
            files: Vec::new(),
            limits,
            status: FormStatus::Idle,
            notice: None,
        }
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// Append a batch of selected files. On any violation the batch is
    /// dropped as a whole, the current list is left untouched and a notice
    /// is shown for [`NOTICE_DURATION`].
    pub fn add_files(&mut self, selected: Vec<Attachment>) -> Result<(), ValidationError> {
        self.add_files_at(selected, Instant::now())
    }

    pub fn add_files_at(&mut self, selected: Vec<Attachment>, now: Instant) -> Result<(), ValidationError> {
        if let Err(err) = self.limits.check_files(self.files.len(), &selected) {
            self.notice = Some(Notice {
                message: err.to_string(),
                shown_at: now,
            });
            return Err(err);
        }

        self.files.extend(selected);
        Ok(())
    }

    /// Remove the file at `index`. Out-of-range indices are a no-op.
    pub fn remove_file(&mut self, index: usize) -> Option<Attachment> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// The validation message currently on display, if it has not expired.
    pub fn notice(&self) -> Option<&str> {
        self.notice_at(Instant::now())
    }

    pub fn notice_at(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.shown_at) < NOTICE_DURATION)
            .map(|n| n.message.as_str())
    }

    /// Send the form. On success every field and the file list are cleared
    /// and the server's confirmation is returned; otherwise the user-facing
    /// error message is returned and also kept in [`FeedbackForm::status`].
    pub async fn submit(&mut self, client: &SubmitClient) -> Result<String, String> {
        let snapshot = SubmissionForm {
            nickname: self.nickname.clone(),
            contact: self.contact.clone(),
            idea: self.idea.clone(),
            files: self.files.clone(),
        };

        if let Err(err) = self.limits.check_fields(&snapshot) {
            return Err(self.fail(err.to_string()));
        }

        self.status = FormStatus::Submitting;
        self.notice = None;

        match client.send(&snapshot).await {
            Ok((status, body)) if status.is_success() && body.success => {
                self.nickname.clear();
                self.contact.clear();
                self.idea.clear();
                self.files.clear();
                self.status = FormStatus::Success;
                Ok(body.message.unwrap_or_default())
            }
            Ok((status, body)) => {
                tracing::debug!(%status, "Submission rejected");
                let message = body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SUBMISSION_FAILED.to_string());
                Err(self.fail(message))
            }
            Err(e) => {
                tracing::debug!("Submission request failed: {e}");
                Err(self.fail(NETWORK_ERROR.to_string()))
            }
        }
    }

    fn fail(&mut self, message: String) -> String {
        self.status = FormStatus::Error(message.clone());
        message
    }
}

/// Posts a [`SubmissionForm`] to the submit endpoint as multipart form data.
#[derive(Debug, Clone)]
pub struct SubmitClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SubmitClient {
    /// `base_url` is the site root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/api/submit-idea", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST. A body that is not the JSON envelope counts as a transport error.
    pub async fn send(&self, form: &SubmissionForm) -> Result<(StatusCode, SubmitResponse), reqwest::Error> {
        let mut body = Form::new()
            .text("nickname", form.nickname.clone())
            .text("contact", form.contact.clone())
            .text("idea", form.idea.clone());

        for file in &form.files {
            let mut part = Part::stream_with_length(file.bytes.clone(), file.size() as u64)
                .file_name(file.name.clone());
            if let Some(ct) = file.content_type.as_deref() {
                part = part.mime_str(ct)?;
            }
            body = body.part("files", part);
        }

        let resp = self.http.post(&self.endpoint).multipart(body).send().await?;
        let status = resp.status();
        let parsed: SubmitResponse = resp.json().await?;
        Ok((status, parsed))
    }
}
