use crate::bitable::{FileToken, RecordFields};

use super::SubmissionForm;

/// Build the column values for one record. The attachment column is left
/// out entirely when nothing was uploaded.
pub fn build_record_fields(form: &SubmissionForm, file_tokens: Vec<FileToken>) -> RecordFields {
    RecordFields {
        nickname: form.nickname.clone(),
        contact: form.contact.clone(),
        idea: form.idea.clone(),
        attachment: file_tokens,
    }
}
