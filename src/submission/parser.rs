use axum::http::HeaderMap;

use super::{Attachment, SubmissionForm};

/// Name given to a file part sent without a filename.
pub const FALLBACK_FILE_NAME: &str = "file";

/// Parse the `multipart/form-data` body of a submission using multer.
///
/// Text parts `nickname`, `contact` and `idea` fill the matching fields; every
/// `files` part becomes an [`Attachment`] in the order it was sent. Unknown
/// parts are ignored. An empty file input (no file name, no bytes) is dropped;
/// a nameless part with content is named [`FALLBACK_FILE_NAME`].
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<SubmissionForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = SubmissionForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "nickname" | "contact" | "idea" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Field read error: {e}"))?;
                match name.as_str() {
                    "nickname" => form.nickname = value,
                    "contact" => form.contact = value,
                    _ => form.idea = value,
                }
            }
            "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("File read error: {e}"))?;

                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                form.files.push(Attachment {
                    name: if file_name.is_empty() {
                        FALLBACK_FILE_NAME.to_string()
                    } else {
                        file_name
                    },
                    content_type,
                    bytes,
                });
            }
            _ => {
                // Drain so the stream advances past the part.
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}
