use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::SubmitError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline, SubmitResponse};

pub const CONFIRMATION: &str = "Feedback received";

pub async fn submit_idea(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, SubmitError> {
    // Body rejections go through the JSON envelope like every other failure.
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SubmitError::Malformed(format!(
                "request body exceeds {} bytes",
                state.config.max_body_size
            ))
        } else {
            SubmitError::Malformed(rejection.body_text())
        }
    })?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    if !content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        return Err(SubmitError::Malformed(
            "expected multipart/form-data".to_string(),
        ));
    }

    let form = parser::parse_multipart(&headers, body)
        .await
        .map_err(SubmitError::Malformed)?;

    let limits = state.config.enforce_limits.then_some(&state.config.limits);
    let result = pipeline::run(state.store.as_ref(), limits, form).await?;
    tracing::info!(
        submission_id = %result.submission_id,
        record_id = %result.record_id,
        attachments = result.attachments,
        "Submission stored"
    );

    Ok((
        StatusCode::OK,
        Json(SubmitResponse {
            success: true,
            message: Some(CONFIRMATION.to_string()),
        }),
    )
        .into_response())
}
