use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::state::SharedState;
use crate::submission::limits::ACCEPTED_EXTENSIONS;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    max_files: usize,
    max_file_mb: usize,
    max_nickname_chars: usize,
    max_contact_chars: usize,
    max_idea_chars: usize,
    accept: String,
}

pub fn view_routes() -> Router<SharedState> {
    Router::new().route("/", get(index))
}

pub async fn index(State(state): State<SharedState>) -> Response {
    let limits = &state.config.limits;
    let tmpl = IndexTemplate {
        max_files: limits.max_files,
        max_file_mb: limits.max_file_bytes / (1024 * 1024),
        max_nickname_chars: limits.max_nickname_chars,
        max_contact_chars: limits.max_contact_chars,
        max_idea_chars: limits.max_idea_chars,
        accept: ACCEPTED_EXTENSIONS.join(","),
    };

    match tmpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
