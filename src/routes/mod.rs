pub mod submit;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn api_routes(max_body_size: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/submit-idea", post(submit::submit_idea))
        .layer(DefaultBodyLimit::max(max_body_size))
}
