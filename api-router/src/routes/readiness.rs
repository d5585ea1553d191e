use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness probe: the searcher only exists once every index is built, so
/// reaching this handler means the service can answer queries.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    let searcher = &state.searcher;
    let config = &state.config;
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "corpus": {
                "bytes": searcher.corpus().len(),
                "titles": searcher.title_index().len(),
                "paragraphs": searcher.paragraph_index().len(),
                "sections": searcher.title_index().titles(),
            },
            "search": {
                "maxResults": config.max_search_results,
                "snippetMode": config.snippet_mode,
                "snippetRadius": config.snippet_radius,
                "paragraphScan": config.paragraph_scan,
            }
        })),
    )
}
