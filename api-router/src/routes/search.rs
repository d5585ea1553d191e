use std::{fmt, str::FromStr, sync::Arc};

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use common::error::AppError;
use corpus_index::{SearchOutcome, SearchResult};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

/// Serde deserialization decorator to map empty Strings to None,
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    results: Vec<SearchResult>,
    /// `-1` when nothing matched.
    first_match_offset: i64,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let first_match_offset = outcome
            .first_match_offset
            .and_then(|offset| i64::try_from(offset).ok())
            .unwrap_or(-1);
        Self {
            results: outcome.results,
            first_match_offset,
        }
    }
}

pub async fn search(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params
        .q
        .ok_or_else(|| ApiError::ValidationError("missing search query in URL params".into()))?;

    let searcher = Arc::clone(&state.searcher);
    let outcome = tokio::task::spawn_blocking(move || searcher.search(&query))
        .await
        .map_err(AppError::from)??;

    info!(
        results = outcome.results.len(),
        first_match_offset = ?outcome.first_match_offset,
        "Search served"
    );

    Ok(Json(SearchResponse::from(outcome)))
}
