use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use portal_search::{SearchOptions, SearchResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::{app_state::AppState, auth::Caller, routes::ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    q: String,
    limit: Option<usize>,
    min_query_length: Option<usize>,
    rank: Option<bool>,
}

#[instrument(name = "GET /search", skip(app_state, caller), fields(user_id = %caller.user_id))]
async fn search(
    State(app_state): State<AppState>,
    caller: Caller,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(query) = query?;
    let settings = app_state.search_settings();
    let limit = query
        .limit
        .unwrap_or(settings.result_limit)
        .clamp(1, settings.max_limit.max(1));

    let options = SearchOptions {
        user_id: Some(caller.user_id),
        user_role: caller.user_role,
        ..SearchOptions::default()
    }
    .with_limit(limit)
    .with_min_query_length(query.min_query_length.unwrap_or(settings.min_query_length))
    .with_ranking(query.rank.unwrap_or(settings.rank_results));

    let response = app_state.searcher().search(&query.q, &options).await?;

    Ok(Json(response))
}
