//! Tag listing and refresh handlers.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tagrank_core::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PageRequest, SortKey, TagRecord};

/// Query string for `GET /tags`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<SortKey>,
}

impl TagsQuery {
    /// Apply defaults and validate against the configured page size limit.
    pub fn into_page_request(
        self,
        max_page_size: Option<i64>,
    ) -> tagrank_core::Result<PageRequest> {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.sort_by.unwrap_or_default(),
            max_page_size,
        )
    }
}

/// GET /tags - One page of the ranked tag set.
pub async fn list_tags(
    State(state): State<AppState>,
    query: Result<Query<TagsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TagRecord>>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = query.into_page_request(state.config.server.max_page_size)?;

    let tags = state.store.query(&request).await?;
    metrics::QUERIES_SERVED.inc();

    tracing::debug!(
        page = request.page(),
        page_size = request.page_size(),
        sort_by = %request.sort_by(),
        returned = tags.len(),
        "Served tag page"
    );

    Ok(Json(tags))
}

/// POST /tags/refresh - Replace the stored batch with a fresh fetch.
///
/// Responds 200 with an empty body. On failure the stored batch is left as it was.
pub async fn refresh_tags(State(state): State<AppState>) -> ApiResult<StatusCode> {
    let _guard = state.refresh_lock.lock().await;

    let timer = metrics::REFRESH_DURATION.start_timer();
    let result = refresh(&state).await;
    timer.observe_duration();

    match result {
        Ok(stored) => {
            metrics::REFRESHES_SUCCEEDED.inc();
            metrics::TAGS_STORED.set(i64::try_from(stored).unwrap_or(i64::MAX));
            tracing::info!(stored, "Tag refresh completed");
            Ok(StatusCode::OK)
        }
        Err(err) => {
            metrics::record_refresh_failure(refresh_error_type(&err));
            Err(err)
        }
    }
}

/// Fetch a batch and store it, returning the number of stored tags.
///
/// Callers must hold `state.refresh_lock`.
async fn refresh(state: &AppState) -> ApiResult<usize> {
    // A failed fetch returns before the store is touched.
    let tags = state.source.fetch_tags().await?;
    state.store.replace_all(&tags).await?;
    Ok(tags.len())
}

fn refresh_error_type(err: &ApiError) -> &'static str {
    match err {
        ApiError::Source(source) => source.kind(),
        ApiError::Store(_) => "store",
        other => other.code(),
    }
}
