use crate::error::{ApiError, Resource};
use crate::handlers::document_json;
use crate::queries::{deals_filter, DEALS_COLLECTION, DEALS_LIMIT};
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

/// `GET /deals`: up to [`DEALS_LIMIT`] deals, unfiltered.
pub async fn list_deals(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.store().await?;

    let deals = store
        .find_many(DEALS_COLLECTION, deals_filter(), DEALS_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!(
                collection = DEALS_COLLECTION,
                error = %e,
                "Failed to fetch deals"
            );
            metrics::counter!("catalog_query_failures_total", "collection" => DEALS_COLLECTION)
                .increment(1);
            ApiError::FetchFailed(Resource::Deals)
        })?;

    tracing::debug!(count = deals.len(), "Fetched deals");

    Ok(Json(
        deals
            .into_iter()
            .take(DEALS_LIMIT)
            .map(document_json)
            .collect(),
    ))
}
