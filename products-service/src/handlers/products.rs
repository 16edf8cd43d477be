use crate::error::{ApiError, Resource};
use crate::handlers::document_json;
use crate::queries::{sku_filter, PRODUCTS_COLLECTION};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

/// `GET /products/sku/:id`: the product owning variant `id`, or `null`.
///
/// A miss is not an error; callers tell it apart from a failed query by
/// status (200 vs 400).
pub async fn get_product_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<Option<Value>>, ApiError> {
    let store = state.store().await?;

    let product = store
        .find_one(PRODUCTS_COLLECTION, sku_filter(&sku))
        .await
        .map_err(|e| {
            tracing::error!(
                collection = PRODUCTS_COLLECTION,
                sku = %sku,
                error = %e,
                "Failed to fetch product by SKU"
            );
            metrics::counter!("catalog_query_failures_total", "collection" => PRODUCTS_COLLECTION)
                .increment(1);
            ApiError::FetchFailed(Resource::Products)
        })?;

    if product.is_none() {
        tracing::debug!(sku = %sku, "No product has this SKU");
    }

    Ok(Json(product.map(document_json)))
}
