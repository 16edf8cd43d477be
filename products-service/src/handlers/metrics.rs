use crate::services::get_metrics;
use axum::{http::header, response::IntoResponse};

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
