pub mod deals;
pub mod health;
pub mod metrics;
pub mod products;

pub use deals::list_deals;
pub use health::{health_check, readiness_check};
pub use self::metrics::metrics_endpoint;
pub use products::get_product_by_sku;

use chrono::SecondsFormat;
use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// JSON body for a stored document.
///
/// ObjectIds become their hex string and dates an ISO-8601 timestamp with
/// millisecond precision; every other value uses relaxed Extended JSON.
pub(crate) fn document_json(document: Document) -> Value {
    bson_json(Bson::Document(document))
}

fn bson_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(at) => Value::String(
            at.to_chrono()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
