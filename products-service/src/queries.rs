//! Fixed query shapes for the catalogue routes.

use mongodb::bson::{doc, Document};

pub const DEALS_COLLECTION: &str = "deals";
pub const PRODUCTS_COLLECTION: &str = "products";

/// Upper bound on documents returned by `GET /deals`.
pub const DEALS_LIMIT: usize = 50;

/// Every deal; the limit is applied separately.
pub fn deals_filter() -> Document {
    doc! {}
}

/// Matches a product whose `variants` array holds an entry with this SKU.
/// The value is used verbatim.
pub fn sku_filter(sku: &str) -> Document {
    doc! { "variants.sku": sku }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deals_filter_is_empty() {
        assert!(deals_filter().is_empty());
    }

    #[test]
    fn sku_filter_targets_nested_variant_field() {
        let filter = sku_filter("SKU-001");
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.get_str("variants.sku").unwrap(), "SKU-001");
    }

    #[test]
    fn sku_filter_does_not_interpret_the_value() {
        let filter = sku_filter("{\"$ne\": null}");
        assert_eq!(filter.get_str("variants.sku").unwrap(), "{\"$ne\": null}");
    }
}
