//! Shape of the fallback document.
//!
//! ```text
//! {
//!   "<property-slug>": [ { "src": ..., "pos": ..., "locked": ... }, ... ],
//!   ...
//!   "_trash": [ { "id": ..., "property_slug": ..., "src": ..., "deleted_at": ... }, ... ]
//! }
//! ```
//!
//! Keys starting with `_` are reserved. Unknown reserved keys are kept
//! as-is when the document is rewritten.

use std::collections::BTreeMap;

use lodge_core::photo_order::{PhotoOrderEntry, RESERVED_KEY_PREFIX};
use lodge_core::trash::TrashItem;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the trash list.
pub const TRASH_KEY: &str = "_trash";

/// The whole fallback document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackDocument(Map<String, Value>);

impl FallbackDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for every property key, each decoded on its own so one bad
    /// key does not hide the others.
    pub fn orders(&self) -> BTreeMap<String, Result<Vec<PhotoOrderEntry>, serde_json::Error>> {
        self.0
            .iter()
            .filter(|(key, _)| !key.starts_with(RESERVED_KEY_PREFIX))
            .map(|(key, value)| (key.clone(), Vec::<PhotoOrderEntry>::deserialize(value)))
            .collect()
    }

    /// Entries for one property, `None` if the key is absent.
    pub fn order(&self, slug: &str) -> Result<Option<Vec<PhotoOrderEntry>>, serde_json::Error> {
        self.0.get(slug).map(Vec::<PhotoOrderEntry>::deserialize).transpose()
    }

    pub fn set_order(
        &mut self,
        slug: &str,
        entries: &[PhotoOrderEntry],
    ) -> Result<(), serde_json::Error> {
        self.0.insert(slug.to_string(), serde_json::to_value(entries)?);
        Ok(())
    }

    /// The trash list; an absent or `null` key is an empty list.
    pub fn trash(&self) -> Result<Vec<TrashItem>, serde_json::Error> {
        match self.0.get(TRASH_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Vec::<TrashItem>::deserialize(value),
        }
    }

    pub fn set_trash(&mut self, items: &[TrashItem]) -> Result<(), serde_json::Error> {
        self.0.insert(TRASH_KEY.to_string(), serde_json::to_value(items)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_orders_and_trash_side_by_side() {
        let doc: FallbackDocument = serde_json::from_value(json!({
            "lakeview": [{ "src": "a.jpg", "pos": 1, "locked": false }],
            "hilltop": [{ "src": "h.jpg", "pos": 2 }],
            "_trash": [{
                "id": 1760000000000_i64,
                "property_slug": "lakeview",
                "src": "old.jpg",
                "deleted_at": "2026-03-01T12:00:00.000Z"
            }]
        }))
        .unwrap();

        let orders = doc.orders();
        assert_eq!(orders.len(), 2, "reserved keys are not orders");
        let hilltop = orders["hilltop"].as_ref().unwrap();
        assert!(!hilltop[0].locked, "locked defaults to false");

        let trash = doc.trash().unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(
            trash[0].deleted_at,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let doc = FallbackDocument::new();
        assert!(doc.order("lakeview").unwrap().is_none());
        assert!(doc.trash().unwrap().is_empty());
        assert!(doc.orders().is_empty());
    }

    #[test]
    fn rewrite_preserves_unknown_reserved_keys() {
        let mut doc: FallbackDocument =
            serde_json::from_value(json!({ "_meta": { "owner": "ops" } })).unwrap();
        doc.set_order(
            "lakeview",
            &[PhotoOrderEntry {
                src: "a.jpg".into(),
                pos: 1,
                locked: true,
            }],
        )
        .unwrap();
        doc.set_trash(&[]).unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_meta"]["owner"], "ops");
        assert_eq!(value["lakeview"][0]["locked"], true);
        assert_eq!(value["_trash"], json!([]));
    }

    #[test]
    fn malformed_order_is_an_error() {
        let doc: FallbackDocument =
            serde_json::from_value(json!({ "lakeview": "not a list" })).unwrap();
        assert!(doc.order("lakeview").is_err());
        assert!(doc.orders()["lakeview"].is_err());
    }

    #[test]
    fn one_bad_key_leaves_the_others_readable() {
        let doc: FallbackDocument = serde_json::from_value(json!({
            "lakeview": [{ "src": "a.jpg", "pos": 1 }],
            "broken": [{ "src": "b.jpg" }],
            "empty": null,
        }))
        .unwrap();

        let orders = doc.orders();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders["lakeview"].as_ref().unwrap().len(), 1);
        assert!(orders["broken"].is_err(), "pos is required");
        assert!(orders["empty"].is_err());
    }
}
