//! In-memory venue store adapter.
//!
//! Holds an ordered schema plus a row set, loadable from a JSON dataset
//! file or from a built-in demo dataset. Backs tests and the demo binary.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::domain::belief::ConstraintMap;
use crate::domain::venue::{value_text, VenueRecord};
use crate::ports::{RouteEstimate, VenueStore};

/// Errors raised while constructing a store from a dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read dataset file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse dataset file {}: {source}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

/// One precomputed route for distance/duration lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub start: String,
    pub venue: String,
    pub manner: String,
    pub distance: String,
    pub duration: String,
}

/// Serializable dataset backing a `MemoryVenueStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueDataset {
    /// The identifier slot.
    pub primary_key: String,
    /// Canonical attribute order for full records.
    pub attribute_order: Vec<String>,
    /// Ordered slots the system may ask the user about.
    pub requestable_slots: Vec<String>,
    /// Schema values per slot; exactly two values mark a slot binary.
    #[serde(default)]
    pub possible_values: BTreeMap<String, Vec<String>>,
    /// Travel manners the routing table understands.
    #[serde(default)]
    pub supported_manners: Vec<String>,
    /// Precomputed routes keyed by (start, venue, manner).
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    /// Venue rows as attribute -> value maps.
    pub venues: Vec<BTreeMap<String, Value>>,
}

/// In-memory implementation of the `VenueStore` port.
#[derive(Debug)]
pub struct MemoryVenueStore {
    primary_key: String,
    requestable_slots: Vec<String>,
    possible_values: BTreeMap<String, Vec<String>>,
    supported_manners: Vec<String>,
    routes: Vec<RouteEntry>,
    rows: RwLock<Vec<VenueRecord>>,
}

impl MemoryVenueStore {
    /// Builds a store from a dataset, ordering every row by the declared
    /// attribute order. Attributes a venue lacks are kept as null so they
    /// surface as "not available" downstream.
    pub fn new(dataset: VenueDataset) -> Result<Self, StoreError> {
        if !dataset.attribute_order.contains(&dataset.primary_key) {
            return Err(StoreError::InvalidDataset(format!(
                "primary key '{}' is not in the attribute order",
                dataset.primary_key
            )));
        }
        for slot in &dataset.requestable_slots {
            if !dataset.attribute_order.contains(slot) {
                return Err(StoreError::InvalidDataset(format!(
                    "requestable slot '{}' is not in the attribute order",
                    slot
                )));
            }
        }

        Ok(Self::from_dataset(dataset))
    }

    fn from_dataset(dataset: VenueDataset) -> Self {
        let rows: Vec<VenueRecord> = dataset
            .venues
            .iter()
            .map(|venue| {
                VenueRecord::from_fields(
                    dataset
                        .attribute_order
                        .iter()
                        .map(|attr| {
                            (attr.clone(), venue.get(attr).cloned().unwrap_or(Value::Null))
                        })
                        .collect(),
                )
            })
            .collect();

        debug!(venues = rows.len(), "venue store loaded");
        Self {
            primary_key: dataset.primary_key,
            requestable_slots: dataset.requestable_slots,
            possible_values: dataset.possible_values,
            supported_manners: dataset.supported_manners,
            routes: dataset.routes,
            rows: RwLock::new(rows),
        }
    }

    /// Loads a store from a JSON dataset file.
    pub fn load_from_path(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset: VenueDataset =
            serde_json::from_str(&raw).map_err(|source| StoreError::ParseFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(dataset)
    }

    /// Builds a store over the built-in demo dataset.
    pub fn demo() -> Self {
        Self::from_dataset(DEMO_DATASET.clone())
    }

    /// Number of venues held.
    pub fn venue_count(&self) -> usize {
        self.read_rows().len()
    }

    /// Current rating of a venue, for inspection in tests and demos.
    pub fn rating_of(&self, id: &str) -> Option<f64> {
        self.read_rows()
            .iter()
            .find(|row| row.get_str(&self.primary_key) == Some(id))
            .and_then(|row| row.get("rating").and_then(Value::as_f64))
    }

    /// Current reviews of a venue, for inspection in tests and demos.
    pub fn reviews_of(&self, id: &str) -> Vec<String> {
        self.read_rows()
            .iter()
            .find(|row| row.get_str(&self.primary_key) == Some(id))
            .and_then(|row| row.get("reviews").and_then(Value::as_array).cloned())
            .map(|reviews| {
                reviews
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn read_rows(&self) -> RwLockReadGuard<'_, Vec<VenueRecord>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_rows(&self) -> RwLockWriteGuard<'_, Vec<VenueRecord>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VenueStore for MemoryVenueStore {
    fn find_venues(&self, constraints: &ConstraintMap) -> Vec<VenueRecord> {
        self.read_rows()
            .iter()
            .filter(|row| {
                constraints.iter().all(|(slot, values)| {
                    row.get(slot)
                        .map(value_text)
                        .map(|text| values.iter().any(|v| *v == text))
                        .unwrap_or(false)
                })
            })
            .cloned()
            .collect()
    }

    fn find_matching_details(&self, id: &str, slots: &[String]) -> Vec<VenueRecord> {
        self.read_rows()
            .iter()
            .filter(|row| row.get_str(&self.primary_key) == Some(id))
            .map(|row| {
                VenueRecord::from_fields(
                    slots
                        .iter()
                        .map(|slot| {
                            (slot.clone(), row.get(slot).cloned().unwrap_or(Value::Null))
                        })
                        .collect(),
                )
            })
            .collect()
    }

    fn system_requestable_slots(&self) -> Vec<String> {
        self.requestable_slots.clone()
    }

    fn possible_values(&self, slot: &str) -> Vec<String> {
        self.possible_values.get(slot).cloned().unwrap_or_default()
    }

    fn primary_key(&self) -> String {
        self.primary_key.clone()
    }

    fn enter_rating(&self, rating: f64, id: &str) {
        let primary_key = self.primary_key.clone();
        let mut rows = self.write_rows();
        if let Some(row) = rows.iter_mut().find(|row| row.get_str(&primary_key) == Some(id)) {
            row.set("rating", json!(rating));
            debug!(venue = id, rating, "rating recorded");
        }
    }

    fn enter_review(&self, review: &str, id: &str) {
        let primary_key = self.primary_key.clone();
        let mut rows = self.write_rows();
        if let Some(row) = rows.iter_mut().find(|row| row.get_str(&primary_key) == Some(id)) {
            let mut reviews = row
                .get("reviews")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            // A later identical write is a no-op.
            if !reviews.iter().any(|existing| existing.as_str() == Some(review)) {
                reviews.push(json!(review));
            }
            row.set("reviews", Value::Array(reviews));
            debug!(venue = id, "review recorded");
        }
    }

    fn distance_duration(&self, start: &str, id: &str, manner: &str) -> RouteEstimate {
        if !self.supported_manners.iter().any(|m| m == manner) {
            return RouteEstimate::BadManner;
        }
        self.routes
            .iter()
            .find(|route| route.start == start && route.venue == id && route.manner == manner)
            .map(|route| RouteEstimate::Route {
                distance: route.distance.clone(),
                duration: route.duration.clone(),
            })
            .unwrap_or(RouteEstimate::BadAddress)
    }

    fn opening_info(&self, day: &str, id: &str) -> String {
        let day = day.to_lowercase();
        self.read_rows()
            .iter()
            .find(|row| row.get_str(&self.primary_key) == Some(id))
            .and_then(|row| row.get("opening_hours").and_then(Value::as_object).cloned())
            .and_then(|hours| hours.get(&day).and_then(Value::as_str).map(str::to_string))
            .map(|hours| format!("open {}: {}", day, hours))
            .unwrap_or_else(|| format!("no opening information for {}", day))
    }

    fn manner_info(&self, kind: &str, id: &str) -> String {
        let offers = self
            .read_rows()
            .iter()
            .find(|row| row.get_str(&self.primary_key) == Some(id))
            .and_then(|row| row.get("manner").and_then(Value::as_array).cloned())
            .map(|manners| manners.iter().any(|m| m.as_str() == Some(kind)))
            .unwrap_or(false);
        if offers {
            format!("{} offers {}", id, kind)
        } else {
            format!("{} does not offer {}", id, kind)
        }
    }
}

fn venue(pairs: Vec<(&str, Value)>) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(attr, value)| (attr.to_string(), value))
        .collect()
}

/// Built-in demo dataset: a handful of venues in one city.
static DEMO_DATASET: Lazy<VenueDataset> = Lazy::new(|| VenueDataset {
    primary_key: "name".to_string(),
    attribute_order: [
        "name",
        "food_type",
        "area",
        "price_range",
        "parking_lot",
        "rating",
        "address",
        "phone",
        "opening_hours",
        "manner",
        "reviews",
        "description",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect(),
    requestable_slots: ["food_type", "area", "price_range", "parking_lot"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    possible_values: [
        ("food_type", vec!["italian", "greek", "german", "turkish"]),
        ("area", vec!["center", "north", "south"]),
        ("price_range", vec!["cheap", "moderate", "expensive"]),
        ("parking_lot", vec!["0", "1"]),
    ]
    .into_iter()
    .map(|(slot, values)| {
        (
            slot.to_string(),
            values.into_iter().map(str::to_string).collect(),
        )
    })
    .collect(),
    supported_manners: ["by foot", "by bike", "by car"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    routes: vec![
        RouteEntry {
            start: "main station".to_string(),
            venue: "trattoria roma".to_string(),
            manner: "by foot".to_string(),
            distance: "1.2 km".to_string(),
            duration: "15 min".to_string(),
        },
        RouteEntry {
            start: "main station".to_string(),
            venue: "trattoria roma".to_string(),
            manner: "by car".to_string(),
            distance: "1.8 km".to_string(),
            duration: "6 min".to_string(),
        },
        RouteEntry {
            start: "main station".to_string(),
            venue: "schwaben stube".to_string(),
            manner: "by bike".to_string(),
            distance: "3.4 km".to_string(),
            duration: "12 min".to_string(),
        },
    ],
    venues: vec![
        venue(vec![
            ("name", json!("trattoria roma")),
            ("food_type", json!("italian")),
            ("area", json!("center")),
            ("price_range", json!("moderate")),
            ("parking_lot", json!("0")),
            ("rating", json!(4.5)),
            ("address", json!("marktplatz 3")),
            ("phone", json!("0711 2040")),
            (
                "opening_hours",
                json!({"monday": "11:00-22:00", "friday": "11:00-23:30", "saturday": "12:00-23:30"}),
            ),
            ("manner", json!(["dine-in", "takeaway"])),
            ("reviews", json!(["Best carbonara in town.", "Friendly staff."])),
            ("description", json!("Family-run trattoria on the market square.")),
        ]),
        venue(vec![
            ("name", json!("luigis")),
            ("food_type", json!("italian")),
            ("area", json!("south")),
            ("price_range", json!("cheap")),
            ("parking_lot", json!("1")),
            ("rating", json!(4.0)),
            ("address", json!("boeblinger strasse 77")),
            ("phone", json!("0711 6874")),
            ("opening_hours", json!({"monday": "12:00-21:00", "friday": "12:00-23:00"})),
            ("manner", json!(["dine-in", "takeaway", "delivery"])),
            ("reviews", json!(["Generous portions."])),
            ("description", json!("No-frills pizzeria with a wood oven.")),
        ]),
        venue(vec![
            ("name", json!("taverna olympia")),
            ("food_type", json!("greek")),
            ("area", json!("center")),
            ("price_range", json!("moderate")),
            ("parking_lot", json!("1")),
            ("rating", json!(4.3)),
            ("address", json!("koenigstrasse 12")),
            ("phone", json!("0711 8812")),
            ("opening_hours", json!({"friday": "17:00-24:00", "saturday": "17:00-24:00"})),
            ("manner", json!(["dine-in"])),
            ("reviews", json!(["Great gyros.", "Can get loud on weekends."])),
            ("description", json!("Taverna with live music on saturdays.")),
        ]),
        venue(vec![
            ("name", json!("schwaben stube")),
            ("food_type", json!("german")),
            ("area", json!("north")),
            ("price_range", json!("expensive")),
            ("parking_lot", json!("1")),
            ("rating", json!(4.7)),
            ("address", json!("heilbronner strasse 201")),
            ("phone", json!("0711 3321")),
            ("opening_hours", json!({"monday": "17:00-22:00", "friday": "17:00-23:00"})),
            ("manner", json!(["dine-in"])),
            ("reviews", json!(["Outstanding maultaschen."])),
            ("description", json!("Traditional swabian cooking, seasonal menu.")),
        ]),
        venue(vec![
            ("name", json!("anatolia grill")),
            ("food_type", json!("turkish")),
            ("area", json!("south")),
            ("price_range", json!("cheap")),
            ("parking_lot", json!("0")),
            ("rating", json!(4.1)),
            ("address", json!("tuebinger strasse 45")),
            ("phone", json!("0711 9917")),
            ("opening_hours", json!({"monday": "10:00-23:00", "friday": "10:00-02:00"})),
            ("manner", json!(["dine-in", "takeaway", "delivery"])),
            ("reviews", json!(["Open late, great doner."])),
            ("description", json!("Grill house near the city gate.")),
        ]),
        venue(vec![
            ("name", json!("bella vista")),
            ("food_type", json!("italian")),
            ("area", json!("north")),
            ("price_range", json!("expensive")),
            ("parking_lot", json!("1")),
            ("rating", json!(4.6)),
            ("address", json!("am weinberg 9")),
            ("phone", json!("0711 5550")),
            ("opening_hours", json!({"friday": "18:00-23:00", "saturday": "18:00-23:00"})),
            ("manner", json!(["dine-in"])),
            ("reviews", json!(["Stunning view over the vineyards."])),
            ("description", json!("Fine dining with a terrace above the city.")),
        ]),
    ],
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store() -> MemoryVenueStore {
        MemoryVenueStore::demo()
    }

    fn constraints(pairs: &[(&str, &[&str])]) -> ConstraintMap {
        pairs
            .iter()
            .map(|(slot, values)| {
                (
                    slot.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    mod queries {
        use super::*;

        #[test]
        fn empty_constraints_return_all_venues() {
            let store = store();
            assert_eq!(store.find_venues(&Vec::new()).len(), store.venue_count());
        }

        #[test]
        fn constraints_filter_rows() {
            let store = store();
            let rows = store.find_venues(&constraints(&[("food_type", &["italian"])]));
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.get_str("food_type") == Some("italian")));
        }

        #[test]
        fn multiple_values_for_a_slot_match_any() {
            let store = store();
            let rows = store.find_venues(&constraints(&[("food_type", &["greek", "german"])]));
            assert_eq!(rows.len(), 2);
        }

        #[test]
        fn conjunction_across_slots() {
            let store = store();
            let rows = store.find_venues(&constraints(&[
                ("food_type", &["italian"]),
                ("area", &["south"]),
            ]));
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].get_str("name"), Some("luigis"));
        }

        #[test]
        fn impossible_constraints_return_empty() {
            let store = store();
            let rows = store.find_venues(&constraints(&[("food_type", &["sushi"])]));
            assert!(rows.is_empty());
        }

        #[test]
        fn rows_keep_canonical_attribute_order() {
            let store = store();
            let rows = store.find_venues(&Vec::new());
            let attrs: Vec<_> = rows[0].attributes().take(4).collect();
            assert_eq!(attrs, vec!["name", "food_type", "area", "price_range"]);
        }
    }

    mod details {
        use super::*;

        #[test]
        fn returns_requested_attributes_in_requested_order() {
            let store = store();
            let rows = store.find_matching_details(
                "luigis",
                &["phone".to_string(), "address".to_string()],
            );
            assert_eq!(rows.len(), 1);
            let attrs: Vec<_> = rows[0].attributes().collect();
            assert_eq!(attrs, vec!["phone", "address"]);
        }

        #[test]
        fn unknown_attribute_is_null_not_absent() {
            let store = store();
            let rows = store.find_matching_details("luigis", &["wifi".to_string()]);
            assert_eq!(rows[0].get("wifi"), Some(&Value::Null));
        }

        #[test]
        fn unknown_venue_returns_empty() {
            let store = store();
            assert!(store
                .find_matching_details("no such place", &["phone".to_string()])
                .is_empty());
        }
    }

    mod schema {
        use super::*;

        #[test]
        fn primary_key_is_name() {
            assert_eq!(store().primary_key(), "name");
        }

        #[test]
        fn requestable_slots_are_ordered() {
            assert_eq!(
                store().system_requestable_slots(),
                vec!["food_type", "area", "price_range", "parking_lot"]
            );
        }

        #[test]
        fn parking_lot_is_binary() {
            assert_eq!(store().possible_values("parking_lot").len(), 2);
            assert!(store().possible_values("food_type").len() > 2);
            assert!(store().possible_values("unknown").is_empty());
        }

        #[test]
        fn demo_dataset_passes_validation() {
            assert!(MemoryVenueStore::new(DEMO_DATASET.clone()).is_ok());
        }

        #[test]
        fn rejects_primary_key_outside_attribute_order() {
            let dataset = VenueDataset {
                primary_key: "id".to_string(),
                attribute_order: vec!["name".to_string()],
                requestable_slots: Vec::new(),
                possible_values: BTreeMap::new(),
                supported_manners: Vec::new(),
                routes: Vec::new(),
                venues: Vec::new(),
            };
            assert!(matches!(
                MemoryVenueStore::new(dataset),
                Err(StoreError::InvalidDataset(_))
            ));
        }

        #[test]
        fn rejects_requestable_slot_outside_attribute_order() {
            let dataset = VenueDataset {
                primary_key: "name".to_string(),
                attribute_order: vec!["name".to_string()],
                requestable_slots: vec!["area".to_string()],
                possible_values: BTreeMap::new(),
                supported_manners: Vec::new(),
                routes: Vec::new(),
                venues: Vec::new(),
            };
            assert!(matches!(
                MemoryVenueStore::new(dataset),
                Err(StoreError::InvalidDataset(_))
            ));
        }
    }

    mod mutations {
        use super::*;

        #[test]
        fn enter_rating_overwrites() {
            let store = store();
            store.enter_rating(3.0, "luigis");
            assert_eq!(store.rating_of("luigis"), Some(3.0));
            store.enter_rating(4.8, "luigis");
            assert_eq!(store.rating_of("luigis"), Some(4.8));
        }

        #[test]
        fn enter_rating_for_unknown_venue_is_a_noop() {
            let store = store();
            store.enter_rating(5.0, "no such place");
            assert_eq!(store.rating_of("no such place"), None);
        }

        #[test]
        fn enter_review_appends() {
            let store = store();
            let before = store.reviews_of("luigis").len();
            store.enter_review("Lovely terrace.", "luigis");
            let reviews = store.reviews_of("luigis");
            assert_eq!(reviews.len(), before + 1);
            assert!(reviews.contains(&"Lovely terrace.".to_string()));
        }

        #[test]
        fn identical_review_is_written_once() {
            let store = store();
            store.enter_review("Lovely terrace.", "luigis");
            let count = store.reviews_of("luigis").len();
            store.enter_review("Lovely terrace.", "luigis");
            assert_eq!(store.reviews_of("luigis").len(), count);
        }
    }

    mod routes {
        use super::*;

        #[test]
        fn known_route_is_returned() {
            let estimate = store().distance_duration("main station", "trattoria roma", "by foot");
            assert_eq!(
                estimate,
                RouteEstimate::Route {
                    distance: "1.2 km".to_string(),
                    duration: "15 min".to_string()
                }
            );
        }

        #[test]
        fn unsupported_manner_fails_before_address_lookup() {
            let estimate =
                store().distance_duration("main station", "trattoria roma", "by helicopter");
            assert_eq!(estimate, RouteEstimate::BadManner);
        }

        #[test]
        fn unknown_start_is_a_bad_address() {
            let estimate = store().distance_duration("nowhere", "trattoria roma", "by foot");
            assert_eq!(estimate, RouteEstimate::BadAddress);
        }
    }

    mod lookups {
        use super::*;

        #[test]
        fn opening_info_formats_known_day() {
            let info = store().opening_info("monday", "luigis");
            assert_eq!(info, "open monday: 12:00-21:00");
        }

        #[test]
        fn opening_info_handles_unknown_day() {
            let info = store().opening_info("sunday", "luigis");
            assert_eq!(info, "no opening information for sunday");
        }

        #[test]
        fn manner_info_reports_offer() {
            assert_eq!(
                store().manner_info("delivery", "luigis"),
                "luigis offers delivery"
            );
            assert_eq!(
                store().manner_info("delivery", "bella vista"),
                "bella vista does not offer delivery"
            );
        }
    }

    mod file_loading {
        use super::*;

        #[test]
        fn loads_dataset_from_json_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            let dataset = serde_json::to_string(&*DEMO_DATASET).unwrap();
            file.write_all(dataset.as_bytes()).unwrap();
            let store = MemoryVenueStore::load_from_path(file.path()).unwrap();
            assert_eq!(store.venue_count(), MemoryVenueStore::demo().venue_count());
        }

        #[test]
        fn missing_file_is_a_read_error() {
            let err = MemoryVenueStore::load_from_path(Path::new("/no/such/dataset.json"));
            assert!(matches!(err, Err(StoreError::ReadFile { .. })));
        }

        #[test]
        fn malformed_json_is_a_parse_error() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(b"not json").unwrap();
            let err = MemoryVenueStore::load_from_path(file.path());
            assert!(matches!(err, Err(StoreError::ParseFile { .. })));
        }
    }
}
