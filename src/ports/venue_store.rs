//! Venue store port - query, lookup and mutation capability.
//!
//! The policy engine performs at most one query and one mutation per turn,
//! both synchronous and completing before the decision returns. Failures
//! surface as data (empty result sets, `RouteEstimate` failure variants),
//! never as errors from these methods.

use serde::{Deserialize, Serialize};

use crate::domain::belief::ConstraintMap;
use crate::domain::venue::VenueRecord;

/// Result of a distance/duration lookup.
///
/// Address and travel-manner failures are modelled as variants rather than
/// errors; the policy maps them to dedicated action tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteEstimate {
    /// A usable estimate.
    Route { distance: String, duration: String },
    /// The start point or the venue address could not be resolved.
    BadAddress,
    /// The requested travel manner is not supported.
    BadManner,
}

/// Port for the venue store the dialogue narrows down over.
///
/// Implementations must be `Send + Sync` so a single engine can serve
/// several (serialized) sessions; all operations are synchronous.
pub trait VenueStore: Send + Sync {
    /// Returns the rows matching every constraint value, in store order.
    ///
    /// An empty constraint map returns all rows.
    fn find_venues(&self, constraints: &ConstraintMap) -> Vec<VenueRecord>;

    /// Returns rows (normally one) carrying just the requested attributes
    /// for a known venue.
    fn find_matching_details(&self, id: &str, slots: &[String]) -> Vec<VenueRecord>;

    /// Returns the canonical ordered list of slots the system may ask
    /// about.
    fn system_requestable_slots(&self) -> Vec<String>;

    /// Returns the schema values for a slot; exactly two values mark the
    /// slot as binary.
    fn possible_values(&self, slot: &str) -> Vec<String>;

    /// Returns the canonical identifier slot name.
    fn primary_key(&self) -> String;

    /// Records a rating for a venue. Write-through, last-write-wins.
    fn enter_rating(&self, rating: f64, id: &str);

    /// Records a review for a venue. Write-through, last-write-wins.
    fn enter_review(&self, review: &str, id: &str);

    /// Estimates distance and duration from a start point to a venue.
    fn distance_duration(&self, start: &str, id: &str, manner: &str) -> RouteEstimate;

    /// Returns formatted opening information for a venue on a day.
    fn opening_info(&self, day: &str, id: &str) -> String;

    /// Returns formatted information about a service manner for a venue.
    fn manner_info(&self, kind: &str, id: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_estimate_serializes_with_snake_case_tags() {
        let estimate = RouteEstimate::Route {
            distance: "2.4 km".to_string(),
            duration: "8 min".to_string(),
        };
        let json = serde_json::to_string(&estimate).unwrap();
        assert!(json.contains("\"route\""));
        let back: RouteEstimate = serde_json::from_str(&json).unwrap();
        assert_eq!(estimate, back);
    }

    #[test]
    fn failure_variants_are_distinct() {
        assert_ne!(RouteEstimate::BadAddress, RouteEstimate::BadManner);
    }
}
