//! The belief state consumed by the policy engine.
//!
//! Produced by the language-understanding front end once per turn and
//! treated as immutable here: the engine reads it, copies what it needs, and
//! never writes back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::user_act::UserAct;

/// Value a user gives to mark a slot as "no preference".
///
/// Slots informed with this value are excluded from constraints and from
/// clarifying questions.
pub const DONT_CARE: &str = "dontcare";

/// Ordered constraint mapping extracted from the belief state.
///
/// Each entry maps a slot name to every value the user has informed for it;
/// multiple values are preserved, not collapsed. Entry order follows the
/// informs map (lexicographic by slot name), which keeps downstream output
/// deterministic.
pub type ConstraintMap = Vec<(String, Vec<String>)>;

/// Accumulated user intent for the current turn.
///
/// `informs` maps slot name to candidate values with confidence scores;
/// `requests` lists slots the user wants values for. The scalar fields carry
/// payloads for the auxiliary flows (ratings, reviews, distance, opening
/// hours, service manner).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeliefState {
    /// Dialogue acts attributed to the user this turn.
    #[serde(default)]
    user_acts: Vec<UserAct>,

    /// Slot name -> candidate value -> confidence.
    #[serde(default)]
    informs: BTreeMap<String, BTreeMap<String, f64>>,

    /// Slots the user is requesting values for.
    #[serde(default)]
    requests: Vec<String>,

    /// Rating given with a GiveRating act.
    #[serde(default)]
    given_rating: Option<f64>,

    /// Review text given with a WrittenReview act.
    #[serde(default)]
    review: Option<String>,

    /// Start point for a distance query.
    #[serde(default)]
    start_point: Option<String>,

    /// Travel manner for a distance query.
    #[serde(default)]
    distance_manner: Option<String>,

    /// Day asked about with an AskOpeningDay act.
    #[serde(default)]
    requested_opening_day: Option<String>,

    /// Service manner asked about with an AskManner act.
    #[serde(default)]
    requested_manner: Option<String>,
}

impl BeliefState {
    /// Creates an empty belief state (no acts, no informs, no requests).
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the user acts for this turn.
    pub fn user_acts(&self) -> &[UserAct] {
        &self.user_acts
    }

    /// Returns true if the given act was attributed to the user this turn.
    pub fn has_act(&self, act: UserAct) -> bool {
        self.user_acts.contains(&act)
    }

    /// Returns the requested slot names.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// Returns the informed values and confidences for a slot, if any.
    pub fn informed_values(&self, slot: &str) -> Option<&BTreeMap<String, f64>> {
        self.informs.get(slot)
    }

    /// Returns true if the slot has at least one informed value.
    pub fn is_informed(&self, slot: &str) -> bool {
        self.informs.get(slot).is_some_and(|values| !values.is_empty())
    }

    /// Returns the informed value with the highest confidence for a slot.
    ///
    /// Equal confidences resolve to the lexicographically smallest value so
    /// the choice is deterministic.
    pub fn best_informed_value(&self, slot: &str) -> Option<&str> {
        let values = self.informs.get(slot)?;
        let mut best: Option<(&str, f64)> = None;
        for (value, &score) in values {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((value.as_str(), score)),
            }
        }
        best.map(|(value, _)| value)
    }

    pub fn given_rating(&self) -> Option<f64> {
        self.given_rating
    }

    pub fn review(&self) -> Option<&str> {
        self.review.as_deref()
    }

    pub fn start_point(&self) -> Option<&str> {
        self.start_point.as_deref()
    }

    pub fn distance_manner(&self) -> Option<&str> {
        self.distance_manner.as_deref()
    }

    pub fn requested_opening_day(&self) -> Option<&str> {
        self.requested_opening_day.as_deref()
    }

    pub fn requested_manner(&self) -> Option<&str> {
        self.requested_manner.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Constraint extraction
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the slots the user has marked as "don't care".
    pub fn dont_care_slots(&self) -> Vec<&str> {
        self.informs
            .iter()
            .filter(|(_, values)| values.contains_key(DONT_CARE))
            .map(|(slot, _)| slot.as_str())
            .collect()
    }

    /// Extracts the active constraints: every informed slot that is not
    /// marked "don't care", with all of its informed values.
    pub fn constraints(&self) -> ConstraintMap {
        self.informs
            .iter()
            .filter(|(_, values)| !values.contains_key(DONT_CARE))
            .filter(|(_, values)| !values.is_empty())
            .map(|(slot, values)| {
                (slot.clone(), values.keys().cloned().collect::<Vec<_>>())
            })
            .collect()
    }

    /// Returns true if the user has at least one active constraint.
    pub fn has_constraints(&self) -> bool {
        !self.constraints().is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Builder-style construction (used by callers and tests)
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a user act.
    pub fn with_act(mut self, act: UserAct) -> Self {
        self.user_acts.push(act);
        self
    }

    /// Adds an informed value with a confidence score.
    pub fn with_inform(mut self, slot: impl Into<String>, value: impl Into<String>, score: f64) -> Self {
        self.informs
            .entry(slot.into())
            .or_default()
            .insert(value.into(), score);
        self
    }

    /// Adds a requested slot.
    pub fn with_request(mut self, slot: impl Into<String>) -> Self {
        self.requests.push(slot.into());
        self
    }

    pub fn with_given_rating(mut self, rating: f64) -> Self {
        self.given_rating = Some(rating);
        self
    }

    pub fn with_review(mut self, review: impl Into<String>) -> Self {
        self.review = Some(review.into());
        self
    }

    pub fn with_start_point(mut self, start: impl Into<String>) -> Self {
        self.start_point = Some(start.into());
        self
    }

    pub fn with_distance_manner(mut self, manner: impl Into<String>) -> Self {
        self.distance_manner = Some(manner.into());
        self
    }

    pub fn with_requested_opening_day(mut self, day: impl Into<String>) -> Self {
        self.requested_opening_day = Some(day.into());
        self
    }

    pub fn with_requested_manner(mut self, manner: impl Into<String>) -> Self {
        self.requested_manner = Some(manner.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod constraints {
        use super::*;

        #[test]
        fn empty_state_has_no_constraints() {
            let belief = BeliefState::new();
            assert!(belief.constraints().is_empty());
            assert!(!belief.has_constraints());
        }

        #[test]
        fn informed_slots_become_constraints() {
            let belief = BeliefState::new()
                .with_inform("food_type", "italian", 0.9)
                .with_inform("area", "center", 0.8);
            let constraints = belief.constraints();
            assert_eq!(constraints.len(), 2);
            assert_eq!(constraints[0].0, "area");
            assert_eq!(constraints[1].0, "food_type");
        }

        #[test]
        fn multiple_values_for_one_slot_are_preserved() {
            let belief = BeliefState::new()
                .with_inform("food_type", "italian", 0.6)
                .with_inform("food_type", "greek", 0.4);
            let constraints = belief.constraints();
            assert_eq!(constraints.len(), 1);
            assert_eq!(constraints[0].1, vec!["greek".to_string(), "italian".to_string()]);
        }

        #[test]
        fn dont_care_slots_are_excluded() {
            let belief = BeliefState::new()
                .with_inform("area", DONT_CARE, 1.0)
                .with_inform("food_type", "italian", 0.9);
            let constraints = belief.constraints();
            assert_eq!(constraints.len(), 1);
            assert_eq!(constraints[0].0, "food_type");
            assert_eq!(belief.dont_care_slots(), vec!["area"]);
        }

        #[test]
        fn dont_care_excludes_the_whole_slot_even_with_other_values() {
            let belief = BeliefState::new()
                .with_inform("area", DONT_CARE, 0.5)
                .with_inform("area", "center", 0.9);
            assert!(belief.constraints().is_empty());
        }
    }

    mod best_informed_value {
        use super::*;

        #[test]
        fn returns_none_for_unknown_slot() {
            let belief = BeliefState::new();
            assert_eq!(belief.best_informed_value("name"), None);
        }

        #[test]
        fn picks_highest_confidence() {
            let belief = BeliefState::new()
                .with_inform("name", "luigis", 0.4)
                .with_inform("name", "trattoria roma", 0.9);
            assert_eq!(belief.best_informed_value("name"), Some("trattoria roma"));
        }

        #[test]
        fn ties_resolve_to_lexicographically_smallest() {
            let belief = BeliefState::new()
                .with_inform("name", "zelda bar", 0.5)
                .with_inform("name", "alpha cafe", 0.5);
            assert_eq!(belief.best_informed_value("name"), Some("alpha cafe"));
        }
    }

    mod acts {
        use super::*;

        #[test]
        fn has_act_matches_added_acts() {
            let belief = BeliefState::new().with_act(UserAct::Hello).with_act(UserAct::Inform);
            assert!(belief.has_act(UserAct::Hello));
            assert!(belief.has_act(UserAct::Inform));
            assert!(!belief.has_act(UserAct::Bye));
        }
    }

    mod serde_round_trip {
        use super::*;

        #[test]
        fn belief_state_round_trips_through_json() {
            let belief = BeliefState::new()
                .with_act(UserAct::Inform)
                .with_inform("food_type", "italian", 0.9)
                .with_request("address")
                .with_given_rating(4.5);
            let json = serde_json::to_string(&belief).unwrap();
            let back: BeliefState = serde_json::from_str(&json).unwrap();
            assert_eq!(belief, back);
        }

        #[test]
        fn missing_fields_default_to_empty() {
            let belief: BeliefState = serde_json::from_str("{}").unwrap();
            assert!(belief.user_acts().is_empty());
            assert!(belief.requests().is_empty());
            assert_eq!(belief.given_rating(), None);
        }
    }
}
