//! Inform construction.
//!
//! Fills in the offer/answer payload in one of three modes: entity detail,
//! alternative scrolling, or a fresh constraint-based offer.

use serde_json::Value;

use crate::domain::acts::{SysAct, SysActType, NONE_VALUE, NOT_AVAILABLE};
use crate::domain::belief::{BeliefState, UserAct};
use crate::domain::session::{Scroll, SessionState};
use crate::domain::venue::{value_text, VenueRecord};
use crate::ports::VenueStore;

use super::PolicyEngine;

impl PolicyEngine {
    /// Builds the inform for this turn's query results.
    pub(crate) fn build_inform(
        &self,
        results: &[VenueRecord],
        belief: &BeliefState,
        acts: &[UserAct],
        session: &mut SessionState,
        focused: Option<&str>,
    ) -> SysAct {
        let primary_key = self.store().primary_key();
        if !belief.requests().is_empty() || belief.is_informed(&primary_key) {
            self.inform_by_detail(results, focused)
        } else if acts.contains(&UserAct::RequestAlternatives) {
            self.inform_by_alternatives(results, belief, session)
        } else {
            self.inform_by_constraints(results, belief, session)
        }
    }

    /// Entity detail: first row, capped attribute list, sentinel for
    /// missing values, identifier appended when the cap dropped it.
    fn inform_by_detail(&self, results: &[VenueRecord], focused: Option<&str>) -> SysAct {
        let primary_key = self.store().primary_key();
        let mut act = SysAct::new(SysActType::InformByName);
        match results.first() {
            Some(row) => {
                let selected = &row.fields()[..row.fields().len().min(self.config().detail_slot_limit)];
                for (attribute, value) in selected {
                    act.add_value(attribute.as_str(), format_attribute(attribute, value));
                }
                if !selected.iter().any(|(attribute, _)| *attribute == primary_key) {
                    act.add_value(primary_key.as_str(), focused.unwrap_or(NONE_VALUE));
                }
            }
            None => act.add_value(primary_key.as_str(), NONE_VALUE),
        }
        act
    }

    /// Alternative scrolling over the session's cached candidates.
    fn inform_by_alternatives(
        &self,
        results: &[VenueRecord],
        belief: &BeliefState,
        session: &mut SessionState,
    ) -> SysAct {
        let primary_key = self.store().primary_key();
        if session.has_no_candidates() && !results.is_empty() {
            session.replace_candidates(results.to_vec(), None);
        }
        let mut act = match session.advance_cursor() {
            Scroll::Empty => {
                let mut act = SysAct::new(SysActType::InformByAlternatives);
                act.add_value(primary_key.as_str(), NONE_VALUE);
                act
            }
            Scroll::At { index, first, .. } => {
                // The very first offer from a fresh cache reads like a plain
                // offer; only subsequent ones are phrased as alternatives.
                let act_type = if first {
                    SysActType::InformByName
                } else {
                    SysActType::InformByAlternatives
                };
                let mut act = SysAct::new(act_type);
                let name = session.candidates()[index]
                    .get_str(&primary_key)
                    .unwrap_or(NONE_VALUE);
                act.add_value(primary_key.as_str(), name.to_string());
                act
            }
        };
        append_constraints(&mut act, belief);
        act
    }

    /// Fresh offer: replace the candidate cache, point at the first row.
    fn inform_by_constraints(
        &self,
        results: &[VenueRecord],
        belief: &BeliefState,
        session: &mut SessionState,
    ) -> SysAct {
        let primary_key = self.store().primary_key();
        let mut act = SysAct::new(SysActType::InformByName);
        if results.is_empty() {
            session.replace_candidates(Vec::new(), None);
            act.add_value(primary_key.as_str(), NONE_VALUE);
        } else {
            session.replace_candidates(results.to_vec(), Some(0));
            let name = results[0].get_str(&primary_key).unwrap_or(NONE_VALUE);
            act.add_value(primary_key.as_str(), name.to_string());
        }
        append_constraints(&mut act, belief);
        act
    }
}

/// Echoes the user's constraints so the renderer can say why the offer is
/// relevant.
fn append_constraints(act: &mut SysAct, belief: &BeliefState) {
    for (slot, values) in belief.constraints() {
        for value in values {
            act.add_value(slot.as_str(), value);
        }
    }
}

/// Renders one attribute value for the outgoing act.
///
/// Missing and empty values become the "not available" sentinel; composite
/// attributes get their dedicated layout.
fn format_attribute(attribute: &str, value: &Value) -> String {
    let missing = match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if missing {
        return NOT_AVAILABLE.to_string();
    }
    match (attribute, value) {
        ("opening_hours", Value::Object(hours)) => {
            let mut out = String::new();
            for (day, times) in hours {
                out.push('\n');
                out.push_str(day);
                out.push_str(": ");
                out.push_str(&value_text(times));
            }
            out
        }
        ("reviews", Value::Array(reviews)) => {
            let mut out = String::new();
            for review in reviews {
                out.push('\n');
                out.push_str(&value_text(review));
            }
            out
        }
        ("manner", Value::Array(manners)) => manners
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        ("parking_lot", value) => match value_text(value).as_str() {
            "0" => "no".to_string(),
            "1" => "a".to_string(),
            other => other.to_string(),
        },
        ("description", value) => format!("\n{}", value_text(value)),
        (_, value) => value_text(value),
    }
}
