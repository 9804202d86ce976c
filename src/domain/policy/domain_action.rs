//! Domain decision logic.
//!
//! Entered when no meta act matched: guards against unanswerable turns,
//! resolves the focused venue, queries the store, and decides between a
//! clarifying question and an inform.

use tracing::debug;

use crate::domain::acts::{SysAct, SysActType, NONE_VALUE};
use crate::domain::belief::{BeliefState, UserAct};
use crate::domain::session::SessionState;
use crate::domain::venue::VenueRecord;
use crate::ports::VenueStore;

use super::question::value_table;
use super::PolicyEngine;

impl PolicyEngine {
    /// Decides the venue-search action for one turn.
    pub(crate) fn decide_domain_action(
        &self,
        belief: &BeliefState,
        acts: &[UserAct],
        session: &mut SessionState,
    ) -> SysAct {
        let primary_key = self.store().primary_key();
        let focused = self.focused_name(belief, session);

        // Requests about no entity in particular cannot be answered.
        if acts.contains(&UserAct::Bad) || (!belief.requests().is_empty() && focused.is_none()) {
            return SysAct::new(SysActType::Bad);
        }

        // Alternatives only make sense against active constraints.
        if acts.contains(&UserAct::RequestAlternatives) && !belief.has_constraints() {
            return SysAct::new(SysActType::Bad);
        }

        // A named venue with nothing requested is offered back directly;
        // the rendering layer fills in the detail.
        if belief.is_informed(&primary_key) && belief.requests().is_empty() {
            let mut act = SysAct::new(SysActType::InformByName);
            if let Some(name) = belief.best_informed_value(&primary_key) {
                act.add_value(primary_key.as_str(), name);
            }
            return act;
        }

        let results = self.query(belief, focused.as_deref());
        debug!(results = results.len(), "venue query answered");

        // More than one candidate and nothing requested: try to narrow
        // down with the most informative open slot.
        if results.len() > 1 && belief.requests().is_empty() {
            let table = value_table(&results, &primary_key);
            if let Some(slot) = self.next_request(&table, belief) {
                let mut act = SysAct::new(SysActType::Request);
                act.add_slot(slot.as_str());
                session.record_request_slot(slot);
                return act;
            }
        }

        let mut act = self.build_inform(&results, belief, acts, session, focused.as_deref());
        let offered = act.first_value(&primary_key).map(str::to_string);
        match offered {
            Some(name) => session.record_offer(name),
            None => act.add_value(primary_key.as_str(), NONE_VALUE),
        }
        act
    }

    /// Issues the one store query for this turn: attribute lookup for a
    /// focused venue with outstanding requests, constraint search otherwise.
    fn query(&self, belief: &BeliefState, focused: Option<&str>) -> Vec<VenueRecord> {
        if let Some(name) = focused {
            if !belief.requests().is_empty() {
                return self
                    .store()
                    .find_matching_details(name, belief.requests());
            }
        }
        self.store().find_venues(&belief.constraints())
    }
}
