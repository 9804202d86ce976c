//! Turn dispatcher.
//!
//! Top of the decision chain: handles the first turn, the turn budget,
//! filler suppression, and the ordered meta-act table, deferring everything
//! else to the domain decision logic.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::acts::{SysAct, SysActType, NONE_VALUE};
use crate::domain::belief::{BeliefState, UserAct};
use crate::domain::session::SessionState;
use crate::ports::{RouteEstimate, VenueStore};

use super::PolicyConfig;

/// Meta acts in dispatch priority order.
///
/// Evaluated first match wins; acts after filler suppression are treated as
/// one dominant intent, and this table resolves residual ambiguity
/// deterministically.
pub const META_ACT_PRIORITY: &[UserAct] = &[
    UserAct::Bad,
    UserAct::Bye,
    UserAct::Thanks,
    UserAct::NewDialogue,
    UserAct::Hello,
    UserAct::SelectDomain,
    UserAct::GiveRating,
    UserAct::WriteReview,
    UserAct::WrittenReview,
    UserAct::AskDistance,
    UserAct::InformStartPoint,
    UserAct::InformDistanceManner,
    UserAct::AskOpeningDay,
    UserAct::AskManner,
    UserAct::NegativeInform,
];

/// Removes politeness filler from a turn's action set.
///
/// While more than one act remains and one of {Thanks, Bad, Hello} is
/// present, one filler act is removed per pass, Thanks before Bad before
/// Hello. Never removes the last remaining act, and applying it twice
/// changes nothing the first pass did not.
pub fn suppress_filler(acts: &[UserAct]) -> Vec<UserAct> {
    let mut acts = acts.to_vec();
    while acts.len() > 1 {
        let filler = [UserAct::Thanks, UserAct::Bad, UserAct::Hello]
            .into_iter()
            .find_map(|filler| acts.iter().position(|act| *act == filler));
        match filler {
            Some(position) => {
                acts.remove(position);
            }
            None => break,
        }
    }
    acts
}

/// The rule-based dialogue policy.
///
/// Holds no per-session state: every decision reads the belief state and a
/// caller-owned `SessionState`, so one engine serves any number of
/// (serially decided) sessions.
pub struct PolicyEngine {
    store: Arc<dyn VenueStore>,
    config: PolicyConfig,
}

impl PolicyEngine {
    /// Creates an engine over a venue store.
    pub fn new(store: Arc<dyn VenueStore>, config: PolicyConfig) -> Self {
        Self { store, config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn VenueStore {
        self.store.as_ref()
    }

    /// Decides the system action for one turn.
    ///
    /// Advances the turn counter, emits exactly one action, and records it
    /// in the session state.
    pub fn decide(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        session.begin_turn();
        debug!(
            turn = session.turn_count(),
            acts = ?belief.user_acts(),
            "deciding turn"
        );
        let act = self.choose(belief, session);
        session.record_act(act.act_type());
        info!(turn = session.turn_count(), %act, "system action");
        act
    }

    fn choose(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        if session.is_first_turn() {
            if belief.user_acts().is_empty() || belief.has_act(UserAct::NewDialogue) {
                session.clear_first_turn();
                return SysAct::new(SysActType::Welcome);
            }
            session.clear_first_turn();
        }

        if session.budget_exhausted() {
            return SysAct::new(SysActType::Bye);
        }

        let acts = suppress_filler(belief.user_acts());
        for &meta in META_ACT_PRIORITY {
            if acts.contains(&meta) {
                return self.handle_meta_act(meta, belief, session);
            }
        }

        self.decide_domain_action(belief, &acts, session)
    }

    fn handle_meta_act(
        &self,
        act: UserAct,
        belief: &BeliefState,
        session: &mut SessionState,
    ) -> SysAct {
        match act {
            UserAct::Bad => SysAct::new(SysActType::Bad),
            UserAct::Bye => SysAct::new(SysActType::Bye),
            UserAct::Thanks => SysAct::new(SysActType::RequestMore),
            UserAct::NewDialogue => {
                session.reset();
                SysAct::new(SysActType::Welcome)
            }
            UserAct::Hello | UserAct::SelectDomain => match self.first_open_slot(belief) {
                Some(slot) => {
                    let mut act = SysAct::new(SysActType::GuideUser);
                    act.add_slot(slot);
                    act
                }
                None => SysAct::new(SysActType::RequestMore),
            },
            UserAct::GiveRating => self.handle_give_rating(belief, session),
            UserAct::WriteReview => match self.focused_name(belief, session) {
                Some(name) => {
                    let mut act = SysAct::new(SysActType::AskWriteReview);
                    act.add_value(self.store.primary_key(), name);
                    act
                }
                None => self.request_primary_key(),
            },
            UserAct::WrittenReview => self.handle_written_review(belief, session),
            UserAct::AskDistance => match self.focused_name(belief, session) {
                Some(_) => SysAct::new(SysActType::AskStartPoint),
                None => self.request_primary_key(),
            },
            UserAct::InformStartPoint => SysAct::new(SysActType::AskDistanceManner),
            UserAct::InformDistanceManner => self.handle_distance_manner(belief, session),
            UserAct::AskOpeningDay => self.handle_opening_day(belief, session),
            UserAct::AskManner => self.handle_manner(belief, session),
            UserAct::NegativeInform => SysAct::new(SysActType::WhatDoYouWant),
            // Inform, Request and RequestAlternatives are not meta acts.
            _ => self.decide_domain_action(belief, &[act], session),
        }
    }

    fn handle_give_rating(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        match self.focused_name(belief, session) {
            Some(name) => {
                let mut act = SysAct::new(SysActType::ConfirmGiveRating);
                act.add_value(self.store.primary_key(), name.clone());
                if let Some(rating) = belief.given_rating() {
                    act.add_value("given_rating", rating.to_string());
                    self.store.enter_rating(rating, &name);
                }
                act
            }
            None => self.request_primary_key(),
        }
    }

    fn handle_written_review(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        let name = self.focused_name(belief, session);
        let mut act = SysAct::new(SysActType::ConfirmWriteReview);
        act.add_value(
            self.store.primary_key(),
            name.clone().unwrap_or_else(|| NONE_VALUE.to_string()),
        );
        if let Some(review) = belief.review() {
            act.add_value("review", review);
            if let Some(name) = name {
                self.store.enter_review(&sanitize_review(review), &name);
            }
        }
        act
    }

    fn handle_distance_manner(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        let name = self.focused_name(belief, session);
        let (name, start, manner) = match (name, belief.start_point(), belief.distance_manner()) {
            (Some(name), Some(start), Some(manner)) => (name, start, manner),
            _ => return SysAct::new(SysActType::BadAddress),
        };
        match self.store.distance_duration(start, &name, manner) {
            RouteEstimate::BadManner => SysAct::new(SysActType::BadTravelManner),
            RouteEstimate::BadAddress => SysAct::new(SysActType::BadAddress),
            RouteEstimate::Route { distance, duration } => {
                let mut act = SysAct::new(SysActType::InformDistance);
                act.add_value(self.store.primary_key(), name);
                act.add_value("distance_manner", manner);
                act.add_value("distance", distance);
                act.add_value("duration", duration);
                act
            }
        }
    }

    fn handle_opening_day(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        match self.focused_name(belief, session) {
            Some(name) => {
                let day = belief.requested_opening_day().unwrap_or_default();
                let info = self.store.opening_info(day, &name);
                let mut act = SysAct::new(SysActType::InformOpeningDay);
                act.add_value(self.store.primary_key(), name);
                act.add_value("opening_day", day);
                act.add_value("opening_info", info);
                act
            }
            None => self.request_primary_key(),
        }
    }

    fn handle_manner(&self, belief: &BeliefState, session: &mut SessionState) -> SysAct {
        match self.focused_name(belief, session) {
            Some(name) => {
                let kind = belief.requested_manner().unwrap_or_default();
                let info = self.store.manner_info(kind, &name);
                let mut act = SysAct::new(SysActType::InformManner);
                act.add_value(self.store.primary_key(), name);
                act.add_value("manner_info", info);
                act
            }
            None => self.request_primary_key(),
        }
    }

    fn request_primary_key(&self) -> SysAct {
        let mut act = SysAct::new(SysActType::Request);
        act.add_slot(self.store.primary_key());
        act
    }

    /// Resolves the entity the conversation currently centers on: the
    /// highest-confidence informed identifier if present, else the candidate
    /// under the scroll cursor.
    pub(crate) fn focused_name(
        &self,
        belief: &BeliefState,
        session: &SessionState,
    ) -> Option<String> {
        let primary_key = self.store.primary_key();
        if belief.is_informed(&primary_key) {
            belief.best_informed_value(&primary_key).map(str::to_string)
        } else {
            session
                .current_candidate()
                .and_then(|candidate| candidate.get_str(&primary_key))
                .map(str::to_string)
        }
    }

    /// First slot in the canonical requestable order the user has neither
    /// constrained nor marked don't-care.
    fn first_open_slot(&self, belief: &BeliefState) -> Option<String> {
        let constrained: Vec<String> = belief
            .constraints()
            .into_iter()
            .map(|(slot, _)| slot)
            .collect();
        let dont_care = belief.dont_care_slots();
        self.store
            .system_requestable_slots()
            .into_iter()
            .find(|slot| {
                !constrained.contains(slot) && !dont_care.iter().any(|d| d == slot)
            })
    }
}

/// Strips quote characters that would corrupt the persisted review.
fn sanitize_review(review: &str) -> String {
    review.replace(['\'', '"'], " ")
}
