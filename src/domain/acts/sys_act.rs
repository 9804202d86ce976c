//! System actions emitted by the policy engine.
//!
//! A `SysAct` is a tag plus an insertion-ordered slot -> values mapping.
//! The rendering layer is contractually expected to have a template for
//! every (tag, slot-set) combination the engine can produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel identifier emitted when no entity matches.
pub const NONE_VALUE: &str = "none";

/// Sentinel emitted for an attribute whose value is missing or empty.
pub const NOT_AVAILABLE: &str = "not available";

/// The fixed enumeration of actions the system can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SysActType {
    /// Opening greeting at the start of a dialogue.
    Welcome,
    /// Parting message; ends the dialogue.
    Bye,
    /// Ask whether the user wants anything else.
    RequestMore,
    /// Signal that the input could not be acted on.
    Bad,
    /// Guide a fresh user towards an open constraint slot.
    GuideUser,
    /// Ask the user to fill a specific slot.
    Request,
    /// Offer or describe a specific venue.
    InformByName,
    /// Offer the next candidate from the cached alternatives.
    InformByAlternatives,
    /// Confirm that a rating was recorded.
    ConfirmGiveRating,
    /// Invite the user to dictate their review.
    AskWriteReview,
    /// Confirm that a review was recorded.
    ConfirmWriteReview,
    /// Ask where the user is starting from.
    AskStartPoint,
    /// Ask how the user wants to travel.
    AskDistanceManner,
    /// Report distance and duration to a venue.
    InformDistance,
    /// Report that the travel manner is unsupported.
    BadTravelManner,
    /// Report that the start or venue address could not be resolved.
    BadAddress,
    /// Report opening information for a requested day.
    InformOpeningDay,
    /// Report whether a venue supports a service manner.
    InformManner,
    /// Ask the user what they actually want after a rejection.
    WhatDoYouWant,
}

impl fmt::Display for SysActType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SysActType::Welcome => "welcome",
            SysActType::Bye => "bye",
            SysActType::RequestMore => "request_more",
            SysActType::Bad => "bad",
            SysActType::GuideUser => "guide_user",
            SysActType::Request => "request",
            SysActType::InformByName => "inform_by_name",
            SysActType::InformByAlternatives => "inform_by_alternatives",
            SysActType::ConfirmGiveRating => "confirm_give_rating",
            SysActType::AskWriteReview => "ask_write_review",
            SysActType::ConfirmWriteReview => "confirm_write_review",
            SysActType::AskStartPoint => "ask_start_point",
            SysActType::AskDistanceManner => "ask_distance_manner",
            SysActType::InformDistance => "inform_distance",
            SysActType::BadTravelManner => "bad_travel_manner",
            SysActType::BadAddress => "bad_address",
            SysActType::InformOpeningDay => "inform_opening_day",
            SysActType::InformManner => "inform_manner",
            SysActType::WhatDoYouWant => "what_do_you_want",
        };
        write!(f, "{}", s)
    }
}

/// A system action: tag plus ordered slot -> values mapping.
///
/// Slots keep their insertion order and may carry zero values (a bare
/// `Request` names the slot without a value) or several (multi-valued
/// constraints echoed back to the user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysAct {
    act_type: SysActType,
    slot_values: Vec<(String, Vec<String>)>,
}

impl SysAct {
    /// Creates an action of the given type with no slots.
    pub fn new(act_type: SysActType) -> Self {
        Self {
            act_type,
            slot_values: Vec::new(),
        }
    }

    /// Returns the action tag.
    pub fn act_type(&self) -> SysActType {
        self.act_type
    }

    /// Adds a slot with no value, keeping it if already present.
    pub fn add_slot(&mut self, slot: impl Into<String>) {
        let slot = slot.into();
        if !self.slot_values.iter().any(|(s, _)| *s == slot) {
            self.slot_values.push((slot, Vec::new()));
        }
    }

    /// Appends a value to a slot, creating the slot at the end of the
    /// ordering if it is new.
    pub fn add_value(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        let slot = slot.into();
        let value = value.into();
        match self.slot_values.iter_mut().find(|(s, _)| *s == slot) {
            Some((_, values)) => values.push(value),
            None => self.slot_values.push((slot, vec![value])),
        }
    }

    /// Returns the values recorded for a slot.
    ///
    /// An empty slice means the slot is present without values; `None`
    /// means the slot is absent.
    pub fn values(&self, slot: &str) -> Option<&[String]> {
        self.slot_values
            .iter()
            .find(|(s, _)| s == slot)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the first value recorded for a slot, if any.
    pub fn first_value(&self, slot: &str) -> Option<&str> {
        self.values(slot).and_then(|values| values.first()).map(String::as_str)
    }

    /// Returns the slot names in insertion order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slot_values.iter().map(|(slot, _)| slot.as_str())
    }

    /// Returns true if the action carries the given slot.
    pub fn has_slot(&self, slot: &str) -> bool {
        self.slot_values.iter().any(|(s, _)| s == slot)
    }
}

impl fmt::Display for SysAct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.act_type)?;
        let mut first = true;
        for (slot, values) in &self.slot_values {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            if values.is_empty() {
                write!(f, "{}", slot)?;
            } else {
                write!(f, "{}=\"{}\"", slot, values.join("|"))?;
            }
        }
        write!(f, ")")
    }
}
