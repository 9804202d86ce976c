//! User action tags.
//!
//! One tag per kind of dialogue act the language-understanding front end can
//! attribute to the user in a single turn. A turn may carry several tags.

use serde::{Deserialize, Serialize};

/// A dialogue act performed by the user in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAct {
    /// The user supplied a constraint value (carried in the informs map).
    Inform,
    /// The user rejected a previous offer or constraint.
    NegativeInform,
    /// The user asked for the value of one or more slots.
    Request,
    /// Greeting.
    Hello,
    /// Parting.
    Bye,
    /// Politeness filler.
    Thanks,
    /// Unintelligible or out-of-domain input.
    Bad,
    /// The user asked to see a different candidate.
    RequestAlternatives,
    /// The user switched into this domain.
    SelectDomain,
    /// The user asked to start the dialogue over.
    NewDialogue,
    /// The user gave a rating for a venue.
    GiveRating,
    /// The user asked to write a review.
    WriteReview,
    /// The user submitted review text.
    WrittenReview,
    /// The user asked how far away a venue is.
    AskDistance,
    /// The user supplied the start point for a distance query.
    InformStartPoint,
    /// The user supplied the travel manner for a distance query.
    InformDistanceManner,
    /// The user asked about opening hours on a given day.
    AskOpeningDay,
    /// The user asked whether a venue supports a service manner.
    AskManner,
}

impl UserAct {
    /// Returns true for politeness/filler acts that must not mask a
    /// substantive act occurring in the same turn.
    pub fn is_filler(&self) -> bool {
        matches!(self, UserAct::Thanks | UserAct::Bad | UserAct::Hello)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filler_acts_are_thanks_bad_hello() {
        assert!(UserAct::Thanks.is_filler());
        assert!(UserAct::Bad.is_filler());
        assert!(UserAct::Hello.is_filler());
    }

    #[test]
    fn substantive_acts_are_not_filler() {
        assert!(!UserAct::Inform.is_filler());
        assert!(!UserAct::Request.is_filler());
        assert!(!UserAct::Bye.is_filler());
        assert!(!UserAct::RequestAlternatives.is_filler());
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&UserAct::RequestAlternatives).unwrap();
        assert_eq!(json, "\"request_alternatives\"");
    }

    #[test]
    fn deserializes_from_snake_case() {
        let act: UserAct = serde_json::from_str("\"new_dialogue\"").unwrap();
        assert_eq!(act, UserAct::NewDialogue);
    }
}
