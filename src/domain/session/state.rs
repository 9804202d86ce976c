//! Per-session dialogue memory.

use serde::{Deserialize, Serialize};

use crate::domain::acts::SysActType;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::venue::VenueRecord;

/// Outcome of advancing the candidate scroll cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    /// The candidate list is empty; there is nothing to scroll to.
    Empty,
    /// The cursor landed on a candidate.
    At {
        /// Index of the candidate now under the cursor.
        index: usize,
        /// True when this is the first candidate offered from a fresh cache.
        first: bool,
        /// True when the request ran past the end and the cursor was
        /// clamped to the last candidate.
        exhausted: bool,
    },
}

/// Mutable per-conversation state.
///
/// # Invariants
///
/// - The scroll cursor is a valid index into the candidate list whenever the
///   list is non-empty, and absent while it is empty.
/// - The turn count never decreases; once it reaches the budget, every
///   subsequent decision is a parting action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    id: SessionId,
    started_at: Timestamp,
    turn_count: u32,
    first_turn: bool,
    max_turns: u32,
    candidates: Vec<VenueRecord>,
    cursor: Option<usize>,
    last_act: Option<SysActType>,
    last_request_slot: Option<String>,
    last_offer: Option<String>,
}

impl SessionState {
    /// Creates a fresh session with the given turn budget.
    pub fn new(max_turns: u32) -> Self {
        Self {
            id: SessionId::new(),
            started_at: Timestamp::now(),
            turn_count: 0,
            first_turn: true,
            max_turns,
            candidates: Vec::new(),
            cursor: None,
            last_act: None,
            last_request_slot: None,
            last_offer: None,
        }
    }

    /// Resets everything except the identity and the turn budget, as on an
    /// explicit "new dialogue" signal.
    pub fn reset(&mut self) {
        self.turn_count = 0;
        self.first_turn = true;
        self.candidates.clear();
        self.cursor = None;
        self.last_act = None;
        self.last_request_slot = None;
        self.last_offer = None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn is_first_turn(&self) -> bool {
        self.first_turn
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Returns true once the turn budget has been spent.
    pub fn budget_exhausted(&self) -> bool {
        self.turn_count >= self.max_turns
    }

    pub fn last_act(&self) -> Option<SysActType> {
        self.last_act
    }

    pub fn last_request_slot(&self) -> Option<&str> {
        self.last_request_slot.as_deref()
    }

    /// Identifier of the last entity offered to the user, if any.
    pub fn last_offer(&self) -> Option<&str> {
        self.last_offer.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Turn bookkeeping
    // ─────────────────────────────────────────────────────────────────────

    /// Advances the turn counter; called exactly once per decision.
    pub fn begin_turn(&mut self) {
        self.turn_count += 1;
    }

    /// Consumes the first-turn flag.
    pub fn clear_first_turn(&mut self) {
        self.first_turn = false;
    }

    /// Records the act emitted this turn.
    pub fn record_act(&mut self, act_type: SysActType) {
        self.last_act = Some(act_type);
    }

    /// Records the slot the system just asked the user about.
    pub fn record_request_slot(&mut self, slot: impl Into<String>) {
        self.last_request_slot = Some(slot.into());
    }

    /// Records the identifier of the entity just offered.
    pub fn record_offer(&mut self, id: impl Into<String>) {
        self.last_offer = Some(id.into());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Candidate list and scroll cursor
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the cached candidate list.
    pub fn candidates(&self) -> &[VenueRecord] {
        &self.candidates
    }

    /// Returns true when no candidate list is cached.
    pub fn has_no_candidates(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the candidate currently under the cursor, if any.
    pub fn current_candidate(&self) -> Option<&VenueRecord> {
        self.cursor.and_then(|index| self.candidates.get(index))
    }

    /// Returns the cursor position, if the list is non-empty and a
    /// candidate has been pointed at.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Replaces the candidate list wholesale.
    ///
    /// `cursor` is clamped into the valid range when the list is non-empty
    /// and discarded otherwise.
    pub fn replace_candidates(&mut self, candidates: Vec<VenueRecord>, cursor: Option<usize>) {
        self.candidates = candidates;
        self.cursor = match cursor {
            Some(index) if !self.candidates.is_empty() => {
                Some(index.min(self.candidates.len() - 1))
            }
            _ => None,
        };
    }

    /// Moves the cursor to the next candidate.
    ///
    /// A fresh cache (no cursor yet) lands on index 0. Running past the end
    /// clamps to the last valid index and reports exhaustion.
    pub fn advance_cursor(&mut self) -> Scroll {
        if self.candidates.is_empty() {
            return Scroll::Empty;
        }
        let last = self.candidates.len() - 1;
        match self.cursor {
            None => {
                self.cursor = Some(0);
                Scroll::At {
                    index: 0,
                    first: true,
                    exhausted: false,
                }
            }
            Some(index) if index < last => {
                self.cursor = Some(index + 1);
                Scroll::At {
                    index: index + 1,
                    first: false,
                    exhausted: false,
                }
            }
            Some(_) => {
                self.cursor = Some(last);
                Scroll::At {
                    index: last,
                    first: false,
                    exhausted: true,
                }
            }
        }
    }
}
