//! Next-question selection.
//!
//! Picks the unfilled attribute whose answer narrows the remaining
//! candidates the most. Without labels there is no true entropy to compute;
//! the proxy is: a non-binary slot that differs across candidates beats any
//! binary slot, and among binary slots the most even split wins.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::domain::belief::BeliefState;
use crate::domain::venue::{value_text, VenueRecord};
use crate::ports::VenueStore;

use super::PolicyEngine;

/// Attribute -> values across all result rows, primary key excluded.
pub(crate) type ValueTable = HashMap<String, Vec<Value>>;

/// Collects every non-identifier attribute's values across the result rows.
pub(crate) fn value_table(results: &[VenueRecord], primary_key: &str) -> ValueTable {
    let mut table = ValueTable::new();
    for row in results {
        for (attribute, value) in row.fields() {
            if attribute != primary_key {
                table.entry(attribute.clone()).or_default().push(value.clone());
            }
        }
    }
    table
}

impl PolicyEngine {
    /// Chooses the next slot to ask about, or `None` when no remaining slot
    /// would discriminate between the candidates.
    pub(crate) fn next_request(
        &self,
        table: &ValueTable,
        belief: &BeliefState,
    ) -> Option<String> {
        let constrained: Vec<String> = belief
            .constraints()
            .into_iter()
            .map(|(slot, _)| slot)
            .collect();
        let dont_care: Vec<String> = belief
            .dont_care_slots()
            .into_iter()
            .map(str::to_string)
            .collect();

        let open: Vec<String> = self
            .store()
            .system_requestable_slots()
            .into_iter()
            .filter(|slot| !constrained.contains(slot) && !dont_care.contains(slot))
            .collect();

        let (binary, non_binary): (Vec<String>, Vec<String>) = open
            .into_iter()
            .partition(|slot| self.store().possible_values(slot).len() == 2);

        // A non-binary slot whose values differ across candidates is asked
        // about first, in canonical order.
        for slot in &non_binary {
            if let Some(values) = table.get(slot) {
                let distinct: HashSet<String> = values.iter().map(value_text).collect();
                if distinct.len() > 1 {
                    debug!(slot = %slot, "non-binary slot discriminates candidates");
                    return Some(slot.clone());
                }
            }
        }

        self.most_even_binary_split(&binary, table)
    }

    /// Among binary slots with both values represented, picks the slot with
    /// the most even value split; ties resolve to the earliest slot in
    /// canonical order.
    fn most_even_binary_split(&self, binary: &[String], table: &ValueTable) -> Option<String> {
        let mut best: Option<(String, usize)> = None;
        for slot in binary {
            let possible = self.store().possible_values(slot);
            let (first, second) = match possible.as_slice() {
                [first, second] => (first, second),
                _ => continue,
            };
            let Some(values) = table.get(slot) else { continue };
            let first_count = values.iter().filter(|v| value_text(v) == *first).count();
            let second_count = values.iter().filter(|v| value_text(v) == *second).count();
            // A value that never occurs makes the question uninformative.
            if first_count == 0 || second_count == 0 {
                continue;
            }
            let diff = first_count.abs_diff(second_count);
            let better = match &best {
                Some((_, best_diff)) => diff < *best_diff,
                None => true,
            };
            if better {
                best = Some((slot.clone(), diff));
            }
        }
        let chosen = best.map(|(slot, _)| slot);
        if let Some(slot) = &chosen {
            debug!(slot = %slot, "binary slot with most even split");
        }
        chosen
    }
}
