//! Policy decision module.
//!
//! The turn-level decision core: dispatches meta acts, narrows candidates
//! through clarifying questions, and builds inform payloads. One decision
//! per invocation; session state is passed in explicitly.

mod dispatcher;
mod domain_action;
mod inform;
mod question;

pub use dispatcher::{suppress_filler, PolicyEngine, META_ACT_PRIORITY};

use serde::{Deserialize, Serialize};

/// Default turn budget per session.
pub const DEFAULT_MAX_TURNS: u32 = 25;

/// Default cap on attribute keys echoed in a detail inform.
///
/// Attributes beyond the cap are silently dropped; the rendering layer is
/// sized for this many detail slots.
pub const DEFAULT_DETAIL_SLOT_LIMIT: usize = 4;

/// Tunable policy behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hard turn budget; reaching it forces a parting action.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Cap on attribute keys in a detail inform.
    #[serde(default = "default_detail_slot_limit")]
    pub detail_slot_limit: usize,
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

fn default_detail_slot_limit() -> usize {
    DEFAULT_DETAIL_SLOT_LIMIT
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            detail_slot_limit: DEFAULT_DETAIL_SLOT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_constants() {
        let config = PolicyConfig::default();
        assert_eq!(config.max_turns, 25);
        assert_eq!(config.detail_slot_limit, 4);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: PolicyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PolicyConfig::default());
    }
}
