//! Venue record module.
//!
//! Rows returned by the venue store, with an explicitly declared attribute
//! order so that downstream selection ("first N keys") is deterministic.

mod record;

pub use record::{value_text, VenueRecord};
