//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.

mod venue_store;

pub use venue_store::{RouteEstimate, VenueStore};
