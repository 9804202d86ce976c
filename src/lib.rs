//! Venue Sherpa - Rule-based dialogue policy engine
//!
//! This crate decides, turn by turn, what a venue-search assistant should
//! do next: ask a clarifying question, offer a venue, or handle one of the
//! auxiliary flows (ratings, reviews, directions, opening hours). Input is
//! a structured belief state; output is a structured system action for a
//! downstream rendering layer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
