//! Demo driver.
//!
//! Loads configuration, initializes tracing, and replays a scripted
//! dialogue against the configured venue store. Belief states are
//! constructed directly; language understanding and rendering live outside
//! this crate.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use venue_sherpa::adapters::memory::MemoryVenueStore;
use venue_sherpa::application::DialogRunner;
use venue_sherpa::config::AppConfig;
use venue_sherpa::domain::belief::{BeliefState, UserAct};
use venue_sherpa::domain::policy::PolicyEngine;

fn scripted_turns() -> Vec<(&'static str, BeliefState)> {
    vec![
        ("(user walks up)", BeliefState::new()),
        (
            "\"something italian, please\"",
            BeliefState::new()
                .with_act(UserAct::Inform)
                .with_inform("food_type", "italian", 0.92),
        ),
        (
            "\"in the center\"",
            BeliefState::new()
                .with_act(UserAct::Inform)
                .with_inform("food_type", "italian", 0.92)
                .with_inform("area", "center", 0.88),
        ),
        (
            "\"what's the address and phone number?\"",
            BeliefState::new()
                .with_act(UserAct::Request)
                .with_request("address")
                .with_request("phone"),
        ),
        (
            "\"are they open on monday?\"",
            BeliefState::new()
                .with_act(UserAct::AskOpeningDay)
                .with_requested_opening_day("monday"),
        ),
        (
            "\"I'd give it four and a half stars\"",
            BeliefState::new()
                .with_act(UserAct::GiveRating)
                .with_given_rating(4.5),
        ),
        (
            "\"thanks, bye!\"",
            BeliefState::new().with_act(UserAct::Thanks).with_act(UserAct::Bye),
        ),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = match &config.store.data_path {
        Some(path) => MemoryVenueStore::load_from_path(path)?,
        None => MemoryVenueStore::demo(),
    };
    let engine = PolicyEngine::new(Arc::new(store), config.policy.clone());
    let mut runner = DialogRunner::new(engine);

    let session = runner.open_session();
    for (utterance, belief) in scripted_turns() {
        println!("user:   {}", utterance);
        let act = runner.run_turn(&session, &belief)?;
        println!("system: {}", act);
    }
    runner.close_session(&session)?;

    Ok(())
}
