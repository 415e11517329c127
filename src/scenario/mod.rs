// src/scenario/mod.rs
pub mod runner;

pub use runner::{run_batch, run_scenario, ScenarioOutcome};
