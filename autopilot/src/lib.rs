pub mod benchmark;
pub mod bots;
pub mod config;
pub mod engine;
pub mod runner;
pub mod util;

pub use config::EngineConfig;
pub use engine::{Decision, DecisionReason, Engine, EngineState, Objective};
