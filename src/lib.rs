pub mod agent;
pub mod benchmark;
pub mod bots;
pub mod config;
pub mod constants;
pub mod counter;
pub mod error;
pub mod geometry;
pub mod host;
pub mod intent;
pub mod reward;
pub mod rng;
pub mod runner;
pub mod script;
pub mod telemetry;
pub mod util;
pub mod world;

pub use agent::ForagerAgent;
pub use counter::AgentState;
pub use error::ScriptError;
pub use intent::{ActionRequest, Intent};
pub use reward::{RewardEvent, RewardOutcome, RewardTable};
