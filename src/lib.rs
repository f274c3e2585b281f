//! Multi-armed bandit agents and regret experiments.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::for_kv_map)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)]
pub mod agents;
pub mod defs;
pub mod envs;
mod error;
pub mod experiment;
pub mod logging;
pub mod utils;

pub use agents::{Action, Agent, History, Step};
pub use defs::AgentDef;
pub use envs::{Environment, ExpectedRewards};
pub use error::BanditError;
pub use experiment::{run_experiment, ExperimentConfig, ExperimentRunner, RegretSummary};

/// Pseudo-random number generator used by agents and environments.
pub type Prng = rand_chacha::ChaCha8Rng;
