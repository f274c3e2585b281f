//! Definition structures
mod agent;

pub use agent::{AgentDef, DynAgent};
