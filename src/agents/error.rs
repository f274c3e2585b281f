//! Agent errors
use thiserror::Error;

/// Error building an agent
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BuildAgentError {
    #[error("agent must have at least one action")]
    NoActions,
    #[error("epsilon must be in [0, 1]; got {0}")]
    InvalidEpsilon(f64),
    #[error("number of posterior samples must be at least 1")]
    ZeroPosteriorSamples,
}

/// A reward outside of the support assumed by an agent's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("reward {reward} is outside the support {{0, 1}} of a Beta-Bernoulli posterior")]
pub struct RewardDomainError {
    pub reward: f64,
}

/// Error while running an agent
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RunError {
    #[error("horizon must be at least 1")]
    ZeroHorizon,
    #[error(transparent)]
    RewardDomain(#[from] RewardDomainError),
}
