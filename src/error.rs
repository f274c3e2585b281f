//! Error type
use crate::agents::{BuildAgentError, RewardDomainError, RunError};
use crate::envs::BuildEnvError;
use crate::experiment::ExperimentError;
use crate::logging::LogError;
use thiserror::Error;

/// Error from the bandit crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    #[error("error building agent")]
    BuildAgent(#[from] BuildAgentError),
    #[error("error building environment")]
    BuildEnv(#[from] BuildEnvError),
    #[error(transparent)]
    RewardDomain(#[from] RewardDomainError),
    #[error("error running agent")]
    Run(#[from] RunError),
    #[error("error running experiment")]
    Experiment(#[from] ExperimentError),
    #[error("error logging statistics")]
    Log(#[from] LogError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn converts_with_source() {
        let error: BanditError = RunError::from(RewardDomainError { reward: 0.5 }).into();
        assert_eq!(
            error,
            BanditError::Run(RunError::RewardDomain(RewardDomainError { reward: 0.5 }))
        );
        assert!(error.source().is_some());
    }
}
