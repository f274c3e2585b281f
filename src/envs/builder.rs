//! Environment builder traits
use super::{Environment, ExpectedRewards};
use crate::Prng;
use rand::distributions::BernoulliError;
use thiserror::Error;

/// Build an [`Environment`].
///
/// Environment is an associated type rather than a generic parameter so that
/// a given configuration constructs exactly one kind of environment.
pub trait BuildEnv {
    /// Type of environment to build
    type Environment: Environment + ExpectedRewards;

    /// Build an environment instance.
    ///
    /// # Args
    /// * `rng` - Random number generator from which the environment derives its own reward
    ///           sampling stream.
    fn build_env(&self, rng: &mut Prng) -> Result<Self::Environment, BuildEnvError>;
}

/// Error building an environment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildEnvError {
    #[error("environment must have at least one action")]
    NoActions,
    #[error(transparent)]
    InvalidProbability(#[from] BernoulliError),
}
