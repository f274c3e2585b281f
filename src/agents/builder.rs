use super::{Agent, BuildAgentError};
use crate::Prng;

/// Build an agent instance.
pub trait BuildAgent<E> {
    type Agent: Agent;

    /// Build an agent that samples rewards from the given environment.
    ///
    /// # Args
    /// * `environment` - The reward source of the agent. Owned by the agent.
    /// * `rng` - Random number generator from which the agent derives its own random stream.
    fn build_agent(&self, environment: E, rng: &mut Prng) -> Result<Self::Agent, BuildAgentError>;
}
