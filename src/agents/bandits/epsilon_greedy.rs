//! Epsilon-greedy bandit agent
use super::super::{Action, BuildAgent, BuildAgentError, MeanTracker, Policy, PolicyAgent};
use super::{greedy_action, sampled_mean_tracker};
use crate::envs::Environment;
use crate::Prng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for an [`EpsilonGreedy`] agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedyConfig {
    /// Probability of taking a uniformly random action. In `[0, 1]`.
    pub epsilon: f64,
}

impl EpsilonGreedyConfig {
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl<E: Environment> BuildAgent<E> for EpsilonGreedyConfig {
    type Agent = PolicyAgent<EpsilonGreedy, E>;

    fn build_agent(&self, environment: E, rng: &mut Prng) -> Result<Self::Agent, BuildAgentError> {
        PolicyAgent::new(EpsilonGreedy::new(self.epsilon, rng.gen())?, environment)
    }
}

/// Epsilon-greedy policy.
///
/// With probability epsilon takes a uniformly random action,
/// otherwise the action with the highest mean observed reward.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: Prng,
}

impl EpsilonGreedy {
    /// # Errors
    /// If `epsilon` is not in `[0, 1]`.
    pub fn new(epsilon: f64, seed: u64) -> Result<Self, BuildAgentError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BuildAgentError::InvalidEpsilon(epsilon));
        }
        Ok(Self {
            epsilon,
            rng: Prng::seed_from_u64(seed),
        })
    }

    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl fmt::Display for EpsilonGreedy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EpsilonGreedy(ϵ={})", self.epsilon)
    }
}

impl Policy for EpsilonGreedy {
    type Tracker = MeanTracker;

    fn initial_tracker<E: Environment + ?Sized>(
        &mut self,
        action: Action,
        environment: &mut E,
    ) -> MeanTracker {
        sampled_mean_tracker(action, environment)
    }

    fn select(&mut self, trackers: &[MeanTracker], _time: u64, _horizon: u64) -> Action {
        if self.rng.gen::<f64>() < self.epsilon {
            Action::from_index(self.rng.gen_range(0..trackers.len()))
        } else {
            greedy_action(trackers.iter().map(MeanTracker::mean))
        }
    }
}
