//! Thompson sampling bandit agent
use super::super::{Action, BetaTracker, BuildAgent, BuildAgentError, Policy, PolicyAgent};
use super::greedy_action;
use crate::envs::Environment;
use crate::Prng;
use rand::distributions::Distribution;
use rand::prelude::*;
use rand_distr::Beta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for [`BetaThompsonSampling`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BetaThompsonSamplingConfig {
    /// Number of posterior samples to draw.
    /// Takes the action with the highest mean sampled value.
    pub num_samples: usize,
}

impl BetaThompsonSamplingConfig {
    pub const fn new(num_samples: usize) -> Self {
        Self { num_samples }
    }
}

impl Default for BetaThompsonSamplingConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<E: Environment> BuildAgent<E> for BetaThompsonSamplingConfig {
    type Agent = PolicyAgent<BetaThompsonSampling, E>;

    fn build_agent(&self, environment: E, rng: &mut Prng) -> Result<Self::Agent, BuildAgentError> {
        PolicyAgent::new(
            BetaThompsonSampling::new(self.num_samples, rng.gen())?,
            environment,
        )
    }
}

/// Thompson sampling for Bernoulli rewards with a uniform Beta prior.
///
/// Rewards must be exactly 0 or 1.
#[derive(Debug, Clone)]
pub struct BetaThompsonSampling {
    num_samples: usize,
    rng: Prng,
}

impl BetaThompsonSampling {
    /// # Errors
    /// If `num_samples` is zero.
    pub fn new(num_samples: usize, seed: u64) -> Result<Self, BuildAgentError> {
        if num_samples == 0 {
            return Err(BuildAgentError::ZeroPosteriorSamples);
        }
        Ok(Self {
            num_samples,
            rng: Prng::seed_from_u64(seed),
        })
    }

    pub const fn num_samples(&self) -> usize {
        self.num_samples
    }
}

impl fmt::Display for BetaThompsonSampling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BetaThompsonSampling")?;
        if self.num_samples != 1 {
            write!(f, "({} samples)", self.num_samples)?;
        }
        Ok(())
    }
}

impl Policy for BetaThompsonSampling {
    type Tracker = BetaTracker;

    fn initial_tracker<E: Environment + ?Sized>(
        &mut self,
        _action: Action,
        _environment: &mut E,
    ) -> BetaTracker {
        BetaTracker::uniform()
    }

    fn select(&mut self, trackers: &[BetaTracker], _time: u64, _horizon: u64) -> Action {
        let num_samples = self.num_samples;
        let rng = &mut self.rng;
        greedy_action(trackers.iter().map(|tracker| {
            // Shape parameters are always >= 1
            Beta::new(tracker.alpha(), tracker.beta())
                .expect("Invalid beta parameters")
                .sample_iter(&mut *rng)
                .take(num_samples)
                .sum::<f64>()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::{testing, Agent, RewardDomainError, RunError, StatTracker};
    use super::*;
    use crate::envs::DeterministicBandit;

    fn agent(values: &[f64]) -> PolicyAgent<BetaThompsonSampling, DeterministicBandit> {
        let env = DeterministicBandit::from_values(values.iter().copied()).unwrap();
        BetaThompsonSamplingConfig::default()
            .build_agent(env, &mut Prng::seed_from_u64(0))
            .unwrap()
    }

    #[test]
    fn learns_determinstic_bandit() {
        let config = BetaThompsonSamplingConfig::default();
        testing::train_deterministic_bandit(
            |env, rng| config.build_agent(env, rng).unwrap(),
            1000,
            0.9,
        );
    }

    #[test]
    fn learns_determinstic_bandit_multiple_samples() {
        let config = BetaThompsonSamplingConfig::new(3);
        testing::train_deterministic_bandit(
            |env, rng| config.build_agent(env, rng).unwrap(),
            1000,
            0.9,
        );
    }

    #[test]
    fn zero_samples_rejected() {
        assert_eq!(
            BetaThompsonSampling::new(0, 0).unwrap_err(),
            BuildAgentError::ZeroPosteriorSamples
        );
    }

    #[test]
    fn starts_from_uniform_prior_without_sampling() {
        let agent = agent(&[0.0, 1.0, 1.0]);
        assert_eq!(agent.counts(), vec![0, 0, 0]);
        assert!(agent.trackers().iter().all(|t| *t == BetaTracker::uniform()));
    }

    #[test]
    fn update_posterior() {
        let mut agent = agent(&[0.0, 1.0]);
        let action = Action::from_index(0);
        for reward in [1.0, 0.0, 1.0] {
            agent.update(action, reward).unwrap();
        }
        let tracker = agent.trackers()[0];
        assert_eq!(tracker.alpha(), 3.0);
        assert_eq!(tracker.beta(), 2.0);
        assert_eq!(tracker.count(), 3);
        assert_eq!(agent.trackers()[1], BetaTracker::uniform());
    }

    #[test]
    fn non_binary_reward_rejected() {
        let mut agent = agent(&[0.0, 1.0]);
        assert_eq!(
            agent.update(Action::from_index(1), 0.5),
            Err(RewardDomainError { reward: 0.5 })
        );
        assert_eq!(agent.trackers()[1], BetaTracker::uniform());
    }

    #[test]
    fn run_on_non_binary_rewards_fails() {
        let mut agent = agent(&[0.5]);
        assert_eq!(
            agent.run(10).unwrap_err(),
            RunError::RewardDomain(RewardDomainError { reward: 0.5 })
        );
    }

    #[test]
    fn reset_restores_prior() {
        let mut agent = agent(&[0.0, 1.0]);
        agent.run(20).unwrap();
        agent.reset();
        assert_eq!(agent.counts(), vec![0, 0]);
        assert!(agent.history().is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(
            BetaThompsonSampling::new(1, 0).unwrap().to_string(),
            "BetaThompsonSampling"
        );
        assert_eq!(
            BetaThompsonSampling::new(4, 0).unwrap().to_string(),
            "BetaThompsonSampling(4 samples)"
        );
    }
}
