use super::{BuildEnv, BuildEnvError, Environment, ExpectedRewards};
use crate::agents::Action;
use crate::utils::distributions::{Bernoulli, Deterministic, Mean};
use crate::Prng;
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A multi-armed bandit
///
/// The distribution of each arm has type `D`.
#[derive(Debug, Clone)]
pub struct Bandit<D> {
    distributions: Vec<D>,
    rng: Prng,
}

/// A multi-armed bandit with Bernoulli-distributed (0 or 1) arm rewards.
pub type BernoulliBandit = Bandit<Bernoulli>;

/// A multi-armed bandit where each arm always gives the same reward.
pub type DeterministicBandit = Bandit<Deterministic>;

impl<D> Bandit<D> {
    /// Create a bandit from its arm distributions.
    ///
    /// # Errors
    /// If `distributions` is empty.
    pub fn new(distributions: Vec<D>, seed: u64) -> Result<Self, BuildEnvError> {
        if distributions.is_empty() {
            return Err(BuildEnvError::NoActions);
        }
        Ok(Self {
            distributions,
            rng: Prng::seed_from_u64(seed),
        })
    }
}

impl<D: Mean> fmt::Display for Bandit<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bandit({:?})", self.expected_rewards())
    }
}

impl<D: Distribution<f64>> Environment for Bandit<D> {
    fn num_actions(&self) -> usize {
        self.distributions.len()
    }

    fn sample(&mut self, action: Action) -> f64 {
        self.distributions[action.index()].sample(&mut self.rng)
    }
}

impl<D: Mean> ExpectedRewards for Bandit<D> {
    fn expected_rewards(&self) -> Vec<f64> {
        self.distributions.iter().map(Mean::mean).collect()
    }
}

impl BernoulliBandit {
    /// Create a Bernoulli bandit from the success probability of each arm.
    ///
    /// # Errors
    /// If there are no arms or any probability is outside `[0, 1]`.
    pub fn from_probabilities<I>(probabilities: I, seed: u64) -> Result<Self, BuildEnvError>
    where
        I: IntoIterator<Item = f64>,
    {
        let distributions = probabilities
            .into_iter()
            .map(Bernoulli::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(distributions, seed)
    }
}

impl DeterministicBandit {
    /// Create a deterministic bandit from the reward of each arm.
    ///
    /// # Errors
    /// If there are no arms.
    pub fn from_values<I>(values: I) -> Result<Self, BuildEnvError>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(values.into_iter().map(Deterministic::new).collect(), 0)
    }
}

/// Configuration for a [`BernoulliBandit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliBanditConfig {
    /// Success probability of each arm.
    pub probabilities: Vec<f64>,
}

impl BernoulliBanditConfig {
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self { probabilities }
    }
}

impl Default for BernoulliBanditConfig {
    fn default() -> Self {
        Self::new(vec![0.5, 0.8, 0.2])
    }
}

impl BuildEnv for BernoulliBanditConfig {
    type Environment = BernoulliBandit;

    fn build_env(&self, rng: &mut Prng) -> Result<Self::Environment, BuildEnvError> {
        BernoulliBandit::from_probabilities(self.probabilities.iter().copied(), rng.gen())
    }
}

/// Configuration for a [`Bandit`] with fixed arm distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct BanditConfig<D> {
    pub distributions: Vec<D>,
}

impl<D> BanditConfig<D> {
    pub fn new(distributions: Vec<D>) -> Self {
        Self { distributions }
    }
}

impl<D> BuildEnv for BanditConfig<D>
where
    D: Distribution<f64> + Mean + Clone,
{
    type Environment = Bandit<D>;

    fn build_env(&self, rng: &mut Prng) -> Result<Self::Environment, BuildEnvError> {
        Bandit::new(self.distributions.clone(), rng.gen())
    }
}

#[cfg(test)]
mod bernoulli_bandit {
    use super::*;

    #[test]
    fn rewards_are_binary() {
        let mut env = BernoulliBandit::from_probabilities([0.2, 0.7], 1).unwrap();
        for i in 0..1000 {
            let reward = env.sample(Action::from_index(i % 2));
            assert!(reward == 0.0 || reward == 1.0);
        }
    }

    #[test]
    fn certain_arms() {
        let mut env = BernoulliBandit::from_probabilities([0.0, 1.0], 2).unwrap();
        for _ in 0..100 {
            assert_eq!(env.sample(Action::from_index(0)), 0.0);
            assert_eq!(env.sample(Action::from_index(1)), 1.0);
        }
    }

    #[test]
    fn expected_rewards() {
        let env = BernoulliBandit::from_probabilities([0.5, 0.8, 0.2], 0).unwrap();
        assert_eq!(env.num_actions(), 3);
        assert_eq!(env.expected_rewards(), vec![0.5, 0.8, 0.2]);
        assert_eq!(env.best_expected_reward(), Some(0.8));
    }

    #[test]
    fn empirical_mean_near_probability() {
        let mut env = BernoulliBandit::from_probabilities([0.3], 3).unwrap();
        let n = 10_000;
        let mean = (0..n).map(|_| env.sample(Action::from_index(0))).sum::<f64>() / n as f64;
        assert!((mean - 0.3).abs() < 0.03);
    }

    #[test]
    fn invalid_probability() {
        assert!(matches!(
            BernoulliBandit::from_probabilities([0.5, 1.2], 0),
            Err(BuildEnvError::InvalidProbability(_))
        ));
    }

    #[test]
    fn no_arms() {
        assert!(matches!(
            BernoulliBandit::from_probabilities(Vec::<f64>::new(), 0),
            Err(BuildEnvError::NoActions)
        ));
    }

    #[test]
    fn config_builds_same_structure() {
        let config = BernoulliBanditConfig::default();
        let mut rng = Prng::seed_from_u64(0);
        let env = config.build_env(&mut rng).unwrap();
        assert_eq!(env.expected_rewards(), config.probabilities);
    }
}
