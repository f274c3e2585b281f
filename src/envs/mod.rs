//! Multi-armed bandit environments
mod bandits;
mod builder;

pub use bandits::{
    Bandit, BanditConfig, BernoulliBandit, BernoulliBanditConfig, DeterministicBandit,
};
pub use builder::{BuildEnv, BuildEnvError};

use crate::agents::Action;

/// A reward-generating environment with a fixed, finite set of actions.
///
/// This is the only view of the environment available to an agent.
pub trait Environment {
    /// Number of available actions `K`; actions are `1 ..= K`.
    fn num_actions(&self) -> usize;

    /// Sample a reward for taking `action`.
    ///
    /// The action must be one of the environment's actions.
    fn sample(&mut self, action: Action) -> f64;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn num_actions(&self) -> usize {
        E::num_actions(self)
    }
    fn sample(&mut self, action: Action) -> f64 {
        E::sample(self, action)
    }
}

impl<E: Environment + ?Sized> Environment for &'_ mut E {
    fn num_actions(&self) -> usize {
        E::num_actions(self)
    }
    fn sample(&mut self, action: Action) -> f64 {
        E::sample(self, action)
    }
}

/// The true expected reward of each action.
///
/// Used only for evaluation (regret), never by agent decision logic.
pub trait ExpectedRewards {
    /// Expected reward of each action, indexed by [`Action::index`].
    fn expected_rewards(&self) -> Vec<f64>;

    /// The largest expected reward of any action.
    ///
    /// Returns `None` if there are no actions.
    fn best_expected_reward(&self) -> Option<f64> {
        self.expected_rewards().into_iter().reduce(f64::max)
    }
}

/// Expected rewards listed directly, one per action.
impl ExpectedRewards for [f64] {
    fn expected_rewards(&self) -> Vec<f64> {
        self.to_vec()
    }
}
