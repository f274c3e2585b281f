//! Multi-armed bandit agents
pub mod bandits;
mod builder;
mod error;
mod history;
mod policy;
pub mod stats;
#[cfg(test)]
pub mod testing;

pub use bandits::{
    Ada, AsymptoticallyOptimal, BetaThompsonSampling, BetaThompsonSamplingConfig, BonusKind,
    ConfidenceBonus, EpsilonGreedy, EpsilonGreedyConfig, Moss, Ucb, Ucb1, UcbConfig,
};
pub use builder::BuildAgent;
pub use error::{BuildAgentError, RewardDomainError, RunError};
pub use history::{History, Step};
pub use policy::{Policy, PolicyAgent};
pub use stats::{BetaTracker, MeanTracker, StatTracker};

use std::fmt;

/// One of the `K` actions available at every step.
///
/// Actions are identified by `1 ..= K` and stored by their zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action(usize);

impl Action {
    /// The action at zero-based position `index`.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The action with one-based identifier `id`, if `id >= 1`.
    pub const fn from_id(id: usize) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self(id - 1))
        }
    }

    /// Zero-based position of this action.
    pub const fn index(self) -> usize {
        self.0
    }

    /// One-based identifier of this action.
    pub const fn id(self) -> usize {
        self.0 + 1
    }

    /// All `num_actions` actions in order.
    pub fn all(num_actions: usize) -> impl Iterator<Item = Self> {
        (0..num_actions).map(Self::from_index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A multi-armed bandit agent.
///
/// Owns its per-action statistics, its history and its reward source.
/// Each step of a run chooses an action, observes a reward, updates the
/// statistics and records the step.
pub trait Agent {
    /// Number of available actions `K`.
    fn num_actions(&self) -> usize;

    /// Choose the action for step `time` (starting from 1) of the current run.
    ///
    /// A `time` of 0 is treated as 1.
    ///
    /// Always returns one of the agent's actions.
    /// Ties are broken in favour of the action with the lowest id.
    fn policy(&mut self, time: u64) -> Action;

    /// Update the statistics of `action` with an observed reward.
    ///
    /// # Errors
    /// If the reward is outside of the support assumed by the agent.
    ///
    /// # Panics
    /// If `action` is not one of the agent's actions.
    fn update(&mut self, action: Action, reward: f64) -> Result<(), RewardDomainError>;

    /// Restore the initial (uninformed) statistics and clear the history.
    ///
    /// Does not change the action set or the reward source.
    fn reset(&mut self);

    /// Run for `horizon` steps and return the history of this run.
    ///
    /// Statistics carry over from earlier runs unless [`Agent::reset`] is called;
    /// the history only covers this run.
    ///
    /// # Errors
    /// If `horizon` is zero (before any sampling) or a reward is outside the agent's support.
    fn run(&mut self, horizon: u64) -> Result<&History, RunError>;

    /// The history of the current run.
    fn history(&self) -> &History;

    /// Number of reward observations of each action, including warm-start pulls.
    fn counts(&self) -> Vec<u64>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn num_actions(&self) -> usize {
        A::num_actions(self)
    }
    fn policy(&mut self, time: u64) -> Action {
        A::policy(self, time)
    }
    fn update(&mut self, action: Action, reward: f64) -> Result<(), RewardDomainError> {
        A::update(self, action, reward)
    }
    fn reset(&mut self) {
        A::reset(self)
    }
    fn run(&mut self, horizon: u64) -> Result<&History, RunError> {
        A::run(self, horizon)
    }
    fn history(&self) -> &History {
        A::history(self)
    }
    fn counts(&self) -> Vec<u64> {
        A::counts(self)
    }
}
