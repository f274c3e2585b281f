//! Generic bandit agent parameterized by its decision policy.
use super::{Action, Agent, BuildAgentError, History, RewardDomainError, RunError, StatTracker};
use crate::envs::Environment;
use std::fmt;

/// A rule for choosing actions from per-action statistics.
pub trait Policy {
    /// Statistics kept for each action.
    type Tracker: StatTracker;

    /// Initial statistics for `action`.
    ///
    /// Called for every action, in order, when the agent is created or reset.
    /// May sample `action` from the environment to warm-start its statistics.
    fn initial_tracker<E: Environment + ?Sized>(
        &mut self,
        action: Action,
        environment: &mut E,
    ) -> Self::Tracker;

    /// Choose an action.
    ///
    /// # Args
    /// * `trackers` - Statistics of every action, indexed by [`Action::index`]. Non-empty.
    /// * `time` - The current step, starting from 1.
    /// * `horizon` - Total number of steps in the run; at least `time`.
    fn select(&mut self, trackers: &[Self::Tracker], time: u64, horizon: u64) -> Action;
}

/// A bandit agent that chooses actions with a [`Policy`] and samples rewards from `E`.
#[derive(Debug, Clone)]
pub struct PolicyAgent<P: Policy, E> {
    policy: P,
    environment: E,
    trackers: Vec<P::Tracker>,
    history: History,
    horizon: u64,
}

impl<P: Policy, E: Environment> PolicyAgent<P, E> {
    /// Create an agent and initialize the statistics of every action.
    ///
    /// # Errors
    /// If the environment has no actions.
    pub fn new(policy: P, environment: E) -> Result<Self, BuildAgentError> {
        if environment.num_actions() == 0 {
            return Err(BuildAgentError::NoActions);
        }
        let mut agent = Self {
            policy,
            environment,
            trackers: Vec::new(),
            history: History::new(),
            horizon: 0,
        };
        agent.initialize();
        Ok(agent)
    }

    fn initialize(&mut self) {
        let policy = &mut self.policy;
        let environment = &mut self.environment;
        self.trackers = Action::all(environment.num_actions())
            .map(|action| policy.initial_tracker(action, environment))
            .collect();
    }
}

impl<P: Policy, E> PolicyAgent<P, E> {
    /// Statistics of every action, indexed by [`Action::index`].
    pub fn trackers(&self) -> &[P::Tracker] {
        &self.trackers
    }

    /// Horizon of the most recent run; zero before the first run.
    pub const fn horizon(&self) -> u64 {
        self.horizon
    }
}

impl<P: Policy, E: Environment> Agent for PolicyAgent<P, E> {
    fn num_actions(&self) -> usize {
        self.trackers.len()
    }

    fn policy(&mut self, time: u64) -> Action {
        let time = time.max(1);
        // Outside of a run the effective horizon is at least the current time
        let horizon = self.horizon.max(time);
        self.policy.select(&self.trackers, time, horizon)
    }

    fn update(&mut self, action: Action, reward: f64) -> Result<(), RewardDomainError> {
        self.trackers[action.index()].update(reward)
    }

    fn reset(&mut self) {
        self.history.clear();
        self.horizon = 0;
        self.initialize();
    }

    fn run(&mut self, horizon: u64) -> Result<&History, RunError> {
        if horizon == 0 {
            return Err(RunError::ZeroHorizon);
        }
        self.horizon = horizon;
        self.history = History::with_capacity(usize::try_from(horizon).unwrap_or(0));
        for time in 1..=horizon {
            let action = self.policy(time);
            let reward = self.environment.sample(action);
            self.update(action, reward)?;
            let step = self.history.push(action, reward);
            debug_assert_eq!(step.time, time);
        }
        Ok(&self.history)
    }

    fn history(&self) -> &History {
        &self.history
    }

    fn counts(&self) -> Vec<u64> {
        self.trackers.iter().map(StatTracker::count).collect()
    }
}

impl<P: Policy + fmt::Display, E> fmt::Display for PolicyAgent<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.policy)
    }
}
