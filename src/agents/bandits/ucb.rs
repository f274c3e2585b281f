//! Upper confidence bound bandit agents.
use super::super::{
    Action, BuildAgent, BuildAgentError, MeanTracker, Policy, PolicyAgent, StatTracker,
};
use super::{greedy_action, sampled_mean_tracker};
use crate::envs::Environment;
use crate::Prng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Natural logarithm floored at zero: `ln(max(1, x))`.
#[inline]
fn log_plus(x: f64) -> f64 {
    x.max(1.0).ln()
}

/// Exploration bonus added to the mean reward of an action.
pub trait ConfidenceBonus {
    /// Bonus of `action` at step `time` of a run with `horizon` steps.
    ///
    /// `trackers` holds the statistics of every action; each has a count of at least 1.
    fn bonus(&self, action: Action, trackers: &[MeanTracker], time: u64, horizon: u64) -> f64;
}

/// UCB1 with confidence `δ = 1 / horizon²`.
///
/// `sqrt(2 ln(1/δ) / n)`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ucb1;

impl ConfidenceBonus for Ucb1 {
    fn bonus(&self, action: Action, trackers: &[MeanTracker], _time: u64, horizon: u64) -> f64 {
        let count = trackers[action.index()].count() as f64;
        let inv_delta = (horizon as f64).powi(2);
        (2.0 * inv_delta.ln() / count).sqrt()
    }
}

impl fmt::Display for Ucb1 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UCB1")
    }
}

/// Asymptotically optimal UCB.
///
/// `sqrt(2 ln(f(t)) / n)` where `f(t) = 1 + t ln(t)²`.
/// Does not depend on the horizon.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsymptoticallyOptimal;

impl ConfidenceBonus for AsymptoticallyOptimal {
    fn bonus(&self, action: Action, trackers: &[MeanTracker], time: u64, _horizon: u64) -> f64 {
        let count = trackers[action.index()].count() as f64;
        let t = time as f64;
        let f = t.mul_add(t.ln().powi(2), 1.0);
        (2.0 * f.ln() / count).sqrt()
    }
}

impl fmt::Display for AsymptoticallyOptimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AO-UCB")
    }
}

/// Minimax Optimal Strategy in the Stochastic case.
///
/// `sqrt(4 ln⁺(h / (K n)) / n)` where `ln⁺(x) = ln(max(1, x))`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Moss;

impl ConfidenceBonus for Moss {
    fn bonus(&self, action: Action, trackers: &[MeanTracker], _time: u64, horizon: u64) -> f64 {
        let count = trackers[action.index()].count() as f64;
        let num_actions = trackers.len() as f64;
        (4.0 * log_plus(horizon as f64 / (num_actions * count)) / count).sqrt()
    }
}

impl fmt::Display for Moss {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MOSS")
    }
}

/// Adaptive UCB.
///
/// `sqrt(2 ln⁺(h / d) / n)` where `d = Σ_j min(n, sqrt(n n_j))`
/// sums over all actions `j` with counts `n_j`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ada;

impl ConfidenceBonus for Ada {
    fn bonus(&self, action: Action, trackers: &[MeanTracker], _time: u64, horizon: u64) -> f64 {
        let count = trackers[action.index()].count() as f64;
        let d: f64 = trackers
            .iter()
            .map(|tracker| count.min((count * tracker.count() as f64).sqrt()))
            .sum();
        (2.0 * log_plus(horizon as f64 / d) / count).sqrt()
    }
}

impl fmt::Display for Ada {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ADA-UCB")
    }
}

/// Any of the confidence bonus variants, selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Ucb1,
    AsymptoticallyOptimal,
    Moss,
    Ada,
}

impl BonusKind {
    pub const ALL: [Self; 4] = [
        Self::Ucb1,
        Self::AsymptoticallyOptimal,
        Self::Moss,
        Self::Ada,
    ];
}

impl Default for BonusKind {
    fn default() -> Self {
        Self::Ucb1
    }
}

impl ConfidenceBonus for BonusKind {
    fn bonus(&self, action: Action, trackers: &[MeanTracker], time: u64, horizon: u64) -> f64 {
        match self {
            Self::Ucb1 => Ucb1.bonus(action, trackers, time, horizon),
            Self::AsymptoticallyOptimal => {
                AsymptoticallyOptimal.bonus(action, trackers, time, horizon)
            }
            Self::Moss => Moss.bonus(action, trackers, time, horizon),
            Self::Ada => Ada.bonus(action, trackers, time, horizon),
        }
    }
}

impl fmt::Display for BonusKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ucb1 => fmt::Display::fmt(&Ucb1, f),
            Self::AsymptoticallyOptimal => fmt::Display::fmt(&AsymptoticallyOptimal, f),
            Self::Moss => fmt::Display::fmt(&Moss, f),
            Self::Ada => fmt::Display::fmt(&Ada, f),
        }
    }
}

/// Configuration for a [`Ucb`] agent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UcbConfig {
    pub bonus: BonusKind,
}

impl UcbConfig {
    pub const fn new(bonus: BonusKind) -> Self {
        Self { bonus }
    }
}

impl<E: Environment> BuildAgent<E> for UcbConfig {
    type Agent = PolicyAgent<Ucb<BonusKind>, E>;

    fn build_agent(&self, environment: E, _rng: &mut Prng) -> Result<Self::Agent, BuildAgentError> {
        PolicyAgent::new(Ucb::new(self.bonus), environment)
    }
}

/// Upper confidence bound policy.
///
/// Deterministically takes the action maximizing `mean + bonus`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ucb<B = BonusKind> {
    pub bonus: B,
}

impl<B> Ucb<B> {
    pub const fn new(bonus: B) -> Self {
        Self { bonus }
    }
}

impl<B: ConfidenceBonus> Ucb<B> {
    /// Upper confidence bound of every action, indexed by [`Action::index`].
    pub fn upper_bounds(&self, trackers: &[MeanTracker], time: u64, horizon: u64) -> Vec<f64> {
        Action::all(trackers.len())
            .zip(trackers)
            .map(|(action, tracker)| {
                tracker.mean() + self.bonus.bonus(action, trackers, time, horizon)
            })
            .collect()
    }
}

impl<B: fmt::Display> fmt::Display for Ucb<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.bonus, f)
    }
}

impl<B: ConfidenceBonus> Policy for Ucb<B> {
    type Tracker = MeanTracker;

    fn initial_tracker<E: Environment + ?Sized>(
        &mut self,
        action: Action,
        environment: &mut E,
    ) -> MeanTracker {
        sampled_mean_tracker(action, environment)
    }

    fn select(&mut self, trackers: &[MeanTracker], time: u64, horizon: u64) -> Action {
        greedy_action(self.upper_bounds(trackers, time, horizon))
    }
}
