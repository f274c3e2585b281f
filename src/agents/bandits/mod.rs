//! Multi-armed bandit decision policies.
mod epsilon_greedy;
mod thompson_sampling;
mod ucb;

pub use epsilon_greedy::{EpsilonGreedy, EpsilonGreedyConfig};
pub use thompson_sampling::{BetaThompsonSampling, BetaThompsonSamplingConfig};
pub use ucb::{Ada, AsymptoticallyOptimal, BonusKind, ConfidenceBonus, Moss, Ucb, Ucb1, UcbConfig};

use super::{Action, MeanTracker};
use crate::envs::Environment;
use crate::utils::iter::argmax_f64;

/// Warm start: one real reward sample for `action`.
fn sampled_mean_tracker<E: Environment + ?Sized>(
    action: Action,
    environment: &mut E,
) -> MeanTracker {
    MeanTracker::from_reward(environment.sample(action))
}

/// The action with the largest value, ties broken by lowest id.
fn greedy_action<I: IntoIterator<Item = f64>>(values: I) -> Action {
    Action::from_index(argmax_f64(values).expect("Empty action space"))
}
