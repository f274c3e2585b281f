//! Agent testing utilities
use super::Agent;
use crate::envs::DeterministicBandit;
use crate::Prng;
use rand::SeedableRng;

/// Check that the agent can be trained to perform well on a trivial bandit environment.
///
/// The environment is a deterministic multi-armed bandit with two arms:
/// the first arm always gives 0 reward and the second 1.
pub fn train_deterministic_bandit<A, F>(make_agent: F, num_train_steps: u64, threshold: f64)
where
    A: Agent,
    F: FnOnce(DeterministicBandit, &mut Prng) -> A,
{
    let env = DeterministicBandit::from_values([0.0, 1.0]).unwrap();
    let mut rng = Prng::seed_from_u64(0);
    let mut agent = make_agent(env, &mut rng);

    // Training
    if num_train_steps > 0 {
        agent.run(num_train_steps).unwrap();
    }

    eval_deterministic_bandit(&mut agent, threshold);
}

/// Evaluate a trained agent on the 0-1 deterministic bandit environment.
///
/// Statistics carry over from training; only the evaluation run is counted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eval_deterministic_bandit<A: Agent + ?Sized>(agent: &mut A, threshold: f64) {
    let num_eval_steps = 1000;
    let history = agent.run(num_eval_steps).unwrap();
    let action_2_count = history.action_counts(2)[1];
    assert!(
        action_2_count >= ((num_eval_steps as f64) * threshold) as u64,
        "best action taken {} / {} times",
        action_2_count,
        num_eval_steps
    );
}
