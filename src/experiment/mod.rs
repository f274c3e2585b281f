//! Monte-Carlo regret experiments
mod runner;

pub use runner::{ExperimentConfig, ExperimentRunner};

use crate::agents::{Action, Agent, BuildAgentError, History, RunError};
use crate::envs::{BuildEnvError, ExpectedRewards};
use crate::logging::{LogError, StatsLogger};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error running an experiment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExperimentError {
    #[error("horizon must be at least 1")]
    ZeroHorizon,
    #[error("number of repetitions must be at least 1")]
    ZeroRepetitions,
    #[error("number of threads must be at least 1")]
    ZeroThreads,
    #[error("agent {agent:?} has {actual} actions but the environment has {expected}")]
    ActionCountMismatch {
        agent: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate agent name {0:?}")]
    DuplicateAgent(String),
    #[error("error building agent")]
    BuildAgent(#[from] BuildAgentError),
    #[error("error building environment")]
    BuildEnv(#[from] BuildEnvError),
    #[error("agent {agent:?} failed")]
    Run {
        agent: String,
        #[source]
        source: RunError,
    },
    #[error("error logging experiment statistics")]
    Log(#[from] LogError),
    #[error("experiment worker thread panicked")]
    WorkerPanic,
}

/// Cumulative regret after each step of a run.
///
/// Step `t` adds the gap between the best expected reward and the expected reward
/// of the action chosen at `t`. Realized rewards are ignored.
///
/// # Panics
/// If an action in the history has no entry in `expected_rewards`.
pub fn cumulative_regret(history: &History, expected_rewards: &[f64]) -> Array1<f64> {
    let best = expected_rewards
        .best_expected_reward()
        .unwrap_or(f64::NEG_INFINITY);
    history
        .actions()
        .scan(0.0, |regret, action| {
            *regret += best - expected_rewards[action.index()];
            Some(*regret)
        })
        .collect()
}

/// Per-step mean and standard deviation of cumulative regret over repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegretSummary {
    /// Arithmetic mean over repetitions at each step.
    pub mean: Array1<f64>,
    /// Population standard deviation over repetitions at each step.
    pub std: Array1<f64>,
}

impl RegretSummary {
    /// Reduce a `(repetitions × horizon)` array of regret trajectories.
    ///
    /// Returns `None` if there are no repetitions.
    pub fn from_trajectories(regrets: &Array2<f64>) -> Option<Self> {
        let mean = regrets.mean_axis(Axis(0))?;
        let std = regrets.std_axis(Axis(0), 0.0);
        Some(Self { mean, std })
    }

    /// Number of steps in each trajectory.
    pub fn horizon(&self) -> usize {
        self.mean.len()
    }

    /// Mean cumulative regret at the final step.
    pub fn final_mean(&self) -> Option<f64> {
        self.mean.last().copied()
    }

    /// Standard deviation of cumulative regret at the final step.
    pub fn final_std(&self) -> Option<f64> {
        self.std.last().copied()
    }
}

/// Outcome of one repetition of one agent.
#[derive(Debug, Clone, PartialEq)]
struct RunRecord {
    regret: Array1<f64>,
    actions: Vec<Action>,
    num_actions: usize,
    elapsed: Duration,
}

impl RunRecord {
    /// Reset `agent`, run it for `horizon` steps and record the outcome.
    fn collect<A: Agent + ?Sized>(
        agent: &mut A,
        horizon: u64,
        expected_rewards: &[f64],
    ) -> Result<Self, RunError> {
        agent.reset();
        let start = Instant::now();
        let history = agent.run(horizon)?;
        let elapsed = start.elapsed();
        Ok(Self {
            regret: cumulative_regret(history, expected_rewards),
            actions: history.actions().collect(),
            num_actions: expected_rewards.len(),
            elapsed,
        })
    }

    fn log<L: StatsLogger + ?Sized>(&self, logger: &mut L) -> Result<(), LogError> {
        logger.log_scalar("final_regret", self.regret.last().copied().unwrap_or(0.0))?;
        logger.log_duration("run_time", self.elapsed)?;
        for action in &self.actions {
            logger.log_index("action", action.index(), self.num_actions)?;
        }
        logger.log_counter_increment("repetitions", 1)
    }
}

/// Stack per-repetition trajectories into a `(repetitions × horizon)` array.
fn stack_trajectories<'a, I>(horizon: usize, trajectories: I) -> Array2<f64>
where
    I: ExactSizeIterator<Item = ArrayView1<'a, f64>>,
{
    let mut regrets = Array2::zeros((trajectories.len(), horizon));
    for (mut row, trajectory) in regrets.rows_mut().into_iter().zip(trajectories) {
        row.assign(&trajectory);
    }
    regrets
}

fn check_unique_names<'a, I: IntoIterator<Item = &'a str>>(
    names: I,
) -> Result<(), ExperimentError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ExperimentError::DuplicateAgent(name.to_owned()));
        }
    }
    Ok(())
}

/// Run named agents for repeated independent trials and summarize their regret.
///
/// Each repetition resets every agent and runs it for `horizon` steps,
/// agents in order within a repetition.
/// Regret is measured against the expected rewards of `environment`,
/// which must have the same actions as the environment each agent samples from.
///
/// Per-run statistics are logged to `logger` under the scope of each agent name.
///
/// # Errors
/// * On a zero horizon or zero repetitions, before any agent is run.
/// * If two agents share a name or an agent's action count differs from the environment's.
/// * If any run fails.
#[allow(clippy::cast_possible_truncation)]
pub fn run_experiment<A, X, L>(
    agents: &mut [(String, A)],
    horizon: u64,
    repetitions: usize,
    environment: &X,
    mut logger: L,
) -> Result<BTreeMap<String, RegretSummary>, ExperimentError>
where
    A: Agent,
    X: ExpectedRewards + ?Sized,
    L: StatsLogger,
{
    if horizon == 0 {
        return Err(ExperimentError::ZeroHorizon);
    }
    if repetitions == 0 {
        return Err(ExperimentError::ZeroRepetitions);
    }
    check_unique_names(agents.iter().map(|(name, _)| name.as_str()))?;
    let expected_rewards = environment.expected_rewards();
    let num_actions = expected_rewards.len();
    for (name, agent) in agents.iter() {
        if agent.num_actions() != num_actions {
            return Err(ExperimentError::ActionCountMismatch {
                agent: name.clone(),
                expected: num_actions,
                actual: agent.num_actions(),
            });
        }
    }

    let mut regrets: Vec<Array2<f64>> = agents
        .iter()
        .map(|_| Array2::zeros((repetitions, horizon as usize)))
        .collect();
    for repetition in 0..repetitions {
        for ((name, agent), agent_regrets) in agents.iter_mut().zip(&mut regrets) {
            let record = RunRecord::collect(agent, horizon, &expected_rewards).map_err(|source| {
                ExperimentError::Run {
                    agent: name.clone(),
                    source,
                }
            })?;
            record.log(&mut (&mut logger).with_scope(name))?;
            agent_regrets.row_mut(repetition).assign(&record.regret);
        }
    }
    logger.flush();

    Ok(agents
        .iter()
        .zip(regrets)
        .map(|((name, _), agent_regrets)| {
            let summary = RegretSummary::from_trajectories(&agent_regrets)
                .expect("at least one repetition");
            (name.clone(), summary)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{
        BetaThompsonSamplingConfig, BonusKind, BuildAgent, EpsilonGreedyConfig, UcbConfig,
    };
    use crate::defs::{AgentDef, DynAgent};
    use crate::envs::{BernoulliBandit, DeterministicBandit};
    use crate::logging::{DisplayLogger, Id, Summary};
    use crate::Prng;
    use ndarray::array;
    use rand::{Rng, SeedableRng};

    fn history(ids: &[usize]) -> History {
        let mut history = History::new();
        for &id in ids {
            history.push(Action::from_id(id).unwrap(), 0.0);
        }
        history
    }

    fn bernoulli_agents(
        defs: &[(&str, AgentDef)],
        probabilities: &[f64],
    ) -> Vec<(String, Box<DynAgent>)> {
        let mut rng = Prng::seed_from_u64(0);
        defs.iter()
            .map(|(name, def)| {
                let env =
                    BernoulliBandit::from_probabilities(probabilities.iter().copied(), rng.gen())
                        .unwrap();
                (name.to_string(), def.build_agent(env, &mut rng).unwrap())
            })
            .collect()
    }

    #[test]
    fn regret_uses_expected_rewards() {
        let regret = cumulative_regret(&history(&[1, 2, 3, 2]), &[0.5, 0.8, 0.2]);
        let expected = [0.3, 0.3, 0.9, 0.9];
        assert_eq!(regret.len(), expected.len());
        for (r, e) in regret.iter().zip(expected) {
            assert!((r - e).abs() < 1e-12);
        }
    }

    #[test]
    fn regret_zero_when_best_action_chosen() {
        let rewards = [0.25, 1.0, 1.0];
        let regret = cumulative_regret(&history(&[2, 3, 2]), &rewards);
        assert_eq!(regret, array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn regret_monotonic() {
        let probabilities = [0.5, 0.8, 0.2];
        let env = BernoulliBandit::from_probabilities(probabilities, 3).unwrap();
        let mut agent = EpsilonGreedyConfig::new(0.3)
            .build_agent(env, &mut Prng::seed_from_u64(4))
            .unwrap();
        let history = agent.run(500).unwrap();
        let regret = cumulative_regret(history, &probabilities);
        assert!(regret.windows(2).into_iter().all(|w| w[1] >= w[0]));
        assert!(regret[0] >= 0.0);
    }

    #[test]
    fn summary_uses_population_std() {
        let summary = RegretSummary::from_trajectories(&array![[0.0, 1.0], [2.0, 3.0]]).unwrap();
        assert_eq!(summary.mean, array![1.0, 2.0]);
        assert_eq!(summary.std, array![1.0, 1.0]);
        assert_eq!(summary.horizon(), 2);
        assert_eq!(summary.final_mean(), Some(2.0));
        assert_eq!(summary.final_std(), Some(1.0));
    }

    #[test]
    fn summary_of_no_repetitions() {
        assert!(RegretSummary::from_trajectories(&Array2::zeros((0, 3))).is_none());
    }

    #[test]
    fn thompson_sampling_regret_is_low() {
        let probabilities = [0.5, 0.8, 0.2];
        let mut agents = bernoulli_agents(
            &[("ts", AgentDef::BetaThompsonSampling(BetaThompsonSamplingConfig::default()))],
            &probabilities,
        );
        let env = BernoulliBandit::from_probabilities(probabilities, 0).unwrap();
        let results = run_experiment(&mut agents, 1000, 100, &env, ()).unwrap();
        let summary = &results["ts"];
        assert_eq!(summary.horizon(), 1000);
        // Always taking action 1 would accumulate a regret of 300
        let final_regret = summary.final_mean().unwrap();
        assert!(final_regret < 30.0, "final regret {}", final_regret);
        assert!(summary.mean.windows(2).into_iter().all(|w| w[1] >= w[0]));
    }

    #[test]
    fn every_agent_is_summarized_and_logged() {
        let probabilities = [0.5, 0.8, 0.2];
        let mut agents = bernoulli_agents(
            &[
                ("greedy", AgentDef::EpsilonGreedy(EpsilonGreedyConfig::default())),
                ("moss", AgentDef::Ucb(UcbConfig::new(BonusKind::Moss))),
            ],
            &probabilities,
        );
        let env = BernoulliBandit::from_probabilities(probabilities, 0).unwrap();
        let mut logger = DisplayLogger::default();
        let results = run_experiment(&mut agents, 50, 4, &env, &mut logger).unwrap();
        assert_eq!(results.keys().collect::<Vec<_>>(), ["greedy", "moss"]);
        assert!(results.values().all(|s| s.horizon() == 50));
        assert_eq!(
            logger.summary(&Id::from("moss/repetitions")),
            Some(&Summary::Counter {
                increment: 0,
                initial_value: 4
            })
        );
    }

    #[test]
    fn zero_horizon_rejected() {
        let mut agents = bernoulli_agents(&[("ts", AgentDef::default())], &[0.5, 0.8]);
        let env = BernoulliBandit::from_probabilities([0.5, 0.8], 0).unwrap();
        assert_eq!(
            run_experiment(&mut agents, 0, 3, &env, ()),
            Err(ExperimentError::ZeroHorizon)
        );
        assert!(agents[0].1.history().is_empty());
    }

    #[test]
    fn zero_repetitions_rejected() {
        let mut agents = bernoulli_agents(&[("ts", AgentDef::default())], &[0.5, 0.8]);
        let env = BernoulliBandit::from_probabilities([0.5, 0.8], 0).unwrap();
        assert_eq!(
            run_experiment(&mut agents, 10, 0, &env, ()),
            Err(ExperimentError::ZeroRepetitions)
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut agents = bernoulli_agents(
            &[("a", AgentDef::default()), ("a", AgentDef::default())],
            &[0.5, 0.8],
        );
        let env = BernoulliBandit::from_probabilities([0.5, 0.8], 0).unwrap();
        assert_eq!(
            run_experiment(&mut agents, 10, 1, &env, ()),
            Err(ExperimentError::DuplicateAgent("a".into()))
        );
    }

    #[test]
    fn action_count_mismatch_rejected() {
        let mut agents = bernoulli_agents(&[("ts", AgentDef::default())], &[0.5, 0.8]);
        let env = BernoulliBandit::from_probabilities([0.5, 0.8, 0.2], 0).unwrap();
        assert_eq!(
            run_experiment(&mut agents, 10, 1, &env, ()),
            Err(ExperimentError::ActionCountMismatch {
                agent: "ts".into(),
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn run_error_names_agent() {
        let env = DeterministicBandit::from_values([0.5, 0.25]).unwrap();
        let agent = AgentDef::default()
            .build_agent(env.clone(), &mut Prng::seed_from_u64(0))
            .unwrap();
        let mut agents = vec![("ts".to_string(), agent)];
        assert!(matches!(
            run_experiment(&mut agents, 10, 1, &env, ()),
            Err(ExperimentError::Run { agent, source: RunError::RewardDomain(_) }) if agent == "ts"
        ));
    }
}
