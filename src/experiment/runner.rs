//! Multithreaded experiment runner
use super::{stack_trajectories, ExperimentError, RegretSummary, RunRecord};
use crate::agents::BuildAgent;
use crate::defs::{AgentDef, DynAgent};
use crate::envs::{BuildEnv, ExpectedRewards};
use crate::logging::StatsLogger;
use crate::Prng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for an [`ExperimentRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of steps in each run.
    pub horizon: u64,
    /// Number of independent runs of each agent.
    pub repetitions: usize,
    /// Maximum number of worker threads.
    pub num_threads: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            horizon: 1000,
            repetitions: 100,
            num_threads: num_cpus::get(),
        }
    }
}

impl ExperimentConfig {
    pub const fn new(horizon: u64, repetitions: usize, num_threads: usize) -> Self {
        Self {
            horizon,
            repetitions,
            num_threads,
        }
    }

    /// Check that every parameter is non-zero.
    ///
    /// # Errors
    /// On the first zero parameter.
    pub const fn validate(&self) -> Result<(), ExperimentError> {
        if self.horizon == 0 {
            Err(ExperimentError::ZeroHorizon)
        } else if self.repetitions == 0 {
            Err(ExperimentError::ZeroRepetitions)
        } else if self.num_threads == 0 {
            Err(ExperimentError::ZeroThreads)
        } else {
            Ok(())
        }
    }

    /// Build a runner for environments built from `env_config`, with no agents yet.
    pub const fn build_runner<EC>(&self, env_config: EC) -> ExperimentRunner<EC> {
        ExperimentRunner {
            config: *self,
            env_config,
            agents: Vec::new(),
        }
    }
}

/// Runs named agents for many independent repetitions across worker threads.
///
/// Each worker builds its own environment and agent instance for every agent definition
/// from a private random stream, then resets and runs them for its share of the repetitions.
/// Results are reproducible for a fixed seed and thread count.
#[derive(Debug, Clone)]
pub struct ExperimentRunner<EC> {
    pub config: ExperimentConfig,
    pub env_config: EC,
    agents: Vec<(String, AgentDef)>,
}

impl<EC> ExperimentRunner<EC> {
    /// Add an agent to the experiment.
    ///
    /// # Errors
    /// If an agent with the same name was already added.
    pub fn add_agent<S: Into<String>>(
        &mut self,
        name: S,
        agent_def: AgentDef,
    ) -> Result<&mut Self, ExperimentError> {
        let name = name.into();
        if self.agents.iter().any(|(existing, _)| *existing == name) {
            return Err(ExperimentError::DuplicateAgent(name));
        }
        self.agents.push((name, agent_def));
        Ok(self)
    }

    /// The named agent definitions in the order they were added.
    pub fn agents(&self) -> impl Iterator<Item = (&str, &AgentDef)> {
        self.agents.iter().map(|(name, def)| (name.as_str(), def))
    }
}

/// An agent instance owned by one worker thread.
struct WorkerAgent<'a> {
    name: &'a str,
    agent: Box<DynAgent>,
    expected_rewards: Vec<f64>,
}

impl<EC> ExperimentRunner<EC>
where
    EC: BuildEnv + Sync,
    EC::Environment: Send + 'static,
{
    /// Run the experiment and summarize the regret of each agent.
    ///
    /// Per-run statistics are logged to `logger` under the scope of each agent name
    /// once all workers have finished.
    ///
    /// # Errors
    /// * If the configuration is invalid, before any agent is built.
    /// * If building an environment or agent fails.
    /// * If any run fails or a worker thread panics.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run<L: StatsLogger>(
        &self,
        seed: u64,
        mut logger: L,
    ) -> Result<BTreeMap<String, RegretSummary>, ExperimentError> {
        self.config.validate()?;
        let num_workers = self.config.num_threads.min(self.config.repetitions);

        let worker_records = crossbeam::scope(|scope| {
            let workers: Vec<_> = (0..num_workers)
                .map(|i| {
                    let repetitions = worker_repetitions(self.config.repetitions, num_workers, i);
                    let worker_seed = seed.wrapping_add(i as u64);
                    scope.spawn(move |_| self.run_worker(worker_seed, repetitions))
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| {
                    worker
                        .join()
                        .map_err(|_| ExperimentError::WorkerPanic)
                        .and_then(|records| records)
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| ExperimentError::WorkerPanic)??;

        let horizon = self.config.horizon as usize;
        let mut summaries = BTreeMap::new();
        for (i, (name, _)) in self.agents.iter().enumerate() {
            let records: Vec<&RunRecord> = worker_records
                .iter()
                .flat_map(|agent_records| &agent_records[i])
                .collect();
            let mut agent_logger = (&mut logger).with_scope(name);
            for record in &records {
                record.log(&mut agent_logger)?;
            }
            let regrets = stack_trajectories(horizon, records.iter().map(|r| r.regret.view()));
            let summary =
                RegretSummary::from_trajectories(&regrets).ok_or(ExperimentError::ZeroRepetitions)?;
            summaries.insert(name.clone(), summary);
        }
        logger.flush();
        Ok(summaries)
    }

    /// Build an instance of every agent, each with its own environment.
    fn build_worker_agents(&self, rng: &mut Prng) -> Result<Vec<WorkerAgent<'_>>, ExperimentError> {
        let mut agents = Vec::with_capacity(self.agents.len());
        for (name, agent_def) in &self.agents {
            let env = self.env_config.build_env(rng)?;
            let expected_rewards = env.expected_rewards();
            let agent = agent_def.build_agent(env, rng)?;
            agents.push(WorkerAgent {
                name,
                agent,
                expected_rewards,
            });
        }
        Ok(agents)
    }

    /// Run every agent for `repetitions` repetitions; records are grouped by agent.
    fn run_worker(
        &self,
        seed: u64,
        repetitions: usize,
    ) -> Result<Vec<Vec<RunRecord>>, ExperimentError> {
        let mut rng = Prng::seed_from_u64(seed);
        let mut agents = self.build_worker_agents(&mut rng)?;
        let mut records: Vec<Vec<RunRecord>> = agents
            .iter()
            .map(|_| Vec::with_capacity(repetitions))
            .collect();
        for _ in 0..repetitions {
            for (worker_agent, agent_records) in agents.iter_mut().zip(&mut records) {
                let record = RunRecord::collect(
                    &mut worker_agent.agent,
                    self.config.horizon,
                    &worker_agent.expected_rewards,
                )
                .map_err(|source| ExperimentError::Run {
                    agent: worker_agent.name.to_owned(),
                    source,
                })?;
                agent_records.push(record);
            }
        }
        Ok(records)
    }
}

/// Number of repetitions assigned to worker `index` of `num_workers`.
const fn worker_repetitions(total: usize, num_workers: usize, index: usize) -> usize {
    total / num_workers + (index < total % num_workers) as usize
}
