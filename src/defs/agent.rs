use crate::agents::{
    Agent, BetaThompsonSamplingConfig, BuildAgent, BuildAgentError, EpsilonGreedyConfig,
    UcbConfig,
};
use crate::envs::Environment;
use crate::Prng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentDef {
    /// Epsilon-greedy on mean observed rewards.
    EpsilonGreedy(EpsilonGreedyConfig),
    /// Upper confidence bound with a selectable confidence bonus.
    Ucb(UcbConfig),
    /// Thompson sampling for Bernoulli rewards using Beta priors.
    BetaThompsonSampling(BetaThompsonSamplingConfig),
}

/// Boxed agent that can be moved to a worker thread.
pub type DynAgent = dyn Agent + Send;

impl Default for AgentDef {
    fn default() -> Self {
        Self::BetaThompsonSampling(BetaThompsonSamplingConfig::default())
    }
}

impl<E> BuildAgent<E> for AgentDef
where
    E: Environment + Send + 'static,
{
    type Agent = Box<DynAgent>;

    fn build_agent(&self, environment: E, rng: &mut Prng) -> Result<Self::Agent, BuildAgentError> {
        use AgentDef::*;
        match self {
            EpsilonGreedy(config) => config.build_agent(environment, rng).map(|a| Box::new(a) as _),
            Ucb(config) => config.build_agent(environment, rng).map(|a| Box::new(a) as _),
            BetaThompsonSampling(config) => {
                config.build_agent(environment, rng).map(|a| Box::new(a) as _)
            }
        }
    }
}

impl fmt::Display for AgentDef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EpsilonGreedy(config) => write!(f, "EpsilonGreedy(ϵ={})", config.epsilon),
            Self::Ucb(config) => write!(f, "{}", config.bonus),
            Self::BetaThompsonSampling(config) if config.num_samples == 1 => {
                write!(f, "BetaThompsonSampling")
            }
            Self::BetaThompsonSampling(config) => {
                write!(f, "BetaThompsonSampling({} samples)", config.num_samples)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::BonusKind;
    use crate::envs::DeterministicBandit;
    use rand::SeedableRng;
    use rstest::rstest;

    #[test]
    fn deserialize_json() {
        let defs: Vec<AgentDef> = serde_json::from_str(
            r#"[
                {"EpsilonGreedy": {"epsilon": 0.1}},
                {"Ucb": {"bonus": "Moss"}},
                {"BetaThompsonSampling": {"num_samples": 2}}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            defs,
            vec![
                AgentDef::EpsilonGreedy(EpsilonGreedyConfig::new(0.1)),
                AgentDef::Ucb(UcbConfig::new(BonusKind::Moss)),
                AgentDef::BetaThompsonSampling(BetaThompsonSamplingConfig::new(2)),
            ]
        );
    }

    #[rstest]
    #[case::epsilon_greedy(AgentDef::EpsilonGreedy(EpsilonGreedyConfig::default()))]
    #[case::ucb1(AgentDef::Ucb(UcbConfig::new(BonusKind::Ucb1)))]
    #[case::ada(AgentDef::Ucb(UcbConfig::new(BonusKind::Ada)))]
    #[case::thompson(AgentDef::default())]
    fn build_and_run(#[case] def: AgentDef) {
        let env = DeterministicBandit::from_values([0.0, 1.0, 0.0]).unwrap();
        let mut agent = def.build_agent(env, &mut Prng::seed_from_u64(1)).unwrap();
        assert_eq!(agent.num_actions(), 3);
        let history = agent.run(20).unwrap();
        assert_eq!(history.len(), 20);
    }

    #[test]
    fn build_propagates_config_error() {
        let env = DeterministicBandit::from_values([0.0, 1.0]).unwrap();
        let def = AgentDef::BetaThompsonSampling(BetaThompsonSamplingConfig::new(0));
        assert!(matches!(
            def.build_agent(env, &mut Prng::seed_from_u64(0)),
            Err(BuildAgentError::ZeroPosteriorSamples)
        ));
    }

    #[test]
    fn display() {
        assert_eq!(
            AgentDef::Ucb(UcbConfig::new(BonusKind::AsymptoticallyOptimal)).to_string(),
            "AO-UCB"
        );
        assert_eq!(AgentDef::default().to_string(), "BetaThompsonSampling");
    }
}
