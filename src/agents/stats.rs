//! Per-action reward statistics
use super::RewardDomainError;

/// Statistics about the rewards observed for a single action.
pub trait StatTracker {
    /// Number of reward observations incorporated so far.
    fn count(&self) -> u64;

    /// Incorporate one observed reward.
    ///
    /// # Errors
    /// If the reward is outside of the support these statistics assume.
    /// The statistics are unchanged on error.
    fn update(&mut self, reward: f64) -> Result<(), RewardDomainError>;
}

/// Running mean of observed rewards.
///
/// Always holds at least one observation so that the mean is defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanTracker {
    count: u64,
    mean: f64,
}

impl MeanTracker {
    /// Initialize from a single observed reward.
    pub const fn from_reward(reward: f64) -> Self {
        Self {
            count: 1,
            mean: reward,
        }
    }

    /// The arithmetic mean of all observed rewards.
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Incorporate one observed reward.
    pub fn observe(&mut self, reward: f64) {
        self.mean += (reward - self.mean) / (self.count + 1) as f64;
        self.count += 1;
    }
}

impl StatTracker for MeanTracker {
    #[inline]
    fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    fn update(&mut self, reward: f64) -> Result<(), RewardDomainError> {
        self.observe(reward);
        Ok(())
    }
}

/// Beta posterior over the success probability of a Bernoulli-reward action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaTracker {
    count: u64,
    alpha: f64,
    beta: f64,
}

impl Default for BetaTracker {
    fn default() -> Self {
        Self::uniform()
    }
}

impl BetaTracker {
    /// Uniform prior: `Beta(1, 1)` with no observations.
    pub const fn uniform() -> Self {
        Self {
            count: 0,
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Posterior shape parameter; one plus the number of successes.
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Posterior shape parameter; one plus the number of failures.
    pub const fn beta(&self) -> f64 {
        self.beta
    }

    /// Expected success probability under the posterior.
    pub fn posterior_mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }
}

impl StatTracker for BetaTracker {
    #[inline]
    fn count(&self) -> u64 {
        self.count
    }

    fn update(&mut self, reward: f64) -> Result<(), RewardDomainError> {
        if reward != 0.0 && reward != 1.0 {
            return Err(RewardDomainError { reward });
        }
        self.alpha += reward;
        self.beta += 1.0 - reward;
        self.count += 1;
        Ok(())
    }
}
