//! Distribution utilities
use rand::distributions::{Bernoulli as BoolBernoulli, BernoulliError, Distribution};
use rand::Rng;

/// Distributions with a known expected value.
pub trait Mean {
    /// The expected value of a sample.
    fn mean(&self) -> f64;
}

/// A determistic distribution.
///
/// Always produces the same value when sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deterministic(f64);

impl Deterministic {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }
}

impl Distribution<f64> for Deterministic {
    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> f64 {
        self.0
    }
}
impl Mean for Deterministic {
    fn mean(&self) -> f64 {
        self.0
    }
}

/// Bernoulli distribution that samples the floats `0.0` and `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    dist: BoolBernoulli,
    p: f64,
}

impl Bernoulli {
    /// Create a new `Bernoulli` instance.
    ///
    /// # Errors
    /// If `p` is not in `[0, 1]`.
    pub fn new(p: f64) -> Result<Self, BernoulliError> {
        Ok(Self {
            dist: BoolBernoulli::new(p)?,
            p,
        })
    }
}

impl Distribution<f64> for Bernoulli {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.dist.sample(rng) {
            1.0
        } else {
            0.0
        }
    }
}
impl Mean for Bernoulli {
    fn mean(&self) -> f64 {
        self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Prng;
    use rand::SeedableRng;

    /// Asserts that the distribution empirical mean is close to its reported mean.
    ///
    /// # Args
    /// * `d` - The distribution to test. d - E[d] must be sub-gaussian.
    /// * `num_samples` - Number of samples to generate.
    /// * `stddev_upper_bound` - An upper bound on the standard deviation of a single sample.
    /// * `seed` - Random seed.
    fn check_mean<D: Distribution<f64> + Mean>(
        d: &D,
        num_samples: usize,
        stddev_upper_bound: f64,
        seed: u64,
    ) {
        let rng = Prng::seed_from_u64(seed);
        let empirical_mean =
            d.sample_iter(rng).take(num_samples).sum::<f64>() / (num_samples as f64);
        // Want to be close enough to the mean to have false positive probability < 1e-5
        let false_positive_prob: f64 = 1e-5;
        let error_bound =
            stddev_upper_bound * (-2.0 / (num_samples as f64) * false_positive_prob.ln()).sqrt();
        assert!(error_bound < 0.1, "Use more samples");
        assert!((empirical_mean - d.mean()).abs() <= error_bound + 1e-12);
    }

    #[test]
    fn deterministic_mean() {
        check_mean(&Deterministic::new(0.7), 100, 1e-6, 2);
    }

    #[test]
    fn bernoulli_samples_binary() {
        let d = Bernoulli::new(0.7).unwrap();
        let mut rng = Prng::seed_from_u64(1);
        for _ in 0..1000 {
            let x: f64 = d.sample(&mut rng);
            assert!(x == 0.0 || x == 1.0);
        }
    }

    #[test]
    fn bernoulli_mean() {
        let p: f64 = 0.7;
        let stddev = (p * (1.0 - p)).sqrt();
        check_mean(&Bernoulli::new(p).unwrap(), 1000, stddev, 2);
    }

    #[test]
    fn bernoulli_rejects_invalid_probability() {
        assert!(Bernoulli::new(1.5).is_err());
    }
}
