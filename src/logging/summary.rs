use super::{LogError, Loggable};
use crate::utils::stats::OnlineMeanVariance;

/// Aggregate of all values logged under one id since the last flush.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Counter {
        increment: u64,
        initial_value: u64,
    },
    Duration {
        stats: OnlineMeanVariance<f64>,
    },
    Scalar {
        stats: OnlineMeanVariance<f64>,
    },
    Index {
        counts: Vec<usize>,
    },
}

impl Summary {
    /// Create a summary from its first value.
    ///
    /// # Errors
    /// If the value is an out-of-bounds index.
    pub fn try_from_loggable(value: Loggable) -> Result<Self, LogError> {
        Ok(match value {
            Loggable::CounterIncrement(i) => Self::Counter {
                increment: i,
                initial_value: 0,
            },
            Loggable::Duration(d) => Self::Duration {
                stats: std::iter::once(d.as_secs_f64()).collect(),
            },
            Loggable::Scalar(v) => Self::Scalar {
                stats: std::iter::once(v).collect(),
            },
            Loggable::Index { value, size } => {
                let mut counts = vec![0; size];
                *counts
                    .get_mut(value)
                    .ok_or(LogError::IndexOutOfBounds { value, size })? += 1;
                Self::Index { counts }
            }
        })
    }

    /// Add a value to the summary
    ///
    /// Returns and error and does not insert the value if it is incompatible with the current
    /// summary. The value will be incompatible if the summary was created from a different
    /// loggable variant, or if some other structure of the loggable is different.
    pub fn push(&mut self, value: Loggable) -> Result<(), LogError> {
        match (self, value) {
            (Self::Counter { increment, .. }, Loggable::CounterIncrement(i)) => {
                *increment += i;
            }
            (Self::Duration { stats }, Loggable::Duration(d)) => {
                stats.push(d.as_secs_f64());
            }
            (Self::Scalar { stats }, Loggable::Scalar(v)) => stats.push(v),
            (Self::Index { counts }, Loggable::Index { value, size }) => {
                if counts.len() != size {
                    return Err(LogError::IncompatibleIndexSize {
                        prev: counts.len(),
                        now: size,
                    });
                }
                *counts
                    .get_mut(value)
                    .ok_or(LogError::IndexOutOfBounds { value, size })? += 1;
            }
            (summary, value) => {
                return Err(LogError::IncompatibleValue {
                    prev: summary.loggable_variant_name(),
                    now: value.variant_name(),
                })
            }
        };
        Ok(())
    }

    /// Reset for the start of the next chunk.
    pub fn reset(&mut self) {
        match self {
            Self::Counter {
                increment,
                initial_value,
            } => {
                *initial_value += *increment;
                *increment = 0
            }
            Self::Duration { stats } | Self::Scalar { stats } => *stats = OnlineMeanVariance::new(),
            Self::Index { counts } => counts.iter_mut().for_each(|c| *c = 0),
        }
    }

    /// The name of the associated loggable variant
    const fn loggable_variant_name(&self) -> &'static str {
        match self {
            Self::Counter { .. } => "CounterIncrement",
            Self::Duration { .. } => "Duration",
            Self::Scalar { .. } => "Scalar",
            Self::Index { .. } => "Index",
        }
    }
}
