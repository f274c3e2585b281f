//! Logging statistics from experiment runs
mod display;
mod summary;

pub use display::DisplayLogger;
pub use summary::Summary;

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Identifier of a logged value, like `"ucb1/final_regret"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(Cow<'static, str>);

impl Id {
    /// This id nested under `scope`.
    #[must_use]
    pub fn scoped(self, scope: &str) -> Self {
        Self(format!("{}/{}", scope, self.0).into())
    }
}

impl From<&'static str> for Id {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that can be logged.
#[derive(Debug, Clone, PartialEq)]
pub enum Loggable {
    /// Increment a counter.
    CounterIncrement(u64),
    /// A duration. Aggregate by taking means.
    Duration(Duration),
    /// A scalar value. Aggregate by taking means.
    Scalar(f64),
    /// A sample from a distrbution over `0 .. size`
    Index { value: usize, size: usize },
}

impl Loggable {
    /// The name of this variant.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::CounterIncrement(_) => "CounterIncrement",
            Self::Duration(_) => "Duration",
            Self::Scalar(_) => "Scalar",
            Self::Index { .. } => "Index",
        }
    }
}

impl From<f64> for Loggable {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Duration> for Loggable {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

/// Error logging a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("incompatible value type; previously {prev} now {now}")]
    IncompatibleValue {
        prev: &'static str,
        now: &'static str,
    },
    #[error("incompatible index size; previously {prev} now {now}")]
    IncompatibleIndexSize { prev: usize, now: usize },
    #[error("index {value} out of bounds for size {size}")]
    IndexOutOfBounds { value: usize, size: usize },
}

/// Log statistics from an experiment run.
pub trait StatsLogger {
    /// Log a value.
    ///
    /// # Errors
    /// If the value is structurally incompatible with previous values logged under the same id.
    fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError>;

    /// Write out any summarized values that have not been written yet.
    fn flush(&mut self);

    /// Log a scalar value.
    ///
    /// # Errors
    /// If a non-scalar value was previously logged under `name`.
    fn log_scalar(&mut self, name: &'static str, value: f64) -> Result<(), LogError> {
        self.log(name.into(), Loggable::Scalar(value))
    }

    /// Log a duration.
    ///
    /// # Errors
    /// If a non-duration value was previously logged under `name`.
    fn log_duration(&mut self, name: &'static str, duration: Duration) -> Result<(), LogError> {
        self.log(name.into(), Loggable::Duration(duration))
    }

    /// Increment a counter.
    ///
    /// # Errors
    /// If a non-counter value was previously logged under `name`.
    fn log_counter_increment(
        &mut self,
        name: &'static str,
        increment: u64,
    ) -> Result<(), LogError> {
        self.log(name.into(), Loggable::CounterIncrement(increment))
    }

    /// Log one sample of an index distribution over `0 .. size`.
    ///
    /// # Errors
    /// If the index is out of bounds or the size differs from earlier values under `name`.
    fn log_index(&mut self, name: &'static str, value: usize, size: usize) -> Result<(), LogError> {
        self.log(name.into(), Loggable::Index { value, size })
    }

    /// Wrap this logger so that every id is nested under `scope`.
    fn with_scope(self, scope: &str) -> ScopedLogger<Self>
    where
        Self: Sized,
    {
        ScopedLogger {
            scope: scope.to_owned(),
            logger: self,
        }
    }
}

/// Logger that does nothing
impl StatsLogger for () {
    #[inline]
    fn log(&mut self, _: Id, _: Loggable) -> Result<(), LogError> {
        Ok(())
    }

    #[inline]
    fn flush(&mut self) {}
}

impl<L: StatsLogger + ?Sized> StatsLogger for &'_ mut L {
    #[inline]
    fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        L::log(self, id, value)
    }

    #[inline]
    fn flush(&mut self) {
        L::flush(self)
    }
}

impl<L: StatsLogger + ?Sized> StatsLogger for Box<L> {
    #[inline]
    fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        L::log(self, id, value)
    }

    #[inline]
    fn flush(&mut self) {
        L::flush(self)
    }
}

/// Logger that nests all ids under a scope. See [`StatsLogger::with_scope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedLogger<L> {
    scope: String,
    logger: L,
}

impl<L: StatsLogger> StatsLogger for ScopedLogger<L> {
    #[inline]
    fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        self.logger.log(id.scoped(&self.scope), value)
    }

    #[inline]
    fn flush(&mut self) {
        self.logger.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every logged value.
    #[derive(Debug, Default)]
    struct RecordLogger(Vec<(Id, Loggable)>);

    impl StatsLogger for RecordLogger {
        fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
            self.0.push((id, value));
            Ok(())
        }
        fn flush(&mut self) {}
    }

    #[test]
    fn scoped_ids_nest() {
        let mut record = RecordLogger::default();
        {
            let mut logger = (&mut record).with_scope("outer").with_scope("inner");
            logger.log_scalar("x", 1.5).unwrap();
        }
        assert_eq!(
            record.0,
            vec![(Id::from("outer/inner/x"), Loggable::Scalar(1.5))]
        );
    }

    #[test]
    fn unit_logger_accepts_anything() {
        let mut logger = ();
        logger.log_scalar("x", 1.0).unwrap();
        logger.log_counter_increment("x", 1).unwrap();
    }
}
