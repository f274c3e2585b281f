//! Command-line display logger
use super::{Id, LogError, Loggable, StatsLogger, Summary};
use std::collections::{btree_map::Entry, BTreeMap};
use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use yansi::Paint;

/// Logger that aggregates values and displays grouped summaries to standard output.
///
/// Summaries are written on [`StatsLogger::flush`] and when the logger is dropped.
#[derive(Debug)]
pub struct DisplayLogger {
    // A binary tree is used so that keys are displayed in sorted order
    summaries: BTreeMap<Id, Node>,
    // Start time of the current chunk.
    chunk_start: Instant,
}

impl Default for DisplayLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayLogger {
    pub fn new() -> Self {
        Self {
            summaries: BTreeMap::new(),
            chunk_start: Instant::now(),
        }
    }

    /// The current summary for an id, if anything has been logged under it.
    pub fn summary(&self, id: &Id) -> Option<&Summary> {
        self.summaries.get(id).map(|node| &node.summary)
    }

    /// Write the dirty summaries to `out`.
    fn write_summaries<W: Write>(&self, out: &mut W, elapsed: Duration) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", Paint::fixed(8, format!("[{:.2?}]", elapsed)))?;
        for (id, node) in self.summaries.iter().filter(|(_, node)| node.dirty) {
            writeln!(
                out,
                "{:<32} {}",
                Paint::fixed(35, id),
                DisplaySummary(&node.summary)
            )?;
        }
        Ok(())
    }
}

impl StatsLogger for DisplayLogger {
    fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        match self.summaries.entry(id) {
            Entry::Vacant(e) => {
                e.insert(Node::new(Summary::try_from_loggable(value)?));
            }
            Entry::Occupied(e) => e.into_mut().push(value)?,
        }
        Ok(())
    }

    fn flush(&mut self) {
        if self.summaries.values().any(|node| node.dirty) {
            let stdout = io::stdout();
            // Failing to write to stdout is not worth interrupting an experiment for
            let _ = self.write_summaries(&mut stdout.lock(), self.chunk_start.elapsed());
        }

        for node in self.summaries.values_mut() {
            node.reset();
        }
        self.chunk_start = Instant::now();
    }
}

/// Flush when dropped
impl Drop for DisplayLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    summary: Summary,
    /// Whether the summary has been updated since the last flush
    dirty: bool,
}

impl Node {
    const fn new(summary: Summary) -> Self {
        Self {
            summary,
            dirty: true,
        }
    }

    fn push(&mut self, value: Loggable) -> Result<(), LogError> {
        self.summary.push(value)?;
        self.dirty = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.dirty = false;
        self.summary.reset()
    }
}

struct DisplaySummary<'a>(&'a Summary);

impl fmt::Display for DisplaySummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Summary::Counter {
                increment,
                initial_value,
            } => write!(
                f,
                "{}  (+{})",
                initial_value + increment,
                Paint::fixed(253, increment)
            ),
            Summary::Duration { stats } => match stats.mean() {
                Some(mean) => write!(f, "{:.4?}", Duration::from_secs_f64(mean)),
                None => Ok(()),
            },
            Summary::Scalar { stats } => {
                if let Some(mean) = stats.mean() {
                    write!(f, "{:.3}", mean)?;
                }
                if let (true, Some(stddev)) = (stats.count() > 1, stats.stddev()) {
                    write!(f, " {}", Paint::fixed(8, format!("(σ {:.3})", stddev)))?;
                }
                Ok(())
            }
            Summary::Index { counts } => {
                let n: usize = counts.iter().sum();
                write!(f, "(n {})  [", n)?;
                for (i, c) in counts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", c * 100 / n.max(1))?;
                }
                write!(f, "]%")
            }
        }
    }
}
