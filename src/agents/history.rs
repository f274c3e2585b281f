//! Action-reward history
use super::Action;
use std::ops::Index;
use std::slice;

/// One completed decision step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Time of the step, starting from 1.
    pub time: u64,
    /// The action chosen by the agent.
    pub action: Action,
    /// The reward observed for the action.
    pub reward: f64,
}

impl Step {
    pub const fn new(time: u64, action: Action, reward: f64) -> Self {
        Self {
            time,
            action,
            reward,
        }
    }
}

/// The steps of one run, ordered by time.
///
/// Times are `1, 2, ..., len()` with no gaps.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct History {
    steps: Vec<Step>,
}

impl History {
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Create an empty history with space for `capacity` steps.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Append the next step; its time is `len() + 1`.
    pub fn push(&mut self, action: Action, reward: f64) -> &Step {
        let time = self.steps.len() as u64 + 1;
        self.steps.push(Step::new(time, action, reward));
        &self.steps[self.steps.len() - 1]
    }

    pub fn clear(&mut self) {
        self.steps.clear()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<Step> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    /// The chosen actions in time order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.steps.iter().map(|step| step.action)
    }

    /// The observed rewards in time order.
    pub fn rewards(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().map(|step| step.reward)
    }

    /// Sum of all observed rewards.
    pub fn total_reward(&self) -> f64 {
        self.rewards().sum()
    }

    /// Number of times each action was chosen, indexed by [`Action::index`].
    pub fn action_counts(&self, num_actions: usize) -> Vec<u64> {
        let mut counts = vec![0; num_actions];
        for action in self.actions() {
            counts[action.index()] += 1;
        }
        counts
    }
}

impl Index<usize> for History {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Step;
    type IntoIter = slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for History {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
