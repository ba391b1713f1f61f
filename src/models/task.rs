//! Task and task-set model.
//!
//! A task occupies one channel for `duration` ticks starting at its
//! `scheduled` tick, holding its registers for the whole window. Dependencies
//! are indices into the owning [`TaskSet`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Register, ResourceType};

/// A unit of work in a puzzle.
///
/// # Time Representation
/// Ticks are unitless steps of the verifier's virtual clock. A task
/// scheduled at `s` occupies its channel for ticks `[s, s + duration)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Channel this task must run on.
    pub resource_type: ResourceType,
    /// Number of ticks the task occupies its channel (>= 1).
    pub duration: u32,
    /// Registers held while running (1 or 2).
    pub registers: BTreeSet<Register>,
    /// Indices of tasks that must complete before this one starts.
    pub depends: BTreeSet<usize>,
    /// Start tick. `None` = not yet placed.
    pub scheduled: Option<u32>,
}

impl Task {
    /// Creates an unscheduled task with no registers or dependencies.
    pub fn new(id: impl Into<String>, resource_type: ResourceType, duration: u32) -> Self {
        Self {
            id: id.into(),
            resource_type,
            duration,
            registers: BTreeSet::new(),
            depends: BTreeSet::new(),
            scheduled: None,
        }
    }

    /// Adds a register.
    pub fn with_register(mut self, register: Register) -> Self {
        self.registers.insert(register);
        self
    }

    /// Adds a dependency on the task at `index` in the owning set.
    pub fn with_dependency(mut self, index: usize) -> Self {
        self.depends.insert(index);
        self
    }

    /// Sets the start tick.
    pub fn with_start(mut self, tick: u32) -> Self {
        self.scheduled = Some(tick);
        self
    }

    /// Whether a start tick has been assigned.
    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Tick at which the task completes, if scheduled.
    #[inline]
    pub fn end_tick(&self) -> Option<u32> {
        self.scheduled.map(|s| s.saturating_add(self.duration))
    }

    /// Whether the task is running at `tick`.
    pub fn occupies(&self, tick: u32) -> bool {
        match self.scheduled {
            Some(s) => s <= tick && tick < s.saturating_add(self.duration),
            None => false,
        }
    }

    /// Registers shared with `other`.
    pub fn shared_registers(&self, other: &Task) -> BTreeSet<Register> {
        self.registers
            .intersection(&other.registers)
            .copied()
            .collect()
    }
}

/// The full task set of one puzzle instance.
///
/// Dependency indices held by each [`Task`] point into this set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Creates a task set from tasks whose dependencies already index `tasks`.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task at `index`.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Mutable task at `index`. Callers should only change `scheduled`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    /// All tasks in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterates over tasks.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Index of the task with the given id.
    pub fn find(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Indices of tasks with no start tick.
    pub fn unscheduled(&self) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_scheduled())
            .map(|(i, _)| i)
            .collect()
    }

    /// Clears every start tick.
    pub fn clear_schedule(&mut self) {
        for task in &mut self.tasks {
            task.scheduled = None;
        }
    }

    /// Sets the start tick of the task at `index`.
    ///
    /// Returns `false` if the index is out of range.
    pub fn schedule(&mut self, index: usize, tick: u32) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.scheduled = Some(tick);
                true
            }
            None => false,
        }
    }

    /// Longest dependency chain ending at `index` (a task with no
    /// dependencies has depth 1).
    ///
    /// Dangling indices are ignored and cycles are cut at the revisited
    /// task, so this never recurses forever on hand-built input.
    pub fn depth(&self, index: usize) -> usize {
        let mut memo = vec![None; self.tasks.len()];
        let mut visiting = vec![false; self.tasks.len()];
        self.depth_memo(index, &mut memo, &mut visiting)
    }

    fn depth_memo(&self, index: usize, memo: &mut [Option<usize>], visiting: &mut [bool]) -> usize {
        let Some(task) = self.tasks.get(index) else {
            return 0;
        };
        if let Some(d) = memo[index] {
            return d;
        }
        if visiting[index] {
            return 0;
        }
        visiting[index] = true;
        let deepest = task
            .depends
            .iter()
            .map(|&dep| self.depth_memo(dep, memo, visiting))
            .max()
            .unwrap_or(0);
        visiting[index] = false;
        memo[index] = Some(deepest + 1);
        deepest + 1
    }

    /// Consumes the set, returning the tasks.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
