//! Tick-by-tick schedule verifier.
//!
//! # Algorithm
//!
//! Each tick, channels are visited in `Red`, `Green`, `Blue` order:
//!
//! 1. Any running task whose completion tick is `<= now` frees its channel
//!    and is marked completed. A task started at `s` completes at
//!    `s + duration` and releases its registers at that tick.
//! 2. Each channel tries to admit the head of its queue. A head whose start
//!    tick has passed is out of order; a head due later waits; a head due
//!    now is checked for a busy channel, a register shared with any running
//!    task, and unmet dependencies, in that order.
//! 3. The clock advances by one.
//!
//! The sweep stops when every queue is drained or the tick ceiling is hit.
//! The first violation aborts verification.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Rejection;
use crate::models::{ChannelQueues, ResourceType, Task, TaskSet};

/// Verifier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// The sweep gives up with `NonTermination` at this tick if work remains.
    pub tick_ceiling: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { tick_ceiling: 30 }
    }
}

/// One admission recorded during an accepted sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    /// Tick the task started.
    pub tick: u32,
    /// Channel it ran on.
    pub channel: ResourceType,
    /// Index into the task set.
    pub index: usize,
}

/// Summary of an accepted schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Ticks swept before every queue drained.
    pub ticks: u32,
    /// Completion tick of the last task to finish.
    pub makespan: u32,
    /// Admissions in the order they happened.
    pub admissions: Vec<Admission>,
}

/// Schedule verifier.
///
/// # Example
///
/// ```
/// use tick_schedule::models::{ChannelQueues, Register, ResourceType, Task, TaskSet};
/// use tick_schedule::simulator::Simulator;
///
/// let tasks = TaskSet::new(vec![
///     Task::new("1", ResourceType::Red, 2).with_register(Register::A).with_start(0),
/// ]);
/// let queues = ChannelQueues::new().with(ResourceType::Red, 0);
///
/// let report = Simulator::new().verify(&queues, &tasks).unwrap();
/// assert_eq!(report.makespan, 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a verifier with the default tick ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a verifier with the given configuration.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Sets the tick ceiling.
    pub fn with_tick_ceiling(mut self, ceiling: u32) -> Self {
        self.config.tick_ceiling = ceiling;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Replays `queues` against a virtual clock.
    ///
    /// `tasks` is the full puzzle: every task in it must be scheduled, and
    /// it resolves queue entries and dependencies. Neither argument is
    /// modified.
    pub fn verify(
        &self,
        queues: &ChannelQueues,
        tasks: &TaskSet,
    ) -> Result<SimulationReport, Rejection> {
        let result = self.run(queues, tasks);
        match &result {
            Ok(report) => debug!(
                ticks = report.ticks,
                makespan = report.makespan,
                "schedule accepted"
            ),
            Err(rejection) => debug!(
                kind = ?rejection.kind(),
                tick = ?rejection.tick(),
                "schedule rejected"
            ),
        }
        result
    }

    fn run(&self, queues: &ChannelQueues, tasks: &TaskSet) -> Result<SimulationReport, Rejection> {
        for (channel, queue) in queues.iter() {
            if let Some(&index) = queue.iter().find(|&&i| i >= tasks.len()) {
                return Err(Rejection::UnknownTask { channel, index });
            }
        }

        let unscheduled: Vec<String> = tasks
            .unscheduled()
            .into_iter()
            .filter_map(|i| tasks.get(i).map(|t| t.id.clone()))
            .collect();
        if !unscheduled.is_empty() {
            return Err(Rejection::UnscheduledTasks { ids: unscheduled });
        }

        let mut sweep = Sweep::new(queues, tasks);
        while sweep.pending() > 0 && sweep.now < self.config.tick_ceiling {
            sweep.retire();
            for channel in ResourceType::ALL {
                sweep.admit(channel)?;
            }
            sweep.now += 1;
        }

        let pending = sweep.pending();
        if pending > 0 {
            return Err(Rejection::NonTermination {
                ceiling: self.config.tick_ceiling,
                pending,
            });
        }
        Ok(sweep.into_report())
    }
}

/// Verifies with the default configuration.
pub fn verify(queues: &ChannelQueues, tasks: &TaskSet) -> Result<SimulationReport, Rejection> {
    Simulator::new().verify(queues, tasks)
}

/// A task occupying a channel.
#[derive(Debug, Clone, Copy)]
struct Running {
    until: u32,
    index: usize,
}

/// Mutable sweep state. Queues are read through cursors; the caller's
/// data is only borrowed.
struct Sweep<'a> {
    tasks: &'a TaskSet,
    queues: &'a ChannelQueues,
    cursors: [usize; ResourceType::COUNT],
    running: [Option<Running>; ResourceType::COUNT],
    completed: Vec<bool>,
    now: u32,
    report: SimulationReport,
}

impl<'a> Sweep<'a> {
    fn new(queues: &'a ChannelQueues, tasks: &'a TaskSet) -> Self {
        Self {
            tasks,
            queues,
            cursors: [0; ResourceType::COUNT],
            running: [None; ResourceType::COUNT],
            completed: vec![false; tasks.len()],
            now: 0,
            report: SimulationReport::default(),
        }
    }

    /// Number of queue entries not yet admitted.
    fn pending(&self) -> usize {
        ResourceType::ALL
            .iter()
            .map(|&ch| self.queues.queue(ch).len() - self.cursors[ch.index()])
            .sum()
    }

    fn task(&self, index: usize) -> &'a Task {
        let tasks: &'a TaskSet = self.tasks;
        // Queue indices are bounds-checked before the sweep starts.
        &tasks.tasks()[index]
    }

    fn task_id(&self, index: usize) -> String {
        self.tasks
            .get(index)
            .map(|t| t.id.clone())
            .unwrap_or_else(|| format!("#{index}"))
    }

    /// Frees channels whose running task has completed by `now`.
    fn retire(&mut self) {
        for channel in ResourceType::ALL {
            let slot = &mut self.running[channel.index()];
            if let Some(run) = *slot {
                if run.until <= self.now {
                    *slot = None;
                    self.completed[run.index] = true;
                    let id = &self.tasks.tasks()[run.index].id;
                    trace!(tick = self.now, %channel, task = %id, "completed");
                }
            }
        }
    }

    /// Tries to start the head of `channel`'s queue at `now`.
    fn admit(&mut self, channel: ResourceType) -> Result<(), Rejection> {
        let ch = channel.index();
        let Some(&index) = self.queues.queue(channel).get(self.cursors[ch]) else {
            return Ok(());
        };
        let task = self.task(index);
        let Some(start) = task.scheduled else {
            return Err(Rejection::UnscheduledTasks {
                ids: vec![task.id.clone()],
            });
        };

        if start < self.now {
            return Err(Rejection::OutOfOrder {
                channel,
                task: task.id.clone(),
                scheduled: start,
                tick: self.now,
            });
        }
        if start > self.now {
            return Ok(());
        }

        if let Some(run) = self.running[ch] {
            return Err(Rejection::ChannelCollision {
                channel,
                task: task.id.clone(),
                running: self.task(run.index).id.clone(),
                until: run.until,
                tick: self.now,
            });
        }

        let conflict = self.running.iter().flatten().find_map(|run| {
            let other = self.task(run.index);
            let shared = task.shared_registers(other);
            (!shared.is_empty()).then(|| (other, shared))
        });
        if let Some((other, shared)) = conflict {
            return Err(Rejection::RegisterConflict {
                task: task.id.clone(),
                other: other.id.clone(),
                registers: shared.into_iter().collect(),
                tick: self.now,
            });
        }

        let unmet = task
            .depends
            .iter()
            .copied()
            .find(|&dep| !self.completed.get(dep).copied().unwrap_or(false));
        if let Some(dep) = unmet {
            return Err(Rejection::DependencyUnmet {
                task: task.id.clone(),
                dependency: self.task_id(dep),
                tick: self.now,
            });
        }

        let until = self.now.saturating_add(task.duration);
        self.running[ch] = Some(Running { until, index });
        self.cursors[ch] += 1;
        self.report.makespan = self.report.makespan.max(until);
        self.report.admissions.push(Admission {
            tick: self.now,
            channel,
            index,
        });
        trace!(tick = self.now, %channel, task = %task.id, until, "admitted");
        Ok(())
    }

    fn into_report(self) -> SimulationReport {
        SimulationReport {
            ticks: self.now,
            ..self.report
        }
    }
}
