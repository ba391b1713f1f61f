//! Per-channel schedule containers.
//!
//! [`ChannelQueues`] is what the verifier consumes: for each channel, the
//! order in which its tasks are expected to start. [`Board`] is the
//! placement surface a front-end drags tasks onto; it refuses overlapping
//! placements on one channel and turns into queues on submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ResourceType, TaskSet};

/// Ordered task indices per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelQueues {
    queues: [Vec<usize>; ResourceType::COUNT],
}

impl ChannelQueues {
    /// Creates empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task index to a channel's queue.
    pub fn push(&mut self, channel: ResourceType, index: usize) {
        self.queues[channel.index()].push(index);
    }

    /// Adds a task index to a channel's queue (builder form).
    pub fn with(mut self, channel: ResourceType, index: usize) -> Self {
        self.push(channel, index);
        self
    }

    /// The queue for a channel.
    pub fn queue(&self, channel: ResourceType) -> &[usize] {
        &self.queues[channel.index()]
    }

    /// Iterates `(channel, queue)` in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, &[usize])> {
        ResourceType::ALL
            .into_iter()
            .map(move |ch| (ch, self.queue(ch)))
    }

    /// Total number of queued entries.
    pub fn len(&self) -> usize {
        self.queues.iter().map(Vec::len).sum()
    }

    /// Whether every queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(Vec::is_empty)
    }

    /// Builds queues from every scheduled task, each on its own channel,
    /// ordered by start tick. Ties keep task-set order.
    pub fn from_scheduled(tasks: &TaskSet) -> Self {
        let mut queues = Self::new();
        for (i, task) in tasks.iter().enumerate() {
            if task.is_scheduled() {
                queues.push(task.resource_type, i);
            }
        }
        for queue in &mut queues.queues {
            queue.sort_by_key(|&i| tasks.get(i).and_then(|t| t.scheduled));
        }
        queues
    }
}

/// Reasons a board placement is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no task at index {0}")]
    UnknownTask(usize),

    #[error("task {task} belongs on {expected}, not {channel}")]
    WrongChannel {
        task: String,
        expected: ResourceType,
        channel: ResourceType,
    },

    #[error("task {task} cannot start at {tick} on a board of {rows} rows")]
    OutOfBounds { task: String, tick: u32, rows: u32 },

    #[error("task {task} at {tick} overlaps {other}")]
    Overlap {
        task: String,
        other: String,
        tick: u32,
    },

    #[error("task {0} is already on the board")]
    AlreadyPlaced(String),
}

/// Placement surface with one timeline per channel.
///
/// Each timeline is kept sorted by start tick and never holds two tasks
/// whose windows overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: u32,
    lanes: [Vec<usize>; ResourceType::COUNT],
}

impl Board {
    /// Row count of the graphical board.
    pub const DEFAULT_ROWS: u32 = 20;

    /// Creates an empty board with [`Board::DEFAULT_ROWS`] rows.
    pub fn new() -> Self {
        Self::with_rows(Self::DEFAULT_ROWS)
    }

    /// Creates an empty board with the given number of rows (ticks).
    pub fn with_rows(rows: u32) -> Self {
        Self {
            rows,
            lanes: Default::default(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Task indices on a channel, sorted by start tick.
    pub fn lane(&self, channel: ResourceType) -> &[usize] {
        &self.lanes[channel.index()]
    }

    /// Whether the task at `index` is on the board.
    pub fn contains(&self, index: usize) -> bool {
        self.lanes.iter().any(|lane| lane.contains(&index))
    }

    /// Places the task at `index` on `channel` starting at `tick`.
    ///
    /// On success the task's `scheduled` field is set to `tick`.
    pub fn place(
        &mut self,
        tasks: &mut TaskSet,
        index: usize,
        channel: ResourceType,
        tick: u32,
    ) -> Result<(), PlacementError> {
        let task = tasks.get(index).ok_or(PlacementError::UnknownTask(index))?;
        if task.resource_type != channel {
            return Err(PlacementError::WrongChannel {
                task: task.id.clone(),
                expected: task.resource_type,
                channel,
            });
        }
        if self.contains(index) {
            return Err(PlacementError::AlreadyPlaced(task.id.clone()));
        }
        if tick >= self.rows {
            return Err(PlacementError::OutOfBounds {
                task: task.id.clone(),
                tick,
                rows: self.rows,
            });
        }

        let end = tick.saturating_add(task.duration);
        let lane = &mut self.lanes[channel.index()];
        let mut slot = 0;
        while slot < lane.len() {
            let Some(other) = tasks.get(lane[slot]) else {
                slot += 1;
                continue;
            };
            let (other_start, other_end) = match (other.scheduled, other.end_tick()) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    slot += 1;
                    continue;
                }
            };
            if end <= other_start {
                break;
            }
            if tick >= other_end {
                slot += 1;
                continue;
            }
            return Err(PlacementError::Overlap {
                task: task.id.clone(),
                other: other.id.clone(),
                tick,
            });
        }

        lane.insert(slot, index);
        tasks.schedule(index, tick);
        Ok(())
    }

    /// Removes the task covering `tick` on `channel`, clearing its start.
    ///
    /// Returns the removed task's index.
    pub fn lift(&mut self, tasks: &mut TaskSet, channel: ResourceType, tick: u32) -> Option<usize> {
        let lane = &mut self.lanes[channel.index()];
        let pos = lane
            .iter()
            .position(|&i| tasks.get(i).is_some_and(|t| t.occupies(tick)))?;
        let index = lane.remove(pos);
        if let Some(task) = tasks.get_mut(index) {
            task.scheduled = None;
        }
        Some(index)
    }

    /// Removes every task from the board and clears all start ticks.
    pub fn clear(&mut self, tasks: &mut TaskSet) {
        for lane in &mut self.lanes {
            lane.clear();
        }
        tasks.clear_schedule();
    }

    /// Per-channel queues in board order, ready for verification.
    pub fn queues(&self) -> ChannelQueues {
        let mut queues = ChannelQueues::new();
        for channel in ResourceType::ALL {
            for &index in self.lane(channel) {
                queues.push(channel, index);
            }
        }
        queues
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
