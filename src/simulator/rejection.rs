//! Schedule rejection diagnostics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Register, ResourceType};

/// Why a proposed schedule was refused.
///
/// The `Display` form is a multi-line, human-readable diagnostic suitable
/// for showing to the player as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// A queue entry does not refer to a task in the set.
    #[error("Unknown task in schedule!\n{channel} queue refers to task #{index}")]
    UnknownTask { channel: ResourceType, index: usize },

    /// Tasks without a start tick.
    #[error("One or more tasks were not scheduled!\n{}", .ids.join(" "))]
    UnscheduledTasks { ids: Vec<String> },

    /// A queue head's start tick has already passed.
    #[error("Schedule not in order!\n{task} scheduled at {scheduled} found at time {tick}")]
    OutOfOrder {
        channel: ResourceType,
        task: String,
        scheduled: u32,
        tick: u32,
    },

    /// A channel is still busy when its next task is due.
    #[error(
        "Task collision! cannot schedule {task} at {tick}\n\
         {running} is already running on {channel} until {until}"
    )]
    ChannelCollision {
        channel: ResourceType,
        task: String,
        running: String,
        until: u32,
        tick: u32,
    },

    /// Two tasks running at the same tick share a register.
    #[error(
        "Cannot schedule task, register is already in use\n\
         {task} and {other} shared registers {} at {tick}",
        join_registers(.registers)
    )]
    RegisterConflict {
        task: String,
        other: String,
        registers: Vec<Register>,
        tick: u32,
    },

    /// A task is due before one of its dependencies completed.
    #[error(
        "Dependency not completed, cannot schedule {task}\n\
         {dependency} has not completed at {tick}"
    )]
    DependencyUnmet {
        task: String,
        dependency: String,
        tick: u32,
    },

    /// Work was still queued when the tick ceiling was reached.
    #[error(
        "The simulation did not terminate within {ceiling} ticks\n\
         {pending} task(s) still queued"
    )]
    NonTermination { ceiling: u32, pending: usize },
}

/// Rejection category, without the diagnostic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    UnknownTask,
    UnscheduledTasks,
    OutOfOrder,
    ChannelCollision,
    RegisterConflict,
    DependencyUnmet,
    NonTermination,
}

impl Rejection {
    /// The rejection category.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::UnknownTask { .. } => RejectionKind::UnknownTask,
            Rejection::UnscheduledTasks { .. } => RejectionKind::UnscheduledTasks,
            Rejection::OutOfOrder { .. } => RejectionKind::OutOfOrder,
            Rejection::ChannelCollision { .. } => RejectionKind::ChannelCollision,
            Rejection::RegisterConflict { .. } => RejectionKind::RegisterConflict,
            Rejection::DependencyUnmet { .. } => RejectionKind::DependencyUnmet,
            Rejection::NonTermination { .. } => RejectionKind::NonTermination,
        }
    }

    /// Whether the player can fix this by editing the schedule.
    ///
    /// `NonTermination` is an engine fault and returns `false`.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Rejection::NonTermination { .. })
    }

    /// Tick at which the violation was detected, for sweep-time rejections.
    pub fn tick(&self) -> Option<u32> {
        match self {
            Rejection::OutOfOrder { tick, .. }
            | Rejection::ChannelCollision { tick, .. }
            | Rejection::RegisterConflict { tick, .. }
            | Rejection::DependencyUnmet { tick, .. } => Some(*tick),
            Rejection::NonTermination { ceiling, .. } => Some(*ceiling),
            Rejection::UnknownTask { .. } | Rejection::UnscheduledTasks { .. } => None,
        }
    }
}

fn join_registers(registers: &[Register]) -> String {
    registers
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_multiline() {
        let r = Rejection::RegisterConflict {
            task: "2".into(),
            other: "1".into(),
            registers: vec![Register::A, Register::C],
            tick: 1,
        };
        let text = r.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("2 and 1 shared registers A C at 1"));
    }

    #[test]
    fn test_unscheduled_lists_ids() {
        let r = Rejection::UnscheduledTasks {
            ids: vec!["3".into(), "1".into()],
        };
        assert!(r.to_string().ends_with("3 1"));
        assert_eq!(r.tick(), None);
    }

    #[test]
    fn test_kind_and_user_error() {
        let r = Rejection::NonTermination {
            ceiling: 30,
            pending: 2,
        };
        assert_eq!(r.kind(), RejectionKind::NonTermination);
        assert!(!r.is_user_error());

        let r = Rejection::DependencyUnmet {
            task: "2".into(),
            dependency: "1".into(),
            tick: 1,
        };
        assert_eq!(r.kind(), RejectionKind::DependencyUnmet);
        assert!(r.is_user_error());
        assert_eq!(r.tick(), Some(1));
    }
}
