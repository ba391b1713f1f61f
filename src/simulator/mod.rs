//! Schedule verification and scoring.
//!
//! `Simulator` replays per-channel queues on a virtual clock and either
//! accepts them with a `SimulationReport` or returns the first `Rejection`.
//! `ScheduleKpi` scores an accepted schedule.
//!
//! # Rejection Kinds
//!
//! | Kind | Meaning |
//! |------|---------|
//! | UnknownTask | Queue entry outside the task set |
//! | UnscheduledTasks | Some task has no start tick |
//! | OutOfOrder | Queue head's start tick already passed |
//! | ChannelCollision | Channel busy when the next task is due |
//! | RegisterConflict | Running tasks share a register |
//! | DependencyUnmet | Task due before a dependency completed |
//! | NonTermination | Tick ceiling reached with work queued |

mod kpi;
mod rejection;
mod verifier;

pub use kpi::ScheduleKpi;
pub use rejection::{Rejection, RejectionKind};
pub use verifier::{verify, Admission, SimulationReport, Simulator, SimulatorConfig};
