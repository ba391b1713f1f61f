//! Puzzle domain models.
//!
//! Provides the data types shared by the generator, the parser and the
//! verifier.
//!
//! | Type | Role |
//! |------|------|
//! | `ResourceType` | Execution channel (Red/Green/Blue) |
//! | `Register` | Shared register, a conflict resource |
//! | `Task` / `TaskSet` | Work items and their dependency graph |
//! | `ChannelQueues` | Per-channel start order submitted for verification |
//! | `Board` | Placement surface that produces `ChannelQueues` |

mod resource;
mod schedule;
mod task;

pub use resource::{Register, ResourceType};
pub use schedule::{Board, ChannelQueues, PlacementError};
pub use task::{Task, TaskSet};
