//! Task-graph scheduling puzzles.
//!
//! Generates a random, resource-balanced, depth-bounded task dependency
//! graph and verifies whether a proposed per-channel execution order is a
//! legal schedule under a discrete-time simulation.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `TaskSet`, `ResourceType`,
//!   `Register`, `ChannelQueues`, `Board`
//! - **`generator`**: Random puzzle generation
//! - **`simulator`**: Tick-by-tick verification and schedule KPIs
//! - **`parser`**: `tick:id` text input to per-channel queues
//! - **`validation`**: Structural checks for hand-built task sets
//!
//! # Example
//!
//! ```
//! use tick_schedule::generator::Generator;
//! use tick_schedule::models::ChannelQueues;
//! use tick_schedule::simulator::{verify, RejectionKind};
//!
//! let tasks = Generator::new().generate(5);
//! let err = verify(&ChannelQueues::new(), &tasks).unwrap_err();
//! assert_eq!(err.kind(), RejectionKind::UnscheduledTasks);
//! ```

pub mod generator;
pub mod models;
pub mod parser;
pub mod simulator;
pub mod validation;
