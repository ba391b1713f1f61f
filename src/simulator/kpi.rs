//! Schedule quality metrics (KPIs).
//!
//! Scores a schedule by how quickly it finishes and how busy each channel
//! is. Intended for schedules the verifier has accepted; on rejected
//! schedules the numbers are still computed but mean little.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest completion tick |
//! | Busy ticks | Sum of durations queued on a channel |
//! | Utilization | Busy ticks / makespan, per channel |
//! | Critical path | Longest duration-weighted dependency chain |

use serde::{Deserialize, Serialize};

use crate::models::{ChannelQueues, ResourceType, TaskSet};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest completion tick over queued tasks.
    pub makespan: u32,
    /// Busy ticks per channel, indexed by `ResourceType::index`.
    pub busy_ticks: [u32; ResourceType::COUNT],
    /// Busy fraction per channel (0.0..1.0).
    pub utilization: [f64; ResourceType::COUNT],
    /// Mean channel utilization.
    pub avg_utilization: f64,
    /// Lower bound on any makespan: the longest chain of durations.
    pub critical_path: u32,
}

impl ScheduleKpi {
    /// Computes KPIs from queued, scheduled tasks.
    pub fn calculate(queues: &ChannelQueues, tasks: &TaskSet) -> Self {
        let mut makespan = 0;
        let mut busy_ticks = [0u32; ResourceType::COUNT];

        for (channel, queue) in queues.iter() {
            for task in queue.iter().filter_map(|&i| tasks.get(i)) {
                let busy = &mut busy_ticks[channel.index()];
                *busy = busy.saturating_add(task.duration);
                if let Some(end) = task.end_tick() {
                    makespan = makespan.max(end);
                }
            }
        }

        let utilization = busy_ticks.map(|busy| {
            if makespan == 0 {
                0.0
            } else {
                f64::from(busy) / f64::from(makespan)
            }
        });
        let avg_utilization = utilization.iter().sum::<f64>() / ResourceType::COUNT as f64;

        Self {
            makespan,
            busy_ticks,
            utilization,
            avg_utilization,
            critical_path: critical_path(tasks),
        }
    }

    /// Utilization of one channel.
    pub fn channel_utilization(&self, channel: ResourceType) -> f64 {
        self.utilization[channel.index()]
    }

    /// Makespan over critical path; 1.0 means no schedule can finish sooner
    /// on dependencies alone.
    pub fn efficiency(&self) -> Option<f64> {
        if self.makespan == 0 {
            return None;
        }
        Some(f64::from(self.critical_path) / f64::from(self.makespan))
    }
}

/// Longest duration-weighted dependency chain. Cycles and dangling indices
/// contribute nothing.
fn critical_path(tasks: &TaskSet) -> u32 {
    fn finish(
        tasks: &TaskSet,
        index: usize,
        memo: &mut [Option<u32>],
        visiting: &mut [bool],
    ) -> u32 {
        let Some(task) = tasks.get(index) else {
            return 0;
        };
        if let Some(v) = memo[index] {
            return v;
        }
        if visiting[index] {
            return 0;
        }
        visiting[index] = true;
        let before = task
            .depends
            .iter()
            .map(|&d| finish(tasks, d, memo, visiting))
            .max()
            .unwrap_or(0);
        visiting[index] = false;
        let v = before.saturating_add(task.duration);
        memo[index] = Some(v);
        v
    }

    let mut memo = vec![None; tasks.len()];
    let mut visiting = vec![false; tasks.len()];
    (0..tasks.len())
        .map(|i| finish(tasks, i, &mut memo, &mut visiting))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Register, Task};

    fn sample() -> (ChannelQueues, TaskSet) {
        let tasks = TaskSet::new(vec![
            Task::new("1", ResourceType::Red, 2)
                .with_register(Register::A)
                .with_start(0),
            Task::new("2", ResourceType::Red, 2)
                .with_register(Register::B)
                .with_dependency(0)
                .with_start(2),
            Task::new("3", ResourceType::Green, 1)
                .with_register(Register::C)
                .with_start(0),
        ]);
        (ChannelQueues::from_scheduled(&tasks), tasks)
    }

    #[test]
    fn test_kpi_basic() {
        let (queues, tasks) = sample();
        let kpi = ScheduleKpi::calculate(&queues, &tasks);

        assert_eq!(kpi.makespan, 4);
        assert_eq!(kpi.busy_ticks, [4, 1, 0]);
        assert!((kpi.channel_utilization(ResourceType::Red) - 1.0).abs() < 1e-10);
        assert!((kpi.channel_utilization(ResourceType::Green) - 0.25).abs() < 1e-10);
        assert!((kpi.avg_utilization - 1.25 / 3.0).abs() < 1e-10);
        assert_eq!(kpi.critical_path, 4);
        assert!((kpi.efficiency().unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&ChannelQueues::new(), &TaskSet::default());
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.avg_utilization, 0.0);
        assert!(kpi.efficiency().is_none());
    }

    #[test]
    fn test_kpi_saturates_at_far_ticks() {
        let tasks = TaskSet::new(vec![
            Task::new("1", ResourceType::Red, 2).with_start(u32::MAX),
            Task::new("2", ResourceType::Red, u32::MAX)
                .with_dependency(0)
                .with_start(3),
        ]);
        let queues = ChannelQueues::from_scheduled(&tasks);
        let kpi = ScheduleKpi::calculate(&queues, &tasks);

        assert_eq!(kpi.makespan, u32::MAX);
        assert_eq!(kpi.busy_ticks[ResourceType::Red.index()], u32::MAX);
        assert_eq!(kpi.critical_path, u32::MAX);
    }
}
