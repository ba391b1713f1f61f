//! Random puzzle generation.
//!
//! # Algorithm
//!
//! 1. Create tasks "1".."N" and shuffle them.
//! 2. Draw a weight per channel, normalize to target ratios, and hand each
//!    task slot to the channel with the largest shortfall between its
//!    target ratio and its current share. Assign channels in that order
//!    over the shuffled list, then shuffle again. This list order is the
//!    generation order.
//! 3. Draw a duration and one or two registers per task.
//! 4. Walk the generation order; a task may only depend on tasks earlier in
//!    it, and only if that candidate's chain depth is below the cap.
//! 5. Shuffle once more so list position carries no hint.
//!
//! Step 4 makes the graph acyclic by construction and bounds the critical
//! path, which keeps every puzzle solvable within the verifier's tick
//! ceiling.

use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use tracing::debug;

use crate::models::{Register, ResourceType, Task, TaskSet};

/// Generation parameters.
///
/// Defaults give the standard nine-task puzzle feel: short tasks, shallow chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Range of the per-channel weight used for resource balancing.
    pub weight_range: RangeInclusive<u32>,
    /// Range of task durations in ticks.
    pub duration_range: RangeInclusive<u32>,
    /// Probability of drawing a second register.
    pub second_register_probability: f64,
    /// Probability that a task gets no dependency at all.
    pub skip_dependency_probability: f64,
    /// Probability of trying a second dependency once a first was tried.
    pub second_dependency_probability: f64,
    /// A candidate is accepted as a dependency only if its depth is below this.
    pub depth_cap: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            weight_range: 4..=16,
            duration_range: 1..=4,
            second_register_probability: 0.25,
            skip_dependency_probability: 0.33,
            second_dependency_probability: 0.34,
            depth_cap: 4,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the channel weight range.
    pub fn with_weight_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.weight_range = range;
        self
    }

    /// Sets the duration range.
    pub fn with_duration_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.duration_range = range;
        self
    }

    /// Sets the second-register probability (clamped to 0..=1).
    pub fn with_second_register_probability(mut self, p: f64) -> Self {
        self.second_register_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the probability of skipping dependencies (clamped to 0..=1).
    pub fn with_skip_dependency_probability(mut self, p: f64) -> Self {
        self.skip_dependency_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the second-dependency probability (clamped to 0..=1).
    pub fn with_second_dependency_probability(mut self, p: f64) -> Self {
        self.second_dependency_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the dependency depth cap.
    pub fn with_depth_cap(mut self, cap: usize) -> Self {
        self.depth_cap = cap;
        self
    }
}

/// Puzzle generator.
///
/// # Example
///
/// ```
/// use tick_schedule::generator::Generator;
///
/// let tasks = Generator::new().generate(9);
/// assert_eq!(tasks.len(), 9);
/// assert!(tasks.iter().all(|t| t.scheduled.is_none()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with the given configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates `count` tasks using the thread-local RNG.
    pub fn generate(&self, count: usize) -> TaskSet {
        self.generate_with_rng(count, &mut rand::rng())
    }

    /// Generates `count` tasks using the given RNG.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> TaskSet {
        let cfg = &self.config;

        let mut ids: Vec<String> = (1..=count).map(|i| i.to_string()).collect();
        ids.shuffle(rng);

        let counts = balanced_counts(count, &channel_ratios(&cfg.weight_range, rng));
        let mut tasks: Vec<Task> = ResourceType::ALL
            .iter()
            .zip(counts)
            .flat_map(|(&ch, n)| std::iter::repeat(ch).take(n))
            .zip(ids)
            .map(|(ch, id)| Task::new(id, ch, 1))
            .collect();
        tasks.shuffle(rng);

        for task in &mut tasks {
            task.duration = draw(&cfg.duration_range, rng).max(1);
        }

        for task in &mut tasks {
            task.registers = draw_registers(cfg.second_register_probability, rng);
        }

        let mut depth = vec![1usize; count];
        for i in 1..count {
            let mut picks: BTreeSet<usize> = BTreeSet::new();
            if chance(cfg.skip_dependency_probability, rng) {
                continue;
            }

            let cand = rng.random_range(0..i);
            if depth[cand] < cfg.depth_cap {
                picks.insert(cand);
            }

            if chance(cfg.second_dependency_probability, rng) {
                let cand = rng.random_range(0..i);
                if depth[cand] < cfg.depth_cap {
                    picks.insert(cand);
                }
            }

            depth[i] = 1 + picks.iter().map(|&d| depth[d]).max().unwrap_or(0);
            tasks[i].depends = picks;
        }

        let set = shuffle_set(tasks, rng);
        debug!(
            task_count = set.len(),
            max_depth = depth.iter().copied().max().unwrap_or(0),
            ?counts,
            "generated task set"
        );
        set
    }
}

/// Generates `count` tasks with the default configuration.
pub fn generate_tasks(count: usize) -> TaskSet {
    Generator::new().generate(count)
}

/// Uniform draw from `range`; an empty range yields its start.
fn draw<R: Rng + ?Sized>(range: &RangeInclusive<u32>, rng: &mut R) -> u32 {
    if range.is_empty() {
        *range.start()
    } else {
        rng.random_range(range.clone())
    }
}

/// Bernoulli draw with `p` clamped to a probability.
fn chance<R: Rng + ?Sized>(p: f64, rng: &mut R) -> bool {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    rng.random_bool(p)
}

/// Draws one weight per channel and normalizes to ratios summing to 1.
fn channel_ratios<R: Rng + ?Sized>(
    weight_range: &RangeInclusive<u32>,
    rng: &mut R,
) -> [f64; ResourceType::COUNT] {
    let weights: [f64; ResourceType::COUNT] =
        std::array::from_fn(|_| f64::from(draw(weight_range, rng).max(1)));
    let total: f64 = weights.iter().sum();
    weights.map(|w| w / total)
}

/// Splits `count` slots across channels, each step giving the slot to the
/// channel furthest below its target ratio. Ties go to the earlier channel.
fn balanced_counts(
    count: usize,
    ratios: &[f64; ResourceType::COUNT],
) -> [usize; ResourceType::COUNT] {
    let mut assigned = [0usize; ResourceType::COUNT];
    if count == 0 {
        return assigned;
    }
    let total = count as f64;
    for _ in 0..count {
        let mut best = 0;
        let mut best_gap = f64::NEG_INFINITY;
        for (ch, (&target, &n)) in ratios.iter().zip(&assigned).enumerate() {
            let gap = target - n as f64 / total;
            if gap > best_gap {
                best_gap = gap;
                best = ch;
            }
        }
        assigned[best] += 1;
    }
    assigned
}

/// One register always, plus a second independent draw with probability
/// `p_second`. A repeated draw collapses into the set, so the realized
/// two-register rate sits a little below `p_second`.
fn draw_registers<R: Rng + ?Sized>(p_second: f64, rng: &mut R) -> BTreeSet<Register> {
    let mut set = BTreeSet::new();
    if let Some(&r) = Register::ALL.choose(rng) {
        set.insert(r);
    }
    if chance(p_second, rng) {
        if let Some(&r) = Register::ALL.choose(rng) {
            set.insert(r);
        }
    }
    set
}

/// Shuffles tasks and rewrites dependency indices to the new positions.
fn shuffle_set<R: Rng + ?Sized>(tasks: Vec<Task>, rng: &mut R) -> TaskSet {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.shuffle(rng);

    let mut new_pos = vec![0usize; tasks.len()];
    for (pos, &old) in order.iter().enumerate() {
        new_pos[old] = pos;
    }

    let mut slots: Vec<Option<Task>> = tasks.into_iter().map(Some).collect();
    let shuffled = order
        .iter()
        .filter_map(|&old| slots[old].take())
        .map(|mut task| {
            task.depends = task.depends.iter().map(|&d| new_pos[d]).collect();
            task
        })
        .collect();
    TaskSet::new(shuffled)
}
