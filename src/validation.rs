//! Structural validation for task sets.
//!
//! Generated puzzles are valid by construction. Hand-built or deserialized
//! task sets should be checked before use. Detects:
//! - Duplicate IDs
//! - Dependencies pointing outside the set or at the task itself
//! - Circular dependencies (DAG validation)
//! - Zero durations and bad register sets
//! - Dependency chains deeper than the cap
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashSet;

use crate::models::TaskSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A dependency index is outside the task set.
    InvalidDependency,
    /// A task depends on itself.
    SelfDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// A task has zero duration.
    ZeroDuration,
    /// A task holds no registers, or more than two.
    InvalidRegisters,
    /// A dependency chain is longer than the cap.
    DepthExceeded,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a task set.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. Every dependency index is in range and not the task itself
/// 3. Every task has a positive duration and one or two registers
/// 4. No circular dependencies
/// 5. No chain longer than `depth_cap` (skipped when cycles exist)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_task_set(tasks: &TaskSet, depth_cap: usize) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for (i, task) in tasks.iter().enumerate() {
        for &dep in &task.depends {
            if dep == i {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' depends on itself", task.id),
                ));
            } else if dep >= tasks.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Task '{}' references unknown dependency #{dep}", task.id),
                ));
            }
        }

        if task.duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Task '{}' has zero duration", task.id),
            ));
        }

        if task.registers.is_empty() || task.registers.len() > 2 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRegisters,
                format!(
                    "Task '{}' holds {} registers, expected 1 or 2",
                    task.id,
                    task.registers.len()
                ),
            ));
        }
    }

    let cyclic = detect_cycles(tasks);
    let has_cycle = cyclic.is_some();
    if let Some(cycle_err) = cyclic {
        errors.push(cycle_err);
    }

    if !has_cycle {
        for (i, task) in tasks.iter().enumerate() {
            let depth = tasks.depth(i);
            if depth > depth_cap {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DepthExceeded,
                    format!(
                        "Task '{}' ends a dependency chain of length {depth} (cap {depth_cap})",
                        task.id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// Self-loops are reported separately and skipped here.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
fn detect_cycles(tasks: &TaskSet) -> Option<ValidationError> {
    let n = tasks.len();
    let mut visited = vec![false; n];
    let mut in_stack = vec![false; n];

    for node in 0..n {
        if !visited[node] && has_cycle_dfs(node, tasks, &mut visited, &mut in_stack) {
            let id = tasks.get(node).map(|t| t.id.as_str()).unwrap_or_default();
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{id}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    tasks: &TaskSet,
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    if let Some(task) = tasks.get(node) {
        for &next in &task.depends {
            if next == node || next >= tasks.len() {
                continue;
            }
            if in_stack[next] {
                return true; // Back edge → cycle
            }
            if !visited[next] && has_cycle_dfs(next, tasks, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack[node] = false;
    false
}
