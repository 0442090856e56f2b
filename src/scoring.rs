use crate::config::SprintConfig;
use crate::eligibility::EligibleTask;
use crate::graph::TaskGraph;
use crate::task::Task;

const WEIGHT_PRIORITY: f64 = 0.30;
const WEIGHT_BUSINESS_VALUE: f64 = 0.15;
const WEIGHT_DEADLINE_CRITICAL: f64 = 0.35;
const WEIGHT_COMPLEXITY: f64 = 0.10;
const WEIGHT_DEPENDENCY_DEPTH: f64 = 0.05;
const WEIGHT_DEADLINE_PRESSURE: f64 = 0.05;

/// Dependency chains at or beyond this depth saturate the depth term.
const DEPTH_SATURATION: f64 = 5.0;

/// An eligible task annotated with its composite priority score.
#[derive(Debug, Clone)]
pub struct ScoredTask {
    pub task: Task,
    pub deadline_critical: bool,
    pub score: f64,
}

/// Priority scorer: fixed-weight composite on a 0-100 scale. Static priority
/// and the Deadline-Critical tag dominate; business value saturates, lower
/// complexity is mildly favored, and deep dependency chains plus imminent
/// deadlines add small nudges.
pub fn score_tasks(
    eligible: Vec<EligibleTask>,
    graph: &TaskGraph,
    config: &SprintConfig,
) -> Vec<ScoredTask> {
    eligible
        .into_iter()
        .map(|entry| {
            let depth = graph.dependency_depth(&entry.task.id);
            let score = composite_score(&entry.task, entry.deadline_critical, depth, config);
            ScoredTask {
                task: entry.task,
                deadline_critical: entry.deadline_critical,
                score,
            }
        })
        .collect()
}

fn composite_score(task: &Task, deadline_critical: bool, depth: u32, config: &SprintConfig) -> f64 {
    let priority_term = task.priority.normalized();

    let value = task.business_value.max(0.0);
    let value_term = value / (value + 1.0);

    let deadline_term = if deadline_critical { 1.0 } else { 0.0 };

    let complexity_term = 1.0 - task.complexity.level() / 3.0;

    let depth_term = (f64::from(depth) / DEPTH_SATURATION).min(1.0);

    let pressure_term = match task.deadline {
        Some(deadline) => {
            let days = (deadline - config.sprint_start).num_days().max(0);
            1.0 / (days as f64 + 1.0)
        }
        None => 0.0,
    };

    let score = priority_term * WEIGHT_PRIORITY
        + value_term * WEIGHT_BUSINESS_VALUE
        + deadline_term * WEIGHT_DEADLINE_CRITICAL
        + complexity_term * WEIGHT_COMPLEXITY
        + depth_term * WEIGHT_DEPENDENCY_DEPTH
        + pressure_term * WEIGHT_DEADLINE_PRESSURE;

    score * 100.0
}
