use crate::config::SprintConfig;
use crate::member::Member;
use crate::plan::DeferredTask;
use crate::task::Task;
use chrono::Duration;
use std::collections::{HashMap, HashSet};

/// A task that survived the eligibility filter.
#[derive(Debug, Clone)]
pub struct EligibleTask {
    pub task: Task,
    /// Deadline falls within the urgency window from sprint start; boosts
    /// the priority score.
    pub deadline_critical: bool,
}

/// Filter output: schedulable tasks plus the tasks excluded up front, each
/// with a specific reason.
#[derive(Debug, Clone, Default)]
pub struct EligibilityOutcome {
    pub eligible: Vec<EligibleTask>,
    pub ineligible: Vec<DeferredTask>,
}

/// Task eligibility filter: excludes tasks whose status is not schedulable,
/// whose dependencies are not all complete, or whose pre-assignee is missing
/// from the roster. Survivors are tagged Deadline-Critical when their
/// deadline is within the urgency window.
///
/// Dependency ids absent from the task map count as incomplete: the filter
/// only trusts what it can see.
pub fn filter_eligible(
    tasks: &[Task],
    members: &[Member],
    config: &SprintConfig,
) -> EligibilityOutcome {
    let task_map: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let roster: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
    let urgency_cutoff = config.sprint_start + Duration::days(config.urgency_window_days);

    let mut outcome = EligibilityOutcome::default();

    for task in tasks {
        if !task.status.is_schedulable() {
            outcome.ineligible.push(DeferredTask {
                task_id: task.id.clone(),
                reason: format!(
                    "status {} is not schedulable this sprint",
                    task.status.as_str()
                ),
            });
            continue;
        }

        let blocking: Vec<&str> = task
            .dependencies
            .iter()
            .filter(|dep| {
                !task_map
                    .get(dep.as_str())
                    .is_some_and(|d| d.status.is_complete())
            })
            .map(String::as_str)
            .collect();
        if !blocking.is_empty() {
            outcome.ineligible.push(DeferredTask {
                task_id: task.id.clone(),
                reason: format!(
                    "blocked by {} incomplete dependencies: {}",
                    blocking.len(),
                    blocking.join(", ")
                ),
            });
            continue;
        }

        if let Some(assignee) = &task.assigned_to {
            if !roster.contains(assignee.as_str()) {
                outcome.ineligible.push(DeferredTask {
                    task_id: task.id.clone(),
                    reason: format!("pre-assigned member {assignee} is not in the sprint roster"),
                });
                continue;
            }
        }

        let deadline_critical = task
            .deadline
            .is_some_and(|deadline| deadline <= urgency_cutoff);

        outcome.eligible.push(EligibleTask {
            task: task.clone(),
            deadline_critical,
        });
    }

    tracing::debug!(
        eligible = outcome.eligible.len(),
        ineligible = outcome.ineligible.len(),
        "partitioned tasks for eligibility"
    );

    outcome
}
