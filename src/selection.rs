use crate::config::SprintConfig;
use crate::fairness::FairnessAllocation;
use crate::member::Member;
use crate::plan::{DeferredTask, TaskAssignment};
use crate::scoring::ScoredTask;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Hard cap on member passes. The loop normally stops as soon as a pass
/// accepts nothing; the cap guarantees termination regardless.
const MAX_SELECTION_PASSES: usize = 100;

/// Per-request running totals, keyed by member id. Never shared across
/// planning requests.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoadTracker {
    remaining: HashMap<String, f64>,
    planned: HashMap<String, f64>,
    task_counts: HashMap<String, u32>,
}

impl LoadTracker {
    fn new(members: &[Member]) -> Self {
        let mut tracker = Self::default();
        for member in members {
            tracker
                .remaining
                .insert(member.id.clone(), member.sprint_capacity_hours);
            tracker.planned.insert(member.id.clone(), 0.0);
            tracker.task_counts.insert(member.id.clone(), 0);
        }
        tracker
    }

    fn accept(&mut self, member_id: &str, effort: f64) {
        if let Some(remaining) = self.remaining.get_mut(member_id) {
            *remaining -= effort;
        }
        if let Some(planned) = self.planned.get_mut(member_id) {
            *planned += effort;
        }
        if let Some(count) = self.task_counts.get_mut(member_id) {
            *count += 1;
        }
    }

    pub(crate) fn remaining_hours(&self, member_id: &str) -> f64 {
        self.remaining.get(member_id).copied().unwrap_or(0.0)
    }

    pub(crate) fn planned_hours(&self, member_id: &str) -> f64 {
        self.planned.get(member_id).copied().unwrap_or(0.0)
    }

    pub(crate) fn task_count(&self, member_id: &str) -> u32 {
        self.task_counts.get(member_id).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SelectionOutcome {
    pub assignments: Vec<TaskAssignment>,
    pub deferred: Vec<DeferredTask>,
    pub recommendations: Vec<String>,
    pub tracker: LoadTracker,
}

/// Greedy selection engine.
///
/// Tasks are partitioned into per-member pre-assigned buckets and an
/// unassigned pool, each in stable descending score order. Members are walked
/// in descending (reliability, availability) order, input order breaking
/// ties; each member's turn considers one candidate, which is either accepted
/// or deferred with a capacity or fairness reason. Passes repeat until no
/// member can decide on any more tasks; a rejection removes its candidate
/// from contention, so the member's next pass sees the task behind it. Every
/// eligible task ends the run either assigned or deferred.
pub(crate) fn select_tasks(
    members: &[Member],
    scored: Vec<ScoredTask>,
    fairness: &FairnessAllocation,
    config: &SprintConfig,
) -> SelectionOutcome {
    // Stable descending score order; ties keep input order.
    let mut ranked: Vec<usize> = (0..scored.len()).collect();
    ranked.sort_by(|&a, &b| {
        scored[b]
            .score
            .partial_cmp(&scored[a].score)
            .unwrap_or(Ordering::Equal)
    });

    let mut buckets: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut pool: Vec<usize> = Vec::new();
    for &idx in &ranked {
        match scored[idx].task.assigned_to.as_deref() {
            Some(assignee) => buckets.entry(assignee).or_default().push(idx),
            None => pool.push(idx),
        }
    }

    // Deterministic member order: reliability, then availability, then the
    // original position.
    let mut member_order: Vec<usize> = (0..members.len()).collect();
    member_order.sort_by(|&a, &b| {
        members[b]
            .reliability_score
            .partial_cmp(&members[a].reliability_score)
            .unwrap_or(Ordering::Equal)
            .then(
                members[b]
                    .availability_factor
                    .partial_cmp(&members[a].availability_factor)
                    .unwrap_or(Ordering::Equal),
            )
    });

    let mut outcome = SelectionOutcome {
        tracker: LoadTracker::new(members),
        ..SelectionOutcome::default()
    };
    let mut available: Vec<bool> = vec![true; scored.len()];
    let mut already_recommended: HashSet<usize> = HashSet::new();

    for pass in 0..MAX_SELECTION_PASSES {
        let mut accepted_this_pass = 0usize;
        let mut rejected_this_pass = 0usize;

        for &mi in &member_order {
            let member = &members[mi];
            if member.sprint_capacity_hours <= 0.0 {
                continue;
            }
            if outcome.tracker.task_count(&member.id) >= member.effective_max_tasks {
                continue;
            }

            let candidate = buckets
                .get(member.id.as_str())
                .and_then(|bucket| bucket.iter().copied().find(|&idx| available[idx]))
                .map(|idx| (idx, true))
                .or_else(|| {
                    pool.iter()
                        .copied()
                        .find(|&idx| available[idx])
                        .map(|idx| (idx, false))
                });

            let Some((idx, pre_assigned)) = candidate else {
                if already_recommended.insert(mi) {
                    outcome.recommendations.push(format!(
                        "member {} has {:.1}h of unused capacity and no remaining candidate tasks",
                        member.id,
                        outcome.tracker.remaining_hours(&member.id)
                    ));
                }
                continue;
            };

            let entry = &scored[idx];
            let effort = entry.task.corrected_effort();
            let remaining = outcome.tracker.remaining_hours(&member.id);

            if remaining < effort {
                available[idx] = false;
                rejected_this_pass += 1;
                outcome.deferred.push(DeferredTask {
                    task_id: entry.task.id.clone(),
                    reason: format!(
                        "estimated {:.1}h exceeds member {}'s remaining capacity of {:.1}h",
                        effort, member.id, remaining
                    ),
                });
                continue;
            }

            let slack = if pre_assigned {
                config.fairness_slack_hours
            } else {
                config.pool_slack_hours()
            };
            let fair_hours = fairness.fair_hours(&member.id);
            let planned = outcome.tracker.planned_hours(&member.id);
            if planned + effort > fair_hours + slack {
                available[idx] = false;
                rejected_this_pass += 1;
                outcome.deferred.push(DeferredTask {
                    task_id: entry.task.id.clone(),
                    reason: format!(
                        "accepting {:.1}h would load member {} to {:.1}h, beyond their fair share \
                         of {:.1}h plus {:.1}h slack",
                        effort,
                        member.id,
                        planned + effort,
                        fair_hours,
                        slack
                    ),
                });
                continue;
            }

            available[idx] = false;
            outcome.tracker.accept(&member.id, effort);
            accepted_this_pass += 1;

            let fairness_score = fairness.get(&member.id).map_or(0.0, |s| s.score);
            let reason = format!(
                "priority score {:.1}{}; effort {:.1}h; capacity {:.1}h -> {:.1}h; \
                 fair share {:.1}h (fairness score {:.2})",
                entry.score,
                if entry.deadline_critical {
                    ", deadline-critical"
                } else {
                    ""
                },
                effort,
                remaining,
                remaining - effort,
                fair_hours,
                fairness_score
            );
            outcome.assignments.push(TaskAssignment {
                task_id: entry.task.id.clone(),
                title: entry.task.title.clone(),
                effort_hours: effort,
                assignee_id: member.id.clone(),
                priority_score: entry.score,
                deadline_critical: entry.deadline_critical,
                reason,
                assignee: member.snapshot(),
            });
        }

        tracing::debug!(
            pass,
            accepted = accepted_this_pass,
            rejected = rejected_this_pass,
            "selection pass complete"
        );
        // A rejection finalizes a candidate, so the member behind it may
        // still accept a smaller task next pass. Only a fully undecided pass
        // means nobody can take anything more.
        if accepted_this_pass == 0 && rejected_this_pass == 0 {
            break;
        }
    }

    // Everything still available was neither accepted nor explicitly
    // rejected; close it out so no task leaves the run undecided.
    for idx in ranked {
        if available[idx] {
            outcome.deferred.push(DeferredTask {
                task_id: scored[idx].task.id.clone(),
                reason: "not selected this sprint (capacity, fairness, priority, or per-member \
                         task limit)"
                    .to_string(),
            });
        }
    }

    outcome
}
