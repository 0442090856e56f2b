use crate::calendar::SprintCalendar;
use crate::fairness::FairnessAllocation;
use crate::member::Member;
use crate::plan::TaskAssignment;
use crate::selection::LoadTracker;
use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A member counts as overloaded when planned work exceeds this share of
/// their capacity.
const OVERLOAD_THRESHOLD: f64 = 0.95;

/// Risk score weights and caps (score is the capped sum, 0-100).
const DEFERRED_WEIGHT: u32 = 2;
const DEFERRED_CAP: u32 = 40;
const CRITICAL_DEP_WEIGHT: u32 = 5;
const CRITICAL_DEP_CAP: u32 = 30;
const OVERLOAD_WEIGHT: u32 = 7;
const OVERLOAD_CAP: u32 = 20;
const DEADLINE_THREAT_WEIGHT: u32 = 5;
const DEADLINE_THREAT_CAP: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    /// min(100, capacity utilization x 125).
    pub delay_risk_pct: f64,
    pub overloaded_members: Vec<String>,
    /// Dependency ids referenced by selected tasks that are not themselves
    /// selected.
    pub critical_dependencies: Vec<String>,
    /// Selected tasks whose deadline falls on or before sprint end.
    pub deadline_threats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurndownPoint {
    pub date: NaiveDate,
    pub remaining_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReportEntry {
    pub member_id: String,
    pub fairness_score: f64,
    pub share: f64,
    pub fair_share_hours: f64,
    pub planned_hours: f64,
    pub overloaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberWorkload {
    pub member_id: String,
    pub task_count: u32,
    pub effort_hours: f64,
    pub story_points: f64,
}

/// Post-selection KPI bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintKpis {
    pub capacity_utilization: f64,
    pub risk: RiskAnalysis,
    pub predicted_velocity: f64,
    pub burndown: Vec<BurndownPoint>,
    pub sprint_risk_score: u32,
    pub fairness_report: Vec<FairnessReportEntry>,
    pub workloads: Vec<MemberWorkload>,
}

/// Risk & KPI analyzer. Pure post-processing over the selection outcome; it
/// never changes any decision.
pub(crate) fn analyze(
    members: &[Member],
    tasks: &[Task],
    assignments: &[TaskAssignment],
    deferred_count: usize,
    tracker: &LoadTracker,
    fairness: &FairnessAllocation,
    calendar: &SprintCalendar,
) -> SprintKpis {
    let task_map: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let selected_ids: HashSet<&str> = assignments.iter().map(|a| a.task_id.as_str()).collect();

    let total_capacity: f64 = members.iter().map(|m| m.sprint_capacity_hours).sum();
    let total_effort: f64 = assignments.iter().map(|a| a.effort_hours).sum();
    let utilization = if total_capacity > 0.0 {
        total_effort / total_capacity
    } else {
        0.0
    };
    let delay_risk_pct = (utilization * 100.0 * 1.25).min(100.0);

    let overloaded_members: Vec<String> = members
        .iter()
        .filter(|m| {
            m.sprint_capacity_hours > 0.0
                && tracker.planned_hours(&m.id) > OVERLOAD_THRESHOLD * m.sprint_capacity_hours
        })
        .map(|m| m.id.clone())
        .collect();
    let overloaded_set: HashSet<&str> = overloaded_members.iter().map(String::as_str).collect();

    let mut critical_dependencies: Vec<String> = Vec::new();
    let mut seen_deps: HashSet<&str> = HashSet::new();
    for assignment in assignments {
        if let Some(task) = task_map.get(assignment.task_id.as_str()) {
            for dep in &task.dependencies {
                if !selected_ids.contains(dep.as_str()) && seen_deps.insert(dep.as_str()) {
                    critical_dependencies.push(dep.clone());
                }
            }
        }
    }
    critical_dependencies.sort();

    let deadline_threats: Vec<String> = assignments
        .iter()
        .filter(|a| {
            task_map
                .get(a.task_id.as_str())
                .and_then(|t| t.deadline)
                .is_some_and(|deadline| deadline <= calendar.end())
        })
        .map(|a| a.task_id.clone())
        .collect();

    let predicted_velocity = if total_capacity > 0.0 {
        members
            .iter()
            .map(|m| {
                f64::from(m.velocity) * (m.sprint_capacity_hours / total_capacity)
                    * m.reliability_score
            })
            .sum()
    } else {
        0.0
    };

    let burndown = burndown_forecast(total_effort, calendar);

    let sprint_risk_score = (deferred_count as u32 * DEFERRED_WEIGHT).min(DEFERRED_CAP)
        + (critical_dependencies.len() as u32 * CRITICAL_DEP_WEIGHT).min(CRITICAL_DEP_CAP)
        + (overloaded_members.len() as u32 * OVERLOAD_WEIGHT).min(OVERLOAD_CAP)
        + (deadline_threats.len() as u32 * DEADLINE_THREAT_WEIGHT).min(DEADLINE_THREAT_CAP);

    let fairness_report: Vec<FairnessReportEntry> = members
        .iter()
        .map(|m| {
            let share = fairness.get(&m.id);
            FairnessReportEntry {
                member_id: m.id.clone(),
                fairness_score: share.map_or(0.0, |s| s.score),
                share: share.map_or(0.0, |s| s.share),
                fair_share_hours: share.map_or(0.0, |s| s.fair_hours),
                planned_hours: tracker.planned_hours(&m.id),
                overloaded: overloaded_set.contains(m.id.as_str()),
            }
        })
        .collect();

    let workloads: Vec<MemberWorkload> = members
        .iter()
        .map(|m| {
            let story_points = assignments
                .iter()
                .filter(|a| a.assignee_id == m.id)
                .filter_map(|a| task_map.get(a.task_id.as_str()))
                .map(|t| t.story_point_value())
                .sum();
            MemberWorkload {
                member_id: m.id.clone(),
                task_count: tracker.task_count(&m.id),
                effort_hours: tracker.planned_hours(&m.id),
                story_points,
            }
        })
        .collect();

    SprintKpis {
        capacity_utilization: utilization,
        risk: RiskAnalysis {
            delay_risk_pct,
            overloaded_members,
            critical_dependencies,
            deadline_threats,
        },
        predicted_velocity,
        burndown,
        sprint_risk_score,
        fairness_report,
        workloads,
    }
}

/// Straight-line forecast: total accepted effort spread evenly over every
/// calendar day of the sprint, ending at zero. Deliberately not
/// capacity-weighted per day.
fn burndown_forecast(total_effort: f64, calendar: &SprintCalendar) -> Vec<BurndownPoint> {
    let days = calendar.calendar_days();
    let intervals = days.len().saturating_sub(1);
    days.iter()
        .enumerate()
        .map(|(i, &date)| {
            // A single-day window has no interval to burn across; the one
            // point reports the effort still outstanding at the start.
            let remaining = if intervals == 0 {
                total_effort
            } else {
                total_effort * (1.0 - i as f64 / intervals as f64)
            };
            BurndownPoint {
                date,
                remaining_hours: remaining,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn burndown_is_linear_and_ends_at_zero() {
        let calendar = SprintCalendar::new(d(2025, 1, 6), 4, &[]);
        let points = burndown_forecast(40.0, &calendar);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].remaining_hours, 40.0);
        assert!((points[2].remaining_hours - 20.0).abs() < 1e-9);
        assert_eq!(points[4].remaining_hours, 0.0);
        assert_eq!(points[4].date, d(2025, 1, 10));
    }

    #[test]
    fn zero_length_sprint_keeps_effort_on_its_single_point() {
        let calendar = SprintCalendar::new(d(2025, 1, 6), 0, &[]);
        let points = burndown_forecast(16.0, &calendar);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].remaining_hours, 16.0);
        assert_eq!(points[0].date, d(2025, 1, 6));
    }
}
