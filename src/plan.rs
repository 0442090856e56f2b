use crate::analysis::{self, SprintKpis};
use crate::calendar::SprintCalendar;
use crate::capacity;
use crate::config::SprintConfig;
use crate::eligibility;
use crate::fairness;
use crate::graph::TaskGraph;
use crate::member::{AssigneeSnapshot, Member};
use crate::scoring;
use crate::selection;
use crate::summarizer::{
    FallbackSummarizer, RetryPolicy, SprintSummarizer, SprintSummary, summarize_with_retry,
};
use crate::task::Task;
use crate::validation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a single planning run needs. Each request owns its own copies
/// of the member and task records, so concurrent runs never share state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub project_id: String,
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub config: SprintConfig,
}

#[derive(Debug, Clone)]
pub enum PlanningError {
    NoMembers,
    NoTasks,
    InvalidInput(String),
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::NoMembers => {
                write!(f, "no project members provided; sprint planning cannot proceed")
            }
            PlanningError::NoTasks => {
                write!(f, "no tasks provided; sprint planning cannot proceed")
            }
            PlanningError::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl std::error::Error for PlanningError {}

/// An accepted task with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub task_id: String,
    pub title: String,
    pub effort_hours: f64,
    pub assignee_id: String,
    pub priority_score: f64,
    pub deadline_critical: bool,
    /// Human-readable justification: score, effort, capacity before/after,
    /// fair share, fairness score.
    pub reason: String,
    pub assignee: AssigneeSnapshot,
}

/// A task left out of the plan, always with a specific reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredTask {
    pub task_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCapacity {
    pub member_id: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySummary {
    pub total_hours: f64,
    pub per_member: Vec<MemberCapacity>,
}

/// The complete plan for one sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintPlan {
    pub success: bool,
    /// Deterministic: `{project_id}-{sprint_start}`. Identical inputs yield
    /// an identical plan.
    pub plan_id: String,
    pub project_id: String,
    pub sprint_start: NaiveDate,
    pub sprint_end: NaiveDate,
    pub assignments: Vec<TaskAssignment>,
    /// Eligible tasks that did not make the plan.
    pub deferred: Vec<DeferredTask>,
    /// Tasks excluded by the eligibility filter before selection.
    pub ineligible: Vec<DeferredTask>,
    pub capacity: CapacitySummary,
    pub total_planned_hours: f64,
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub kpis: SprintKpis,
    pub summary: SprintSummary,
}

/// Plan a sprint with the deterministic fallback summarizer.
pub fn plan_sprint(request: &PlanRequest) -> Result<SprintPlan, PlanningError> {
    plan_sprint_with_summarizer(request, &FallbackSummarizer, RetryPolicy::default())
}

/// Plan a sprint, decorating the result through the given summarizer. The
/// summarizer is the only external call; its failure degrades to a fallback
/// summary and never fails the plan.
pub fn plan_sprint_with_summarizer(
    request: &PlanRequest,
    summarizer: &dyn SprintSummarizer,
    retry: RetryPolicy,
) -> Result<SprintPlan, PlanningError> {
    if request.members.is_empty() {
        return Err(PlanningError::NoMembers);
    }
    if request.tasks.is_empty() {
        return Err(PlanningError::NoTasks);
    }
    validation::validate_members(&request.members)
        .map_err(|err| PlanningError::InvalidInput(err.to_string()))?;
    validation::validate_tasks(&request.tasks)
        .map_err(|err| PlanningError::InvalidInput(err.to_string()))?;

    let config = &request.config;
    let calendar = SprintCalendar::new(
        config.sprint_start,
        config.sprint_length_days,
        &config.team_holidays,
    );

    // Capacity and fairness run once and feed selection; they are never
    // revisited mid-pass.
    let mut members = request.members.clone();
    capacity::compute_capacities(&mut members, &calendar, config);
    let total_capacity = capacity::total_capacity(&members);
    let fair_shares = fairness::allocate_fair_shares(&members, total_capacity);

    let eligibility = eligibility::filter_eligible(&request.tasks, &members, config);
    let graph = TaskGraph::build(&request.tasks);
    let scored = scoring::score_tasks(eligibility.eligible, &graph, config);

    let selection = selection::select_tasks(&members, scored, &fair_shares, config);

    tracing::info!(
        project = %request.project_id,
        assigned = selection.assignments.len(),
        deferred = selection.deferred.len(),
        ineligible = eligibility.ineligible.len(),
        "sprint selection complete"
    );

    let deferred_count = selection.deferred.len() + eligibility.ineligible.len();
    let kpis = analysis::analyze(
        &members,
        &request.tasks,
        &selection.assignments,
        deferred_count,
        &selection.tracker,
        &fair_shares,
        &calendar,
    );

    let mut recommendations = selection.recommendations;
    if kpis.risk.delay_risk_pct >= 80.0 {
        recommendations.push(format!(
            "delay risk is {:.0}%; consider descoping lower-priority work",
            kpis.risk.delay_risk_pct
        ));
    }
    if !kpis.risk.overloaded_members.is_empty() {
        recommendations.push(format!(
            "members above 95% of capacity: {}",
            kpis.risk.overloaded_members.join(", ")
        ));
    }

    let mut summary = summarize_with_retry(summarizer, &selection.assignments, retry);
    // Declared goals always win over generated ones.
    if !config.goals.is_empty() {
        summary.goals = config.goals.clone();
    }

    let total_planned_hours: f64 = selection.assignments.iter().map(|a| a.effort_hours).sum();
    let capacity_summary = CapacitySummary {
        total_hours: total_capacity,
        per_member: members
            .iter()
            .map(|m| MemberCapacity {
                member_id: m.id.clone(),
                hours: m.sprint_capacity_hours,
            })
            .collect(),
    };

    Ok(SprintPlan {
        success: true,
        plan_id: format!("{}-{}", request.project_id, config.sprint_start),
        project_id: request.project_id.clone(),
        sprint_start: config.sprint_start,
        sprint_end: config.sprint_end(),
        assignments: selection.assignments,
        deferred: selection.deferred,
        ineligible: eligibility.ineligible,
        capacity: capacity_summary,
        total_planned_hours,
        recommendations,
        kpis,
        summary,
    })
}
