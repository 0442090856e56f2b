pub mod analysis;
pub mod calendar;
pub mod capacity;
pub mod config;
pub mod eligibility;
pub mod fairness;
pub mod graph;
pub mod input;
pub mod member;
pub mod plan;
pub mod scoring;
pub mod selection;
pub mod summarizer;
pub mod task;
pub(crate) mod validation;

pub use analysis::{
    BurndownPoint, FairnessReportEntry, MemberWorkload, RiskAnalysis, SprintKpis,
};
pub use calendar::SprintCalendar;
pub use config::SprintConfig;
pub use eligibility::{EligibilityOutcome, EligibleTask};
pub use fairness::{FairShare, FairnessAllocation};
pub use input::{
    InputError, load_members_from_csv, load_request_from_json, load_tasks_from_csv,
};
pub use member::{AssigneeSnapshot, Member};
pub use plan::{
    CapacitySummary, DeferredTask, PlanRequest, PlanningError, SprintPlan, TaskAssignment,
    plan_sprint, plan_sprint_with_summarizer,
};
pub use summarizer::{
    FallbackSummarizer, RetryPolicy, SprintSummarizer, SprintSummary, SummarizerError,
};
pub use task::{Task, TaskComplexity, TaskPriority, TaskStatus};
