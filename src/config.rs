use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sprint-level planning parameters supplied alongside the member and task
/// lists. Every field has a serde default so partial request payloads resolve
/// to the documented values instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintConfig {
    /// First calendar day of the sprint. All deadline math is relative to
    /// this date rather than wall-clock time, which keeps planning runs
    /// reproducible.
    #[serde(default = "default_sprint_start")]
    pub sprint_start: NaiveDate,
    /// Sprint length in calendar days. The sprint window is
    /// [sprint_start, sprint_start + sprint_length_days], inclusive.
    #[serde(default = "default_sprint_length_days")]
    pub sprint_length_days: i64,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    /// Request-level cap on tasks per member. A per-member override takes
    /// precedence; absent both, each member takes at most one task.
    #[serde(default)]
    pub max_tasks_per_member: Option<u32>,
    /// Declared sprint goals. When non-empty these win over summarizer goals.
    #[serde(default)]
    pub goals: Vec<String>,
    /// Shared non-working dates for the whole team (company holidays).
    #[serde(default)]
    pub team_holidays: Vec<NaiveDate>,
    /// Deadlines within this many days of sprint_start mark a task
    /// Deadline-Critical.
    #[serde(default = "default_urgency_window_days")]
    pub urgency_window_days: i64,
    /// Fraction of effective capacity held back for unplanned work.
    #[serde(default = "default_capacity_safety_buffer")]
    pub capacity_safety_buffer: f64,
    /// Hours a pre-assigned task may push a member past their fair share.
    /// Pool tasks get double this slack.
    #[serde(default = "default_fairness_slack_hours")]
    pub fairness_slack_hours: f64,
}

fn default_sprint_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn default_sprint_length_days() -> i64 {
    14
}

fn default_hours_per_day() -> f64 {
    6.0
}

fn default_urgency_window_days() -> i64 {
    5
}

fn default_capacity_safety_buffer() -> f64 {
    0.10
}

fn default_fairness_slack_hours() -> f64 {
    2.0
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            sprint_start: default_sprint_start(),
            sprint_length_days: default_sprint_length_days(),
            hours_per_day: default_hours_per_day(),
            max_tasks_per_member: None,
            goals: Vec::new(),
            team_holidays: Vec::new(),
            urgency_window_days: default_urgency_window_days(),
            capacity_safety_buffer: default_capacity_safety_buffer(),
            fairness_slack_hours: default_fairness_slack_hours(),
        }
    }
}

impl SprintConfig {
    pub fn with_start(start: NaiveDate) -> Self {
        Self {
            sprint_start: start,
            ..Self::default()
        }
    }

    /// Last calendar day of the sprint window (inclusive).
    pub fn sprint_end(&self) -> NaiveDate {
        self.sprint_start + chrono::Duration::days(self.sprint_length_days)
    }

    /// Slack applied to tasks drawn from the unassigned pool. Unassigned work
    /// is treated more leniently than pre-assigned work.
    pub fn pool_slack_hours(&self) -> f64 {
        self.fairness_slack_hours * 2.0
    }
}
