use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Effort substituted when a task arrives with a zero or missing estimate,
/// so unestimated work never vanishes from capacity math.
pub const DEFAULT_EFFORT_HOURS: f64 = 8.0;

/// Hours-to-story-points divisor used when a task carries no explicit
/// story-point figure.
pub const HOURS_PER_STORY_POINT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Critical => "Critical",
        }
    }

    /// Priority level normalized to [0, 1] for scoring.
    pub fn normalized(&self) -> f64 {
        match self {
            TaskPriority::Low => 0.25,
            TaskPriority::Medium => 0.5,
            TaskPriority::High => 0.75,
            TaskPriority::Critical => 1.0,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl FromStr for TaskPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "trivial" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" => Ok(TaskPriority::Critical),
            _ => Err(()),
        }
    }
}

// Unknown priority strings fall back to Medium rather than failing the load.
impl From<String> for TaskPriority {
    fn from(value: String) -> Self {
        TaskPriority::from_str(&value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum TaskStatus {
    Backlog,
    Open,
    Done,
    Completed,
    Other,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::Open => "Open",
            TaskStatus::Done => "Done",
            TaskStatus::Completed => "Completed",
            TaskStatus::Other => "Other",
        }
    }

    /// Statuses that may enter a sprint.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, TaskStatus::Backlog | TaskStatus::Open)
    }

    /// Statuses that satisfy a dependency.
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Completed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Backlog
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backlog" => Ok(TaskStatus::Backlog),
            "open" => Ok(TaskStatus::Open),
            "done" => Ok(TaskStatus::Done),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        TaskStatus::from_str(&value).unwrap_or(TaskStatus::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum TaskComplexity {
    Low,
    Medium,
    High,
}

impl TaskComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskComplexity::Low => "Low",
            TaskComplexity::Medium => "Medium",
            TaskComplexity::High => "High",
        }
    }

    pub fn level(&self) -> f64 {
        match self {
            TaskComplexity::Low => 1.0,
            TaskComplexity::Medium => 2.0,
            TaskComplexity::High => 3.0,
        }
    }
}

impl Default for TaskComplexity {
    fn default() -> Self {
        TaskComplexity::Medium
    }
}

impl FromStr for TaskComplexity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskComplexity::Low),
            "medium" => Ok(TaskComplexity::Medium),
            "high" => Ok(TaskComplexity::High),
            _ => Err(()),
        }
    }
}

impl From<String> for TaskComplexity {
    fn from(value: String) -> Self {
        TaskComplexity::from_str(&value).unwrap_or_default()
    }
}

/// A backlog work item.
///
/// Immutable during planning; the engine only reads these records and carries
/// its own derived state (eligibility reasons, scores, resolved assignees) in
/// request-scoped structures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Estimated hours. Zero or absent means "unestimated" and falls back to
    /// [`DEFAULT_EFFORT_HOURS`] for all effort math.
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub business_value: f64,
    #[serde(default)]
    pub complexity: TaskComplexity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    /// Direct dependency task ids. Order carries no meaning.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Pre-assignment to a member id, honored before the unassigned pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            estimated_hours: 0.0,
            business_value: 0.0,
            complexity: TaskComplexity::default(),
            deadline: None,
            dependencies: Vec::new(),
            assigned_to: None,
            story_points: None,
        }
    }

    /// Estimated hours with the unestimated-task fallback applied.
    pub fn corrected_effort(&self) -> f64 {
        if self.estimated_hours > 0.0 {
            self.estimated_hours
        } else {
            DEFAULT_EFFORT_HOURS
        }
    }

    /// Explicit story points when present, else derived from corrected effort.
    pub fn story_point_value(&self) -> f64 {
        self.story_points
            .unwrap_or_else(|| self.corrected_effort() / HOURS_PER_STORY_POINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_priority_defaults_to_medium() {
        let task: Task =
            serde_json::from_str(r#"{"id": "t1", "priority": "Blocker"}"#).unwrap();
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn unknown_status_maps_to_other() {
        let task: Task =
            serde_json::from_str(r#"{"id": "t1", "status": "InReview"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Other);
        assert!(!task.status.is_schedulable());
    }

    #[test]
    fn zero_estimate_corrects_to_default_effort() {
        let task = Task::new("t1", "Unestimated");
        assert_eq!(task.corrected_effort(), DEFAULT_EFFORT_HOURS);
        assert_eq!(task.story_point_value(), 2.0);
    }

    #[test]
    fn explicit_story_points_win_over_derived() {
        let mut task = Task::new("t1", "Sized");
        task.estimated_hours = 12.0;
        task.story_points = Some(5.0);
        assert_eq!(task.story_point_value(), 5.0);
    }
}
