use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A project member available for sprint work.
///
/// Caller-supplied fields carry serde defaults so sparse payloads resolve to
/// the documented baseline values at deserialization time. The two derived
/// fields are written by the capacity calculator at the start of every
/// planning run and are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text role label. Informational only; no keyword matching happens
    /// against it during planning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default = "default_base_weekly_hours")]
    pub base_weekly_hours: f64,
    /// Dates the member is fully unavailable.
    #[serde(default)]
    pub unavailable_dates: Vec<NaiveDate>,
    /// Fraction of nominal time the member is present (0..1).
    #[serde(default = "default_availability_factor")]
    pub availability_factor: f64,
    /// Throughput multiplier for skill level (>= 0).
    #[serde(default = "default_skill_efficiency_multiplier")]
    pub skill_efficiency_multiplier: f64,
    /// Historical completion dependability (0..1).
    #[serde(default = "default_reliability_score")]
    pub reliability_score: f64,
    /// Current risk of being overcommitted (0..1).
    #[serde(default)]
    pub overload_risk_score: f64,
    /// Historical throughput in velocity units.
    #[serde(default)]
    pub velocity: u32,
    /// Per-member task-count cap. Takes precedence over the request-level
    /// cap when positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tasks: Option<u32>,

    // Derived fields, recomputed by the capacity calculator every run.
    #[serde(default)]
    pub sprint_capacity_hours: f64,
    #[serde(default)]
    pub effective_max_tasks: u32,
}

fn default_base_weekly_hours() -> f64 {
    40.0
}

fn default_availability_factor() -> f64 {
    1.0
}

fn default_skill_efficiency_multiplier() -> f64 {
    1.0
}

fn default_reliability_score() -> f64 {
    0.7
}

impl Member {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: None,
            base_weekly_hours: default_base_weekly_hours(),
            unavailable_dates: Vec::new(),
            availability_factor: default_availability_factor(),
            skill_efficiency_multiplier: default_skill_efficiency_multiplier(),
            reliability_score: default_reliability_score(),
            overload_risk_score: 0.0,
            velocity: 0,
            max_tasks: None,
            sprint_capacity_hours: 0.0,
            effective_max_tasks: 0,
        }
    }

    pub fn snapshot(&self) -> AssigneeSnapshot {
        AssigneeSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            sprint_capacity_hours: self.sprint_capacity_hours,
            reliability_score: self.reliability_score,
            velocity: self.velocity,
        }
    }
}

/// Point-in-time view of an assignee attached to each accepted assignment so
/// the plan is readable without joining back to the member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeSnapshot {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub sprint_capacity_hours: f64,
    pub reliability_score: f64,
    pub velocity: u32,
}
