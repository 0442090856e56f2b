use crate::plan::TaskAssignment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Canned categorized goals used whenever a summarizer cannot supply its own.
const FALLBACK_GOALS: [&str; 6] = [
    "Finalize and merge all code for high-priority features (Delivery Goal).",
    "Complete the implementation of the primary backend ingestion API (Delivery Goal).",
    "Achieve 100% unit test coverage for all newly implemented features (Quality Goal).",
    "Resolve all identified P1 and P2 bugs from the current backlog (Quality Goal).",
    "Validate and document the finalized API specification with the consuming frontend team \
     (Risk/Dependency Goal).",
    "Set up the foundational CI/CD pipeline to de-risk future deployments (Risk/Dependency Goal).",
];

/// Prose decoration attached to a finished plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSummary {
    pub summary: String,
    /// 0..1 confidence in the plan's achievability; 0.0 for fallbacks.
    pub confidence: f64,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SummarizerError {
    message: String,
}

impl SummarizerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SummarizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SummarizerError {}

/// External summary generator. The engine treats every failure as
/// recoverable: after retries run out it substitutes the deterministic
/// fallback and the plan still succeeds.
pub trait SprintSummarizer {
    fn summarize(&self, assignments: &[TaskAssignment]) -> Result<SprintSummary, SummarizerError>;
}

/// Deterministic summarizer derived purely from the assignment count. Also
/// the substitute whenever a real summarizer keeps failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSummarizer;

impl FallbackSummarizer {
    fn sprint_shape(task_count: usize) -> (&'static str, usize) {
        if task_count <= 3 {
            ("light sprint focused on quick wins", 2)
        } else if task_count <= 8 {
            ("balanced sprint focusing on key deliverables", 3)
        } else {
            ("intensive sprint addressing complex objectives", 5)
        }
    }
}

impl SprintSummarizer for FallbackSummarizer {
    fn summarize(&self, assignments: &[TaskAssignment]) -> Result<SprintSummary, SummarizerError> {
        let (sprint_type, goal_count) = Self::sprint_shape(assignments.len());
        Ok(SprintSummary {
            summary: format!(
                "This is a {} with {} tasks. Team should prioritize efficiency and alignment.",
                sprint_type,
                assignments.len()
            ),
            confidence: 0.0,
            goals: FALLBACK_GOALS[..goal_count]
                .iter()
                .map(|g| g.to_string())
                .collect(),
        })
    }
}

/// Bounded retry schedule for summarizer calls: `max_attempts` tries with
/// the delay doubling after each failure.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts; used by tests.
    pub fn immediate() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::ZERO,
        }
    }
}

/// Run the summarizer under the retry policy, degrading to the fallback
/// summary once attempts are exhausted. Never fails the plan.
pub fn summarize_with_retry(
    summarizer: &dyn SprintSummarizer,
    assignments: &[TaskAssignment],
    policy: RetryPolicy,
) -> SprintSummary {
    let mut delay = policy.initial_delay;
    for attempt in 1..=policy.max_attempts.max(1) {
        match summarizer.summarize(assignments) {
            Ok(summary) => return summary,
            Err(err) => {
                tracing::warn!(attempt, error = %err, "sprint summarizer attempt failed");
                if attempt < policy.max_attempts && !delay.is_zero() {
                    std::thread::sleep(delay);
                    delay *= 2;
                }
            }
        }
    }
    tracing::info!("summarizer exhausted retries; using fallback summary");
    FallbackSummarizer
        .summarize(assignments)
        .unwrap_or_else(|_| SprintSummary {
            summary: String::new(),
            confidence: 0.0,
            goals: Vec::new(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_scales_goals_with_task_count() {
        assert_eq!(FallbackSummarizer::sprint_shape(0), ("light sprint focused on quick wins", 2));
        assert_eq!(FallbackSummarizer::sprint_shape(3).1, 2);
        assert_eq!(FallbackSummarizer::sprint_shape(8).1, 3);
        assert_eq!(FallbackSummarizer::sprint_shape(9).1, 5);
    }

    #[test]
    fn retry_falls_back_after_exhaustion() {
        struct AlwaysFails;
        impl SprintSummarizer for AlwaysFails {
            fn summarize(
                &self,
                _assignments: &[TaskAssignment],
            ) -> Result<SprintSummary, SummarizerError> {
                Err(SummarizerError::new("upstream timeout"))
            }
        }

        let summary = summarize_with_retry(&AlwaysFails, &[], RetryPolicy::immediate());
        assert_eq!(summary.confidence, 0.0);
        assert_eq!(summary.goals.len(), 2);
        assert!(summary.summary.contains("light sprint"));
    }
}
