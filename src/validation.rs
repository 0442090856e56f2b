use crate::member::Member;
use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

fn check_unit_interval(value: f64, member_id: &str, field: &str) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::new(format!(
            "member {member_id} has invalid {field} {value} (must be between 0 and 1)"
        )));
    }
    Ok(())
}

pub fn validate_members(members: &[Member]) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::with_capacity(members.len());
    for member in members {
        if member.id.trim().is_empty() {
            return Err(ValidationError::new("member with empty id"));
        }
        if !seen_ids.insert(member.id.as_str()) {
            return Err(ValidationError::new(format!(
                "duplicate member id {}",
                member.id
            )));
        }
        if !member.base_weekly_hours.is_finite() || member.base_weekly_hours < 0.0 {
            return Err(ValidationError::new(format!(
                "member {} has invalid base_weekly_hours {}",
                member.id, member.base_weekly_hours
            )));
        }
        if !member.skill_efficiency_multiplier.is_finite()
            || member.skill_efficiency_multiplier < 0.0
        {
            return Err(ValidationError::new(format!(
                "member {} has invalid skill_efficiency_multiplier {}",
                member.id, member.skill_efficiency_multiplier
            )));
        }
        check_unit_interval(member.availability_factor, &member.id, "availability_factor")?;
        check_unit_interval(member.reliability_score, &member.id, "reliability_score")?;
        check_unit_interval(member.overload_risk_score, &member.id, "overload_risk_score")?;
    }
    Ok(())
}

pub fn validate_tasks(tasks: &[Task]) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.id.trim().is_empty() {
            return Err(ValidationError::new("task with empty id"));
        }
        if !seen_ids.insert(task.id.as_str()) {
            return Err(ValidationError::new(format!("duplicate task id {}", task.id)));
        }
        if !task.estimated_hours.is_finite() || task.estimated_hours < 0.0 {
            return Err(ValidationError::new(format!(
                "task {} has invalid estimated_hours {}",
                task.id, task.estimated_hours
            )));
        }
        if !task.business_value.is_finite() || task.business_value < 0.0 {
            return Err(ValidationError::new(format!(
                "task {} has invalid business_value {}",
                task.id, task.business_value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_member_ids_rejected() {
        let members = vec![Member::new("m1"), Member::new("m1")];
        let err = validate_members(&members).unwrap_err();
        assert!(err.to_string().contains("duplicate member id m1"));
    }

    #[test]
    fn out_of_range_reliability_rejected() {
        let mut member = Member::new("m1");
        member.reliability_score = 1.5;
        assert!(validate_members(&[member]).is_err());
    }

    #[test]
    fn negative_estimate_rejected() {
        let mut task = Task::new("t1", "Bad");
        task.estimated_hours = -2.0;
        assert!(validate_tasks(&[task]).is_err());
    }
}
