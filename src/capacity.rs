use crate::calendar::SprintCalendar;
use crate::config::SprintConfig;
use crate::member::Member;

/// Capacity calculator: turns each member's availability, skill, reliability
/// and overload attributes into effective usable hours for the sprint window,
/// writing the derived fields back onto the member records.
///
/// Effective hours = workdays x hours/day
///                   x availability x reliability x skill
///                   x (1 - overload risk)
///                   x (1 - safety buffer), floored at 0.
pub fn compute_capacities(
    members: &mut [Member],
    calendar: &SprintCalendar,
    config: &SprintConfig,
) {
    for member in members.iter_mut() {
        let workdays = calendar.workdays_for(&member.unavailable_dates);
        let base_hours = workdays as f64 * config.hours_per_day;

        let effective = base_hours
            * member.availability_factor
            * member.reliability_score
            * member.skill_efficiency_multiplier
            * (1.0 - member.overload_risk_score)
            * (1.0 - config.capacity_safety_buffer);

        member.sprint_capacity_hours = effective.max(0.0);
        member.effective_max_tasks = effective_max_tasks(member, config);

        tracing::debug!(
            member = %member.id,
            workdays,
            capacity = member.sprint_capacity_hours,
            max_tasks = member.effective_max_tasks,
            "computed sprint capacity"
        );
    }
}

/// Task-count ceiling: a positive per-member override wins, then a positive
/// request-level cap, else strictly one task per member per sprint. The
/// one-task default is a deliberate policy favoring focus over throughput.
fn effective_max_tasks(member: &Member, config: &SprintConfig) -> u32 {
    match member.max_tasks {
        Some(cap) if cap > 0 => cap,
        _ => match config.max_tasks_per_member {
            Some(cap) if cap > 0 => cap,
            _ => 1,
        },
    }
}

/// Sum of computed member capacities.
pub fn total_capacity(members: &[Member]) -> f64 {
    members.iter().map(|m| m.sprint_capacity_hours).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config() -> SprintConfig {
        SprintConfig {
            sprint_start: d(2025, 1, 6),
            sprint_length_days: 11,
            hours_per_day: 8.0,
            ..SprintConfig::default()
        }
    }

    #[test]
    fn full_attendance_gets_buffered_base_hours() {
        let config = config();
        // Mon Jan 6 .. Fri Jan 17: 10 weekdays.
        let calendar = SprintCalendar::new(config.sprint_start, config.sprint_length_days, &[]);
        let mut members = vec![Member::new("m1")];
        members[0].reliability_score = 1.0;

        compute_capacities(&mut members, &calendar, &config);
        assert!((members[0].sprint_capacity_hours - 72.0).abs() < 1e-9);
        assert_eq!(members[0].effective_max_tasks, 1);
    }

    #[test]
    fn overload_and_unavailability_shrink_capacity() {
        let config = config();
        let calendar = SprintCalendar::new(config.sprint_start, config.sprint_length_days, &[]);
        let mut members = vec![Member::new("m1")];
        members[0].reliability_score = 0.8;
        members[0].availability_factor = 0.5;
        members[0].overload_risk_score = 0.25;
        members[0].unavailable_dates = vec![d(2025, 1, 6), d(2025, 1, 7)];

        compute_capacities(&mut members, &calendar, &config);
        // 8 workdays * 8h * 0.5 * 0.8 * 1.0 * 0.75 * 0.9
        assert!((members[0].sprint_capacity_hours - 17.28).abs() < 1e-9);
    }

    #[test]
    fn capacity_never_goes_negative() {
        let config = config();
        let calendar = SprintCalendar::new(config.sprint_start, config.sprint_length_days, &[]);
        let mut members = vec![Member::new("m1")];
        members[0].availability_factor = 0.0;

        compute_capacities(&mut members, &calendar, &config);
        assert_eq!(members[0].sprint_capacity_hours, 0.0);
    }

    #[test]
    fn member_cap_beats_request_cap() {
        let mut config = config();
        config.max_tasks_per_member = Some(3);
        let calendar = SprintCalendar::new(config.sprint_start, config.sprint_length_days, &[]);
        let mut members = vec![Member::new("a"), Member::new("b")];
        members[0].max_tasks = Some(2);

        compute_capacities(&mut members, &calendar, &config);
        assert_eq!(members[0].effective_max_tasks, 2);
        assert_eq!(members[1].effective_max_tasks, 3);
    }
}
