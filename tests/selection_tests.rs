use chrono::NaiveDate;
use sprint_planner::{
    Member, PlanRequest, SprintConfig, Task, TaskPriority, TaskStatus, plan_sprint,
};

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

fn member(id: &str, reliability: f64, availability: f64) -> Member {
    let mut m = Member::new(id);
    m.reliability_score = reliability;
    m.availability_factor = availability;
    m.velocity = 10;
    m
}

fn task(id: &str, hours: f64, priority: TaskPriority) -> Task {
    let mut t = Task::new(id, id);
    t.status = TaskStatus::Open;
    t.estimated_hours = hours;
    t.priority = priority;
    t
}

fn plan(members: Vec<Member>, tasks: Vec<Task>, config: SprintConfig) -> sprint_planner::SprintPlan {
    plan_sprint(&PlanRequest {
        project_id: "proj".to_string(),
        members,
        tasks,
        config,
    })
    .unwrap()
}

#[test]
fn most_reliable_member_picks_first() {
    // Identical tasks; the higher-reliability member must take the
    // higher-scored one.
    let tasks = vec![
        task("top", 8.0, TaskPriority::Critical),
        task("next", 8.0, TaskPriority::Low),
    ];
    let result = plan(
        vec![member("weak", 0.5, 1.0), member("strong", 0.9, 1.0)],
        tasks,
        config(),
    );

    let top = result
        .assignments
        .iter()
        .find(|a| a.task_id == "top")
        .expect("top task assigned");
    assert_eq!(top.assignee_id, "strong");
}

#[test]
fn availability_breaks_reliability_ties() {
    let tasks = vec![
        task("top", 8.0, TaskPriority::Critical),
        task("next", 8.0, TaskPriority::Low),
    ];
    let result = plan(
        vec![member("busy", 0.8, 0.6), member("free", 0.8, 1.0)],
        tasks,
        config(),
    );

    let top = result
        .assignments
        .iter()
        .find(|a| a.task_id == "top")
        .unwrap();
    assert_eq!(top.assignee_id, "free");
}

#[test]
fn preassignment_wins_over_pool_priority() {
    let mut mine = task("mine", 8.0, TaskPriority::Low);
    mine.assigned_to = Some("m1".into());
    let tasks = vec![task("hot", 8.0, TaskPriority::Critical), mine];
    let result = plan(vec![member("m1", 0.9, 1.0)], tasks, config());

    // The pre-assigned bucket is consulted before the pool even though the
    // pool task scores higher.
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].task_id, "mine");
}

/// Two members with equal fairness scores but unequal capacity: the skilled
/// member's capacity (129.6h) exceeds their fair share (97.2h), so fairness
/// can reject a task that raw capacity would admit.
fn skewed_team() -> Vec<Member> {
    let mut skilled = member("m1", 0.9, 1.0);
    skilled.skill_efficiency_multiplier = 2.0;
    vec![skilled, member("m2", 0.9, 1.0)]
}

#[test]
fn fairness_rejection_cites_fair_share() {
    let mut heavy = task("heavy", 110.0, TaskPriority::High);
    heavy.assigned_to = Some("m1".into());
    let result = plan(skewed_team(), vec![heavy], config());

    assert!(result.assignments.is_empty());
    let deferred = &result.deferred[0];
    assert_eq!(deferred.task_id, "heavy");
    assert!(deferred.reason.contains("fair share"), "{}", deferred.reason);
}

#[test]
fn pool_tasks_get_double_slack() {
    // 100h sits between fair share + 2h (99.2) and fair share + 4h (101.2):
    // acceptable from the pool, rejected when pre-assigned.
    let result = plan(
        skewed_team(),
        vec![task("wide", 100.0, TaskPriority::High)],
        config(),
    );
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].assignee_id, "m1");

    let mut pinned = task("wide", 100.0, TaskPriority::High);
    pinned.assigned_to = Some("m1".into());
    let result = plan(skewed_team(), vec![pinned], config());
    assert!(result.assignments.is_empty());
    assert!(result.deferred[0].reason.contains("fair share"));
}

#[test]
fn rejected_candidate_does_not_end_the_run() {
    // The top-scored task is capacity-rejected in the first pass, which
    // accepts nothing; the smaller task behind it must still be picked up on
    // the next pass.
    let mut cfg = config();
    cfg.max_tasks_per_member = Some(2);
    let tasks = vec![
        task("big", 100.0, TaskPriority::High),
        task("small", 8.0, TaskPriority::Low),
    ];
    let result = plan(vec![member("m1", 1.0, 1.0)], tasks, cfg);

    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].task_id, "small");
    let big = &result.deferred[0];
    assert_eq!(big.task_id, "big");
    assert!(big.reason.contains("remaining capacity"), "{}", big.reason);
}

#[test]
fn members_with_task_cap_take_multiple_passes() {
    let mut cfg = config();
    cfg.max_tasks_per_member = Some(3);
    let tasks = vec![
        task("a", 8.0, TaskPriority::High),
        task("b", 8.0, TaskPriority::Medium),
        task("c", 8.0, TaskPriority::Low),
    ];
    let result = plan(vec![member("m1", 0.9, 1.0)], tasks, cfg);

    // 64.8h capacity and 64.8h fair share admit all three 8h tasks.
    assert_eq!(result.assignments.len(), 3);
    let order: Vec<&str> = result
        .assignments
        .iter()
        .map(|a| a.task_id.as_str())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn idle_member_yields_unused_capacity_recommendation() {
    let result = plan(
        vec![member("m1", 0.9, 1.0), member("m2", 0.7, 1.0)],
        vec![task("only", 8.0, TaskPriority::High)],
        config(),
    );

    assert_eq!(result.assignments.len(), 1);
    assert!(
        result
            .recommendations
            .iter()
            .any(|r| r.contains("m2") && r.contains("unused capacity")),
        "{:?}",
        result.recommendations
    );
}

#[test]
fn zero_capacity_member_is_skipped() {
    let mut absent = member("ghost", 0.9, 1.0);
    absent.availability_factor = 0.0;
    let result = plan(
        vec![absent, member("m1", 0.5, 1.0)],
        vec![task("t", 8.0, TaskPriority::High)],
        config(),
    );

    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].assignee_id, "m1");
}

#[test]
fn acceptance_reason_carries_the_audit_numbers() {
    let result = plan(
        vec![member("m1", 0.9, 1.0)],
        vec![task("t", 10.0, TaskPriority::High)],
        config(),
    );

    let reason = &result.assignments[0].reason;
    assert!(reason.contains("priority score"), "{reason}");
    assert!(reason.contains("10.0h"), "{reason}");
    assert!(reason.contains("fair share"), "{reason}");
}

#[test]
fn stable_tie_break_keeps_input_order() {
    // Same score for both tasks; the earlier task must be taken first.
    let tasks = vec![
        task("first", 8.0, TaskPriority::Medium),
        task("second", 8.0, TaskPriority::Medium),
    ];
    let result = plan(
        vec![member("m1", 0.9, 1.0), member("m2", 0.8, 1.0)],
        tasks,
        config(),
    );

    let first = result
        .assignments
        .iter()
        .find(|a| a.task_id == "first")
        .unwrap();
    assert_eq!(first.assignee_id, "m1");
}
