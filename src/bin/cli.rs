use chrono::NaiveDate;
use sprint_planner::{
    PlanRequest, SprintConfig, SprintPlan, load_members_from_csv, load_request_from_json,
    load_tasks_from_csv, plan_sprint,
};
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cli plan <request.json> [--json]");
    eprintln!(
        "  cli plan --tasks <tasks.csv> --members <members.csv> --project <id> \
         [--start YYYY-MM-DD] [--days N] [--json]"
    );
}

fn render_assignments_table(plan: &SprintPlan) -> String {
    let headers = ["task", "assignee", "effort_h", "score", "deadline_critical"];
    let rows: Vec<[String; 5]> = plan
        .assignments
        .iter()
        .map(|a| {
            [
                a.task_id.clone(),
                a.assignee_id.clone(),
                format!("{:.1}", a.effort_hours),
                format!("{:.1}", a.priority_score),
                a.deadline_critical.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci] - cell.len() + 1));
            line.push('|');
        }
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&header_cells));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn print_plan_text(plan: &SprintPlan) {
    println!(
        "plan {} ({} -> {})",
        plan.plan_id, plan.sprint_start, plan.sprint_end
    );
    println!("{}", render_assignments_table(plan));
    println!(
        "assigned={} deferred={} ineligible={} planned={:.1}h of {:.1}h",
        plan.assignments.len(),
        plan.deferred.len(),
        plan.ineligible.len(),
        plan.total_planned_hours,
        plan.capacity.total_hours
    );
    println!(
        "delay_risk={:.0}% sprint_risk_score={} predicted_velocity={:.1}",
        plan.kpis.risk.delay_risk_pct, plan.kpis.sprint_risk_score, plan.kpis.predicted_velocity
    );
    for deferred in &plan.deferred {
        println!("deferred {}: {}", deferred.task_id, deferred.reason);
    }
    for excluded in &plan.ineligible {
        println!("ineligible {}: {}", excluded.task_id, excluded.reason);
    }
    for recommendation in &plan.recommendations {
        println!("note: {recommendation}");
    }
    println!("summary: {}", plan.summary.summary);
}

struct PlanArgs {
    request_path: Option<String>,
    tasks_path: Option<String>,
    members_path: Option<String>,
    project_id: String,
    start: Option<NaiveDate>,
    days: Option<i64>,
    json_output: bool,
}

fn parse_plan_args(args: &[String]) -> Result<PlanArgs, String> {
    let mut parsed = PlanArgs {
        request_path: None,
        tasks_path: None,
        members_path: None,
        project_id: "project".to_string(),
        start: None,
        days: None,
        json_output: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => parsed.json_output = true,
            "--tasks" => {
                parsed.tasks_path =
                    Some(iter.next().ok_or("--tasks requires a path")?.clone());
            }
            "--members" => {
                parsed.members_path =
                    Some(iter.next().ok_or("--members requires a path")?.clone());
            }
            "--project" => {
                parsed.project_id = iter.next().ok_or("--project requires an id")?.clone();
            }
            "--start" => {
                let raw = iter.next().ok_or("--start requires a date")?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("unparseable start date '{raw}'"))?;
                parsed.start = Some(date);
            }
            "--days" => {
                let raw = iter.next().ok_or("--days requires a number")?;
                let days = raw
                    .parse()
                    .map_err(|_| format!("unparseable day count '{raw}'"))?;
                parsed.days = Some(days);
            }
            other if !other.starts_with("--") && parsed.request_path.is_none() => {
                parsed.request_path = Some(other.to_string());
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn build_request(args: &PlanArgs) -> Result<PlanRequest, String> {
    if let Some(path) = &args.request_path {
        let mut request = load_request_from_json(path).map_err(|err| err.to_string())?;
        if let Some(start) = args.start {
            request.config.sprint_start = start;
        }
        if let Some(days) = args.days {
            request.config.sprint_length_days = days;
        }
        return Ok(request);
    }

    let tasks_path = args
        .tasks_path
        .as_ref()
        .ok_or("either a request JSON file or --tasks/--members is required")?;
    let members_path = args
        .members_path
        .as_ref()
        .ok_or("--members is required alongside --tasks")?;

    let tasks = load_tasks_from_csv(tasks_path).map_err(|err| err.to_string())?;
    let members = load_members_from_csv(members_path).map_err(|err| err.to_string())?;

    let mut config = SprintConfig::default();
    if let Some(start) = args.start {
        config.sprint_start = start;
    }
    if let Some(days) = args.days {
        config.sprint_length_days = days;
    }

    Ok(PlanRequest {
        project_id: args.project_id.clone(),
        members,
        tasks,
        config,
    })
}

fn run_plan(args: &[String]) -> Result<(), String> {
    let parsed = parse_plan_args(args)?;
    let request = build_request(&parsed)?;
    let plan = plan_sprint(&request).map_err(|err| err.to_string())?;

    if parsed.json_output {
        let rendered =
            serde_json::to_string_pretty(&plan).map_err(|err| err.to_string())?;
        println!("{rendered}");
    } else {
        print_plan_text(&plan);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((command, rest)) if command == "plan" => match run_plan(rest) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
        _ => {
            print_usage();
            ExitCode::FAILURE
        }
    }
}
