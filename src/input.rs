use crate::member::Member;
use crate::plan::PlanRequest;
use crate::task::{Task, TaskComplexity, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum InputError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Serialization(err) => write!(f, "serialization error: {err}"),
            InputError::Io(err) => write!(f, "io error: {err}"),
            InputError::Csv(err) => write!(f, "csv error: {err}"),
            InputError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for InputError {}

impl From<SerdeJsonError> for InputError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for InputError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for InputError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type InputResult<T> = Result<T, InputError>;

/// Load a full planning request from a JSON file.
pub fn load_request_from_json<P: AsRef<Path>>(path: P) -> InputResult<PlanRequest> {
    let file = File::open(path)?;
    let request: PlanRequest = serde_json::from_reader(file)?;
    Ok(request)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    estimated_hours: String,
    #[serde(default)]
    business_value: String,
    #[serde(default)]
    complexity: String,
    #[serde(default)]
    deadline: String,
    /// Semicolon-joined dependency ids.
    #[serde(default)]
    dependencies: String,
    #[serde(default)]
    assigned_to: String,
    #[serde(default)]
    story_points: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemberCsvRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    base_weekly_hours: String,
    /// Semicolon-joined ISO dates.
    #[serde(default)]
    unavailable_dates: String,
    #[serde(default)]
    availability_factor: String,
    #[serde(default)]
    skill_efficiency_multiplier: String,
    #[serde(default)]
    reliability_score: String,
    #[serde(default)]
    overload_risk_score: String,
    #[serde(default)]
    velocity: String,
    #[serde(default)]
    max_tasks: String,
}

fn parse_optional<T: std::str::FromStr>(field: &str) -> Option<T> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn parse_number(field: &str, default: f64, context: &str) -> InputResult<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse()
        .map_err(|_| InputError::InvalidData(format!("{context}: unparseable number '{trimmed}'")))
}

fn parse_date(field: &str, context: &str) -> InputResult<Option<NaiveDate>> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| InputError::InvalidData(format!("{context}: unparseable date '{trimmed}'")))
}

fn split_list(field: &str) -> Vec<String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl TaskCsvRecord {
    fn into_task(self) -> InputResult<Task> {
        if self.id.trim().is_empty() {
            return Err(InputError::InvalidData("task row with empty id".into()));
        }
        let context = format!("task {}", self.id);
        let mut task = Task::new(self.id.trim(), self.title.trim());
        task.priority = TaskPriority::from(self.priority);
        task.status = TaskStatus::from(self.status);
        task.estimated_hours = parse_number(&self.estimated_hours, 0.0, &context)?;
        task.business_value = parse_number(&self.business_value, 0.0, &context)?;
        task.complexity = TaskComplexity::from(self.complexity);
        task.deadline = parse_date(&self.deadline, &context)?;
        task.dependencies = split_list(&self.dependencies);
        task.assigned_to = if self.assigned_to.trim().is_empty() {
            None
        } else {
            Some(self.assigned_to.trim().to_string())
        };
        task.story_points = parse_optional(&self.story_points);
        Ok(task)
    }
}

impl MemberCsvRecord {
    fn into_member(self) -> InputResult<Member> {
        if self.id.trim().is_empty() {
            return Err(InputError::InvalidData("member row with empty id".into()));
        }
        let context = format!("member {}", self.id);
        let mut member = Member::new(self.id.trim());
        member.name = parse_optional(&self.name);
        member.role = parse_optional(&self.role);
        member.base_weekly_hours = parse_number(&self.base_weekly_hours, 40.0, &context)?;
        member.unavailable_dates = split_list(&self.unavailable_dates)
            .iter()
            .map(|d| {
                parse_date(d, &context)?.ok_or_else(|| {
                    InputError::InvalidData(format!("{context}: empty unavailable date"))
                })
            })
            .collect::<InputResult<Vec<NaiveDate>>>()?;
        member.availability_factor = parse_number(&self.availability_factor, 1.0, &context)?;
        member.skill_efficiency_multiplier =
            parse_number(&self.skill_efficiency_multiplier, 1.0, &context)?;
        member.reliability_score = parse_number(&self.reliability_score, 0.7, &context)?;
        member.overload_risk_score = parse_number(&self.overload_risk_score, 0.0, &context)?;
        member.velocity = match self.velocity.trim() {
            "" => 0,
            raw => raw.parse().map_err(|_| {
                InputError::InvalidData(format!("{context}: unparseable velocity '{raw}'"))
            })?,
        };
        member.max_tasks = parse_optional(&self.max_tasks);
        Ok(member)
    }
}

/// Load backlog tasks from a CSV file. List columns use semicolon-joined
/// values; empty cells resolve to the documented defaults.
pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> InputResult<Vec<Task>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tasks = Vec::new();
    for record in reader.deserialize() {
        let record: TaskCsvRecord = record?;
        tasks.push(record.into_task()?);
    }
    Ok(tasks)
}

/// Load project members from a CSV file.
pub fn load_members_from_csv<P: AsRef<Path>>(path: P) -> InputResult<Vec<Member>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut members = Vec::new();
    for record in reader.deserialize() {
        let record: MemberCsvRecord = record?;
        members.push(record.into_member()?);
    }
    Ok(members)
}
