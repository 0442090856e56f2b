use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Working-day calendar scoped to a single sprint window.
///
/// Weekends and shared team holidays make a date unavailable for everyone;
/// per-member unavailable dates are applied on top when counting an
/// individual's workdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintCalendar {
    start: NaiveDate,
    end: NaiveDate,
    non_working_days: HashSet<Weekday>,
    holidays: HashSet<NaiveDate>,
}

impl SprintCalendar {
    /// Build the calendar for `[start, start + length_days]`, inclusive.
    pub fn new(start: NaiveDate, length_days: i64, holidays: &[NaiveDate]) -> Self {
        Self {
            start,
            end: start + Duration::days(length_days.max(0)),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
            holidays: holidays.iter().copied().collect(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Whether the team works on this date at all.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday()) && !self.holidays.contains(&date)
    }

    /// Workdays in the sprint window for a member with the given
    /// unavailable dates.
    pub fn workdays_for(&self, unavailable: &[NaiveDate]) -> i64 {
        let blocked: HashSet<NaiveDate> = unavailable.iter().copied().collect();
        let mut count = 0;
        let mut current = self.start;
        while current <= self.end {
            if self.is_working_day(current) && !blocked.contains(&current) {
                count += 1;
            }
            current += Duration::days(1);
        }
        count
    }

    /// Every calendar day in the sprint window, working or not. The burndown
    /// forecast plots one point per calendar day.
    pub fn calendar_days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            days.push(current);
            current += Duration::days(1);
        }
        days
    }
}
