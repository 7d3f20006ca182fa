use std::fmt;

use askama::Template;
use chrono::{Datelike, Days, Months, NaiveDate};

use crate::calendar::DateBoundaries;
use crate::error::RunError;
use crate::templates::SampleInvoice;

const HOURS_PER_DAY: usize = 8;

/// A Monday to Friday run of days inside one month.
#[derive(Debug, PartialEq, Clone)]
pub struct WorkWeek {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl WorkWeek {
    fn weekdays(&self) -> usize {
        self.from
            .iter_days()
            .take_while(|d| d <= &self.until)
            .filter(|d| d.is_weekday())
            .count()
    }

    pub fn hours(&self) -> usize {
        self.weekdays() * HOURS_PER_DAY
    }
}

impl fmt::Display for WorkWeek {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.from.format("%B"),
            self.from.day(),
            self.until.day()
        )
    }
}

/// Splits the month containing `date` into its work weeks. Weeks cut by
/// the start or end of the month only keep their days inside it.
pub fn work_weeks(date: NaiveDate) -> Option<Vec<WorkWeek>> {
    let first = date.start_of_month()?;
    let last = date.end_of_month()?;

    let mut weeks = Vec::new();
    let mut monday = first.start_of_week()?;
    while monday <= last {
        let from = monday.max(first);
        let until = monday.end_of_work_week()?.min(last);
        if from <= until {
            weeks.push(WorkWeek { from, until });
        }
        monday = monday.checked_add_days(Days::new(7))?;
    }
    Some(weeks)
}

/// YAML skeleton of an invoice for the month `offset` months before
/// `today`'s.
pub fn generate(today: NaiveDate, offset: u32) -> Result<String, RunError> {
    let weeks = today
        .start_of_month()
        .and_then(|d| d.checked_sub_months(Months::new(offset)))
        .and_then(work_weeks)
        .ok_or(RunError::MonthOutOfRange { offset })?;

    let mut yaml = SampleInvoice { date: today, weeks }.render()?;
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }
    Ok(yaml)
}
