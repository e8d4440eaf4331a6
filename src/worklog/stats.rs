//! Weekly buckets over a date range and their comparison with work-hour targets.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use super::WorklogRecord;
use crate::config::Config;

/// One 7-day bucket of worklogs and the public holidays that fall in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub public_holidays: u32,
    pub worklogs: Vec<WorklogRecord>,
}

impl Week {
    /// ISO week number of the start date.
    pub fn number(&self) -> u32 {
        self.start_date.iso_week().week()
    }

    /// Distinct dates with at least one worklog.
    pub fn work_days(&self) -> u32 {
        self.worklogs
            .iter()
            .map(|record| record.date)
            .collect::<BTreeSet<_>>()
            .len() as u32
    }

    /// Hours logged in the week.
    pub fn total_time(&self) -> f64 {
        let seconds: u64 = self.worklogs.iter().map(|r| r.time_spent_seconds).sum();
        seconds as f64 / 3600.0
    }

    /// Hours per work day, 0 when nothing was logged.
    pub fn average(&self) -> f64 {
        match self.work_days() {
            0 => 0.0,
            days => self.total_time() / f64::from(days),
        }
    }
}

/// Splits `[from, to]` into 7-day buckets starting at `from`, empty weeks included.
///
/// Worklogs count in `[start, start + 6]`, holidays only in `[start, start + 5]`.
pub fn group_by_week(
    from: NaiveDate,
    to: NaiveDate,
    worklogs: &[WorklogRecord],
    holiday_dates: &[NaiveDate],
) -> Vec<Week> {
    let mut weeks = Vec::new();
    let mut start = from;
    while start <= to {
        let end = start + Duration::days(6);
        let holiday_end = start + Duration::days(5);
        let public_holidays = holiday_dates
            .iter()
            .filter(|date| **date >= start && **date <= holiday_end)
            .count() as u32;
        let in_week = worklogs
            .iter()
            .filter(|record| record.date >= start && record.date <= end)
            .cloned()
            .collect();
        weeks.push(Week {
            start_date: start,
            end_date: end,
            public_holidays,
            worklogs: in_week,
        });
        start += Duration::days(7);
    }
    weeks
}

/// Weekly work-hour targets taken from the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkTargets {
    pub working_days: u32,
    pub hours_per_day: f64,
    pub hours_per_week: f64,
}

impl WorkTargets {
    /// Reads the working-day and working-hour settings.
    pub fn from_config(config: &Config) -> Self {
        Self {
            working_days: config.number_of_working_days,
            hours_per_day: config.working_hours_per_day,
            hours_per_week: config.working_hours_per_week,
        }
    }

    /// Expected hours for a week after subtracting its holidays.
    pub fn expected_total(&self, week: &Week) -> f64 {
        self.hours_per_week - self.hours_per_day * f64::from(week.public_holidays)
    }

    /// Total hours reach the holiday-adjusted weekly target.
    pub fn total_on_target(&self, week: &Week) -> bool {
        week.total_time() >= self.expected_total(week)
    }

    /// Average hours per work day reach the daily target.
    pub fn average_on_target(&self, week: &Week) -> bool {
        week.average() >= self.hours_per_day
    }

    /// Enough distinct work days once holidays are subtracted.
    pub fn work_days_on_target(&self, week: &Week) -> bool {
        week.work_days() >= self.working_days.saturating_sub(week.public_holidays)
    }

    /// Hours over (positive) or under (negative) the week's target.
    pub fn balance(&self, week: &Week) -> f64 {
        week.total_time() - self.expected_total(week)
    }

    /// Sum of [`balance`](Self::balance) over all weeks.
    pub fn total_balance(&self, weeks: &[Week]) -> f64 {
        weeks.iter().map(|week| self.balance(week)).sum()
    }
}

impl Default for WorkTargets {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
