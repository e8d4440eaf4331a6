//! Decides which edited worklogs need remote writes and performs them.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use chrono::{Local, NaiveDateTime, TimeZone};
use jira_api::{JiraClient, WorklogPayload};
use log::{debug, warn};

use super::edit_parser::editable_comment;
use super::{WorklogId, WorklogRecord};
use crate::error::ReconciliationError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub updates: Vec<WorklogRecord>,
    pub creates: Vec<WorklogRecord>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.creates.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub updated: usize,
    pub created: usize,
}

/// Compares edited records with the originals by worklog id alone.
///
/// Ids missing from `original` are ignored since deletions and foreign ids
/// cannot be expressed through the edit block.
pub fn reconcile(original: &[WorklogRecord], edited: &[WorklogRecord]) -> ReconcilePlan {
    let by_id: HashMap<u64, &WorklogRecord> = original
        .iter()
        .filter_map(|record| match record.id {
            WorklogId::Existing(id) => Some((id, record)),
            WorklogId::New => None,
        })
        .collect();

    let mut plan = ReconcilePlan::default();
    let mut seen = HashSet::new();
    for record in edited {
        match record.id {
            WorklogId::New => plan.creates.push(record.clone()),
            WorklogId::Existing(id) => {
                if !seen.insert(id) {
                    warn!("worklog {id} appears more than once, keeping the first line");
                    continue;
                }
                match by_id.get(&id) {
                    Some(before) if differs(before, record) => {
                        debug!("worklog {id} on {} changed", record.issue_key);
                        plan.updates.push(record.clone());
                    }
                    Some(_) => {}
                    None => debug!("worklog {id} is not part of the loaded timesheet, ignoring"),
                }
            }
        }
    }
    plan
}

fn differs(before: &WorklogRecord, after: &WorklogRecord) -> bool {
    before.started != after.started
        || before.time_spent_seconds / 60 != after.time_spent_seconds / 60
        || editable_comment(&before.comment) != editable_comment(&after.comment)
}

/// JIRA `started` format in the local offset, e.g. `2024-03-04T09:00:00.000+0100`.
pub fn format_started(issue_key: &str, started: NaiveDateTime) -> Result<String, ReconciliationError> {
    format_started_in(&Local, issue_key, started)
}

/// Like [`format_started`] for an explicit zone; a wall-clock time the zone skips is rejected.
pub fn format_started_in<Tz>(
    tz: &Tz,
    issue_key: &str,
    started: NaiveDateTime,
) -> Result<String, ReconciliationError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let zoned = tz
        .from_local_datetime(&started)
        .earliest()
        .ok_or_else(|| ReconciliationError::InvalidStart {
            issue_key: issue_key.to_string(),
            started: started.format("%Y-%m-%d %H:%M").to_string(),
        })?;
    Ok(zoned.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string())
}

pub fn worklog_payload(record: &WorklogRecord) -> Result<WorklogPayload, ReconciliationError> {
    worklog_payload_in(&Local, record)
}

fn worklog_payload_in<Tz>(tz: &Tz, record: &WorklogRecord) -> Result<WorklogPayload, ReconciliationError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(WorklogPayload {
        id: match record.id {
            WorklogId::Existing(id) => Some(id.to_string()),
            WorklogId::New => None,
        },
        comment: record.comment.clone(),
        started: format_started_in(tz, &record.issue_key, record.started)?,
        time_spent_seconds: record.time_spent_seconds,
    })
}

/// Sends updates, then creates, one request at a time.
///
/// The first failure stops the batch; writes already made stay in place.
pub async fn apply(
    client: &JiraClient,
    plan: &ReconcilePlan,
) -> Result<ApplyReport, ReconciliationError> {
    apply_in(&Local, client, plan).await
}

/// Every payload is built before the first request, so a bad start time writes nothing.
async fn apply_in<Tz>(
    tz: &Tz,
    client: &JiraClient,
    plan: &ReconcilePlan,
) -> Result<ApplyReport, ReconciliationError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let updates = payloads_in(tz, &plan.updates)?;
    let creates = payloads_in(tz, &plan.creates)?;

    let mut report = ApplyReport::default();
    for (record, payload) in updates {
        if let WorklogId::Existing(id) = record.id {
            debug!("updating worklog {id} on {}", record.issue_key);
            client
                .update_worklog(&record.issue_key, id, &payload)
                .await
                .map_err(|source| aborted(record, report, source))?;
            report.updated += 1;
        }
    }
    for (record, payload) in creates {
        debug!("creating worklog on {}", record.issue_key);
        client
            .add_worklog(&record.issue_key, &payload)
            .await
            .map_err(|source| aborted(record, report, source))?;
        report.created += 1;
    }
    Ok(report)
}

fn payloads_in<'a, Tz>(
    tz: &Tz,
    records: &'a [WorklogRecord],
) -> Result<Vec<(&'a WorklogRecord, WorklogPayload)>, ReconciliationError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    records
        .iter()
        .map(|record| worklog_payload_in(tz, record).map(|payload| (record, payload)))
        .collect()
}

fn aborted(
    record: &WorklogRecord,
    report: ApplyReport,
    source: jira_api::JiraError,
) -> ReconciliationError {
    ReconciliationError::Aborted {
        issue_key: record.issue_key.clone(),
        worklog_id: record.id.to_string(),
        updated: report.updated,
        created: report.created,
        source,
    }
}
