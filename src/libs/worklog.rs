//! Worklog data model and normalization.
//!
//! Raw search results and per-issue worklog listings are flattened here
//! into the uniform [`WorklogRecord`] shape that the aggregation engine
//! consumes, together with a ticket-metadata lookup keyed by issue key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel used when the tracker returns an issue without a summary.
pub const NO_TITLE: &str = "No title available";

/// One normalized time-tracking entry.
///
/// `date` is always the calendar-date prefix of `started` taken verbatim
/// (the substring before the `T` separator). This is deliberately not a
/// timezone conversion: the tracker's own reporting string is the source
/// of truth so repeated runs stay deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogRecord {
    pub key: String,
    pub author: String,
    pub started: String,
    pub date: String,
    pub time_spent_seconds: u64,
}

/// Ticket metadata shared by all aggregation views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketInfo {
    pub key: String,
    pub summary: String,
}

/// A raw worklog entry as returned by the tracker, already filtered to the
/// requested authors but not yet flattened.
#[derive(Debug, Clone)]
pub struct RawWorklog {
    pub author: String,
    pub started: String,
    pub time_spent_seconds: u64,
}

/// An issue as returned by the search endpoint.
#[derive(Debug, Clone)]
pub struct IssueRef {
    pub key: String,
    pub summary: Option<String>,
}

/// Derives the calendar date of a worklog from its start timestamp.
///
/// String-prefix split at `T`, no timezone math. Timestamps without a `T`
/// separator pass through unchanged.
pub fn date_of(started: &str) -> String {
    match started.split_once('T') {
        Some((date, _)) => date.to_string(),
        None => started.to_string(),
    }
}

/// Flattens fetched data into records and builds the ticket lookup.
///
/// Pure: ordering follows the issue order of `raw_by_issue` and, within an
/// issue, the order the tracker returned. Issues with no surviving
/// worklogs still contribute ticket metadata.
pub fn normalize(issues: &[IssueRef], raw_by_issue: &[(String, Vec<RawWorklog>)]) -> (Vec<WorklogRecord>, HashMap<String, TicketInfo>) {
    let mut ticket_info = HashMap::new();
    for issue in issues {
        ticket_info.insert(
            issue.key.clone(),
            TicketInfo {
                key: issue.key.clone(),
                summary: issue.summary.clone().unwrap_or_else(|| NO_TITLE.to_string()),
            },
        );
    }

    let mut records = Vec::new();
    for (key, worklogs) in raw_by_issue {
        for raw in worklogs {
            records.push(WorklogRecord {
                key: key.clone(),
                author: raw.author.clone(),
                date: date_of(&raw.started),
                started: raw.started.clone(),
                time_spent_seconds: raw.time_spent_seconds,
            });
        }
    }

    (records, ticket_info)
}
