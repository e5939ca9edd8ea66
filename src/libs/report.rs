//! Worklog retrieval pipeline.
//!
//! Orchestrates the full fetch cycle: validate the inbound request, run
//! the issue search, fetch worklogs per issue concurrently, filter to the
//! requested authors and hand the flattened result to the normalizer.
//!
//! ## Partial-failure policy
//!
//! A failed worklog listing skips that one issue (logged at WARN) instead
//! of aborting the batch. If every single issue fails the caller still
//! receives an empty successful result: partial data beats total failure.
//! Only the initial search is fatal.

use crate::api::jira::Jira;
use crate::libs::error::{Result, WorklensError};
use crate::libs::worklog::{normalize, RawWorklog, TicketInfo, WorklogRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Default trailing window when the caller does not specify one.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

fn default_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

/// Inbound request from the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    pub usernames: Vec<String>,
    #[serde(default = "default_days")]
    pub days: u32,
}

impl FetchRequest {
    pub fn new(usernames: Vec<String>, days: u32) -> Self {
        Self { usernames, days }
    }

    /// Rejects requests with no usernames before any network call is made.
    pub fn validate(&self) -> Result<()> {
        if self.usernames.is_empty() {
            return Err(WorklensError::InvalidRequest("at least one username is required".to_string()));
        }
        if self.days == 0 {
            return Err(WorklensError::InvalidRequest("days must be positive".to_string()));
        }
        Ok(())
    }
}

/// Outbound result of one fetch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogData {
    pub worklogs: Vec<WorklogRecord>,
    pub ticket_info: HashMap<String, TicketInfo>,
    pub usernames: Vec<String>,
}

/// Runs the full retrieval pipeline for one request.
///
/// Worklog listings are fetched concurrently (one task per issue) but
/// merged in the fixed order the search returned, so the final record
/// list is deterministic for a given input. Within an issue the tracker's
/// own entry order is preserved; there is no re-sort.
pub async fn fetch_worklog_data(jira: &Jira, request: &FetchRequest) -> Result<WorklogData> {
    request.validate()?;

    let issues = jira.search_worklog_issues(&request.usernames, request.days).await?;

    let authors_lower: Vec<String> = request.usernames.iter().map(|u| u.to_lowercase()).collect();

    let handles: Vec<_> = issues
        .iter()
        .map(|issue| {
            let jira = jira.clone();
            let key = issue.key.clone();
            tokio::spawn(async move { jira.issue_worklogs(&key).await })
        })
        .collect();

    let mut raw_by_issue: Vec<(String, Vec<RawWorklog>)> = Vec::with_capacity(issues.len());
    for (issue, handle) in issues.iter().zip(handles) {
        match handle.await {
            Ok(Ok(worklogs)) => {
                let matched: Vec<RawWorklog> = worklogs
                    .into_iter()
                    .filter(|w| authors_lower.contains(&w.author.to_lowercase()))
                    .collect();
                raw_by_issue.push((issue.key.clone(), matched));
            }
            Ok(Err(e)) => {
                // Deliberate skip: one broken issue must not blank out the report.
                warn!(issue = %issue.key, error = %e, "skipping issue after worklog fetch failure");
            }
            Err(e) => {
                warn!(issue = %issue.key, error = %e, "skipping issue after worklog task failure");
            }
        }
    }

    let (worklogs, ticket_info) = normalize(&issues, &raw_by_issue);
    debug!(worklogs = worklogs.len(), tickets = ticket_info.len(), "fetch cycle complete");

    Ok(WorklogData {
        worklogs,
        ticket_info,
        usernames: request.usernames.clone(),
    })
}
