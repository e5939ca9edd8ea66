//! Jira REST client for worklog retrieval.
//!
//! Two read-only endpoints are consumed: issue search (one JQL query over
//! all requested authors, single page capped at [`MAX_RESULTS`]) and the
//! per-issue worklog listing. Authentication is a bearer token applied as
//! a default header; there is no session caching and no retry logic.

use crate::libs::error::{Result, WorklensError};
use crate::libs::worklog::{IssueRef, RawWorklog};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed result cap for the search call. One page only, no pagination.
pub const MAX_RESULTS: u32 = 1000;

const SEARCH_URL: &str = "rest/api/2/search";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JiraSearchRequest {
    jql: String,
    fields: Vec<&'static str>,
    max_results: u32,
}

#[derive(Deserialize, Debug)]
struct JiraSearchResults {
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize, Debug)]
struct JiraIssue {
    key: String,
    fields: Option<JiraIssueFields>,
}

#[derive(Deserialize, Debug)]
struct JiraIssueFields {
    summary: Option<String>,
}

#[derive(Deserialize, Debug)]
struct JiraWorklogList {
    #[serde(default)]
    worklogs: Vec<JiraWorklogEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JiraWorklogEntry {
    author: JiraWorklogAuthor,
    started: String,
    time_spent_seconds: u64,
}

#[derive(Deserialize, Debug)]
struct JiraWorklogAuthor {
    name: String,
}

/// Jira instance connection parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JiraConfig {
    pub api_url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Jira {
    client: Client,
    api_url: String,
}

impl Jira {
    /// Builds a client with the bearer token installed as a default header.
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| WorklensError::InvalidRequest(format!("invalid token: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Searches for issues on which any of `authors` logged work within the
    /// last `window_days` days (inclusive of today).
    ///
    /// Fails with `InvalidRequest` before any network call when `authors`
    /// is empty, and with `UpstreamSearch` (carrying the upstream status
    /// text) on a non-success response. A transient failure propagates
    /// immediately; there are no retries.
    pub async fn search_worklog_issues(&self, authors: &[String], window_days: u32) -> Result<Vec<IssueRef>> {
        if authors.is_empty() {
            return Err(WorklensError::InvalidRequest("at least one author is required".to_string()));
        }

        let jql = build_jql(authors, window_days);
        debug!(jql = %jql, "searching issues with worklogs");

        let body = JiraSearchRequest {
            jql,
            fields: vec!["key", "summary"],
            max_results: MAX_RESULTS,
        };
        let url = format!("{}/{}", self.api_url, SEARCH_URL);
        let res = self.client.post(&url).json(&body).send().await?;

        if !res.status().is_success() {
            return Err(WorklensError::UpstreamSearch(format!("search failed: {}", res.status())));
        }

        let results = res.json::<JiraSearchResults>().await?;
        debug!(count = results.issues.len(), "search returned issues");

        Ok(results
            .issues
            .into_iter()
            .map(|issue| IssueRef {
                key: issue.key,
                summary: issue.fields.and_then(|f| f.summary),
            })
            .collect())
    }

    /// Lists all worklog entries of one issue, in tracker order.
    ///
    /// Author filtering happens in the pipeline, not here; the endpoint has
    /// no server-side author filter.
    pub async fn issue_worklogs(&self, issue_key: &str) -> Result<Vec<RawWorklog>> {
        let url = format!("{}/rest/api/2/issue/{}/worklog", self.api_url, issue_key);
        let res = self.client.get(&url).send().await?;

        if !res.status().is_success() {
            return Err(WorklensError::UpstreamWorklogFetch {
                issue: issue_key.to_string(),
                message: res.status().to_string(),
            });
        }

        let list = res.json::<JiraWorklogList>().await?;
        Ok(list
            .worklogs
            .into_iter()
            .map(|entry| RawWorklog {
                author: entry.author.name,
                started: entry.started,
                time_spent_seconds: entry.time_spent_seconds,
            })
            .collect())
    }
}

/// Builds the JQL selecting issues with worklogs by any requested author
/// in the trailing window.
pub fn build_jql(authors: &[String], window_days: u32) -> String {
    let authors_jql = authors.iter().map(|a| format!("\"{}\"", a)).collect::<Vec<_>>().join(", ");
    format!("worklogAuthor in ({}) AND worklogDate >= -{}d", authors_jql, window_days)
}
