//! # Worklens - Jira Worklog Aggregation
//!
//! A library for retrieving time-tracking records ("worklogs") from a
//! Jira-style issue tracker and deriving the summaries a team dashboard
//! needs.
//!
//! ## Features
//!
//! - **Worklog Retrieval**: One JQL search plus per-issue worklog listing,
//!   filtered to the requested authors
//! - **Aggregation Engine**: Daily, per-ticket and per-user summaries with
//!   weekday gap-filling, all pure and reproducible
//! - **Drill-Down Navigation**: A small tab state machine for opening,
//!   switching and closing ticket/day detail views
//! - **Partial-Failure Policy**: One broken issue never blanks out the
//!   whole report
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklens::api::jira::Jira;
//! use worklens::libs::config::Config;
//! use worklens::libs::report::{fetch_worklog_data, FetchRequest};
//!
//! # async fn run() -> Result<(), worklens::libs::error::WorklensError> {
//! let config = Config::read().expect("missing Jira configuration");
//! let jira = Jira::new(&config.jira)?;
//! let request = FetchRequest::new(vec!["jdoe".to_string()], 30);
//! let data = fetch_worklog_data(&jira, &request).await?;
//! println!("{} worklogs", data.worklogs.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod libs;
