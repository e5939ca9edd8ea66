//! API client modules for external service integrations.
//!
//! Provides the client for the Jira-style issue tracker that worklens
//! reads worklogs from. Authentication is a static bearer token supplied
//! through configuration; the client is read-only and performs no retries.

pub mod jira;

// Re-export the client and config for easier access from other modules
pub use jira::{Jira, JiraConfig};
