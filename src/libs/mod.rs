//! Core library modules for worklens.
//!
//! - **Data Model**: Worklog records, ticket metadata, normalization
//! - **Pipeline**: Request validation and the fetch/filter/merge cycle
//! - **Aggregation**: Daily, ticket and user summaries with gap-filling
//! - **Navigation**: Drill-down tab state machine
//! - **Infrastructure**: Configuration, errors, logging

pub mod aggregate;
pub mod config;
pub mod error;
pub mod logger;
pub mod navigation;
pub mod report;
pub mod worklog;
