//! Aggregation engine for normalized worklog records.
//!
//! Every function here is pure: it takes the full record list plus an
//! [`AggregationRequest`] and recomputes its view from scratch. There is
//! no incremental aggregate state, no caching and no clock access, so the
//! same inputs always produce byte-identical output.
//!
//! ## Numeric policy
//!
//! Internal accumulation uses unrounded seconds; hours are seconds / 3600
//! rounded to 2 decimal places only at the point of exposure, so repeated
//! aggregation never compounds rounding error.
//!
//! ## Day axis
//!
//! Day-keyed views enumerate exactly the weekdays (Mon-Fri) of the window
//! `[reference_now - window_days, reference_now]` and gap-fill missing
//! ones with zeros. Weekends never appear on the day axis, even when
//! worklogs exist on them; such records still count toward ticket and
//! user grand totals.

use crate::libs::worklog::{TicketInfo, WorklogRecord, NO_TITLE};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::HashMap;

/// Inputs shared by every aggregation function.
///
/// `reference_now` is injected rather than read from the system clock so
/// that outputs are reproducible. Author membership is case-insensitive;
/// the casing given here is the casing used in per-user output keys.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    pub authors: Vec<String>,
    pub window_days: u32,
    pub reference_now: NaiveDate,
}

impl AggregationRequest {
    pub fn new(authors: Vec<String>, window_days: u32, reference_now: NaiveDate) -> Self {
        Self {
            authors,
            window_days,
            reference_now,
        }
    }

    /// First day of the window, as an ISO date string.
    fn cutoff(&self) -> String {
        self.reference_now
            .checked_sub_days(Days::new(self.window_days as u64))
            .unwrap_or(NaiveDate::MIN)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Resolves a record author to the caller-supplied casing, or `None`
    /// when the author is not in the visible set.
    fn visible_label(&self, author: &str) -> Option<&str> {
        let lower = author.to_lowercase();
        self.authors.iter().find(|a| a.to_lowercase() == lower).map(|a| a.as_str())
    }
}

/// One row of the daily totals view, with a running cumulative total.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub hours: f64,
    pub cumulative_hours: f64,
}

/// One row of a day-keyed breakdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayHours {
    pub date: String,
    pub hours: f64,
}

/// One row of the ticket totals view, sorted descending by hours.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TicketSummary {
    pub ticket: String,
    pub title: String,
    pub hours: f64,
}

/// One day of the multi-user daily view; every visible author is present,
/// defaulted to zero.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiUserDailyRow {
    pub date: String,
    pub hours_by_user: HashMap<String, f64>,
}

/// One ticket of the multi-user ticket view, sorted descending by `total`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiUserTicketRow {
    pub ticket: String,
    pub title: String,
    pub total: f64,
    pub hours_by_user: HashMap<String, f64>,
}

/// Per-author totals over the window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    pub username: String,
    pub total_hours: f64,
    pub days_logged: usize,
    pub consistency_percent: f64,
}

/// Headline figures for the dashboard summary cards.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_hours: f64,
    pub user_totals: HashMap<String, f64>,
    pub unique_tickets: usize,
    pub days_with_logs: usize,
    pub avg_hours_per_day: f64,
}

fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

fn hours(seconds: u64) -> f64 {
    round2(seconds as f64 / 3600.0)
}

/// Enumerates the weekdays of the window in ascending order.
pub fn weekdays_in_window(request: &AggregationRequest) -> Vec<String> {
    let start = request
        .reference_now
        .checked_sub_days(Days::new(request.window_days as u64))
        .unwrap_or(NaiveDate::MIN);
    start
        .iter_days()
        .take_while(|d| *d <= request.reference_now)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

/// Keeps records inside the window and authored by a visible author.
///
/// Dates are compared as strings; lexicographic ISO date comparison is
/// valid and intentional.
pub fn filter_by_window<'a>(records: &'a [WorklogRecord], request: &AggregationRequest) -> Vec<&'a WorklogRecord> {
    let cutoff = request.cutoff();
    records
        .iter()
        .filter(|r| r.date.as_str() >= cutoff.as_str() && request.visible_label(&r.author).is_some())
        .collect()
}

/// Sums seconds per `key(record)` preserving first-seen key order.
fn sum_by<'a, K: Fn(&WorklogRecord) -> &str>(records: &[&'a WorklogRecord], key: K) -> (Vec<String>, HashMap<String, u64>) {
    let mut order = Vec::new();
    let mut totals: HashMap<String, u64> = HashMap::new();
    for record in records {
        let k = key(record);
        if !totals.contains_key(k) {
            order.push(k.to_string());
        }
        *totals.entry(k.to_string()).or_insert(0) += record.time_spent_seconds;
    }
    (order, totals)
}

/// Total hours per day over the weekday axis, gap-filled with zeros and
/// carrying a cumulative running total.
pub fn daily_totals(records: &[WorklogRecord], request: &AggregationRequest) -> Vec<DailySummary> {
    let filtered = filter_by_window(records, request);
    let (_, by_date) = sum_by(&filtered, |r| &r.date);

    let mut cumulative = 0.0;
    weekdays_in_window(request)
        .into_iter()
        .map(|date| {
            let day_hours = hours(by_date.get(&date).copied().unwrap_or(0));
            cumulative = round2(cumulative + day_hours);
            DailySummary {
                date,
                hours: day_hours,
                cumulative_hours: cumulative,
            }
        })
        .collect()
}

/// Total hours per ticket, descending by hours with first-seen order on
/// exact ties. Weekend worklogs count here.
pub fn ticket_totals(records: &[WorklogRecord], request: &AggregationRequest, ticket_info: &HashMap<String, TicketInfo>) -> Vec<TicketSummary> {
    let filtered = filter_by_window(records, request);
    let (order, by_ticket) = sum_by(&filtered, |r| &r.key);

    let mut summaries: Vec<(u64, TicketSummary)> = order
        .into_iter()
        .map(|ticket| {
            let seconds = by_ticket[&ticket];
            let title = ticket_info.get(&ticket).map(|t| t.summary.clone()).unwrap_or_else(|| NO_TITLE.to_string());
            (
                seconds,
                TicketSummary {
                    ticket,
                    title,
                    hours: hours(seconds),
                },
            )
        })
        .collect();
    // Stable sort keeps first-seen order on exact ties.
    summaries.sort_by(|a, b| b.0.cmp(&a.0));
    summaries.into_iter().map(|(_, s)| s).collect()
}

/// Two-level aggregation keyed by (date, author) over the weekday axis.
pub fn multi_user_daily(records: &[WorklogRecord], request: &AggregationRequest) -> Vec<MultiUserDailyRow> {
    let filtered = filter_by_window(records, request);

    let mut by_date: HashMap<String, HashMap<String, u64>> = HashMap::new();
    for record in &filtered {
        if let Some(label) = request.visible_label(&record.author) {
            *by_date.entry(record.date.clone()).or_default().entry(label.to_string()).or_insert(0) += record.time_spent_seconds;
        }
    }

    weekdays_in_window(request)
        .into_iter()
        .map(|date| {
            let day = by_date.get(&date);
            let hours_by_user = request
                .authors
                .iter()
                .map(|author| {
                    let seconds = day.and_then(|d| d.get(author)).copied().unwrap_or(0);
                    (author.clone(), hours(seconds))
                })
                .collect();
            MultiUserDailyRow { date, hours_by_user }
        })
        .collect()
}

/// Two-level aggregation keyed by (ticket, author) with a total column
/// summed across visible authors, descending by total.
pub fn multi_user_ticket(records: &[WorklogRecord], request: &AggregationRequest, ticket_info: &HashMap<String, TicketInfo>) -> Vec<MultiUserTicketRow> {
    let filtered = filter_by_window(records, request);

    let mut order = Vec::new();
    let mut by_ticket: HashMap<String, HashMap<String, u64>> = HashMap::new();
    for record in &filtered {
        if let Some(label) = request.visible_label(&record.author) {
            if !by_ticket.contains_key(&record.key) {
                order.push(record.key.clone());
            }
            *by_ticket.entry(record.key.clone()).or_default().entry(label.to_string()).or_insert(0) += record.time_spent_seconds;
        }
    }

    let mut rows: Vec<(u64, MultiUserTicketRow)> = order
        .into_iter()
        .map(|ticket| {
            let per_user = &by_ticket[&ticket];
            let total_seconds: u64 = per_user.values().sum();
            let hours_by_user = request
                .authors
                .iter()
                .map(|author| (author.clone(), hours(per_user.get(author).copied().unwrap_or(0))))
                .collect();
            let title = ticket_info.get(&ticket).map(|t| t.summary.clone()).unwrap_or_else(|| NO_TITLE.to_string());
            (
                total_seconds,
                MultiUserTicketRow {
                    ticket,
                    title,
                    total: hours(total_seconds),
                    hours_by_user,
                },
            )
        })
        .collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.into_iter().map(|(_, r)| r).collect()
}

/// Daily totals restricted to one ticket, over the weekday axis.
pub fn ticket_daily_breakdown(records: &[WorklogRecord], request: &AggregationRequest, ticket_key: &str) -> Vec<DayHours> {
    let filtered: Vec<&WorklogRecord> = filter_by_window(records, request).into_iter().filter(|r| r.key == ticket_key).collect();
    let (_, by_date) = sum_by(&filtered, |r| &r.date);

    weekdays_in_window(request)
        .into_iter()
        .map(|date| {
            let day_hours = hours(by_date.get(&date).copied().unwrap_or(0));
            DayHours { date, hours: day_hours }
        })
        .collect()
}

/// Ticket totals restricted to one exact date, descending by hours.
///
/// Not gap-filled: a ticket absent from the day contributed nothing and
/// gets no row.
pub fn day_ticket_breakdown(
    records: &[WorklogRecord],
    request: &AggregationRequest,
    date: &str,
    ticket_info: &HashMap<String, TicketInfo>,
) -> Vec<TicketSummary> {
    let filtered: Vec<&WorklogRecord> = filter_by_window(records, request).into_iter().filter(|r| r.date == date).collect();
    let (order, by_ticket) = sum_by(&filtered, |r| &r.key);

    let mut summaries: Vec<(u64, TicketSummary)> = order
        .into_iter()
        .map(|ticket| {
            let seconds = by_ticket[&ticket];
            let title = ticket_info.get(&ticket).map(|t| t.summary.clone()).unwrap_or_else(|| NO_TITLE.to_string());
            (
                seconds,
                TicketSummary {
                    ticket,
                    title,
                    hours: hours(seconds),
                },
            )
        })
        .collect();
    summaries.sort_by(|a, b| b.0.cmp(&a.0));
    summaries.into_iter().map(|(_, s)| s).collect()
}

/// Per-author totals, distinct logged days and consistency percentage.
///
/// Consistency = distinct days logged / weekdays in window * 100, clamped
/// to [0, 100] and 0 when the window contains no weekdays. Output order
/// follows the request's author order.
pub fn user_stats(records: &[WorklogRecord], request: &AggregationRequest) -> Vec<UserStat> {
    let filtered = filter_by_window(records, request);
    let total_weekdays = weekdays_in_window(request).len();

    request
        .authors
        .iter()
        .map(|author| {
            let lower = author.to_lowercase();
            let mut seconds = 0u64;
            let mut days: Vec<&str> = Vec::new();
            for record in &filtered {
                if record.author.to_lowercase() == lower {
                    seconds += record.time_spent_seconds;
                    if !days.contains(&record.date.as_str()) {
                        days.push(&record.date);
                    }
                }
            }
            let consistency = if total_weekdays > 0 {
                ((days.len() as f64 / total_weekdays as f64) * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };
            UserStat {
                username: author.clone(),
                total_hours: hours(seconds),
                days_logged: days.len(),
                consistency_percent: round2(consistency),
            }
        })
        .collect()
}

/// Ranking of [`user_stats`] descending by total hours; ties keep input order.
pub fn rank_by_hours(stats: &[UserStat]) -> Vec<UserStat> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| b.total_hours.partial_cmp(&a.total_hours).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Ranking of [`user_stats`] descending by consistency; ties keep input order.
pub fn rank_by_consistency(stats: &[UserStat]) -> Vec<UserStat> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| b.consistency_percent.partial_cmp(&a.consistency_percent).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Headline figures: grand total, per-author totals, distinct tickets,
/// days with logs and average hours per logged day.
pub fn overview_stats(records: &[WorklogRecord], request: &AggregationRequest) -> OverviewStats {
    let filtered = filter_by_window(records, request);

    let mut total_seconds = 0u64;
    let mut user_seconds: HashMap<String, u64> = HashMap::new();
    let mut tickets: Vec<&str> = Vec::new();
    let mut days: Vec<&str> = Vec::new();
    for record in &filtered {
        if let Some(label) = request.visible_label(&record.author) {
            total_seconds += record.time_spent_seconds;
            *user_seconds.entry(label.to_string()).or_insert(0) += record.time_spent_seconds;
            if !tickets.contains(&record.key.as_str()) {
                tickets.push(&record.key);
            }
            if !days.contains(&record.date.as_str()) {
                days.push(&record.date);
            }
        }
    }

    let total_hours = hours(total_seconds);
    let avg = if days.is_empty() { 0.0 } else { round2(total_hours / days.len() as f64) };
    OverviewStats {
        total_hours,
        user_totals: request
            .authors
            .iter()
            .map(|author| (author.clone(), hours(user_seconds.get(author).copied().unwrap_or(0))))
            .collect(),
        unique_tickets: tickets.len(),
        days_with_logs: days.len(),
        avg_hours_per_day: avg,
    }
}
