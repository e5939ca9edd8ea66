//! Drill-down navigation state machine.
//!
//! Two permanent base views (daily hours, ticket summary) plus lazily
//! created detail tabs scoped to one ticket or one day. All transitions
//! are explicit methods on [`Navigation`] so the state is independently
//! testable; there is no ambient global state. Transitions are
//! synchronous reactions to discrete selection events and never overlap.

use crate::libs::error::{Result, WorklensError};
use serde::Serialize;

/// Id of the default base tab, the fallback after closing the last detail.
pub const BASE_DAILY_ID: &str = "daily";
/// Id of the ticket-summary base tab.
pub const BASE_TICKETS_ID: &str = "tickets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabKind {
    BaseDaily,
    BaseTickets,
    TicketDetail,
    DayDetail,
}

/// One open view.
///
/// Base tabs live for the whole session and are never closable. Detail
/// tabs are created on first selection of a ticket or day, reused on
/// repeat selection and destroyed explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationTab {
    pub id: String,
    pub kind: TabKind,
    pub label: String,
    pub payload: Option<String>,
}

/// Tab set plus the active-tab pointer.
///
/// The pointer always references an existing tab: the constructor starts
/// on the daily base tab and every transition that removes a tab repairs
/// the pointer before returning.
#[derive(Debug, Clone)]
pub struct Navigation {
    base_tabs: Vec<NavigationTab>,
    detail_tabs: Vec<NavigationTab>,
    active_tab_id: String,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        let base_tabs = vec![
            NavigationTab {
                id: BASE_DAILY_ID.to_string(),
                kind: TabKind::BaseDaily,
                label: "Daily Hours".to_string(),
                payload: None,
            },
            NavigationTab {
                id: BASE_TICKETS_ID.to_string(),
                kind: TabKind::BaseTickets,
                label: "Tickets Summary".to_string(),
                payload: None,
            },
        ];
        Self {
            base_tabs,
            detail_tabs: Vec::new(),
            active_tab_id: BASE_DAILY_ID.to_string(),
        }
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn active_tab(&self) -> &NavigationTab {
        // The pointer invariant guarantees a match.
        self.tabs().find(|t| t.id == self.active_tab_id).expect("active tab must exist")
    }

    /// All tabs in display order: the two bases, then details in opening order.
    pub fn tabs(&self) -> impl Iterator<Item = &NavigationTab> {
        self.base_tabs.iter().chain(self.detail_tabs.iter())
    }

    pub fn detail_tabs(&self) -> &[NavigationTab] {
        &self.detail_tabs
    }

    /// Opens (or re-activates) the drill-down for one ticket.
    pub fn open_ticket_detail(&mut self, ticket_key: &str) {
        let id = format!("ticket-{}", ticket_key);
        self.open_detail(id, TabKind::TicketDetail, ticket_key.to_string(), ticket_key.to_string());
    }

    /// Opens (or re-activates) the drill-down for one day.
    pub fn open_day_detail(&mut self, date: &str) {
        let id = format!("day-{}", date);
        self.open_detail(id, TabKind::DayDetail, date.to_string(), date.to_string());
    }

    /// Tab ids are deterministic from kind + key, so a repeat selection
    /// finds the existing tab and only moves the active pointer.
    fn open_detail(&mut self, id: String, kind: TabKind, label: String, payload: String) {
        if !self.detail_tabs.iter().any(|t| t.id == id) {
            self.detail_tabs.push(NavigationTab {
                id: id.clone(),
                kind,
                label,
                payload: Some(payload),
            });
        }
        self.active_tab_id = id;
    }

    /// Moves the active pointer to an existing tab.
    pub fn switch(&mut self, tab_id: &str) -> Result<()> {
        if !self.tabs().any(|t| t.id == tab_id) {
            return Err(WorklensError::UnknownTab(tab_id.to_string()));
        }
        self.active_tab_id = tab_id.to_string();
        Ok(())
    }

    /// Closes a detail tab. Closing a base tab (or an unknown id) is a
    /// no-op: base tabs must never be removed.
    ///
    /// When the closed tab was active, the new active tab is the detail at
    /// the closed tab's former index clamped into the remaining detail
    /// list; with no details left, the daily base tab.
    pub fn close(&mut self, tab_id: &str) {
        let Some(index) = self.detail_tabs.iter().position(|t| t.id == tab_id) else {
            return;
        };
        self.detail_tabs.remove(index);

        if self.active_tab_id == tab_id {
            self.active_tab_id = match self.detail_tabs.is_empty() {
                true => BASE_DAILY_ID.to_string(),
                false => {
                    let next = index.min(self.detail_tabs.len() - 1);
                    self.detail_tabs[next].id.clone()
                }
            };
        }
    }
}
