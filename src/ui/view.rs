//! Dashboard view-state: section switching, debounced filtering, the
//! detail modal and row rendering.
//!
//! Everything here is page-local and ephemeral. Filtering and search are
//! evaluated over rows already fetched from the API; no operation here
//! performs a network call, and rendering fully replaces the previous row
//! set rather than diffing it.

use std::time::{Duration, Instant};

use crate::db::{DemandResponse, DemandStatus};

/// Quiet period before a search edit is applied.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Dashboard sections. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Profile,
    DemandForm,
    DemandList,
    Statistics,
    AdminDemands,
    AdminUsers,
}

/// A rendered table row. What the user actually sees of a demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: DemandStatus,
    pub created_at: String,
}

impl From<&DemandResponse> for Row {
    fn from(demand: &DemandResponse) -> Self {
        Self {
            id: demand.id.clone(),
            title: demand.title.clone(),
            category: demand.category.clone(),
            status: demand.status,
            created_at: demand.created_at.clone(),
        }
    }
}

/// Debounced search input. Edits re-arm the timer; the pending term is
/// only applied once the quiet period elapses.
#[derive(Debug, Default)]
struct SearchInput {
    applied: String,
    pending: Option<(String, Instant)>,
}

impl SearchInput {
    fn edit(&mut self, term: &str, now: Instant) {
        self.pending = Some((term.to_string(), now));
    }

    /// Apply the pending term when its quiet period has elapsed. Returns
    /// true when the applied term changed.
    fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some((term, at)) if now.duration_since(*at) >= SEARCH_DEBOUNCE => {
                let changed = *term != self.applied;
                self.applied = term.clone();
                self.pending = None;
                changed
            }
            _ => false,
        }
    }
}

/// View state for the demand table and its surrounding chrome.
#[derive(Debug, Default)]
pub struct DashboardView {
    active: Section,
    search: SearchInput,
    status_filter: Option<DemandStatus>,
    /// Demand id shown in the detail modal, when one is open
    modal: Option<String>,
    fetched: Vec<DemandResponse>,
    rows: Vec<Row>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_section(&self) -> Section {
        self.active
    }

    /// Switch sections. The previous section is deactivated; there is
    /// never more than one active.
    pub fn show_section(&mut self, section: Section) {
        self.active = section;
    }

    /// Replace the fetched record set and re-render.
    pub fn set_demands(&mut self, demands: Vec<DemandResponse>) {
        self.fetched = demands;
        self.render();
    }

    /// Record a keystroke in the search box. The filter does not move
    /// until [`tick`](Self::tick) observes the quiet period.
    pub fn edit_search(&mut self, term: &str, now: Instant) {
        self.search.edit(term, now);
    }

    pub fn set_status_filter(&mut self, status: Option<DemandStatus>) {
        self.status_filter = status;
        self.render();
    }

    /// Advance the debounce clock, re-rendering when a pending search
    /// term got applied. Returns true when the visible rows were rebuilt.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.search.poll(now) {
            self.render();
            true
        } else {
            false
        }
    }

    pub fn open_modal(&mut self, demand_id: &str) {
        // at most one modal; opening another replaces it
        self.modal = Some(demand_id.to_string());
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn open_modal_id(&self) -> Option<&str> {
        self.modal.as_deref()
    }

    pub fn visible_rows(&self) -> &[Row] {
        &self.rows
    }

    fn matches(&self, demand: &DemandResponse) -> bool {
        if let Some(status) = self.status_filter {
            if demand.status != status {
                return false;
            }
        }
        if self.search.applied.is_empty() {
            return true;
        }
        let needle = self.search.applied.to_lowercase();
        demand.title.to_lowercase().contains(&needle)
            || demand.description.to_lowercase().contains(&needle)
    }

    /// Rebuild the visible rows from the fetched set. Full replacement:
    /// the same inputs always produce the same table.
    fn render(&mut self) {
        self.rows = self
            .fetched
            .iter()
            .filter(|d| self.matches(d))
            .map(Row::from)
            .collect();
    }
}

/// Guards a UI control against duplicate submission while a network call
/// is in flight. Calls are not cancellable; the guard only releases when
/// the caller reports completion.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    in_flight: bool,
}

impl SubmitGuard {
    /// Try to start a submission. Refused while one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Report completion (success or failure), re-enabling the control.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
