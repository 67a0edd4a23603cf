//! Per-row expand/collapse state for the results table.
//!
//! A row starts `Collapsed`. Toggling it either opens it straight away from
//! the detail cache or moves it to `Expanding` and hands out a
//! [`FetchTicket`]; the fetch outcome is applied with `resolve`. A ticket
//! issued before the row was collapsed again is stale and ignored.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::api::{DishId, SeasonalDataset};
use crate::detail_cache::{DetailCache, DetailResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RowExpansionState {
    #[default]
    Collapsed,
    Expanding,
    Expanded(Arc<SeasonalDataset>),
}

/// Identifies one fetch started by one toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What a toggle asks the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Collapsed,
    /// Opened from cache; no request needed.
    Expanded,
    /// Fetch the detail, then `resolve` with this ticket.
    Fetch(FetchTicket),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowExpansionController {
    state: RowExpansionState,
    error: Option<String>,
    pending: Option<FetchTicket>,
    next_ticket: u64,
}

impl RowExpansionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RowExpansionState {
        &self.state
    }

    /// Message from the last failed load, shown while collapsed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn toggle(&mut self, cached: Option<Arc<SeasonalDataset>>) -> Toggle {
        match self.state {
            RowExpansionState::Collapsed => {
                self.error = None;
                if let Some(dataset) = cached {
                    self.state = RowExpansionState::Expanded(dataset);
                    return Toggle::Expanded;
                }
                let ticket = FetchTicket(self.next_ticket);
                self.next_ticket += 1;
                self.pending = Some(ticket);
                self.state = RowExpansionState::Expanding;
                Toggle::Fetch(ticket)
            }
            RowExpansionState::Expanding | RowExpansionState::Expanded(_) => {
                self.state = RowExpansionState::Collapsed;
                self.pending = None;
                Toggle::Collapsed
            }
        }
    }

    /// Apply a fetch outcome. Returns `false` when the ticket is stale.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: &DetailResult) -> bool {
        if self.state != RowExpansionState::Expanding || self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(dataset) => {
                self.state = RowExpansionState::Expanded(Arc::clone(dataset));
            }
            Err(e) => {
                self.state = RowExpansionState::Collapsed;
                self.error = Some(e.to_string());
            }
        }
        true
    }
}

/// Expansion state of every row, keyed by item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowExpansions {
    rows: HashMap<DishId, RowExpansionController>,
}

impl RowExpansions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `id`, opening it directly when `cache` already holds its data.
    pub fn toggle<S>(&mut self, id: &DishId, cache: &DetailCache<S>) -> Toggle {
        let cached = cache.peek(id);
        let outcome = self.rows.entry(id.clone()).or_default().toggle(cached);
        debug!("Row {} toggled: {:?}", id, outcome);
        outcome
    }

    pub fn resolve(&mut self, id: &DishId, ticket: FetchTicket, outcome: &DetailResult) -> bool {
        let applied = self
            .rows
            .get_mut(id)
            .map(|row| row.resolve(ticket, outcome))
            .unwrap_or(false);
        if !applied {
            debug!("Discarded stale detail result for row {}", id);
        }
        applied
    }

    pub fn state(&self, id: &DishId) -> RowExpansionState {
        self.rows.get(id).map(|r| r.state().clone()).unwrap_or_default()
    }

    pub fn error(&self, id: &DishId) -> Option<String> {
        self.rows.get(id).and_then(|r| r.error().map(str::to_string))
    }

    pub fn expanded_count(&self) -> usize {
        self.rows
            .values()
            .filter(|r| matches!(r.state(), RowExpansionState::Expanded(_)))
            .count()
    }

    /// Forget every row, e.g. when a new result set replaces the table.
    pub fn reset(&mut self) {
        self.rows.clear();
    }
}
