use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{LeadRecord, Result};
use crate::store::StateStore;

const SELECTION_KEY: &str = "selection";

/// Emitted when a reconcile pruned previously selected leads out of the
/// universe. Informational - the caller decides whether to tell the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationLoss {
    pub lost_ids: Vec<String>,
    /// True when a non-empty selection lost every member.
    pub fully_invalidated: bool,
}

/// Tracks which lead IDs the user currently has chosen, across filter, sort
/// and grouping changes. The set only ever references leads present in the
/// current universe; `reconcile` enforces that whenever the universe moves.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: HashSet<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedSelection {
    selected_ids: Vec<String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Flip membership for one lead. Toggling twice is a no-op.
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Toggle-all: if the selection already covers the whole universe, clear
    /// it; otherwise select exactly the universe.
    pub fn select_all(&mut self, universe: &[LeadRecord]) {
        let universe_ids: HashSet<String> = universe.iter().map(|l| l.id.clone()).collect();
        if self.selected == universe_ids {
            self.selected.clear();
        } else {
            self.selected = universe_ids;
        }
    }

    /// Replace the selection wholesale with a group's IDs. Switching to a
    /// filtered tab selects everything in it - deliberate behaviour.
    pub fn auto_select_group<'a, I>(&mut self, group: I)
    where
        I: IntoIterator<Item = &'a LeadRecord>,
    {
        self.selected = group.into_iter().map(|l| l.id.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Intersect the selection with a changed universe, pruning stale IDs.
    /// Returns the loss report when anything was pruned.
    pub fn reconcile(&mut self, new_universe: &[LeadRecord]) -> Option<ReconciliationLoss> {
        if self.selected.is_empty() {
            return None;
        }

        let universe_ids: HashSet<&str> = new_universe.iter().map(|l| l.id.as_str()).collect();
        let mut lost_ids: Vec<String> = self
            .selected
            .iter()
            .filter(|id| !universe_ids.contains(id.as_str()))
            .cloned()
            .collect();

        if lost_ids.is_empty() {
            return None;
        }
        lost_ids.sort();

        for id in &lost_ids {
            self.selected.remove(id);
        }

        let loss = ReconciliationLoss {
            fully_invalidated: self.selected.is_empty(),
            lost_ids,
        };
        debug!(
            "Reconcile pruned {} stale selection id(s), {} remain",
            loss.lost_ids.len(),
            self.selected.len()
        );
        Some(loss)
    }

    pub async fn persist(&self, store: &StateStore) -> Result<()> {
        let state = PersistedSelection {
            selected_ids: self.ids(),
        };
        store.set(SELECTION_KEY, &serde_json::to_string(&state)?).await
    }

    /// Restore a persisted selection and immediately reconcile it against
    /// the freshly loaded universe - a stored set is never trusted as-is.
    pub async fn restore(
        store: &StateStore,
        universe: &[LeadRecord],
    ) -> Result<(Self, Option<ReconciliationLoss>)> {
        let mut manager = Self::new();

        if let Some(raw) = store.get(SELECTION_KEY).await? {
            let state: PersistedSelection = serde_json::from_str(&raw)?;
            manager.selected = state.selected_ids.into_iter().collect();
            info!("Restored {} selected lead(s) from previous session", manager.len());
        }

        let loss = manager.reconcile(universe);
        Ok((manager, loss))
    }
}
