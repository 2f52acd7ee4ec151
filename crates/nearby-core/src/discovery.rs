//! # Discovery State
//!
//! View state behind the home screen: categories, the selected category and
//! the markets listed under it.
//!
//! ## Dependent Fetch Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Discovery State Machine                             │
//! │                                                                         │
//! │  ┌──────┐ begin_categories ┌───────────────────┐ apply_categories       │
//! │  │ Idle │ ───────────────► │ CategoriesLoading │ ──────────────┐        │
//! │  └──────┘ ◄─────────────── └───────────────────┘               │        │
//! │              fail_categories                                   ▼        │
//! │                                                 ┌──────────────────┐    │
//! │           selection = default_selection(list)   │ CategoriesLoaded │    │
//! │                                                 └────────┬─────────┘    │
//! │                                            begin_markets │              │
//! │                                                          ▼              │
//! │  ┌───────────────┐     apply_markets      ┌────────────────┐            │
//! │  │ MarketsLoaded │ ◄───────────────────── │ MarketsLoading │            │
//! │  └───────┬───────┘                        └───────┬────────┘            │
//! │          │ select(other) + begin_markets          │ fail_markets        │
//! │          └───────────────────────────────►        ▼                     │
//! │                                      back to the last stable phase      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - The market list is replaced wholesale, never merged.
//! - Only the newest market request may write the list (see
//!   [`RequestSequencer`]); after [`close`](DiscoveryState::close) nothing
//!   does.
//! - Failures never touch data; the phase falls back to the last stable one.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::sequence::{RequestSequencer, Ticket};
use crate::types::{Category, MapMarker, MarketSummary};

// =============================================================================
// Phase
// =============================================================================

/// Where the home screen currently is in its fetch chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscoveryPhase {
    #[default]
    Idle,
    CategoriesLoading,
    CategoriesLoaded,
    MarketsLoading,
    MarketsLoaded,
}

impl std::fmt::Display for DiscoveryPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryPhase::Idle => write!(f, "idle"),
            DiscoveryPhase::CategoriesLoading => write!(f, "categories_loading"),
            DiscoveryPhase::CategoriesLoaded => write!(f, "categories_loaded"),
            DiscoveryPhase::MarketsLoading => write!(f, "markets_loading"),
            DiscoveryPhase::MarketsLoaded => write!(f, "markets_loaded"),
        }
    }
}

// =============================================================================
// Selection Policy
// =============================================================================

/// The category selected when none is chosen yet: the first one.
///
/// Kept apart from the fetch so the policy can be tested (and swapped)
/// without a network call.
pub fn default_selection(categories: &[Category]) -> Option<&str> {
    categories.first().map(|c| c.id.as_str())
}

/// Outcome of a selection update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Same category as before; no refetch.
    Unchanged,
    /// A different category; exactly one market fetch must follow.
    Changed(String),
}

/// Outcome of applying a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied<T> {
    /// The response was written to state.
    Fresh(T),
    /// A newer request was issued (or the screen closed); nothing changed.
    Stale,
}

impl<T> Applied<T> {
    /// Returns true if the response was written.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Applied::Fresh(_))
    }
}

// =============================================================================
// Discovery State
// =============================================================================

/// Home screen state, owned by one screen instance.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryState {
    categories: Vec<Category>,
    categories_loaded: bool,
    selection: Option<String>,

    markets: Vec<MarketSummary>,
    /// Category the current market list belongs to.
    markets_category: Option<String>,
    markets_loaded: bool,

    categories_seq: RequestSequencer,
    markets_seq: RequestSequencer,
    pending_categories: Option<Ticket>,
    pending_markets: Option<Ticket>,
}

impl DiscoveryState {
    /// Creates an empty, idle state.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase, derived from what is in flight and what has loaded.
    pub fn phase(&self) -> DiscoveryPhase {
        if self.pending_categories.is_some() {
            DiscoveryPhase::CategoriesLoading
        } else if self.pending_markets.is_some() {
            DiscoveryPhase::MarketsLoading
        } else {
            self.stable_phase()
        }
    }

    fn stable_phase(&self) -> DiscoveryPhase {
        if self.markets_loaded {
            DiscoveryPhase::MarketsLoaded
        } else if self.categories_loaded {
            DiscoveryPhase::CategoriesLoaded
        } else {
            DiscoveryPhase::Idle
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Selected category id, `None` before the first successful load.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn markets(&self) -> &[MarketSummary] {
        &self.markets
    }

    /// Category the displayed market list was fetched for.
    pub fn markets_category(&self) -> Option<&str> {
        self.markets_category.as_deref()
    }

    /// Map pins for the current market list.
    pub fn markers(&self) -> Vec<MapMarker> {
        self.markets.iter().map(MarketSummary::marker).collect()
    }

    /// Returns true after the screen unmounted.
    pub fn is_closed(&self) -> bool {
        self.markets_seq.is_closed()
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Records that a category request went out.
    pub fn begin_categories(&mut self) -> Ticket {
        let ticket = self.categories_seq.issue();
        if !self.categories_seq.is_closed() {
            self.pending_categories = Some(ticket);
        }
        ticket
    }

    /// Writes a category response.
    ///
    /// The current selection survives if the category is still listed;
    /// otherwise [`default_selection`] picks the first entry.
    pub fn apply_categories(
        &mut self,
        ticket: Ticket,
        categories: Vec<Category>,
    ) -> Applied<SelectionChange> {
        if !self.categories_seq.is_current(ticket) {
            return Applied::Stale;
        }

        self.pending_categories = None;
        self.categories = categories;
        self.categories_loaded = true;

        let keep = self
            .selection
            .as_deref()
            .is_some_and(|id| self.categories.iter().any(|c| c.id == id));

        if keep {
            return Applied::Fresh(SelectionChange::Unchanged);
        }

        let next = default_selection(&self.categories).map(str::to_string);
        if next == self.selection {
            return Applied::Fresh(SelectionChange::Unchanged);
        }

        self.selection = next.clone();
        Applied::Fresh(SelectionChange::Changed(next.unwrap_or_default()))
    }

    /// Records a failed category request. Data is left untouched.
    pub fn fail_categories(&mut self, ticket: Ticket) -> bool {
        if !self.categories_seq.is_current(ticket) {
            return false;
        }
        self.pending_categories = None;
        true
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a category.
    ///
    /// An empty id clears the selection; the following market load is then
    /// a no-op.
    pub fn select(&mut self, category_id: &str) -> SelectionChange {
        let category_id = category_id.trim();
        let next = (!category_id.is_empty()).then(|| category_id.to_string());

        if next == self.selection {
            return SelectionChange::Unchanged;
        }

        self.selection = next;
        SelectionChange::Changed(category_id.to_string())
    }

    // =========================================================================
    // Markets
    // =========================================================================

    /// Records that a market request went out.
    ///
    /// Returns `None` (and issues nothing) for an empty category id or once
    /// the screen is closed.
    pub fn begin_markets(&mut self, category_id: &str) -> Option<Ticket> {
        if category_id.trim().is_empty() || self.markets_seq.is_closed() {
            return None;
        }

        let ticket = self.markets_seq.issue();
        self.pending_markets = Some(ticket);
        Some(ticket)
    }

    /// Writes a market response if it belongs to the newest request.
    pub fn apply_markets(
        &mut self,
        ticket: Ticket,
        category_id: &str,
        markets: Vec<MarketSummary>,
    ) -> Applied<usize> {
        if !self.markets_seq.is_current(ticket) {
            return Applied::Stale;
        }

        self.pending_markets = None;
        self.markets = markets;
        self.markets_category = Some(category_id.to_string());
        self.markets_loaded = true;
        Applied::Fresh(self.markets.len())
    }

    /// Records a failed market request. The previous list stays.
    pub fn fail_markets(&mut self, ticket: Ticket) -> bool {
        if !self.markets_seq.is_current(ticket) {
            return false;
        }
        self.pending_markets = None;
        true
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Screen unmounted: every in-flight response will be discarded.
    pub fn close(&mut self) {
        self.categories_seq.close();
        self.markets_seq.close();
        self.pending_categories = None;
        self.pending_markets = None;
    }

    /// Serializable snapshot for the presentation layer.
    pub fn view(&self) -> DiscoveryView {
        DiscoveryView {
            phase: self.phase(),
            categories: self.categories.clone(),
            selection: self.selection.clone(),
            markets: self.markets.clone(),
            markers: self.markers(),
        }
    }
}

/// What the home screen renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscoveryView {
    pub phase: DiscoveryPhase,
    pub categories: Vec<Category>,
    pub selection: Option<String>,
    pub markets: Vec<MarketSummary>,
    pub markers: Vec<MapMarker>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon_id: String::new(),
        }
    }

    fn market(id: &str) -> MarketSummary {
        MarketSummary {
            id: id.to_string(),
            name: format!("Market {}", id),
            address: "Rua A".to_string(),
            latitude: -23.5,
            longitude: -46.6,
            description: None,
            coupons: None,
            cover: None,
        }
    }

    #[test]
    fn test_default_selection_is_first() {
        let list = vec![category("c1", "Food"), category("c2", "Shop")];
        assert_eq!(default_selection(&list), Some("c1"));
        assert_eq!(default_selection(&[]), None);
    }

    #[test]
    fn test_categories_select_first() {
        let mut state = DiscoveryState::new();
        assert_eq!(state.phase(), DiscoveryPhase::Idle);

        let ticket = state.begin_categories();
        assert_eq!(state.phase(), DiscoveryPhase::CategoriesLoading);

        let applied = state.apply_categories(
            ticket,
            vec![category("c1", "Food"), category("c2", "Shop")],
        );

        assert_eq!(applied, Applied::Fresh(SelectionChange::Changed("c1".into())));
        assert_eq!(state.selection(), Some("c1"));
        assert_eq!(state.phase(), DiscoveryPhase::CategoriesLoaded);
    }

    #[test]
    fn test_empty_categories_leave_selection_unset() {
        let mut state = DiscoveryState::new();
        let ticket = state.begin_categories();

        let applied = state.apply_categories(ticket, vec![]);
        assert_eq!(applied, Applied::Fresh(SelectionChange::Unchanged));
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn test_reload_keeps_listed_selection() {
        let mut state = DiscoveryState::new();
        let t = state.begin_categories();
        state.apply_categories(t, vec![category("c1", "Food"), category("c2", "Shop")]);
        state.select("c2");

        let t = state.begin_categories();
        let applied =
            state.apply_categories(t, vec![category("c1", "Food"), category("c2", "Shop")]);
        assert_eq!(applied, Applied::Fresh(SelectionChange::Unchanged));
        assert_eq!(state.selection(), Some("c2"));
    }

    #[test]
    fn test_category_failure_returns_to_idle() {
        let mut state = DiscoveryState::new();
        let ticket = state.begin_categories();

        assert!(state.fail_categories(ticket));
        assert_eq!(state.phase(), DiscoveryPhase::Idle);
        assert!(state.categories().is_empty());
    }

    #[test]
    fn test_select_same_category_is_unchanged() {
        let mut state = DiscoveryState::new();
        assert_eq!(state.select("c1"), SelectionChange::Changed("c1".into()));
        assert_eq!(state.select("c1"), SelectionChange::Unchanged);
        assert_eq!(state.select("c2"), SelectionChange::Changed("c2".into()));
    }

    #[test]
    fn test_empty_category_issues_no_request() {
        let mut state = DiscoveryState::new();
        assert_eq!(state.begin_markets(""), None);
        assert_eq!(state.begin_markets("   "), None);
        assert_eq!(state.phase(), DiscoveryPhase::Idle);
    }

    #[test]
    fn test_markets_replaced_not_merged() {
        let mut state = DiscoveryState::new();

        let t = state.begin_markets("c1").unwrap();
        assert_eq!(state.phase(), DiscoveryPhase::MarketsLoading);
        state.apply_markets(t, "c1", vec![market("m1"), market("m2")]);

        let t = state.begin_markets("c2").unwrap();
        state.apply_markets(t, "c2", vec![market("m3")]);

        assert_eq!(state.markets().len(), 1);
        assert_eq!(state.markets()[0].id, "m3");
        assert_eq!(state.markets_category(), Some("c2"));
        assert_eq!(state.markers()[0].id, "m3");
        assert_eq!(state.phase(), DiscoveryPhase::MarketsLoaded);
    }

    #[test]
    fn test_stale_market_response_discarded() {
        let mut state = DiscoveryState::new();

        let older = state.begin_markets("c2").unwrap();
        let newer = state.begin_markets("c3").unwrap();

        assert!(state.apply_markets(newer, "c3", vec![market("m3")]).is_fresh());
        assert_eq!(
            state.apply_markets(older, "c2", vec![market("m2")]),
            Applied::Stale
        );

        assert_eq!(state.markets()[0].id, "m3");
        assert_eq!(state.markets_category(), Some("c3"));
    }

    #[test]
    fn test_market_failure_keeps_previous_list() {
        let mut state = DiscoveryState::new();
        let t = state.begin_markets("c1").unwrap();
        state.apply_markets(t, "c1", vec![market("m1")]);

        let t = state.begin_markets("c2").unwrap();
        assert!(state.fail_markets(t));

        assert_eq!(state.markets()[0].id, "m1");
        assert_eq!(state.phase(), DiscoveryPhase::MarketsLoaded);
    }

    #[test]
    fn test_close_discards_in_flight() {
        let mut state = DiscoveryState::new();
        let t = state.begin_markets("c1").unwrap();
        state.close();

        assert!(state.is_closed());
        assert_eq!(state.apply_markets(t, "c1", vec![market("m1")]), Applied::Stale);
        assert!(state.markets().is_empty());
        assert_eq!(state.begin_markets("c1"), None);
    }

    #[test]
    fn test_view_snapshot() {
        let mut state = DiscoveryState::new();
        let t = state.begin_categories();
        state.apply_categories(t, vec![category("c1", "Food")]);
        let t = state.begin_markets("c1").unwrap();
        state.apply_markets(t, "c1", vec![market("m1")]);

        let view = state.view();
        assert_eq!(view.phase, DiscoveryPhase::MarketsLoaded);
        assert_eq!(view.selection.as_deref(), Some("c1"));
        assert_eq!(view.markers.len(), 1);
    }
}
