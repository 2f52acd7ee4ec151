//! # Market Discovery Flow
//!
//! Drives the home screen: categories, the selected category, and the
//! markets shown as map pins and list rows.
//!
//! ## Fetch Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Home Screen Flow                                 │
//! │                                                                         │
//! │  mount()                                                                │
//! │    │                                                                    │
//! │    ├── (map.follow_user) locate_user() ── permission ── position        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  load_categories() ── GET /categories                                   │
//! │    │                                                                    │
//! │    │  selection changed (first load: first category)                    │
//! │    ▼                                                                    │
//! │  load_markets(id) ── GET /markets/category/{id} ── ticket #n            │
//! │    │                                                                    │
//! │    │  newest ticket? ── yes ──► replace list, rebuild markers           │
//! │    │                 └─ no ───► discard                                 │
//! │    ▼                                                                    │
//! │  select_category(other) ── exactly one more market fetch               │
//! │                                                                         │
//! │  open_market(id) ──► navigate /market/{id}                             │
//! │  unmount() ──► every in-flight response is discarded                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state lock is only taken between awaits, never across a request.

use std::sync::Arc;

use nearby_core::discovery::{Applied, DiscoveryState, DiscoveryView, SelectionChange};
use nearby_core::validation::{validate_category_id, validate_coordinates, validate_market_id};
use nearby_core::{
    Capability, Category, CoreResult, Coordinates, FlowError, MapRegion, MarketSummary, Route,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::MarketApi;
use crate::config::ClientConfig;
use crate::ui::{DeviceCapabilities, Presenter};

/// Home screen controller. Cloning yields another handle to the same screen.
#[derive(Clone)]
pub struct MarketDiscovery {
    api: Arc<dyn MarketApi>,
    presenter: Arc<dyn Presenter>,
    device: Arc<dyn DeviceCapabilities>,
    config: Arc<ClientConfig>,
    state: Arc<Mutex<DiscoveryState>>,
}

impl MarketDiscovery {
    pub fn new(
        api: Arc<dyn MarketApi>,
        presenter: Arc<dyn Presenter>,
        device: Arc<dyn DeviceCapabilities>,
        config: Arc<ClientConfig>,
    ) -> Self {
        MarketDiscovery {
            api,
            presenter,
            device,
            config,
            state: Arc::new(Mutex::new(DiscoveryState::new())),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Screen mounted: optionally locate the user, then load categories
    /// (which loads the markets of the default selection).
    pub async fn mount(&self) -> CoreResult<Vec<Category>> {
        if self.config.map.follow_user {
            if let Err(e) = self.locate_user().await {
                debug!(error = %e, "Continuing without user position");
            }
        }
        self.load_categories().await
    }

    /// Screen unmounted. Late responses are dropped on arrival.
    pub async fn unmount(&self) {
        self.state.lock().await.close();
        debug!("Discovery flow closed");
    }

    /// Region the map opens on.
    pub fn initial_region(&self) -> MapRegion {
        self.config.map.initial_region
    }

    /// Current view for rendering.
    pub async fn snapshot(&self) -> DiscoveryView {
        self.state.lock().await.view()
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Fetches the category list.
    ///
    /// On success the list is replaced and, if the selection changed, the
    /// markets of the new selection are loaded before returning. A market
    /// failure at that point is alerted but does not fail this call.
    pub async fn load_categories(&self) -> CoreResult<Vec<Category>> {
        let ticket = self.state.lock().await.begin_categories();
        debug!(%ticket, "Loading categories");

        let categories = match self.api.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                let current = self.state.lock().await.fail_categories(ticket);
                warn!(error = %e, "Failed to load categories");
                let err = FlowError::CategoryFetchFailed(e.to_string());
                if current {
                    self.report(&err).await;
                }
                return Err(err);
            }
        };

        let applied = self
            .state
            .lock()
            .await
            .apply_categories(ticket, categories.clone());

        match applied {
            Applied::Fresh(SelectionChange::Changed(id)) if !id.is_empty() => {
                info!(count = categories.len(), selection = %id, "Categories loaded");
                self.follow_selection(&id).await;
            }
            Applied::Fresh(_) => info!(count = categories.len(), "Categories loaded"),
            Applied::Stale => debug!(%ticket, "Discarding stale category response"),
        }

        Ok(categories)
    }

    async fn follow_selection(&self, category_id: &str) {
        if let Err(e) = self.load_markets(category_id).await {
            debug!(category_id, error = %e, "Market reload after selection change failed");
        }
    }

    /// Changes the selected category.
    ///
    /// A different category triggers exactly one market fetch; the same one
    /// (or an empty id, which clears the selection) triggers none.
    pub async fn select_category(&self, category_id: &str) -> CoreResult<SelectionChange> {
        let category_id = category_id.trim();
        if !category_id.is_empty() {
            if let Err(e) = validate_category_id(category_id) {
                let err = FlowError::from(e);
                self.report(&err).await;
                return Err(err);
            }
        }

        let change = self.state.lock().await.select(category_id);
        if let SelectionChange::Changed(ref id) = change {
            info!(category_id = %id, "Category selected");
            if !id.is_empty() {
                self.load_markets(id).await?;
            }
        }
        Ok(change)
    }

    // =========================================================================
    // Markets
    // =========================================================================

    /// Fetches the markets of a category and returns the list now shown.
    ///
    /// An empty id issues no request. Only the newest request may replace
    /// the list; older responses are discarded.
    pub async fn load_markets(&self, category_id: &str) -> CoreResult<Vec<MarketSummary>> {
        let category_id = category_id.trim();
        if !category_id.is_empty() {
            if let Err(e) = validate_category_id(category_id) {
                let err = FlowError::from(e);
                self.report(&err).await;
                return Err(err);
            }
        }

        let ticket = {
            let mut state = self.state.lock().await;
            match state.begin_markets(category_id) {
                Some(ticket) => ticket,
                None => return Ok(state.markets().to_vec()),
            }
        };
        debug!(category_id, %ticket, "Loading markets");

        match self.api.list_markets(category_id).await {
            Ok(markets) => {
                let mut state = self.state.lock().await;
                match state.apply_markets(ticket, category_id, markets) {
                    Applied::Fresh(count) => info!(category_id, count, "Markets loaded"),
                    Applied::Stale => debug!(category_id, %ticket, "Discarding stale market response"),
                }
                Ok(state.markets().to_vec())
            }
            Err(e) => {
                let current = self.state.lock().await.fail_markets(ticket);
                warn!(category_id, error = %e, "Failed to load markets");
                let err = FlowError::MarketFetchFailed {
                    category_id: category_id.to_string(),
                    reason: e.to_string(),
                };
                if current {
                    self.report(&err).await;
                }
                Err(err)
            }
        }
    }

    /// Callout tapped: opens the detail screen.
    pub async fn open_market(&self, market_id: &str) -> CoreResult<Route> {
        if let Err(e) = validate_market_id(market_id) {
            let err = FlowError::from(e);
            self.report(&err).await;
            return Err(err);
        }

        let route = Route::Market(market_id.trim().to_string());
        info!(route = %route, "Opening market");
        self.presenter.navigate(&route);
        Ok(route)
    }

    // =========================================================================
    // Location
    // =========================================================================

    /// Asks for foreground location and reads the current position.
    pub async fn locate_user(&self) -> CoreResult<Coordinates> {
        let capability = Capability::Location;

        let result = match self.device.request_permission(capability).await {
            Ok(status) if status.is_granted() => self
                .device
                .current_position()
                .await
                .map_err(|e| FlowError::CapabilityUnavailable {
                    capability,
                    reason: e.to_string(),
                }),
            Ok(_) => Err(FlowError::PermissionDenied { capability }),
            Err(e) => Err(FlowError::CapabilityUnavailable {
                capability,
                reason: e.to_string(),
            }),
        };

        let checked = result.and_then(|position| {
            validate_coordinates(&position)?;
            Ok(position)
        });

        let position = match checked {
            Ok(position) => position,
            Err(err) => {
                warn!(error = %err, "Could not locate user");
                self.report(&err).await;
                return Err(err);
            }
        };

        debug!(
            latitude = position.latitude,
            longitude = position.longitude,
            "User located"
        );
        Ok(position)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn report(&self, err: &FlowError) {
        if self.state.lock().await.is_closed() {
            return;
        }
        let alert = err.alert(self.config.locale());
        self.presenter.alert(&alert).await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, FakeDevice, RecordingPresenter};
    use nearby_core::discovery::DiscoveryPhase;
    use nearby_core::Locale;
    use std::sync::atomic::Ordering;

    struct Harness {
        api: Arc<FakeApi>,
        presenter: Arc<RecordingPresenter>,
        flow: MarketDiscovery,
    }

    fn harness_with(api: FakeApi, device: FakeDevice, config: ClientConfig) -> Harness {
        let api = Arc::new(api);
        let presenter = Arc::new(RecordingPresenter::answering(true));
        let flow = MarketDiscovery::new(
            api.clone(),
            presenter.clone(),
            Arc::new(device),
            Arc::new(config),
        );
        Harness {
            api,
            presenter,
            flow,
        }
    }

    fn harness(api: FakeApi) -> Harness {
        harness_with(api, FakeDevice::granting(), ClientConfig::default())
    }

    fn food_and_shop() -> FakeApi {
        FakeApi::new()
            .with_categories(&[("c1", "Food"), ("c2", "Shop")])
            .with_markets("c1", &["m1", "m2"])
            .with_markets("c2", &["m3"])
    }

    #[tokio::test]
    async fn test_mount_selects_first_and_loads_its_markets() {
        let h = harness(food_and_shop());

        let categories = h.flow.mount().await.unwrap();
        assert_eq!(categories.len(), 2);

        let view = h.flow.snapshot().await;
        assert_eq!(view.selection.as_deref(), Some("c1"));
        assert_eq!(view.phase, DiscoveryPhase::MarketsLoaded);
        assert_eq!(view.markets.len(), 2);
        assert_eq!(view.markers[0].title, "Market m1");

        assert_eq!(
            h.api.requests(),
            vec!["/categories".to_string(), "/markets/category/c1".to_string()]
        );
        assert!(h.presenter.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_category_list_issues_no_market_request() {
        let h = harness(FakeApi::new());
        h.flow.load_categories().await.unwrap();

        let view = h.flow.snapshot().await;
        assert_eq!(view.selection, None);
        assert_eq!(view.phase, DiscoveryPhase::CategoriesLoaded);
        assert_eq!(h.api.requests(), vec!["/categories".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_category_id_is_noop() {
        let h = harness(food_and_shop());

        let markets = h.flow.load_markets("").await.unwrap();
        assert!(markets.is_empty());
        assert_eq!(h.flow.select_category("  ").await.unwrap(), SelectionChange::Unchanged);
        assert!(h.api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_select_same_category_does_not_refetch() {
        let h = harness(food_and_shop());
        h.flow.mount().await.unwrap();

        assert_eq!(h.flow.select_category("c1").await.unwrap(), SelectionChange::Unchanged);
        assert_eq!(h.api.count("/markets/category/c1"), 1);

        assert_eq!(
            h.flow.select_category("c2").await.unwrap(),
            SelectionChange::Changed("c2".into())
        );
        assert_eq!(h.api.count("/markets/category/c2"), 1);

        let view = h.flow.snapshot().await;
        assert_eq!(view.markets.len(), 1);
        assert_eq!(view.markets[0].id, "m3");
    }

    #[tokio::test]
    async fn test_latest_selection_wins_over_late_response() {
        let h = harness(
            food_and_shop()
                .with_categories(&[("c1", "Food"), ("c2", "Shop"), ("c3", "Fun")])
                .with_markets("c3", &["m4", "m5"]),
        );
        h.flow.mount().await.unwrap();

        let release_c2 = h.api.gate("/markets/category/c2");
        let slow = {
            let flow = h.flow.clone();
            tokio::spawn(async move { flow.select_category("c2").await })
        };
        while h.api.count("/markets/category/c2") == 0 {
            tokio::task::yield_now().await;
        }

        h.flow.select_category("c3").await.unwrap();
        release_c2.send(()).unwrap();
        slow.await.unwrap().unwrap();

        let view = h.flow.snapshot().await;
        assert_eq!(view.selection.as_deref(), Some("c3"));
        let ids: Vec<_> = view.markets.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m4", "m5"]);
    }

    #[tokio::test]
    async fn test_category_failure_alerts_and_keeps_state() {
        let api = food_and_shop();
        api.fail_categories.store(true, Ordering::SeqCst);
        let h = harness(api);

        let err = h.flow.load_categories().await.unwrap_err();
        assert!(matches!(err, FlowError::CategoryFetchFailed(_)));

        let alerts = h.presenter.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0], err.alert(Locale::PtBr));
        assert_eq!(h.flow.snapshot().await.phase, DiscoveryPhase::Idle);
    }

    #[tokio::test]
    async fn test_market_failure_keeps_previous_list() {
        let h = harness(food_and_shop());
        h.flow.mount().await.unwrap();

        h.api.fail_markets.store(true, Ordering::SeqCst);
        let err = h.flow.select_category("c2").await.unwrap_err();
        assert!(matches!(err, FlowError::MarketFetchFailed { .. }));

        let view = h.flow.snapshot().await;
        assert_eq!(view.markets.len(), 2);
        assert_eq!(view.phase, DiscoveryPhase::MarketsLoaded);
        assert_eq!(h.presenter.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_unmount_discards_in_flight_response() {
        let h = harness(food_and_shop());
        let release = h.api.gate("/markets/category/c1");

        let pending = {
            let flow = h.flow.clone();
            tokio::spawn(async move { flow.load_markets("c1").await })
        };
        while h.api.count("/markets/category/c1") == 0 {
            tokio::task::yield_now().await;
        }

        h.flow.unmount().await;
        release.send(()).unwrap();
        pending.await.unwrap().unwrap();

        assert!(h.flow.snapshot().await.markets.is_empty());
    }

    #[tokio::test]
    async fn test_open_market_navigates() {
        let h = harness(food_and_shop());

        let route = h.flow.open_market("m1").await.unwrap();
        assert_eq!(route.path(), "/market/m1");
        assert_eq!(h.presenter.routes(), vec![Route::Market("m1".into())]);

        assert!(h.flow.open_market("").await.is_err());
        assert_eq!(h.presenter.routes().len(), 1);
    }

    #[tokio::test]
    async fn test_location_denied_alerts() {
        let h = harness_with(food_and_shop(), FakeDevice::denying(), ClientConfig::default());

        let err = h.flow.locate_user().await.unwrap_err();
        assert_eq!(
            err,
            FlowError::PermissionDenied {
                capability: Capability::Location
            }
        );
        assert_eq!(h.presenter.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_user_locates_before_loading() {
        let mut config = ClientConfig::default();
        config.map.follow_user = true;
        let h = harness_with(food_and_shop(), FakeDevice::denying(), config);

        h.flow.mount().await.unwrap();
        assert_eq!(h.presenter.alerts().len(), 1);
        assert_eq!(h.flow.snapshot().await.markets.len(), 2);
    }

    #[tokio::test]
    async fn test_initial_region_from_config() {
        let h = harness(FakeApi::new());
        assert_eq!(h.flow.initial_region(), MapRegion::default());
    }
}
