//! # Market Detail Flow
//!
//! Drives `/market/{id}`: the market record, the camera surface and coupon
//! redemption.
//!
//! ## Redemption Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coupon Redemption                                │
//! │                                                                         │
//! │  open_camera() ── camera permission? ── no ──► alert "Câmera"           │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  on_barcode_scanned(v)  v, v, v ... only the first is admitted          │
//! │       │                                                                 │
//! │       ▼  (500 ms)                                                       │
//! │  hide camera ── prompt "Cupom / Deseja realmente resgatar?"             │
//! │       │ Sim                        │ Não                                │
//! │       ▼                            └──► back to Ready                   │
//! │  redeem_coupon(v)  busy = true, cancel disabled                         │
//! │       │                                                                 │
//! │       ├── ok ──► store code ── GET /markets/{id} ── alert code          │
//! │       └── err ─► alert, busy = false, no code                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use nearby_core::detail::{DetailLoad, DetailState, DetailView};
use nearby_core::validation::{validate_market_id, validate_scan_payload};
use nearby_core::{
    Capability, Confirmation, CoreResult, CouponCode, FlowError, MarketDetail, Notice,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::MarketApi;
use crate::config::ClientConfig;
use crate::ui::{DeviceCapabilities, Presenter};

/// What a scheduled scan ended in. `None`: cancelled or declined.
pub type ScanOutcome = Option<CoreResult<CouponCode>>;

/// Detail screen controller. Cloning yields another handle to the same screen.
#[derive(Clone)]
pub struct MarketDetailFlow {
    api: Arc<dyn MarketApi>,
    presenter: Arc<dyn Presenter>,
    device: Arc<dyn DeviceCapabilities>,
    config: Arc<ClientConfig>,
    state: Arc<Mutex<DetailState>>,
}

impl MarketDetailFlow {
    /// Creates the flow for one market. Rejects an unusable id up front.
    pub fn new(
        market_id: &str,
        api: Arc<dyn MarketApi>,
        presenter: Arc<dyn Presenter>,
        device: Arc<dyn DeviceCapabilities>,
        config: Arc<ClientConfig>,
    ) -> CoreResult<Self> {
        validate_market_id(market_id)?;

        Ok(MarketDetailFlow {
            api,
            presenter,
            device,
            config,
            state: Arc::new(Mutex::new(DetailState::new(market_id.trim()))),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Screen mounted: first detail fetch.
    pub async fn mount(&self) -> CoreResult<Option<MarketDetail>> {
        self.load_detail().await
    }

    /// Screen unmounted. Late responses are dropped on arrival and a
    /// pending confirmation prompt is never shown.
    pub async fn unmount(&self) {
        self.state.lock().await.close();
        debug!("Detail flow closed");
    }

    /// Current view for rendering.
    pub async fn snapshot(&self) -> DetailView {
        self.state.lock().await.view()
    }

    // =========================================================================
    // Detail
    // =========================================================================

    /// Fetches the market record.
    ///
    /// No record (404 or `null`) sends the user to `/home` once. A failure
    /// alerts and, once acknowledged, also sends the user home. Nothing is
    /// retried.
    pub async fn load_detail(&self) -> CoreResult<Option<MarketDetail>> {
        let (ticket, market_id) = {
            let mut state = self.state.lock().await;
            match state.begin_load() {
                Some(ticket) => (ticket, state.market_id().to_string()),
                None => return Ok(state.detail().cloned()),
            }
        };
        debug!(market_id = %market_id, %ticket, "Loading market detail");

        match self.api.get_market(&market_id).await {
            Ok(detail) => {
                let outcome = self.state.lock().await.apply_detail(ticket, detail.clone());
                match outcome {
                    DetailLoad::Ready => {
                        let coupons = detail.as_ref().map(|d| d.coupons).unwrap_or_default();
                        info!(market_id = %market_id, coupons, "Market detail loaded");
                    }
                    DetailLoad::NotFound { redirect } => {
                        warn!(market_id = %market_id, "Market not found");
                        if let Some(route) = redirect {
                            self.presenter.navigate(&route);
                        }
                    }
                    DetailLoad::Stale => {
                        debug!(market_id = %market_id, %ticket, "Discarding stale detail response")
                    }
                }
                Ok(detail)
            }
            Err(e) => {
                let redirect = self.state.lock().await.fail_detail(ticket);
                warn!(market_id = %market_id, error = %e, "Failed to load market detail");
                let err = FlowError::MarketDetailFetchFailed {
                    market_id,
                    reason: e.to_string(),
                };
                if let Some(route) = redirect {
                    self.presenter.alert(&err.alert(self.config.locale())).await;
                    self.presenter.navigate(&route);
                }
                Err(err)
            }
        }
    }

    // =========================================================================
    // Camera
    // =========================================================================

    /// Requests camera permission and shows the camera surface.
    ///
    /// Returns false when the surface could not open in the current state
    /// (still loading, already open, redemption in flight).
    pub async fn open_camera(&self) -> CoreResult<bool> {
        let capability = Capability::Camera;

        let err = match self.device.request_permission(capability).await {
            Ok(status) if status.is_granted() => None,
            Ok(_) => Some(FlowError::PermissionDenied { capability }),
            Err(e) => Some(FlowError::CapabilityUnavailable {
                capability,
                reason: e.to_string(),
            }),
        };

        if let Some(err) = err {
            warn!(error = %err, "Camera unavailable");
            self.report(&err).await;
            return Err(err);
        }

        let opened = self.state.lock().await.open_camera();
        if opened {
            debug!("Camera opened");
        }
        Ok(opened)
    }

    /// Cancel: hides the camera surface. Refused while redeeming.
    pub async fn close_camera(&self) -> bool {
        let closed = self.state.lock().await.close_camera();
        if closed {
            debug!("Camera closed");
        }
        closed
    }

    /// Decoded value from the camera stream.
    ///
    /// The first value of a camera session schedules the confirmation
    /// prompt after the configured delay and returns the task running it.
    /// Every later value is discarded.
    pub async fn on_barcode_scanned(&self, value: &str) -> Option<JoinHandle<ScanOutcome>> {
        let payload = match validate_scan_payload(value) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "Ignoring unusable scan");
                return None;
            }
        };

        let admitted = self.state.lock().await.on_scan(&payload)?;
        info!(payload = %admitted.payload, session = admitted.session, "Scan admitted");

        let flow = self.clone();
        let delay = self.config.ui.scan_confirm_delay();
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flow.confirm_scanned(admitted.session).await
        }))
    }

    async fn confirm_scanned(&self, session: u64) -> ScanOutcome {
        let Some(payload) = self.state.lock().await.begin_confirmation(session) else {
            debug!(session, "Scan cancelled before confirmation");
            return None;
        };

        let prompt = Confirmation::redeem_coupon(self.config.locale());
        if !self.presenter.confirm(&prompt).await {
            debug!("Redemption declined");
            self.state.lock().await.decline_confirmation();
            return None;
        }

        let outcome = self.redeem_coupon(&payload).await;
        if let Err(e) = &outcome {
            debug!(error = %e, "Scanned redemption did not complete");
        }
        Some(outcome)
    }

    // =========================================================================
    // Redemption
    // =========================================================================

    /// Redeems a coupon against `market_id`. Call only after the user
    /// confirmed.
    ///
    /// On success the code is stored, the detail is refreshed (the remaining
    /// count changed) and the code is alerted.
    pub async fn redeem_coupon(&self, market_id: &str) -> CoreResult<CouponCode> {
        if let Err(e) = validate_market_id(market_id) {
            self.state.lock().await.decline_confirmation();
            let err = FlowError::from(e);
            self.report(&err).await;
            return Err(err);
        }
        let market_id = market_id.trim();

        if !self.state.lock().await.begin_redeem() {
            debug!(market_id, "Redemption refused in current state");
            return Err(FlowError::CouponRedemptionFailed {
                market_id: market_id.to_string(),
                reason: "another redemption is in progress".to_string(),
            });
        }
        info!(market_id, "Redeeming coupon");

        match self.api.redeem_coupon(market_id).await {
            Ok(code) => {
                let refresh = self.state.lock().await.apply_coupon(code.clone());
                if refresh {
                    info!(market_id, code = %code, "Coupon redeemed");
                    if let Err(e) = self.load_detail().await {
                        debug!(error = %e, "Refresh after redemption failed");
                    }
                    let notice = Notice::CouponRedeemed(code.code.clone());
                    self.presenter
                        .alert(&notice.render(self.config.locale()))
                        .await;
                }
                Ok(code)
            }
            Err(e) => {
                self.state.lock().await.fail_coupon();
                warn!(market_id, error = %e, "Coupon redemption failed");
                let err = FlowError::CouponRedemptionFailed {
                    market_id: market_id.to_string(),
                    reason: e.to_string(),
                };
                self.report(&err).await;
                Err(err)
            }
        }
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
