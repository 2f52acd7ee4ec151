//! # Detail State
//!
//! View state behind `/market/{id}`: the market record, the camera surface
//! and the coupon-redemption sub-flow.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Detail State Machine                              │
//! │                                                                         │
//! │  ┌─────────┐ apply_detail(Some) ┌───────┐ open_camera ┌────────────┐   │
//! │  │ Loading │ ─────────────────► │ Ready │ ──────────► │ CameraOpen │   │
//! │  └────┬────┘                    └───────┘ ◄────────── └─────┬──────┘   │
//! │       │ apply_detail(None)          ▲      close_camera     │ on_scan  │
//! │       ▼                             │                       ▼          │
//! │  redirect /home (once)              │               ┌─────────────┐    │
//! │                                     │               │ ScanLocked  │    │
//! │                                     │               └──────┬──────┘    │
//! │                       declined      │   begin_confirmation │ (500ms)   │
//! │                    ┌────────────────┤                      ▼           │
//! │                    │                │              ┌────────────────┐  │
//! │                    │                │              │ ConfirmPending │  │
//! │                    │                │              └───────┬────────┘  │
//! │                    │  apply_coupon /│                      │ accepted  │
//! │                    │  fail_coupon   │              ┌───────▼────────┐  │
//! │                    └────────────────┴───────────── │   Redeeming    │  │
//! │                                                    │   (busy=true)  │  │
//! │                                                    └────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `busy` is true exactly while a redemption request is in flight.
//! - The coupon code goes from `None` to `Some` and never back.
//! - A "not found" or failed load redirects at most once per screen.
//! - The scan guard reopens every time the camera surface opens.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::guard::ScanGuard;
use crate::route::Route;
use crate::sequence::{RequestSequencer, Ticket};
use crate::types::{CouponCode, MarketDetail};

// =============================================================================
// Phase
// =============================================================================

/// Where the detail screen currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DetailPhase {
    /// First fetch still running; render a loading indicator.
    #[default]
    Loading,
    Ready,
    CameraOpen,
    /// A value was admitted; the confirmation prompt is scheduled.
    ScanLocked,
    ConfirmPending,
    Redeeming,
}

impl std::fmt::Display for DetailPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailPhase::Loading => write!(f, "loading"),
            DetailPhase::Ready => write!(f, "ready"),
            DetailPhase::CameraOpen => write!(f, "camera_open"),
            DetailPhase::ScanLocked => write!(f, "scan_locked"),
            DetailPhase::ConfirmPending => write!(f, "confirm_pending"),
            DetailPhase::Redeeming => write!(f, "redeeming"),
        }
    }
}

/// Outcome of writing a detail response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLoad {
    /// Record stored.
    Ready,
    /// The backend had no record; `redirect` is `Some` the first time only.
    NotFound { redirect: Option<Route> },
    /// Superseded or closed; ignored.
    Stale,
}

/// A scan admitted by the guard, tied to the camera session that saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedScan {
    pub payload: String,
    pub session: u64,
}

// =============================================================================
// Detail State
// =============================================================================

/// Detail screen state, owned by one screen instance.
#[derive(Debug, Clone)]
pub struct DetailState {
    market_id: String,
    phase: DetailPhase,
    detail: Option<MarketDetail>,
    coupon: Option<CouponCode>,
    busy: bool,
    camera_visible: bool,
    guard: ScanGuard,
    /// Bumped every time the camera surface opens.
    camera_session: u64,
    /// Scanned payload travelling ScanLocked → ConfirmPending → Redeeming.
    pending_scan: Option<String>,
    seq: RequestSequencer,
    redirected: bool,
}

impl DetailState {
    /// Creates the state for `/market/{market_id}`.
    pub fn new(market_id: impl Into<String>) -> Self {
        DetailState {
            market_id: market_id.into(),
            phase: DetailPhase::Loading,
            detail: None,
            coupon: None,
            busy: false,
            camera_visible: false,
            guard: ScanGuard::new(),
            camera_session: 0,
            pending_scan: None,
            seq: RequestSequencer::new(),
            redirected: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn market_id(&self) -> &str {
        &self.market_id
    }

    pub fn phase(&self) -> DetailPhase {
        self.phase
    }

    pub fn detail(&self) -> Option<&MarketDetail> {
        self.detail.as_ref()
    }

    pub fn coupon(&self) -> Option<&CouponCode> {
        self.coupon.as_ref()
    }

    /// True while a redemption is in flight; disables the cancel action.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_camera_visible(&self) -> bool {
        self.camera_visible
    }

    pub fn is_closed(&self) -> bool {
        self.seq.is_closed()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Records that a detail request went out. `None` once closed.
    ///
    /// A refresh after the first load keeps the current phase; only the
    /// initial load shows the loading indicator.
    pub fn begin_load(&mut self) -> Option<Ticket> {
        if self.seq.is_closed() {
            return None;
        }
        Some(self.seq.issue())
    }

    /// Writes a detail response.
    pub fn apply_detail(&mut self, ticket: Ticket, detail: Option<MarketDetail>) -> DetailLoad {
        if !self.seq.is_current(ticket) {
            return DetailLoad::Stale;
        }

        if self.phase == DetailPhase::Loading {
            self.phase = DetailPhase::Ready;
        }

        match detail {
            Some(detail) => {
                self.detail = Some(detail);
                DetailLoad::Ready
            }
            None => {
                self.detail = None;
                DetailLoad::NotFound {
                    redirect: self.redirect_once(),
                }
            }
        }
    }

    /// Records a failed detail request.
    ///
    /// Returns the route to leave for once the alert is acknowledged, or
    /// `None` if the response was stale or the user was already sent away.
    pub fn fail_detail(&mut self, ticket: Ticket) -> Option<Route> {
        if !self.seq.is_current(ticket) {
            return None;
        }
        self.redirect_once()
    }

    fn redirect_once(&mut self) -> Option<Route> {
        if self.redirected {
            return None;
        }
        self.redirected = true;
        Some(Route::Home)
    }

    // =========================================================================
    // Camera
    // =========================================================================

    /// Shows the camera surface and starts a fresh scan session.
    ///
    /// Only allowed from `Ready` (the button is not rendered otherwise).
    pub fn open_camera(&mut self) -> bool {
        if self.phase != DetailPhase::Ready || self.busy {
            return false;
        }

        self.guard.reopen();
        self.camera_session += 1;
        self.pending_scan = None;
        self.camera_visible = true;
        self.phase = DetailPhase::CameraOpen;
        true
    }

    /// Cancel: hides the camera surface.
    ///
    /// Refused while busy. A scan waiting for its confirmation prompt is
    /// dropped.
    pub fn close_camera(&mut self) -> bool {
        if self.busy || !self.camera_visible {
            return false;
        }

        self.camera_visible = false;
        self.pending_scan = None;
        if matches!(self.phase, DetailPhase::CameraOpen | DetailPhase::ScanLocked) {
            self.phase = DetailPhase::Ready;
        }
        true
    }

    /// Offers a decoded value from the camera stream.
    ///
    /// Admits the first value of the session; every later value (and
    /// anything outside `CameraOpen`) is discarded.
    pub fn on_scan(&mut self, value: &str) -> Option<AdmittedScan> {
        if self.phase != DetailPhase::CameraOpen {
            return None;
        }

        let payload = self.guard.accept(value)?;
        self.pending_scan = Some(payload.clone());
        self.phase = DetailPhase::ScanLocked;
        Some(AdmittedScan {
            payload,
            session: self.camera_session,
        })
    }

    // =========================================================================
    // Redemption
    // =========================================================================

    /// Delay elapsed: hide the camera and prompt.
    ///
    /// Returns the scanned payload, or `None` if the scan was cancelled in
    /// the meantime or `session` is not the current camera session.
    pub fn begin_confirmation(&mut self, session: u64) -> Option<String> {
        if self.phase != DetailPhase::ScanLocked
            || self.seq.is_closed()
            || session != self.camera_session
        {
            return None;
        }

        let payload = self.pending_scan.clone()?;
        self.camera_visible = false;
        self.phase = DetailPhase::ConfirmPending;
        Some(payload)
    }

    /// The user declined the one-time-use prompt.
    pub fn decline_confirmation(&mut self) {
        if self.phase == DetailPhase::ConfirmPending {
            self.pending_scan = None;
            self.phase = DetailPhase::Ready;
        }
    }

    /// Marks a confirmed redemption as in flight.
    ///
    /// Allowed from `ConfirmPending` (scan path) or `Ready` (confirmed
    /// directly); refused while another redemption runs.
    pub fn begin_redeem(&mut self) -> bool {
        if self.busy
            || self.seq.is_closed()
            || !matches!(self.phase, DetailPhase::ConfirmPending | DetailPhase::Ready)
        {
            return false;
        }

        self.busy = true;
        self.phase = DetailPhase::Redeeming;
        true
    }

    /// Stores the redeemed code. Returns true when the detail should be
    /// refreshed (the remaining count changed).
    pub fn apply_coupon(&mut self, code: CouponCode) -> bool {
        self.busy = false;
        self.pending_scan = None;
        if self.phase == DetailPhase::Redeeming {
            self.phase = DetailPhase::Ready;
        }

        if self.seq.is_closed() {
            return false;
        }

        self.coupon = Some(code);
        true
    }

    /// Records a failed redemption. No code is stored.
    pub fn fail_coupon(&mut self) {
        self.busy = false;
        self.pending_scan = None;
        if self.phase == DetailPhase::Redeeming {
            self.phase = DetailPhase::Ready;
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Screen unmounted: late responses are discarded.
    pub fn close(&mut self) {
        self.seq.close();
        self.camera_visible = false;
    }

    /// Serializable snapshot for the presentation layer.
    pub fn view(&self) -> DetailView {
        DetailView {
            market_id: self.market_id.clone(),
            phase: self.phase,
            detail: self.detail.clone(),
            coupon: self.coupon.clone(),
            busy: self.busy,
            camera_visible: self.camera_visible,
        }
    }
}

/// What the detail screen renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DetailView {
    pub market_id: String,
    pub phase: DetailPhase,
    pub detail: Option<MarketDetail>,
    pub coupon: Option<CouponCode>,
    pub busy: bool,
    pub camera_visible: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
