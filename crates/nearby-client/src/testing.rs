//! In-memory collaborators for flow tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use nearby_core::{
    Alert, Capability, Category, Confirmation, Coordinates, CouponCode, MarketDetail,
    MarketSummary, Route,
};
use tokio::sync::oneshot;

use crate::api::MarketApi;
use crate::error::{ClientError, ClientResult};
use crate::ui::{CapabilityError, DeviceCapabilities, PermissionStatus, Presenter};

// =============================================================================
// Fake API
// =============================================================================

/// Backend with canned data, a request log and per-path gates.
#[derive(Default)]
pub struct FakeApi {
    pub categories: Mutex<Vec<Category>>,
    pub markets: Mutex<HashMap<String, Vec<MarketSummary>>>,
    pub detail: Mutex<Option<MarketDetail>>,
    pub codes: Mutex<VecDeque<String>>,

    pub fail_categories: AtomicBool,
    pub fail_markets: AtomicBool,
    pub fail_detail: AtomicBool,
    pub fail_coupon: AtomicBool,

    /// Paths in the order they were requested.
    pub requests: Mutex<Vec<String>>,
    /// A request for a gated path waits until its sender fires.
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    pub redeemed: AtomicU32,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(self, list: &[(&str, &str)]) -> Self {
        *self.categories.lock().unwrap() = list
            .iter()
            .map(|(id, name)| category(id, name))
            .collect();
        self
    }

    pub fn with_markets(self, category_id: &str, ids: &[&str]) -> Self {
        self.markets.lock().unwrap().insert(
            category_id.to_string(),
            ids.iter().map(|id| market(id)).collect(),
        );
        self
    }

    pub fn with_detail(self, detail: MarketDetail) -> Self {
        *self.detail.lock().unwrap() = Some(detail);
        self
    }

    pub fn with_code(self, code: &str) -> Self {
        self.codes.lock().unwrap().push_back(code.to_string());
        self
    }

    /// Holds the next request for `path` until the returned sender fires.
    pub fn gate(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(path.to_string(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| p.as_str() == path).count()
    }

    async fn hit(&self, path: String) {
        self.requests.lock().unwrap().push(path.clone());
        let gate = self.gates.lock().unwrap().remove(&path);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn refused(path: &str) -> ClientError {
        ClientError::Status {
            method: "GET",
            path: path.to_string(),
            status: 500,
        }
    }
}

#[async_trait]
impl MarketApi for FakeApi {
    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.hit("/categories".to_string()).await;
        if self.fail_categories.load(Ordering::SeqCst) {
            return Err(Self::refused("/categories"));
        }
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn list_markets(&self, category_id: &str) -> ClientResult<Vec<MarketSummary>> {
        let path = format!("/markets/category/{}", category_id);
        self.hit(path.clone()).await;
        if self.fail_markets.load(Ordering::SeqCst) {
            return Err(Self::refused(&path));
        }
        Ok(self
            .markets
            .lock()
            .unwrap()
            .get(category_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_market(&self, market_id: &str) -> ClientResult<Option<MarketDetail>> {
        let path = format!("/markets/{}", market_id);
        self.hit(path.clone()).await;
        if self.fail_detail.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout(700));
        }
        Ok(self.detail.lock().unwrap().clone())
    }

    async fn redeem_coupon(&self, market_id: &str) -> ClientResult<CouponCode> {
        let path = format!("/coupons/{}", market_id);
        self.hit(path.clone()).await;
        if self.fail_coupon.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                method: "PATCH",
                path,
                status: 400,
            });
        }

        self.redeemed.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = self.detail.lock().unwrap().as_mut() {
            detail.coupons = detail.coupons.saturating_sub(1);
        }

        let code = self
            .codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "ABC123".to_string());
        Ok(CouponCode {
            code,
            redeemed_at: Utc::now(),
        })
    }
}

// =============================================================================
// Recording Presenter
// =============================================================================

/// Presenter that records everything and answers prompts with `answer`.
pub struct RecordingPresenter {
    pub alerts: Mutex<Vec<Alert>>,
    pub prompts: Mutex<Vec<Confirmation>>,
    pub routes: Mutex<Vec<Route>>,
    pub answer: AtomicBool,
}

impl RecordingPresenter {
    pub fn answering(answer: bool) -> Self {
        RecordingPresenter {
            alerts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            routes: Mutex::new(Vec::new()),
            answer: AtomicBool::new(answer),
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn alert(&self, alert: &Alert) {
        self.alerts.lock().unwrap().push(alert.clone());
    }

    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        self.prompts.lock().unwrap().push(confirmation.clone());
        self.answer.load(Ordering::SeqCst)
    }

    fn navigate(&self, route: &Route) {
        self.routes.lock().unwrap().push(route.clone());
    }
}

// =============================================================================
// Fake Device
// =============================================================================

/// Device whose permission answers are fixed up front.
pub struct FakeDevice {
    pub camera: Result<PermissionStatus, CapabilityError>,
    pub location: Result<PermissionStatus, CapabilityError>,
    pub position: Coordinates,
}

impl FakeDevice {
    pub fn granting() -> Self {
        FakeDevice {
            camera: Ok(PermissionStatus::Granted),
            location: Ok(PermissionStatus::Granted),
            position: Coordinates::new(-23.55, -46.63),
        }
    }

    pub fn denying() -> Self {
        FakeDevice {
            camera: Ok(PermissionStatus::Denied),
            location: Ok(PermissionStatus::Denied),
            position: Coordinates::new(0.0, 0.0),
        }
    }
}

#[async_trait]
impl DeviceCapabilities for FakeDevice {
    async fn request_permission(
        &self,
        capability: Capability,
    ) -> Result<PermissionStatus, CapabilityError> {
        match capability {
            Capability::Camera => self.camera.clone(),
            Capability::Location => self.location.clone(),
        }
    }

    async fn current_position(&self) -> Result<Coordinates, CapabilityError> {
        Ok(self.position)
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon_id: String::new(),
    }
}

pub fn market(id: &str) -> MarketSummary {
    MarketSummary {
        id: id.to_string(),
        name: format!("Market {}", id),
        address: "Rua Augusta, 100".to_string(),
        latitude: -23.56,
        longitude: -46.65,
        description: None,
        coupons: None,
        cover: None,
    }
}

pub fn detail(id: &str, coupons: u32) -> MarketDetail {
    MarketDetail {
        id: id.to_string(),
        name: "Padaria Real".to_string(),
        description: "Pães e doces".to_string(),
        cover: String::new(),
        coupons,
        address: Some("Rua Augusta, 100".to_string()),
        phone: None,
        opening_hours: None,
        week_days: Vec::new(),
        rules: Vec::new(),
        extra: serde_json::Map::new(),
    }
}
