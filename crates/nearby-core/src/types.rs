//! # Domain Types
//!
//! Wire and view types shared by every Nearby screen.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │  MarketSummary  │   │  MarketDetail   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name, address  │   │  description    │       │
//! │  │  icon_id        │   │  lat / lon      │   │  cover, coupons │       │
//! │  └─────────────────┘   └────────┬────────┘   │  rules, hours   │       │
//! │                                 │            └─────────────────┘       │
//! │                                 ▼                                       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Coordinates   │◄──│    MapMarker    │   │   CouponCode    │       │
//! │  │  lat / lon      │   │  (map pin +     │   │  code           │       │
//! │  └─────────────────┘   │   callout text) │   │  redeemed_at    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The backend speaks camelCase JSON (`iconId`, `openingHours`). Every wire
//! type carries `#[serde(rename_all = "camelCase")]` so field names stay
//! idiomatic on the Rust side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DEFAULT_MAP_CENTER, DEFAULT_MAP_DELTA};

// =============================================================================
// Coordinates
// =============================================================================

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }
}

/// The region a map surface opens on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MapRegion {
    pub center: Coordinates,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for MapRegion {
    fn default() -> Self {
        MapRegion {
            center: DEFAULT_MAP_CENTER,
            latitude_delta: DEFAULT_MAP_DELTA,
            longitude_delta: DEFAULT_MAP_DELTA,
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A tag used to filter the market list.
///
/// Server order is display order; ids are assumed unique but not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,

    pub name: String,

    /// Key into the presentation layer's icon table.
    #[serde(default)]
    pub icon_id: String,
}

// =============================================================================
// Market Summary
// =============================================================================

/// One business as listed under the selected category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MarketSummary {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub address: String,

    pub latitude: f64,

    pub longitude: f64,

    /// Short blurb shown in the list row.
    #[serde(default)]
    pub description: Option<String>,

    /// Remaining coupons, when the backend includes it in listings.
    #[serde(default)]
    pub coupons: Option<u32>,

    /// Thumbnail URL for the list row.
    #[serde(default)]
    pub cover: Option<String>,
}

impl MarketSummary {
    /// Returns the market's position.
    #[inline]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Builds the map pin for this market.
    ///
    /// The callout shows the name as title and the address as subtitle;
    /// tapping it opens `/market/{id}`.
    pub fn marker(&self) -> MapMarker {
        MapMarker {
            id: self.id.clone(),
            title: self.name.clone(),
            subtitle: self.address.clone(),
            coordinates: self.coordinates(),
        }
    }
}

/// A map pin with its callout content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub coordinates: Coordinates,
}

// =============================================================================
// Market Detail
// =============================================================================

/// A house rule displayed on the detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MarketRule {
    pub id: String,
    pub description: String,
}

/// Full record for the detail screen.
///
/// ## Shape Ownership
/// The backend owns this schema. Fields the client does not model are kept
/// in `extra` so nothing is lost when the record is re-serialized for the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MarketDetail {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Cover image URL.
    #[serde(default)]
    pub cover: String,

    /// Coupons still available at this market.
    #[serde(default)]
    pub coupons: u32,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub opening_hours: Option<String>,

    #[serde(default)]
    pub week_days: Vec<String>,

    #[serde(default)]
    pub rules: Vec<MarketRule>,

    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MarketDetail {
    /// Returns true while the market still has coupons to hand out.
    #[inline]
    pub fn has_coupons(&self) -> bool {
        self.coupons > 0
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// Body of a successful `PATCH /coupons/{marketId}`.
///
/// The backend names the field `coupons` even though it holds one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedeemResponse {
    pub coupons: String,
}

impl RedeemResponse {
    /// Stamps the code with the moment it was received.
    pub fn into_code(self, redeemed_at: DateTime<Utc>) -> CouponCode {
        CouponCode {
            code: self.coupons,
            redeemed_at,
        }
    }
}

/// An opaque redemption code shown to the user after a successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CouponCode {
    pub code: String,

    #[ts(as = "String")]
    pub redeemed_at: DateTime<Utc>,
}

impl CouponCode {
    /// Returns the code text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for CouponCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

// =============================================================================
// Device Capabilities
// =============================================================================

/// A device capability that needs user permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Capability {
    Camera,
    Location,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
            Capability::Location => write!(f, "location"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_category_from_camel_case() {
        let category: Category =
            serde_json::from_value(json!({ "id": "c1", "name": "Food", "iconId": "1" })).unwrap();
        assert_eq!(category.icon_id, "1");

        // Icon is optional on the wire
        let category: Category =
            serde_json::from_value(json!({ "id": "c2", "name": "Shop" })).unwrap();
        assert!(category.icon_id.is_empty());
    }

    #[test]
    fn test_market_summary_marker() {
        let market: MarketSummary = serde_json::from_value(json!({
            "id": "m1",
            "name": "Padaria",
            "address": "Rua A, 10",
            "latitude": -23.5,
            "longitude": -46.6,
        }))
        .unwrap();

        assert_eq!(market.description, None);
        let marker = market.marker();
        assert_eq!(marker.id, "m1");
        assert_eq!(marker.title, "Padaria");
        assert_eq!(marker.subtitle, "Rua A, 10");
        assert_eq!(marker.coordinates, Coordinates::new(-23.5, -46.6));
    }

    #[test]
    fn test_market_detail_keeps_unknown_fields() {
        let detail: MarketDetail = serde_json::from_value(json!({
            "id": "m1",
            "name": "Padaria",
            "description": "Pães",
            "cover": "https://img/1.png",
            "coupons": 3,
            "openingHours": "08:00-18:00",
            "weekDays": ["mon", "tue"],
            "rules": [{ "id": "r1", "description": "Um por cliente" }],
            "categoryId": "c1"
        }))
        .unwrap();

        assert_eq!(detail.coupons, 3);
        assert!(detail.has_coupons());
        assert_eq!(detail.opening_hours.as_deref(), Some("08:00-18:00"));
        assert_eq!(detail.week_days.len(), 2);
        assert_eq!(detail.rules[0].id, "r1");
        assert_eq!(detail.extra.get("categoryId"), Some(&json!("c1")));

        let back = serde_json::to_value(&detail).unwrap();
        assert_eq!(back["categoryId"], json!("c1"));
    }

    #[test]
    fn test_redeem_response_into_code() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let response: RedeemResponse =
            serde_json::from_value(json!({ "coupons": "ABC123" })).unwrap();
        let code = response.into_code(at);

        assert_eq!(code.as_str(), "ABC123");
        assert_eq!(code.to_string(), "ABC123");
        assert_eq!(code.redeemed_at, at);
    }

    #[test]
    fn test_default_map_region() {
        let region = MapRegion::default();
        assert_eq!(region.center, DEFAULT_MAP_CENTER);
        assert_eq!(region.latitude_delta, 0.01);
    }
}
