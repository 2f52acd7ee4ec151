//! # Alert Catalog
//!
//! Every user-facing message the flows can raise, per locale.
//!
//! ## Presentation Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Alert Presentation                               │
//! │                                                                         │
//! │  Flow raises Notice ──► Notice::render(locale) ──► Alert               │
//! │                                                  { title, message }    │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                      Presenter shows a blocking alert   │
//! │                                                                         │
//! │  The redemption prompt is a Confirmation: same shape plus the two      │
//! │  button labels. Declining is the "cancel" style action.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Brazilian Portuguese is the default locale; English is provided for the
//! terminal client and tests.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Locale
// =============================================================================

/// Language used for alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Locale {
    /// Brazilian Portuguese.
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,

    /// English.
    #[serde(rename = "en")]
    En,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::PtBr => write!(f, "pt-BR"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(ValidationError::InvalidFormat {
                field: "locale".to_string(),
                reason: format!("unknown locale '{}', expected pt-BR or en", other),
            }),
        }
    }
}

// =============================================================================
// Alert / Confirmation
// =============================================================================

/// A blocking alert with a short title and a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Alert {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// A two-button prompt. `cancel_label` is the cancel-styled action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Confirmation {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl Confirmation {
    /// The one-time-use warning shown before a coupon is redeemed.
    pub fn redeem_coupon(locale: Locale) -> Self {
        match locale {
            Locale::PtBr => Confirmation {
                title: "Cupom".to_string(),
                message: "Não é possível reutilizar um cupom resgatado. \
                          Deseja realmente resgatar o cupom?"
                    .to_string(),
                confirm_label: "Sim".to_string(),
                cancel_label: "Não".to_string(),
            },
            Locale::En => Confirmation {
                title: "Coupon".to_string(),
                message: "A redeemed coupon cannot be used again. \
                          Do you really want to redeem it?"
                    .to_string(),
                confirm_label: "Yes".to_string(),
                cancel_label: "No".to_string(),
            },
        }
    }
}

// =============================================================================
// Notice
// =============================================================================

/// Something the user must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CategoriesFailed,
    MarketsFailed,
    DetailFailed,
    CouponFailed,
    /// A redemption succeeded; carries the code to display.
    CouponRedeemed(String),
    CameraDenied,
    CameraFailed,
    LocationDenied,
    LocationFailed,
    InvalidInput,
}

impl Notice {
    /// Renders the notice in the given locale.
    pub fn render(&self, locale: Locale) -> Alert {
        match locale {
            Locale::PtBr => self.render_pt_br(),
            Locale::En => self.render_en(),
        }
    }

    fn render_pt_br(&self) -> Alert {
        match self {
            Notice::CategoriesFailed => {
                Alert::new("Categorias", "Não foi possível carregar as categorias.")
            }
            Notice::MarketsFailed => Alert::new("Locais", "Não foi possível carregar os locais."),
            Notice::DetailFailed => Alert::new("Erro", "Não foi possível carregar os dados"),
            Notice::CouponFailed => Alert::new("Erro", "Não foi possível utilizar o cupom"),
            Notice::CouponRedeemed(code) => Alert::new("Cupom", code.clone()),
            Notice::CameraDenied => Alert::new("Câmera", "Você precisa habilitar o uso da câmera"),
            Notice::CameraFailed => Alert::new("Câmera", "Não foi possível utilizar a câmera"),
            Notice::LocationDenied => Alert::new(
                "Localização",
                "Você precisa habilitar o uso da localização",
            ),
            Notice::LocationFailed => {
                Alert::new("Localização", "Não foi possível obter a localização")
            }
            Notice::InvalidInput => Alert::new("Erro", "Dados inválidos"),
        }
    }

    fn render_en(&self) -> Alert {
        match self {
            Notice::CategoriesFailed => Alert::new("Categories", "Could not load the categories."),
            Notice::MarketsFailed => Alert::new("Places", "Could not load the places."),
            Notice::DetailFailed => Alert::new("Error", "Could not load the data"),
            Notice::CouponFailed => Alert::new("Error", "Could not use the coupon"),
            Notice::CouponRedeemed(code) => Alert::new("Coupon", code.clone()),
            Notice::CameraDenied => Alert::new("Camera", "You need to allow camera access"),
            Notice::CameraFailed => Alert::new("Camera", "Could not use the camera"),
            Notice::LocationDenied => Alert::new("Location", "You need to allow location access"),
            Notice::LocationFailed => Alert::new("Location", "Could not get your location"),
            Notice::InvalidInput => Alert::new("Error", "Invalid input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("pt_br".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_locale_serde_names() {
        assert_eq!(serde_json::to_string(&Locale::PtBr).unwrap(), "\"pt-BR\"");
        assert_eq!(serde_json::from_str::<Locale>("\"en\"").unwrap(), Locale::En);
    }

    #[test]
    fn test_coupon_redeemed_shows_code() {
        let alert = Notice::CouponRedeemed("ABC123".to_string()).render(Locale::PtBr);
        assert_eq!(alert.title, "Cupom");
        assert_eq!(alert.message, "ABC123");
    }

    #[test]
    fn test_redeem_confirmation_labels() {
        let prompt = Confirmation::redeem_coupon(Locale::PtBr);
        assert_eq!(prompt.confirm_label, "Sim");
        assert_eq!(prompt.cancel_label, "Não");

        let prompt = Confirmation::redeem_coupon(Locale::En);
        assert!(prompt.message.contains("cannot be used again"));
    }
}
