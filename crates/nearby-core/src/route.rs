//! # Routes
//!
//! Logical navigation targets. `/home` doubles as the "not found" fallback.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::validate_market_id;

/// A screen the user can be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    /// Discovery screen (map + list).
    Home,
    /// Detail screen for one market.
    Market(String),
}

impl Route {
    /// Returns the route path, e.g. `/market/m1`.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Market(id) => format!("/market/{}", id),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl std::str::FromStr for Route {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "/home" {
            return Ok(Route::Home);
        }

        match trimmed.strip_prefix("/market/") {
            Some(id) => {
                validate_market_id(id)?;
                Ok(Route::Market(id.to_string()))
            }
            None => Err(ValidationError::InvalidFormat {
                field: "route".to_string(),
                reason: format!("unknown route '{}'", s),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/home");
        assert_eq!(Route::Market("m1".into()).to_string(), "/market/m1");
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!("/home".parse::<Route>().unwrap(), Route::Home);
        assert_eq!("/".parse::<Route>().unwrap(), Route::Home);
        assert_eq!(
            "/market/m1/".parse::<Route>().unwrap(),
            Route::Market("m1".into())
        );
        assert!("/market/".parse::<Route>().is_err());
        assert!("/settings".parse::<Route>().is_err());
    }
}
