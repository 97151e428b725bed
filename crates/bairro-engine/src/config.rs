//! Configuration for the proposal engine.

use std::path::Path;

use bairro_model::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::navigation::View;

/// Configuration for a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Proposal list settings
    #[serde(default)]
    pub listing: ListingConfig,
    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Navigation settings
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Map defaults handed to the presentation layer
    #[serde(default)]
    pub map: MapConfig,
}

impl EngineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| EngineError::ConfigError(e.to_string()))
    }

    /// Load config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.listing.page_size == 0 {
            return Err(EngineError::ConfigError(
                "listing.page_size must be at least 1".to_string(),
            ));
        }
        if !self.listing.nearby_radius_km.is_finite() || self.listing.nearby_radius_km < 0.0 {
            return Err(EngineError::ConfigError(
                "listing.nearby_radius_km must be a non-negative number".to_string(),
            ));
        }
        if !self.map.center.is_valid() {
            return Err(EngineError::ConfigError(
                "map.center is out of range".to_string(),
            ));
        }
        if self.navigation.landing_view == View::Details {
            return Err(EngineError::ConfigError(
                "navigation.landing_view cannot be details".to_string(),
            ));
        }
        Ok(())
    }
}

/// Proposal list configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Proposals per page
    pub page_size: usize,
    /// Default radius for proximity search (km)
    pub nearby_radius_km: f64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            nearby_radius_km: 1.0,
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many recent proposals the dashboard lists
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { recent_limit: 5 }
    }
}

/// Navigation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Where a member lands after signing in
    pub landing_view: View,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            landing_view: View::Home,
        }
    }
}

/// Map defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial map center (São Paulo, Sé)
    pub center: Coordinate,
    /// Initial zoom level
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: Coordinate::new(-23.550520, -46.633308),
            zoom: 13,
        }
    }
}
