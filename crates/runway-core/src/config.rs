//! Analytics configuration
//!
//! Tunables for the analytics engine: rolling window, trend band, anomaly
//! threshold, dashboard window, transfer filtering and report sizes.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/runway/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analytics::anomalies::DEFAULT_THRESHOLD_PERCENT;
use crate::analytics::dashboard::DEFAULT_WINDOW_MONTHS;
use crate::analytics::rolling::{WindowAnchor, DEFAULT_STABLE_BAND_PERCENT, DEFAULT_WINDOW_SIZE};
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Default number of rows in the top-categories report
pub const DEFAULT_TOP_CATEGORIES: usize = 10;

/// Rolling metrics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingConfig {
    pub window_size: usize,
    pub stable_band_percent: f64,
    pub anchor: WindowAnchor,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            stable_band_percent: DEFAULT_STABLE_BAND_PERCENT,
            anchor: WindowAnchor::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    pub threshold_percent: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Averaging window for long histories
    pub window_months: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_months: DEFAULT_WINDOW_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Drop transfers between own accounts before analysis
    pub hide_transfers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_categories: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_categories: DEFAULT_TOP_CATEGORIES,
        }
    }
}

/// Complete analytics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub rolling: RollingConfig,
    pub anomalies: AnomalyConfig,
    pub dashboard: DashboardConfig,
    pub filters: FilterConfig,
    pub reports: ReportConfig,
}

impl AnalyticsConfig {
    /// Load from `path`, or from the default override location, or the
    /// embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_config(path)
    }

    /// Reject values the analytics cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.rolling.window_size == 0 {
            return Err(Error::Config(
                "rolling.window_size must be at least 1".to_string(),
            ));
        }
        check_percent("rolling.stable_band_percent", self.rolling.stable_band_percent)?;
        check_percent("anomalies.threshold_percent", self.anomalies.threshold_percent)?;
        if self.dashboard.window_months == 0 {
            return Err(Error::Config(
                "dashboard.window_months must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_percent(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!(
            "{} must be a non-negative number, got {}",
            key, value
        )));
    }
    Ok(())
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("runway").join("config").join("analytics.toml"))
}

/// Load configuration (explicit path, then override location, then default)
///
/// An explicit path must exist and parse. A broken file at the default
/// override location is skipped with a warning.
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    if let Some(path) = path {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded analytics config");
        return parse_config(&content);
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let parsed = fs::read_to_string(&default_path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))
                .and_then(|content| parse_config(&content));

            match parsed {
                Ok(config) => {
                    debug!(path = %default_path.display(), "Loaded analytics config override");
                    return Ok(config);
                }
                Err(e) => {
                    warn!(path = %default_path.display(), "Skipping config override: {}", e);
                }
            }
        }
    }

    parse_config(DEFAULT_CONFIG)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    rolling: Option<RawRolling>,
    anomalies: Option<RawAnomalies>,
    dashboard: Option<RawDashboard>,
    filters: Option<RawFilters>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawRolling {
    window_size: Option<usize>,
    stable_band_percent: Option<f64>,
    anchor: Option<WindowAnchor>,
}

#[derive(Debug, Deserialize)]
struct RawAnomalies {
    threshold_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDashboard {
    window_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawFilters {
    hide_transfers: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    top_categories: Option<usize>,
}

/// Parse config from TOML content, applied over the defaults
pub fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(rolling) = raw.rolling {
        if let Some(window) = rolling.window_size {
            config.rolling.window_size = window;
        }
        if let Some(band) = rolling.stable_band_percent {
            config.rolling.stable_band_percent = band;
        }
        if let Some(anchor) = rolling.anchor {
            config.rolling.anchor = anchor;
        }
    }

    if let Some(threshold) = raw.anomalies.and_then(|a| a.threshold_percent) {
        config.anomalies.threshold_percent = threshold;
    }

    if let Some(window) = raw.dashboard.and_then(|d| d.window_months) {
        config.dashboard.window_months = window;
    }

    if let Some(hide) = raw.filters.and_then(|f| f.hide_transfers) {
        config.filters.hide_transfers = hide;
    }

    if let Some(limit) = raw.reports.and_then(|r| r.top_categories) {
        config.reports.top_categories = limit;
    }

    config.validate()?;
    Ok(config)
}
