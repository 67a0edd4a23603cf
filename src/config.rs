use serde::Deserialize;
use tracing::{warn, Level};
use wasm_bindgen::JsValue;

use crate::heatmap::DEFAULT_SIZE;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Name of the optional page-level config object, e.g.
/// `window.__PLATELY_CONFIG__ = { api_base: "https://api.example.com" }`.
const GLOBAL_CONFIG_KEY: &str = "__PLATELY_CONFIG__";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base: String,
    pub heatmap_width: f64,
    pub heatmap_height: f64,
    pub log_level: Level,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            heatmap_width: DEFAULT_SIZE.0,
            heatmap_height: DEFAULT_SIZE.1,
            log_level: Level::INFO,
        }
    }
}

/// Page-supplied settings. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub heatmap_width: Option<f64>,
    pub heatmap_height: Option<f64>,
    pub log_level: Option<String>,
}

impl DashboardConfig {
    /// Resolve settings from the page global, then the `PLATELY_API_BASE`
    /// build variable, then defaults.
    pub fn load() -> Self {
        let overrides = read_global_overrides().unwrap_or_default();
        Self::resolve(overrides, option_env!("PLATELY_API_BASE"))
    }

    pub fn resolve(overrides: ConfigOverrides, build_api_base: Option<&str>) -> Self {
        let defaults = Self::default();

        let api_base = overrides
            .api_base
            .filter(|s| !s.trim().is_empty())
            .or_else(|| build_api_base.filter(|s| !s.trim().is_empty()).map(str::to_string))
            .unwrap_or(defaults.api_base);

        let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);

        let log_level = match overrides.log_level.as_deref() {
            Some(raw) => raw.parse::<Level>().unwrap_or_else(|_| {
                warn!("Unknown log level '{}', using {}", raw, defaults.log_level);
                defaults.log_level
            }),
            None => defaults.log_level,
        };

        Self {
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            heatmap_width: positive(overrides.heatmap_width).unwrap_or(defaults.heatmap_width),
            heatmap_height: positive(overrides.heatmap_height).unwrap_or(defaults.heatmap_height),
            log_level,
        }
    }

    pub fn heatmap_size(&self) -> (f64, f64) {
        (self.heatmap_width, self.heatmap_height)
    }
}

fn read_global_overrides() -> Option<ConfigOverrides> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(GLOBAL_CONFIG_KEY)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value(value) {
        Ok(overrides) => Some(overrides),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", GLOBAL_CONFIG_KEY, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::resolve(ConfigOverrides::default(), None);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.heatmap_size(), (450.0, 450.0));
    }

    #[test]
    fn test_page_global_beats_build_variable() {
        let overrides = ConfigOverrides {
            api_base: Some("https://api.plately.test/".into()),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(overrides, Some("http://build:9000"));
        assert_eq!(config.api_base, "https://api.plately.test");
    }

    #[test]
    fn test_build_variable_used_when_page_is_silent() {
        let config = DashboardConfig::resolve(ConfigOverrides::default(), Some("http://build:9000"));
        assert_eq!(config.api_base, "http://build:9000");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let overrides = ConfigOverrides {
            api_base: Some("   ".into()),
            heatmap_width: Some(-10.0),
            heatmap_height: Some(f64::NAN),
            log_level: Some("chatty".into()),
        };
        assert_eq!(DashboardConfig::resolve(overrides, None), DashboardConfig::default());
    }

    #[test]
    fn test_log_level_parsed() {
        let overrides = ConfigOverrides {
            log_level: Some("debug".into()),
            heatmap_width: Some(300.0),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(overrides, None);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.heatmap_size(), (300.0, 450.0));
    }
}
