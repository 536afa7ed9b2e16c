//! Designer configuration parsed from environment variables.

use canvas::geometry::CanvasBounds;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("canvas min width {min}px exceeds max width {max}px")]
    InvalidCanvasBounds { min: f64, max: f64 },

    #[error("API base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCanvasBounds { .. } => "E_CONFIG_CANVAS_BOUNDS",
            Self::InvalidBaseUrl(_) => "E_CONFIG_BASE_URL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ServiceTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignerConfig {
    /// Base URL of the metadata, generation, and settings API, without a trailing `/`.
    pub api_base_url: String,
    pub timeouts: ServiceTimeouts,
    pub canvas: CanvasBounds,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: ServiceTimeouts::default(),
            canvas: CanvasBounds::default(),
        }
    }
}

impl DesignerConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `SLIDE_API_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `SLIDE_REQUEST_TIMEOUT_SECS`: default 60
    /// - `SLIDE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SLIDE_CANVAS_RESERVED_LEFT_PX`, `_RIGHT_PX`, `_TOP_PX`, `_BOTTOM_PX`
    /// - `SLIDE_CANVAS_MIN_WIDTH_PX`, `SLIDE_CANVAS_MAX_WIDTH_PX`
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the base URL is not HTTP(S) or the canvas width
    /// range is inverted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DesignerConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`DesignerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = match lookup("SLIDE_API_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_API_BASE_URL.to_owned(),
        };

        let timeouts = ServiceTimeouts {
            request_secs: parse_or(&lookup, "SLIDE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "SLIDE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let defaults = CanvasBounds::default();
        let canvas = CanvasBounds {
            reserved_left_px: parse_px(&lookup, "SLIDE_CANVAS_RESERVED_LEFT_PX", defaults.reserved_left_px),
            reserved_right_px: parse_px(&lookup, "SLIDE_CANVAS_RESERVED_RIGHT_PX", defaults.reserved_right_px),
            reserved_top_px: parse_px(&lookup, "SLIDE_CANVAS_RESERVED_TOP_PX", defaults.reserved_top_px),
            reserved_bottom_px: parse_px(&lookup, "SLIDE_CANVAS_RESERVED_BOTTOM_PX", defaults.reserved_bottom_px),
            min_width_px: parse_px(&lookup, "SLIDE_CANVAS_MIN_WIDTH_PX", defaults.min_width_px),
            max_width_px: parse_px(&lookup, "SLIDE_CANVAS_MAX_WIDTH_PX", defaults.max_width_px),
        };
        if canvas.min_width_px > canvas.max_width_px {
            return Err(ConfigError::InvalidCanvasBounds { min: canvas.min_width_px, max: canvas.max_width_px });
        }

        Ok(Self { api_base_url, timeouts, canvas })
    }

    /// Replace the base URL, validated like `SLIDE_API_BASE_URL`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBaseUrl`] when `raw` is not HTTP(S).
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

/// Trim whitespace and trailing `/`, then require an HTTP(S) scheme.
///
/// # Errors
///
/// [`ConfigError::InvalidBaseUrl`] for any other scheme.
pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_owned())
    } else {
        Err(ConfigError::InvalidBaseUrl(url.to_owned()))
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Non-negative finite pixel value, or `default`.
fn parse_px(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
