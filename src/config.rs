//! Runtime configuration
//!
//! Defaults, then `WATERFALL_WS` from the environment, then command-line
//! arguments for the binaries.

use std::time::Duration;

use thiserror::Error;

use crate::core::frame::FRAME_LEN;

/// Default WebSocket URL of the PSD producer
pub const DEFAULT_WS_URL: &str = "ws://localhost:8000/ws";

/// Environment variable overriding the endpoint
pub const ENDPOINT_ENV: &str = "WATERFALL_WS";

/// Slowest accepted refresh rate, one row a minute
pub const MIN_REFRESH_HZ: f64 = 1.0 / 60.0;

/// Upper bound on the display refresh rate
pub const MAX_REFRESH_HZ: f64 = 1000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("width must be between 1 and {max}, got {width}")]
    InvalidWidth { width: usize, max: usize },

    #[error("height must be at least 1")]
    InvalidHeight,

    #[error("refresh rate must be between {min} and {max} Hz, got {0}", min = MIN_REFRESH_HZ, max = MAX_REFRESH_HZ)]
    InvalidRefreshRate(f64),

    #[error("endpoint must be a ws:// or wss:// URL, got {0:?}")]
    InvalidEndpoint(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallConfig {
    pub endpoint: String,
    /// Canvas width in pixels; one downsampled bin per column
    pub width: usize,
    /// Number of rows kept in the waterfall
    pub height: usize,
    /// Display refresh rate, at most one row per tick
    pub refresh_hz: f64,
    /// How often the CLI logs throughput
    pub stats_interval: Duration,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_WS_URL.to_string(),
            width: 800,
            height: 400,
            refresh_hz: 60.0,
            stats_interval: Duration::from_secs(5),
        }
    }
}

impl WaterfallConfig {
    /// Defaults with the endpoint taken from `WATERFALL_WS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            if !url.is_empty() {
                config.endpoint = url;
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.width > FRAME_LEN {
            return Err(ConfigError::InvalidWidth {
                width: self.width,
                max: FRAME_LEN,
            });
        }
        if self.height == 0 {
            return Err(ConfigError::InvalidHeight);
        }
        // Also rejects NaN
        if !(self.refresh_hz >= MIN_REFRESH_HZ && self.refresh_hz <= MAX_REFRESH_HZ) {
            return Err(ConfigError::InvalidRefreshRate(self.refresh_hz));
        }
        if !(self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    /// Period of the display refresh tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_hz)
    }
}

/// Command-line arguments shared by the viewer binaries
#[cfg(feature = "cli")]
#[derive(clap::Parser, Debug, Clone)]
#[command(version, about = "Real-time PSD waterfall viewer")]
pub struct CliArgs {
    /// WebSocket URL of the PSD producer [default: $WATERFALL_WS, then ws://localhost:8000/ws]
    #[arg(long)]
    pub url: Option<String>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    /// Number of rows kept in the waterfall
    #[arg(long, default_value_t = 400)]
    pub height: usize,

    /// Display refresh rate in Hz
    #[arg(long, default_value_t = 60.0)]
    pub refresh_hz: f64,

    /// Seconds between throughput log lines
    #[arg(long, default_value_t = 5)]
    pub stats_secs: u64,

    /// Send a request_update as soon as the connection opens
    #[arg(long)]
    pub request_update: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    pub fn into_config(self) -> Result<WaterfallConfig, ConfigError> {
        let base = WaterfallConfig::from_env();
        let config = WaterfallConfig {
            endpoint: self.url.unwrap_or(base.endpoint),
            width: self.width,
            height: self.height,
            refresh_hz: self.refresh_hz,
            stats_interval: Duration::from_secs(self.stats_secs.max(1)),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WaterfallConfig::default();
        assert_eq!(config.endpoint, "ws://localhost:8000/ws");
        assert_eq!((config.width, config.height), (800, 400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_interval() {
        let config = WaterfallConfig {
            refresh_hz: 50.0,
            ..Default::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let mut config = WaterfallConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWidth { .. })));

        config.width = FRAME_LEN + 1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWidth { .. })));

        config.width = FRAME_LEN;
        config.height = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidHeight));
    }

    #[test]
    fn test_rejects_bad_refresh_and_endpoint() {
        let config = WaterfallConfig {
            refresh_hz: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRefreshRate(0.0)));

        let config = WaterfallConfig {
            endpoint: "http://localhost:8000/ws".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_rejects_extreme_refresh_rates() {
        for hz in [1e-310, 1e-3, MAX_REFRESH_HZ * 2.0, 1e12, f64::INFINITY, f64::NAN] {
            let config = WaterfallConfig {
                refresh_hz: hz,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidRefreshRate(_))),
                "{hz} accepted"
            );
        }

        for hz in [MIN_REFRESH_HZ, MAX_REFRESH_HZ] {
            let config = WaterfallConfig {
                refresh_hz: hz,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
            assert!(config.tick_interval() > Duration::ZERO);
        }
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_args_into_config() {
        use clap::Parser;

        let args = CliArgs::parse_from([
            "waterfall-cli",
            "--url",
            "ws://10.0.0.2:9000/ws",
            "--width",
            "1024",
            "--refresh-hz",
            "30",
        ]);
        let config = args.into_config().unwrap();
        assert_eq!(config.endpoint, "ws://10.0.0.2:9000/ws");
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 400);
        assert_eq!(config.refresh_hz, 30.0);
    }

    /// The only test touching `WATERFALL_WS`; others pass `--url` or use `Default`.
    #[cfg(feature = "cli")]
    #[test]
    fn test_endpoint_precedence() {
        use clap::Parser;

        std::env::set_var(ENDPOINT_ENV, "ws://10.0.0.3:8000/ws");
        assert_eq!(WaterfallConfig::from_env().endpoint, "ws://10.0.0.3:8000/ws");

        let from_env = CliArgs::parse_from(["waterfall-cli"]).into_config();
        let from_flag = CliArgs::parse_from(["waterfall-cli", "--url", "ws://10.0.0.4:8000/ws"]).into_config();

        std::env::set_var(ENDPOINT_ENV, "");
        let empty = WaterfallConfig::from_env();
        std::env::remove_var(ENDPOINT_ENV);

        assert_eq!(from_env.unwrap().endpoint, "ws://10.0.0.3:8000/ws");
        assert_eq!(from_flag.unwrap().endpoint, "ws://10.0.0.4:8000/ws");
        assert_eq!(empty.endpoint, DEFAULT_WS_URL);
    }
}
