//! Viewer configuration.
//!
//! Loaded from an optional YAML file; every field has a default so a partial
//! file (or none at all) is valid.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cog_client::ClientConfig;
use cog_common::{TilingScheme, MAX_ZOOM};
use serde::{Deserialize, Serialize};
use tracing::debug;
use viewer::{Padding, SessionConfig, TileEndpoint};

use crate::headless::MAX_VIEWPORT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Root of the COG tile service
    pub service_url: String,
    /// Quiet period after a locator edit before metadata is requested
    pub debounce_ms: u64,
    pub tiling_scheme: TilingScheme,
    /// Pixels kept clear on every side when fitting to a raster
    pub fit_padding: u32,
    pub request_timeout_secs: u64,
    /// Initial view center in EPSG:3857
    pub initial_center: [f64; 2],
    pub initial_zoom: u32,
    /// Width and height of the headless map in pixels
    pub viewport: [u32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8000".to_string(),
            debounce_ms: 500,
            tiling_scheme: TilingScheme::WebMercatorQuad,
            fit_padding: 20,
            request_timeout_secs: 30,
            initial_center: [8747875.0, 2831018.0],
            initial_zoom: 18,
            viewport: [1024, 768],
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded viewer config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.service_url.trim();
        if url.is_empty() {
            bail!("service_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("service_url must be an http(s) URL, got '{}'", url);
        }

        let [width, height] = self.viewport;
        if width == 0 || height == 0 {
            bail!("viewport must be non-zero, got {}x{}", width, height);
        }
        if width > MAX_VIEWPORT || height > MAX_VIEWPORT {
            bail!(
                "viewport must be at most {}x{}, got {}x{}",
                MAX_VIEWPORT,
                MAX_VIEWPORT,
                width,
                height
            );
        }
        if self.fit_padding.saturating_mul(2) >= width.min(height) {
            bail!(
                "fit_padding {} leaves no room in a {}x{} viewport",
                self.fit_padding,
                width,
                height
            );
        }
        if self.initial_zoom > MAX_ZOOM {
            bail!("initial_zoom must be at most {}", MAX_ZOOM);
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            endpoint: TileEndpoint::new(self.service_url.trim(), self.tiling_scheme),
            debounce: Duration::from_millis(self.debounce_ms),
            padding: Padding::uniform(self.fit_padding),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.service_url.trim().to_string(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session_config().debounce, Duration::from_millis(500));
        assert_eq!(config.session_config().padding, Padding::uniform(20));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service_url: https://tiles.example.com/").unwrap();
        writeln!(file, "fit_padding: 40").unwrap();

        let config = ViewerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service_url, "https://tiles.example.com/");
        assert_eq!(config.fit_padding, 40);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.viewport, [1024, 768]);
        assert_eq!(
            config.session_config().endpoint.base_url(),
            "https://tiles.example.com"
        );
    }

    #[test]
    fn test_unknown_tiling_scheme_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tiling_scheme: WorldCRS84Quad").unwrap();
        assert!(ViewerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::from_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let blank = ViewerConfig {
            service_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let flat = ViewerConfig {
            viewport: [1024, 0],
            ..Default::default()
        };
        assert!(flat.validate().is_err());

        let huge = ViewerConfig {
            viewport: [u32::MAX, 768],
            ..Default::default()
        };
        assert!(huge.validate().unwrap_err().to_string().contains("at most"));

        let largest = ViewerConfig {
            viewport: [MAX_VIEWPORT, MAX_VIEWPORT],
            ..Default::default()
        };
        assert!(largest.validate().is_ok());

        let crowded = ViewerConfig {
            viewport: [100, 100],
            fit_padding: 50,
            ..Default::default()
        };
        assert!(crowded.validate().is_err());

        let deep = ViewerConfig {
            initial_zoom: 30,
            ..Default::default()
        };
        assert!(deep.validate().is_err());
    }
}
