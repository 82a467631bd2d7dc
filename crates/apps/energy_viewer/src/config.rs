use std::path::{Path, PathBuf};

use foundation::{GeoPoint, MapView};
use layers::{LegendSpec, Symbology};
use serde::{Deserialize, Serialize};

/// Largest zoom the XYZ base layers serve.
pub const MAX_ZOOM: u8 = 19;
/// Largest viewport side, in pixels.
pub const MAX_VIEWPORT_PX: f64 = 16_384.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center_lat: 20.0,
            center_lon: 0.0,
            zoom: 2,
            width_px: 1200.0,
            height_px: 700.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLayerConfig {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub title: String,
    pub attribution: String,
    pub legend: LegendSpec,
}

impl OverlayConfig {
    pub fn renewable() -> Self {
        Self {
            title: "Renewable Energy".to_string(),
            attribution: "Renewable Energy: Based on IEA data from IEA World Energy Balances \
                          © OECD/IEA [2013], www.iea.org/statistics, Licence: www.iea.org/t&c; \
                          as modified by Allison K Smith"
                .to_string(),
            legend: LegendSpec::renewable(),
        }
    }

    pub fn fossil() -> Self {
        Self {
            title: "Fossil Fuels".to_string(),
            attribution: "Fossil Fuels: Based on IEA data from IEA Statistics © OECD/IEA [2014], \
                          www.iea.org/statistics, Licence: www.iea.org/t&c; \
                          as modified by Allison K Smith"
                .to_string(),
            legend: LegendSpec::fossil(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::renewable()
    }
}

/// Everything about the map that is not data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub base_layers: Vec<BaseLayerConfig>,
    pub default_base: String,
    pub renewable: OverlayConfig,
    pub fossil: OverlayConfig,
    pub symbology: Symbology,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            base_layers: vec![
                BaseLayerConfig {
                    name: "Grayscale".to_string(),
                    url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/Canvas/World_Light_Gray_Base/MapServer/tile/{z}/{y}/{x}".to_string(),
                    attribution: "Tiles © Esri, DeLorme, NAVTEQ".to_string(),
                },
                BaseLayerConfig {
                    name: "Streets".to_string(),
                    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                    attribution: "© OpenStreetMap contributors".to_string(),
                },
            ],
            default_base: "Grayscale".to_string(),
            renewable: OverlayConfig::renewable(),
            fossil: OverlayConfig::fossil(),
            symbology: Symbology::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl MapConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: MapConfig =
            serde_json::from_str(&payload).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_layers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one base layer is required".to_string(),
            ));
        }
        if self.base_layer(&self.default_base).is_none() {
            return Err(ConfigError::Invalid(format!(
                "default base layer {:?} is not listed",
                self.default_base
            )));
        }
        if self.view.zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!(
                "zoom {} exceeds {MAX_ZOOM}",
                self.view.zoom
            )));
        }
        for (side, px) in [("width", self.view.width_px), ("height", self.view.height_px)] {
            if !(px.is_finite() && px > 0.0 && px <= MAX_VIEWPORT_PX) {
                return Err(ConfigError::Invalid(format!(
                    "viewport {side} must be between 0 and {MAX_VIEWPORT_PX} px, got {px}"
                )));
            }
        }
        if !(self.view.center_lat.is_finite() && self.view.center_lon.is_finite()) {
            return Err(ConfigError::Invalid(
                "view center must be finite".to_string(),
            ));
        }
        if self.symbology.attributes.marker.is_empty() {
            return Err(ConfigError::Invalid(
                "attribute marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn map_view(&self) -> MapView {
        MapView::new(
            GeoPoint::new(self.view.center_lon, self.view.center_lat),
            self.view.zoom,
            self.view.width_px,
            self.view.height_px,
        )
    }

    /// Case-insensitive lookup.
    pub fn base_layer(&self, name: &str) -> Option<&BaseLayerConfig> {
        self.base_layers
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name.trim()))
    }
}
