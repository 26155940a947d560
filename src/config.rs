use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// World boundary FeatureCollection with a `name` property per feature.
    /// Each input is either an http(s) URL or a local path.
    pub world_geojson: String,
    /// Monthly country temperatures: `Country, dt, AverageTemperature`.
    pub country_csv: String,
    /// City/state temperatures: `Country, City/state, Temperature`.
    pub city_csv: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    /// Canvas for the drill-down views (line chart, country map, bar chart).
    pub chart_width: f64,
    pub chart_height: f64,
    pub projection_scale: f64,
    /// Endpoints of the sequential color scale, warm end first. The default
    /// runs high-to-low on purpose.
    pub color_domain: [f64; 2],
    /// Fill for countries with no temperature data.
    pub neutral_fill: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            chart_width: 1200.0,
            chart_height: 500.0,
            projection_scale: 150.0,
            color_domain: [30.0, -10.0],
            neutral_fill: "#ccc".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}
