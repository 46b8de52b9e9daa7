use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_inflation_floor")]
    pub inflation_floor_pct: f64,
    #[serde(default = "default_inflation_ceiling")]
    pub inflation_ceiling_pct: f64,
    #[serde(default)]
    pub seed: Option<u64>, // fixed seed for reproducible runs; None draws from entropy
}

fn default_iterations() -> usize {
    500
}
fn default_inflation_floor() -> f64 {
    4.0
}
fn default_inflation_ceiling() -> f64 {
    7.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            inflation_floor_pct: default_inflation_floor(),
            inflation_ceiling_pct: default_inflation_ceiling(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "default_bins")]
    pub bins: usize,
}

fn default_bins() -> usize {
    20
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_format() -> String {
    "json".into()
}
fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nestegg")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("NESTEGG_CONFIG") {
            PathBuf::from(env_path) // $NESTEGG_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let cfg: Self = toml::from_str(&content)?;
        Ok(cfg)
    }

    pub fn save(&self) -> crate::Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::NestEggError::Other(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.simulation.iterations, 500);
        assert_eq!(cfg.simulation.inflation_floor_pct, 4.0);
        assert_eq!(cfg.simulation.inflation_ceiling_pct, 7.0);
        assert_eq!(cfg.histogram.bins, 20);
    }

    #[test]
    fn toml_round_trip() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.simulation.iterations, cfg.simulation.iterations);
        assert_eq!(back.export.format, cfg.export.format);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[simulation]\niterations = 50\n").unwrap();
        assert_eq!(cfg.simulation.iterations, 50);
        assert_eq!(cfg.simulation.inflation_floor_pct, 4.0);
        assert_eq!(cfg.histogram.bins, 20);
    }
}
