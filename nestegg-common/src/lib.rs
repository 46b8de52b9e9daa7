pub mod config;
pub use config::{ApiConfig, Config, ExportConfig, HistogramConfig, SimulationConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NestEggError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NestEggError>;
