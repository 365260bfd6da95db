use rtt_core::GeometryError;
use thiserror::Error;

/// Errors surfaced by the terminal viewer
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("scene construction failed: {0}")]
    Geometry(#[from] GeometryError),
}
