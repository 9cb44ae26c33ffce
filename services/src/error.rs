use shared::{ConfigError, RadarError, RouteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Radar(#[from] RadarError),
}
