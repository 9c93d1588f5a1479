use std::io::Error as IoError;

use thiserror::Error;
use watchpost::ConfigError;

use crate::config::SettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Settings(#[from] SettingsError),
    #[error("{0:#}")]
    Startup(#[from] anyhow::Error),
}
