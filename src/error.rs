//! Типы ошибок для симуляции

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiningError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Host error: {0}")]
    HostError(String),

    #[error("Work error: {0}")]
    WorkError(String),

    #[error("Request error: {0}")]
    RequestError(String),
}

impl From<String> for DiningError {
    fn from(s: String) -> Self {
        DiningError::ConfigError(s)
    }
}

impl From<&str> for DiningError {
    fn from(s: &str) -> Self {
        DiningError::ConfigError(s.to_string())
    }
}
