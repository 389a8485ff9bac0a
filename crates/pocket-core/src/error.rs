//! Errors surfaced by the `pocket-weather` binary.
//!
//! Library crates keep their own error enums; the binary folds them into
//! [`AppError`]. `Display` carries the detail for logs, `user_message()`
//! the one line printed to the terminal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short terminal message; run with `RUST_LOG=debug` for the detail
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "Could not read or write a local file.",
            AppError::Other(_) => "Something went wrong. Run with RUST_LOG=debug for details.",
        }
    }
}

/// Transport failures talking to OpenWeatherMap
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    /// The body arrived but was not the JSON we expect
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Could not reach OpenWeatherMap. Check your connection."
            }
            NetworkError::Timeout => {
                "OpenWeatherMap took too long to answer. Raise weather.request_timeout_secs or retry."
            }
            NetworkError::InvalidResponse(_) => {
                "OpenWeatherMap sent data we could not read. Try again later."
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => {
                "The config file has errors. Run `pocket-weather config` to list them."
            }
            ConfigError::MissingSetting(_) => {
                "A setting is missing. Set OPENWEATHER_API_KEY or edit the config file."
            }
        }
    }
}

/// Failures reported by the weather API or the dashboard
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => "No weather data for that place.",
            WeatherError::ApiError(_) => "OpenWeatherMap rejected the request.",
            WeatherError::InvalidApiKey => {
                "OpenWeatherMap rejected the API key. Check OPENWEATHER_API_KEY."
            }
            WeatherError::ServiceUnavailable => "OpenWeatherMap is down. Try again later.",
            WeatherError::Dashboard(_) => "That change can't be made to the dashboard.",
        }
    }
}

/// Classify a transport failure from `reqwest`
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
