use pocket_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError};
use pocket_weather::{DashboardError, WeatherError as ProviderError};

pub fn from_provider(e: ProviderError) -> AppError {
    match e {
        ProviderError::Network(err) => AppError::Network(err.into_network_error()),
        ProviderError::MissingApiKey => {
            AppError::Config(ConfigError::MissingSetting("weather.api_key".into()))
        }
        ProviderError::InvalidApiKey => AppError::Weather(WeatherError::InvalidApiKey),
        ProviderError::LocationNotFound(s) => AppError::Weather(WeatherError::LocationNotFound(s)),
        ProviderError::Api { status, .. } if status >= 500 => {
            AppError::Weather(WeatherError::ServiceUnavailable)
        }
        ProviderError::Api { status, message } => {
            AppError::Weather(WeatherError::ApiError(format!("{}: {}", status, message)))
        }
        ProviderError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
    }
}

pub fn from_dashboard(e: DashboardError) -> AppError {
    AppError::Weather(WeatherError::Dashboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_config_problem() {
        let app_err = from_provider(ProviderError::MissingApiKey);
        assert!(matches!(app_err, AppError::Config(ConfigError::MissingSetting(_))));
    }

    #[test]
    fn upstream_failure_is_service_unavailable() {
        let app_err = from_provider(ProviderError::Api {
            status: 502,
            message: "bad gateway".into(),
        });
        assert!(matches!(app_err, AppError::Weather(WeatherError::ServiceUnavailable)));
    }

    #[test]
    fn client_failure_keeps_message() {
        let app_err = from_provider(ProviderError::Api {
            status: 429,
            message: "slow down".into(),
        });
        assert!(app_err.to_string().contains("slow down"));
    }

    #[test]
    fn dashboard_errors_have_user_message() {
        let app_err = from_dashboard(DashboardError::CurrentLocation);
        assert_eq!(app_err.user_message(), "That change can't be made to the dashboard.");
    }
}
