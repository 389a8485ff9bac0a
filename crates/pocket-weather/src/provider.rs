//! OpenWeatherMap client.
//!
//! Current conditions, today's high/low and active alerts all come from a
//! single One Call request per city.

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::geocode::Geocoder;
use crate::types::{
    AlertKind, AlertSeverity, City, Observation, WeatherAlert, WeatherCondition, WeatherError,
};

const ONE_CALL_PATH: &str = "/data/3.0/onecall";
const USER_AGENT: &str = concat!("PocketWeather/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the weather and geocoding APIs
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_base_url: String,
    pub geo_base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openweathermap.org".to_string(),
            geo_base_url: "https://api.openweathermap.org".to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Observation and alerts for one city, from a single request
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub observation: Observation,
    pub alerts: Vec<WeatherAlert>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    /// Geocoder sharing this provider's HTTP client and credentials
    pub fn geocoder(&self) -> Geocoder {
        Geocoder::new(
            self.client.clone(),
            self.settings.geo_base_url.clone(),
            self.settings.api_key.clone(),
        )
    }

    pub async fn fetch_snapshot(&self, city: &City) -> Result<WeatherSnapshot, WeatherError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey)?;

        let url = format!(
            "{}{}",
            self.settings.api_base_url.trim_end_matches('/'),
            ONE_CALL_PATH
        );

        tracing::debug!("Fetching weather for {} ({}, {})", city.name, city.lat, city.lon);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", city.lat.to_string()),
                ("lon", city.lon.to_string()),
                ("units", "metric".to_string()),
                ("exclude", "minutely,hourly".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        let body: OneCallResponse = read_json(response, &city.name).await?;

        let snapshot = WeatherSnapshot {
            observation: body.observation(city),
            alerts: body.weather_alerts(city),
        };

        tracing::info!(
            "Fetched weather for {}: {} ({} alerts)",
            city.name,
            snapshot.observation.condition,
            snapshot.alerts.len()
        );
        Ok(snapshot)
    }

    pub async fn fetch_observation(&self, city: &City) -> Result<Observation, WeatherError> {
        Ok(self.fetch_snapshot(city).await?.observation)
    }

    pub async fn fetch_alerts(&self, city: &City) -> Result<Vec<WeatherAlert>, WeatherError> {
        Ok(self.fetch_snapshot(city).await?.alerts)
    }
}

/// Check the status and decode a JSON body.
///
/// `subject` names what was requested, for `LocationNotFound`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    subject: &str,
) -> Result<T, WeatherError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("OpenWeatherMap returned {} for {}", status, subject);
        return Err(match status {
            StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
            StatusCode::NOT_FOUND => WeatherError::LocationNotFound(subject.to_string()),
            _ => WeatherError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            },
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| WeatherError::Parse(e.to_string()))
}

/// Prefer the `message` field of an OpenWeatherMap error body
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// One decimal place, to keep converted units comparable
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    current: OwmCurrent,
    #[serde(default)]
    daily: Vec<OwmDaily>,
    #[serde(default)]
    alerts: Vec<OwmAlert>,
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    sunrise: Option<i64>,
    sunset: Option<i64>,
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
    #[serde(default)]
    uvi: f64,
    /// Metres; omitted by the API when unknown
    visibility: Option<f64>,
    /// Metres per second
    wind_speed: f64,
    #[serde(default)]
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u16,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmDaily {
    temp: OwmDailyTemp,
}

#[derive(Debug, Deserialize)]
struct OwmDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwmAlert {
    #[serde(default)]
    sender_name: Option<String>,
    event: String,
    start: i64,
    end: i64,
    #[serde(default)]
    description: String,
}

impl OneCallResponse {
    fn observation(&self, city: &City) -> Observation {
        let current = &self.current;
        let (condition, description) = current
            .weather
            .first()
            .map(|w| (WeatherCondition::from_owm_code(w.id), w.description.clone()))
            .unwrap_or_default();
        let today = self.daily.first().map(|d| &d.temp);

        Observation {
            id: city.id.clone(),
            city: city.name.clone(),
            country: city.country.clone(),
            temperature: current.temp,
            feels_like: current.feels_like,
            humidity: current.humidity,
            wind_speed: round1(current.wind_speed * 3.6),
            uv_index: current.uvi,
            visibility: current
                .visibility
                .map_or(f64::NAN, |metres| round1(metres / 1000.0)),
            pressure: current.pressure,
            high: today.map_or(current.temp, |t| t.max),
            low: today.map_or(current.temp, |t| t.min),
            condition,
            description,
            sunrise: current.sunrise.and_then(timestamp),
            sunset: current.sunset.and_then(timestamp),
            is_current_location: false,
        }
    }

    fn weather_alerts(&self, city: &City) -> Vec<WeatherAlert> {
        self.alerts
            .iter()
            .enumerate()
            .filter_map(|(index, alert)| {
                let Some(expires_at) = timestamp(alert.end) else {
                    tracing::warn!("Skipping alert '{}' with invalid end time", alert.event);
                    return None;
                };
                let kind = AlertKind::from_event(&alert.event);
                let description = match &alert.sender_name {
                    Some(sender) if !sender.is_empty() => {
                        format!("{} ({})", alert.description.trim(), sender)
                    }
                    _ => alert.description.trim().to_string(),
                };
                Some(WeatherAlert {
                    id: format!("{}-{}-{}", city.id, alert.start, index),
                    kind,
                    title: alert.event.clone(),
                    description,
                    severity: AlertSeverity::for_event(&alert.event, kind),
                    cities: vec![city.name.clone()],
                    expires_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> City {
        City {
            id: "lisbon".into(),
            name: "Lisbon".into(),
            country: "PT".into(),
            state: None,
            lat: 38.72,
            lon: -9.14,
        }
    }

    fn sample() -> OneCallResponse {
        serde_json::from_value(serde_json::json!({
            "current": {
                "dt": 1760000000,
                "sunrise": 1759990000,
                "sunset": 1760030000,
                "temp": 24.3,
                "feels_like": 24.9,
                "pressure": 1016,
                "humidity": 61,
                "uvi": 6.2,
                "visibility": 10000,
                "wind_speed": 5.5,
                "weather": [{"id": 801, "main": "Clouds", "description": "few clouds"}]
            },
            "daily": [{"temp": {"min": 17.1, "max": 26.4}}],
            "alerts": [{
                "sender_name": "IPMA",
                "event": "Heat Warning",
                "start": 1760000000,
                "end": 1760086400,
                "description": "  Very hot afternoon.  "
            }]
        }))
        .unwrap()
    }

    #[test]
    fn maps_current_conditions() {
        let obs = sample().observation(&city());
        assert_eq!(obs.id, "lisbon");
        assert_eq!(obs.city, "Lisbon");
        assert_eq!(obs.country, "PT");
        assert_eq!(obs.condition, WeatherCondition::Clouds);
        assert_eq!(obs.description, "few clouds");
        assert_eq!(obs.wind_speed, 19.8);
        assert_eq!(obs.visibility, 10.0);
        assert_eq!(obs.uv_index, 6.2);
        assert_eq!(obs.high, 26.4);
        assert_eq!(obs.low, 17.1);
        assert!(obs.sunrise.is_some());
        assert!(!obs.is_current_location);
    }

    #[test]
    fn missing_visibility_is_nan() {
        let mut body = sample();
        body.current.visibility = None;
        assert!(body.observation(&city()).visibility.is_nan());
    }

    #[test]
    fn missing_weather_entry_is_unknown() {
        let mut body = sample();
        body.current.weather.clear();
        let obs = body.observation(&city());
        assert_eq!(obs.condition, WeatherCondition::Unknown);
        assert!(obs.description.is_empty());
    }

    #[test]
    fn maps_alerts() {
        let alerts = sample().weather_alerts(&city());
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.id, "lisbon-1760000000-0");
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.title, "Heat Warning");
        assert_eq!(alert.description, "Very hot afternoon. (IPMA)");
        assert_eq!(alert.cities, vec!["Lisbon"]);
        assert_eq!(alert.expires_at.timestamp(), 1760086400);
    }

    #[test]
    fn api_message_prefers_json_message() {
        assert_eq!(
            api_message(r#"{"cod": 429, "message": "slow down"}"#),
            "slow down"
        );
        assert_eq!(api_message(" plain text "), "plain text");
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_request() {
        let provider = WeatherProvider::new(ProviderSettings {
            api_base_url: "http://127.0.0.1:9".into(),
            ..ProviderSettings::default()
        })
        .unwrap();
        let err = provider.fetch_snapshot(&city()).await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }
}
