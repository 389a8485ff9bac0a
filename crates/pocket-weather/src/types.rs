use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Weather condition categories, keyed by the lowercase OpenWeatherMap
/// group name. Labels parse case-insensitively; unrecognized ones become
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Sleet,
    Snow,
    Fog,
    Mist,
    Haze,
    Smoke,
    Dust,
    Sand,
    Ash,
    Squall,
    Tornado,
    #[default]
    Unknown,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 17] = [
        Self::Clear,
        Self::Clouds,
        Self::Rain,
        Self::Drizzle,
        Self::Thunderstorm,
        Self::Sleet,
        Self::Snow,
        Self::Fog,
        Self::Mist,
        Self::Haze,
        Self::Smoke,
        Self::Dust,
        Self::Sand,
        Self::Ash,
        Self::Squall,
        Self::Tornado,
        Self::Unknown,
    ];

    /// Convert an OpenWeatherMap condition id to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: u16) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            511 => Self::Sleet, // Freezing rain
            500..=599 => Self::Rain,
            611..=616 => Self::Sleet,
            600..=699 => Self::Snow,
            701 => Self::Mist,
            711 => Self::Smoke,
            721 => Self::Haze,
            731 | 761 => Self::Dust,
            741 => Self::Fog,
            751 => Self::Sand,
            762 => Self::Ash,
            771 => Self::Squall,
            781 => Self::Tornado,
            800 => Self::Clear,
            801..=804 => Self::Clouds,
            _ => Self::Unknown,
        }
    }

    /// Lowercase label, as used in JSON and on the command line
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
            Self::Thunderstorm => "thunderstorm",
            Self::Sleet => "sleet",
            Self::Snow => "snow",
            Self::Fog => "fog",
            Self::Mist => "mist",
            Self::Haze => "haze",
            Self::Smoke => "smoke",
            Self::Dust => "dust",
            Self::Sand => "sand",
            Self::Ash => "ash",
            Self::Squall => "squall",
            Self::Tornado => "tornado",
            Self::Unknown => "unknown",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Cloudy",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Sleet => "Sleet",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
            Self::Mist => "Mist",
            Self::Haze => "Haze",
            Self::Smoke => "Smoke",
            Self::Dust => "Dust",
            Self::Sand => "Sand",
            Self::Ash => "Volcanic Ash",
            Self::Squall => "Squalls",
            Self::Tornado => "Tornado",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for WeatherCondition {
    fn from(label: String) -> Self {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Self::Unknown)
    }
}

/// A searchable place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    /// Id used for a position that was located rather than searched
    pub fn located_id(lat: f64, lon: f64) -> String {
        format!("{}-{}", lat, lon)
    }

    /// "Name, State, CC" with the state omitted when absent
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Current conditions for one city.
///
/// Units are metric: °C, %, km/h, km, hPa. Snapshots are replaced
/// wholesale on refresh, never edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub temperature: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub feels_like: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub humidity: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub wind_speed: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub uv_index: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub visibility: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub pressure: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub high: f64,
    #[serde(default = "missing_reading", deserialize_with = "nullable_reading")]
    pub low: f64,
    #[serde(default)]
    pub condition: WeatherCondition,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_current_location: bool,
}

/// Absent readings are NaN, so they never trip a threshold or win a
/// comparison
fn missing_reading() -> f64 {
    f64::NAN
}

/// NaN serializes as `null`, so read `null` back as a missing reading
fn nullable_reading<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Observation {
    /// True when every numeric reading is finite
    pub fn is_finite(&self) -> bool {
        [
            self.temperature,
            self.feels_like,
            self.humidity,
            self.wind_speed,
            self.uv_index,
            self.visibility,
            self.pressure,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Kind of an issued alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Watch,
    Advisory,
}

impl AlertKind {
    /// Classify from the issuing agency's event name
    pub fn from_event(event: &str) -> Self {
        let event = event.to_ascii_lowercase();
        if event.contains("warning") {
            Self::Warning
        } else if event.contains("watch") {
            Self::Watch
        } else {
            Self::Advisory
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Watch => "watch",
            Self::Advisory => "advisory",
        }
    }
}

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl AlertSeverity {
    const EXTREME_EVENTS: [&'static str; 5] =
        ["tornado", "hurricane", "tsunami", "extreme", "typhoon"];

    /// Severity implied by the alert kind, raised to `Extreme` for
    /// life-threatening event names
    pub fn for_event(event: &str, kind: AlertKind) -> Self {
        let lowered = event.to_ascii_lowercase();
        if Self::EXTREME_EVENTS.iter().any(|e| lowered.contains(e)) {
            return Self::Extreme;
        }
        match kind {
            AlertKind::Warning => Self::High,
            AlertKind::Watch => Self::Moderate,
            AlertKind::Advisory => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }
}

/// An alert issued for one or more cities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub cities: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("No API key configured")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}
