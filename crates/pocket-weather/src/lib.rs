//! Weather engine for Pocket Weather
//!
//! Classifies observations, derives prioritized advice, ranks cities
//! against each other, and fetches current conditions and alerts from
//! OpenWeatherMap.

pub mod types;
pub mod classify;
pub mod advice;
pub mod compare;
pub mod alerts;
pub mod dashboard;
pub mod geocode;
pub mod provider;

pub use types::*;
pub use classify::{Classification, ConditionGroup, Extrema};
pub use advice::{derive_advice, AdviceIcon, Advisory, Priority};
pub use compare::{ComparisonRow, ComparisonTable, Metric, MetricKind, Polarity, Trend};
pub use alerts::relevant_alerts;
pub use dashboard::{Dashboard, DashboardError};
pub use geocode::Geocoder;
pub use provider::{ProviderSettings, WeatherProvider, WeatherSnapshot};
