//! Side-by-side ranking of cities.
//!
//! For each metric the min and max across all cities are computed and every
//! cell is tagged with a [`Trend`]. Ties at an extreme all share the tag.

use serde::Serialize;

use crate::classify::{nan_max, nan_min};
use crate::types::{Observation, WeatherCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Temperature,
    FeelsLike,
    Humidity,
    WindSpeed,
    UvIndex,
    Visibility,
}

impl MetricKind {
    pub fn value(&self, observation: &Observation) -> f64 {
        match self {
            Self::Temperature => observation.temperature,
            Self::FeelsLike => observation.feels_like,
            Self::Humidity => observation.humidity,
            Self::WindSpeed => observation.wind_speed,
            Self::UvIndex => observation.uv_index,
            Self::Visibility => observation.visibility,
        }
    }
}

/// Whether a larger reading is preferable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
    /// Purely descriptive: extremes are labelled highest/lowest
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub kind: MetricKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub polarity: Polarity,
}

/// Compared metrics, in display order
pub const METRICS: [Metric; 6] = [
    Metric {
        kind: MetricKind::Temperature,
        label: "Temperature",
        unit: "°C",
        polarity: Polarity::Neutral,
    },
    Metric {
        kind: MetricKind::FeelsLike,
        label: "Feels Like",
        unit: "°C",
        polarity: Polarity::Neutral,
    },
    Metric {
        kind: MetricKind::Humidity,
        label: "Humidity",
        unit: "%",
        polarity: Polarity::LowerIsBetter,
    },
    Metric {
        kind: MetricKind::WindSpeed,
        label: "Wind Speed",
        unit: "km/h",
        polarity: Polarity::LowerIsBetter,
    },
    Metric {
        kind: MetricKind::UvIndex,
        label: "UV Index",
        unit: "",
        polarity: Polarity::LowerIsBetter,
    },
    Metric {
        kind: MetricKind::Visibility,
        label: "Visibility",
        unit: "km",
        polarity: Polarity::HigherIsBetter,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Best,
    Highest,
    Lowest,
    Neutral,
}

impl Trend {
    /// Classify `value` against the spread of its metric.
    ///
    /// When every city ties (`min == max`) or any reading is NaN the cell is
    /// neutral.
    pub fn classify(value: f64, min: f64, max: f64, polarity: Polarity) -> Self {
        let spread = max != min;
        if spread && value == max {
            return match polarity {
                Polarity::HigherIsBetter => Self::Best,
                _ => Self::Highest,
            };
        }
        if spread && value == min {
            return match polarity {
                Polarity::LowerIsBetter => Self::Best,
                _ => Self::Lowest,
            };
        }
        Self::Neutral
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Best => "*",
            Self::Highest => "↑",
            Self::Lowest => "↓",
            Self::Neutral => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub observation_id: String,
    pub value: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: Metric,
    pub min: f64,
    pub max: f64,
    /// One cell per city, in city order
    pub cells: Vec<ComparisonCell>,
}

impl ComparisonRow {
    pub fn build(metric: Metric, observations: &[Observation]) -> Self {
        let values: Vec<f64> = observations.iter().map(|o| metric.kind.value(o)).collect();
        let min = nan_min(values.iter().copied());
        let max = nan_max(values.iter().copied());

        let cells = observations
            .iter()
            .zip(values)
            .map(|(o, value)| ComparisonCell {
                observation_id: o.id.clone(),
                value,
                trend: Trend::classify(value, min, max, metric.polarity),
            })
            .collect();

        Self {
            metric,
            min,
            max,
            cells,
        }
    }
}

/// Column header for one compared city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedCity {
    pub id: String,
    pub city: String,
    pub condition: WeatherCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub cities: Vec<ComparedCity>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Rank the given cities across [`METRICS`].
    ///
    /// Returns `None` with fewer than two observations: there is nothing
    /// to compare.
    pub fn build(observations: &[Observation]) -> Option<Self> {
        if observations.len() < 2 {
            return None;
        }

        let cities = observations
            .iter()
            .map(|o| ComparedCity {
                id: o.id.clone(),
                city: o.city.clone(),
                condition: o.condition,
            })
            .collect();

        let rows = METRICS
            .iter()
            .map(|m| ComparisonRow::build(*m, observations))
            .collect();

        Some(Self { cities, rows })
    }

    pub fn row(&self, kind: MetricKind) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.metric.kind == kind)
    }
}
