//! Advice rules.
//!
//! A fixed, ordered table of independent rules is evaluated against the
//! [`Classification`] of the selected cities. Each rule that fires adds one
//! entry; the result is then stably sorted by priority so rules of equal
//! priority keep table order.

use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::types::Observation;

/// UV index at or above which sun protection is advised
pub const UV_THRESHOLD: f64 = 6.0;
/// Temperature (°C) at or above which hydration is advised
pub const HEAT_THRESHOLD: f64 = 35.0;
/// Temperature (°C) at or below which warm clothing is advised
pub const COLD_THRESHOLD: f64 = 5.0;
/// Wind speed (km/h) at or above which wind caution is advised
pub const WIND_THRESHOLD: f64 = 25.0;
/// Relative humidity (%) at or above which humidity is noted
pub const HUMIDITY_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high=0, medium=1, low=2
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdviceIcon {
    Umbrella,
    Sunglasses,
    Thermometer,
    Shirt,
    Snowflake,
    Wind,
    Droplets,
    Sun,
    Cloud,
    AlertTriangle,
    Mask,
}

impl AdviceIcon {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Umbrella => "umbrella",
            Self::Sunglasses => "sunglasses",
            Self::Thermometer => "thermometer",
            Self::Shirt => "shirt",
            Self::Snowflake => "snowflake",
            Self::Wind => "wind",
            Self::Droplets => "droplets",
            Self::Sun => "sun",
            Self::Cloud => "cloud",
            Self::AlertTriangle => "alert-triangle",
            Self::Mask => "mask",
        }
    }
}

/// One piece of advice. Titles are unique within a derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub icon: AdviceIcon,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Clone, Copy)]
pub enum Description {
    Fixed(&'static str),
    /// Rendered from the classification, e.g. to quote a reading
    Templated(fn(&Classification) -> String),
}

impl Description {
    fn render(&self, flags: &Classification) -> String {
        match self {
            Self::Fixed(text) => (*text).to_string(),
            Self::Templated(render) => render(flags),
        }
    }
}

/// A single advice rule: when `applies` holds, emit one entry
#[derive(Clone, Copy)]
pub struct AdviceRule {
    pub icon: AdviceIcon,
    pub title: &'static str,
    pub priority: Priority,
    pub applies: fn(&Classification) -> bool,
    pub description: Description,
}

impl AdviceRule {
    pub fn evaluate(&self, flags: &Classification) -> Option<Advisory> {
        if !(self.applies)(flags) {
            return None;
        }
        Some(Advisory {
            icon: self.icon,
            title: self.title.to_string(),
            description: self.description.render(flags),
            priority: self.priority,
        })
    }
}

/// The rule table, in evaluation order
pub fn rule_table() -> [AdviceRule; 11] {
    [
        AdviceRule {
            icon: AdviceIcon::Umbrella,
            title: "Bring an Umbrella",
            priority: Priority::High,
            applies: |f| f.rain,
            description: Description::Fixed(
                "Rain is expected in some areas. Keep an umbrella handy for unexpected showers.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Sunglasses,
            title: "UV Protection Needed",
            priority: Priority::High,
            applies: |f| f.extrema.max_uv_index >= UV_THRESHOLD,
            description: Description::Templated(|f: &Classification| {
                format!(
                    "UV index is {}. Wear sunscreen (SPF 30+), sunglasses, and seek shade during peak hours.",
                    f.extrema.max_uv_index
                )
            }),
        },
        AdviceRule {
            icon: AdviceIcon::Thermometer,
            title: "Stay Hydrated",
            priority: Priority::High,
            applies: |f| f.extrema.max_temperature >= HEAT_THRESHOLD,
            description: Description::Fixed(
                "High temperatures expected. Drink plenty of water and avoid prolonged outdoor exposure.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Shirt,
            title: "Bundle Up",
            priority: Priority::Medium,
            applies: |f| f.extrema.min_temperature <= COLD_THRESHOLD,
            description: Description::Fixed(
                "Cold temperatures ahead. Layer up with warm clothing and protect extremities.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Snowflake,
            title: "Winter Conditions",
            priority: Priority::High,
            applies: |f| f.snow,
            description: Description::Fixed(
                "Snow expected. Drive carefully and wear appropriate winter footwear.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Wind,
            title: "Strong Winds",
            priority: Priority::Medium,
            applies: |f| f.extrema.max_wind_speed >= WIND_THRESHOLD,
            description: Description::Fixed(
                "Windy conditions expected. Secure loose outdoor items and be cautious while driving.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Droplets,
            title: "High Humidity",
            priority: Priority::Low,
            applies: |f| f.extrema.max_humidity >= HUMIDITY_THRESHOLD,
            description: Description::Fixed(
                "Very humid conditions. Stay cool and consider indoor activities.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Sun,
            title: "Great Outdoor Weather",
            priority: Priority::Low,
            applies: |f| f.sunny && f.extrema.max_uv_index < UV_THRESHOLD,
            description: Description::Fixed(
                "Perfect conditions for outdoor activities. Enjoy the sunshine!",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Cloud,
            title: "Overcast Skies",
            priority: Priority::Low,
            applies: |f| f.clouds && !f.rain && !f.snow,
            description: Description::Fixed(
                "Cloudy conditions expected. It may feel cooler and less sunny than usual.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::AlertTriangle,
            title: "Reduced Visibility",
            priority: Priority::Medium,
            applies: |f| f.fog,
            description: Description::Fixed(
                "Foggy or hazy conditions may reduce visibility. Drive carefully and use fog lights if needed.",
            ),
        },
        AdviceRule {
            icon: AdviceIcon::Mask,
            title: "Poor Air Quality",
            priority: Priority::High,
            applies: |f| f.poor_air,
            description: Description::Fixed(
                "Air quality may be poor due to smoke or dust. Limit outdoor activities and consider wearing a mask.",
            ),
        },
    ]
}

/// Evaluate every rule against `flags`, most urgent first
pub fn evaluate(rules: &[AdviceRule], flags: &Classification) -> Vec<Advisory> {
    let mut advice: Vec<Advisory> = rules.iter().filter_map(|r| r.evaluate(flags)).collect();
    // sort_by_key is stable: equal priorities keep table order
    advice.sort_by_key(|a| a.priority.rank());
    advice
}

/// Derive advice for a set of observations.
///
/// Callers should not pass an empty slice; if they do, no rule fires and
/// the result is empty.
pub fn derive_advice(observations: &[Observation]) -> Vec<Advisory> {
    let flags = Classification::of(observations);
    let advice = evaluate(&rule_table(), &flags);
    tracing::debug!(
        "Derived {} advice entries from {} observations",
        advice.len(),
        observations.len()
    );
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCondition;
    use std::collections::HashSet;

    fn obs(
        condition: WeatherCondition,
        temperature: f64,
        uv_index: f64,
        wind_speed: f64,
        humidity: f64,
    ) -> Observation {
        Observation {
            condition,
            temperature,
            uv_index,
            wind_speed,
            humidity,
            ..Default::default()
        }
    }

    fn titles(advice: &[Advisory]) -> Vec<&str> {
        advice.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn rain_only_yields_umbrella() {
        let advice = derive_advice(&[obs(WeatherCondition::Rain, 20.0, 3.0, 10.0, 50.0)]);
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].title, "Bring an Umbrella");
        assert_eq!(advice[0].priority, Priority::High);
        assert_eq!(advice[0].icon, AdviceIcon::Umbrella);
    }

    #[test]
    fn clear_mild_yields_great_outdoor_weather() {
        let advice = derive_advice(&[obs(WeatherCondition::Clear, 25.0, 3.0, 10.0, 50.0)]);
        assert_eq!(titles(&advice), vec!["Great Outdoor Weather"]);
        assert_eq!(advice[0].priority, Priority::Low);
    }

    #[test]
    fn heat_fires_once_across_cities() {
        let advice = derive_advice(&[
            obs(WeatherCondition::Unknown, 10.0, 2.0, 5.0, 40.0),
            obs(WeatherCondition::Unknown, 40.0, 2.0, 5.0, 40.0),
        ]);
        let hydrated = advice.iter().filter(|a| a.title == "Stay Hydrated").count();
        assert_eq!(hydrated, 1);
    }

    #[test]
    fn sleet_fires_rain_and_snow() {
        let advice = derive_advice(&[obs(WeatherCondition::Sleet, 1.0, 0.0, 0.0, 60.0)]);
        let t = titles(&advice);
        assert!(t.contains(&"Bring an Umbrella"));
        assert!(t.contains(&"Winter Conditions"));
        assert!(t.contains(&"Bundle Up"));
    }

    #[test]
    fn uv_description_quotes_reading() {
        let advice = derive_advice(&[obs(WeatherCondition::Clear, 25.0, 8.0, 0.0, 30.0)]);
        let uv = advice
            .iter()
            .find(|a| a.title == "UV Protection Needed")
            .unwrap();
        assert!(uv.description.starts_with("UV index is 8."));

        let advice = derive_advice(&[obs(WeatherCondition::Clear, 25.0, 6.5, 0.0, 30.0)]);
        assert!(advice[0].description.starts_with("UV index is 6.5."));
    }

    #[test]
    fn high_uv_suppresses_good_weather() {
        for uv in [0.0, 3.0, 5.99, 6.0, 6.01, 11.0] {
            let advice = derive_advice(&[obs(WeatherCondition::Clear, 22.0, uv, 0.0, 30.0)]);
            let t = titles(&advice);
            let protection = t.contains(&"UV Protection Needed");
            let outdoor = t.contains(&"Great Outdoor Weather");
            assert!(protection != outdoor, "uv {uv}: {t:?}");
        }
    }

    #[test]
    fn overcast_suppressed_by_rain_or_snow() {
        let advice = derive_advice(&[obs(WeatherCondition::Clouds, 15.0, 1.0, 0.0, 50.0)]);
        assert_eq!(titles(&advice), vec!["Overcast Skies"]);

        let advice = derive_advice(&[
            obs(WeatherCondition::Clouds, 15.0, 1.0, 0.0, 50.0),
            obs(WeatherCondition::Drizzle, 15.0, 1.0, 0.0, 50.0),
        ]);
        assert!(!titles(&advice).contains(&"Overcast Skies"));

        let advice = derive_advice(&[
            obs(WeatherCondition::Clouds, 15.0, 1.0, 0.0, 50.0),
            obs(WeatherCondition::Snow, 15.0, 1.0, 0.0, 50.0),
        ]);
        assert!(!titles(&advice).contains(&"Overcast Skies"));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let advice = derive_advice(&[
            obs(WeatherCondition::Unknown, 35.0, 0.0, 25.0, 80.0),
            obs(WeatherCondition::Unknown, 5.0, 0.0, 0.0, 0.0),
        ]);
        let t = titles(&advice);
        assert!(t.contains(&"Stay Hydrated"));
        assert!(t.contains(&"Bundle Up"));
        assert!(t.contains(&"Strong Winds"));
        assert!(t.contains(&"High Humidity"));
    }

    #[test]
    fn sorted_by_priority_with_table_order_ties() {
        let advice = derive_advice(&[
            obs(WeatherCondition::Rain, 38.0, 9.0, 30.0, 90.0),
            obs(WeatherCondition::Fog, 2.0, 0.0, 0.0, 50.0),
            obs(WeatherCondition::Smoke, 20.0, 0.0, 0.0, 50.0),
            obs(WeatherCondition::Clear, 20.0, 0.0, 0.0, 50.0),
        ]);
        assert_eq!(
            titles(&advice),
            vec![
                "Bring an Umbrella",
                "UV Protection Needed",
                "Stay Hydrated",
                "Poor Air Quality",
                "Bundle Up",
                "Strong Winds",
                "Reduced Visibility",
                "High Humidity",
            ]
        );
        assert!(advice
            .windows(2)
            .all(|w| w[0].priority.rank() <= w[1].priority.rank()));
    }

    #[test]
    fn derivation_is_idempotent() {
        let input = [
            obs(WeatherCondition::Snow, -4.0, 1.0, 28.0, 85.0),
            obs(WeatherCondition::Haze, 12.0, 4.0, 3.0, 40.0),
        ];
        assert_eq!(derive_advice(&input), derive_advice(&input));
    }

    #[test]
    fn nan_readings_fire_nothing() {
        let advice = derive_advice(&[
            obs(WeatherCondition::Unknown, f64::NAN, f64::NAN, f64::NAN, f64::NAN),
            obs(WeatherCondition::Unknown, 45.0, 11.0, 60.0, 99.0),
        ]);
        assert!(advice.is_empty(), "{:?}", titles(&advice));
    }

    #[test]
    fn empty_input_yields_empty_advice() {
        assert!(derive_advice(&[]).is_empty());
    }

    #[test]
    fn rule_titles_are_unique() {
        let rules = rule_table();
        let unique: HashSet<_> = rules.iter().map(|r| r.title).collect();
        assert_eq!(unique.len(), rules.len());
    }

    #[test]
    fn rules_evaluate_in_isolation() {
        let rules = rule_table();
        let flags = Classification::of(&[obs(WeatherCondition::Dust, 20.0, 0.0, 0.0, 20.0)]);
        let fired: Vec<_> = rules.iter().filter_map(|r| r.evaluate(&flags)).collect();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].icon, AdviceIcon::Mask);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"medium\"");
        assert_eq!(
            serde_json::to_string(&AdviceIcon::AlertTriangle).unwrap(),
            "\"alert-triangle\""
        );
    }
}
