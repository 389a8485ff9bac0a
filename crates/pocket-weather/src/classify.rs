//! Condition classification.
//!
//! Reduces a set of observations to the group flags and extrema the advice
//! rules are written against. Flags use "any" semantics: a group is present
//! when at least one observation falls into it.

use crate::types::{Observation, WeatherCondition};

/// Fixed groupings of condition labels.
///
/// Groups may overlap: sleet is both rain and snow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionGroup {
    Rain,
    Sunny,
    Snow,
    Clouds,
    Fog,
    PoorAir,
}

impl ConditionGroup {
    pub const ALL: [ConditionGroup; 6] = [
        Self::Rain,
        Self::Sunny,
        Self::Snow,
        Self::Clouds,
        Self::Fog,
        Self::PoorAir,
    ];

    pub fn contains(&self, condition: WeatherCondition) -> bool {
        use WeatherCondition as C;
        match self {
            Self::Rain => matches!(condition, C::Rain | C::Drizzle | C::Thunderstorm | C::Sleet),
            Self::Sunny => matches!(condition, C::Clear),
            Self::Snow => matches!(condition, C::Snow | C::Sleet),
            Self::Clouds => matches!(condition, C::Clouds),
            Self::Fog => matches!(condition, C::Fog | C::Mist | C::Haze),
            Self::PoorAir => matches!(condition, C::Smoke | C::Dust | C::Sand | C::Ash),
        }
    }
}

/// Sequence-wide extrema.
///
/// Any NaN reading poisons the extremum it feeds, so every threshold
/// comparison against it is false. An empty input leaves maxima at -inf and
/// minima at +inf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub max_uv_index: f64,
    pub max_wind_speed: f64,
    pub max_humidity: f64,
}

impl Extrema {
    pub fn of(observations: &[Observation]) -> Self {
        Self {
            max_temperature: nan_max(observations.iter().map(|o| o.temperature)),
            min_temperature: nan_min(observations.iter().map(|o| o.temperature)),
            max_uv_index: nan_max(observations.iter().map(|o| o.uv_index)),
            max_wind_speed: nan_max(observations.iter().map(|o| o.wind_speed)),
            max_humidity: nan_max(observations.iter().map(|o| o.humidity)),
        }
    }
}

/// Maximum that propagates NaN instead of skipping it
pub(crate) fn nan_max(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::NEG_INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v)
        }
    })
}

/// Minimum that propagates NaN instead of skipping it
pub(crate) fn nan_min(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.min(v)
        }
    })
}

/// Group flags plus extrema for one set of observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub rain: bool,
    pub sunny: bool,
    pub snow: bool,
    pub clouds: bool,
    pub fog: bool,
    pub poor_air: bool,
    pub extrema: Extrema,
}

impl Classification {
    pub fn of(observations: &[Observation]) -> Self {
        let any = |group: ConditionGroup| observations.iter().any(|o| group.contains(o.condition));

        let skipped = observations.iter().filter(|o| !o.is_finite()).count();
        if skipped > 0 {
            tracing::debug!(
                "{} of {} observations carry non-finite readings",
                skipped,
                observations.len()
            );
        }

        Self {
            rain: any(ConditionGroup::Rain),
            sunny: any(ConditionGroup::Sunny),
            snow: any(ConditionGroup::Snow),
            clouds: any(ConditionGroup::Clouds),
            fog: any(ConditionGroup::Fog),
            poor_air: any(ConditionGroup::PoorAir),
            extrema: Extrema::of(observations),
        }
    }

    pub fn has(&self, group: ConditionGroup) -> bool {
        match group {
            ConditionGroup::Rain => self.rain,
            ConditionGroup::Sunny => self.sunny,
            ConditionGroup::Snow => self.snow,
            ConditionGroup::Clouds => self.clouds,
            ConditionGroup::Fog => self.fog,
            ConditionGroup::PoorAir => self.poor_air,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(condition: WeatherCondition, temperature: f64) -> Observation {
        Observation {
            condition,
            temperature,
            ..Default::default()
        }
    }

    #[test]
    fn sleet_is_rain_and_snow() {
        assert!(ConditionGroup::Rain.contains(WeatherCondition::Sleet));
        assert!(ConditionGroup::Snow.contains(WeatherCondition::Sleet));
    }

    #[test]
    fn every_condition_outside_groups_is_unflagged() {
        for condition in [
            WeatherCondition::Squall,
            WeatherCondition::Tornado,
            WeatherCondition::Unknown,
        ] {
            let flags = Classification::of(&[obs(condition, 10.0)]);
            for group in ConditionGroup::ALL {
                assert!(!flags.has(group), "{condition} flagged as {group:?}");
            }
        }
    }

    #[test]
    fn flags_use_any_semantics() {
        let flags = Classification::of(&[
            obs(WeatherCondition::Clear, 20.0),
            obs(WeatherCondition::Mist, 12.0),
            obs(WeatherCondition::Ash, 15.0),
        ]);
        assert!(flags.sunny);
        assert!(flags.fog);
        assert!(flags.poor_air);
        assert!(!flags.rain);
        assert!(!flags.snow);
        assert!(!flags.clouds);
    }

    #[test]
    fn extrema_span_all_observations() {
        let mut a = obs(WeatherCondition::Clear, 10.0);
        a.uv_index = 2.0;
        a.wind_speed = 30.0;
        a.humidity = 40.0;
        let mut b = obs(WeatherCondition::Clouds, 40.0);
        b.uv_index = 7.5;
        b.wind_speed = 5.0;
        b.humidity = 85.0;

        let extrema = Extrema::of(&[a, b]);
        assert_eq!(extrema.max_temperature, 40.0);
        assert_eq!(extrema.min_temperature, 10.0);
        assert_eq!(extrema.max_uv_index, 7.5);
        assert_eq!(extrema.max_wind_speed, 30.0);
        assert_eq!(extrema.max_humidity, 85.0);
    }

    #[test]
    fn empty_input_has_infinite_extrema() {
        let extrema = Extrema::of(&[]);
        assert_eq!(extrema.max_temperature, f64::NEG_INFINITY);
        assert_eq!(extrema.min_temperature, f64::INFINITY);
    }

    #[test]
    fn nan_poisons_extremum() {
        let extrema = Extrema::of(&[
            obs(WeatherCondition::Clear, 38.0),
            obs(WeatherCondition::Clear, f64::NAN),
        ]);
        assert!(extrema.max_temperature.is_nan());
        assert!(extrema.min_temperature.is_nan());
        assert_eq!(extrema.max_uv_index, 0.0);
    }
}
