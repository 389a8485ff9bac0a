//! Alert selection.

use crate::types::WeatherAlert;

/// Alerts naming at least one of the selected cities, in their original
/// order. City names match exactly.
pub fn relevant_alerts<'a, S: AsRef<str>>(
    alerts: &'a [WeatherAlert],
    selected_cities: &[S],
) -> Vec<&'a WeatherAlert> {
    alerts
        .iter()
        .filter(|alert| {
            alert
                .cities
                .iter()
                .any(|city| selected_cities.iter().any(|s| s.as_ref() == city.as_str()))
        })
        .collect()
}
