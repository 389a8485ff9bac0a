//! Dashboard session state.
//!
//! Tracks the selected cities, their latest observations, and the alerts
//! fetched for the current location. Everything is in memory; derived
//! views (advice, comparison, relevant alerts) are recomputed on demand.

use crate::advice::{derive_advice, Advisory};
use crate::alerts::relevant_alerts;
use crate::compare::ComparisonTable;
use crate::types::{City, Observation, WeatherAlert};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("City already added: {0}")]
    AlreadyAdded(String),
    #[error("City not found: {0}")]
    NotFound(String),
    #[error("The current location cannot be removed")]
    CurrentLocation,
}

/// Selected cities with their observations, kept index-aligned
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    cities: Vec<City>,
    weather: Vec<Observation>,
    alerts: Vec<WeatherAlert>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over from a located position.
    ///
    /// The located city becomes the only, non-removable entry and `alerts`
    /// replace any previously fetched alerts.
    pub fn set_current_location(
        &mut self,
        city: City,
        mut observation: Observation,
        alerts: Vec<WeatherAlert>,
    ) {
        tracing::info!("Current location set to {}", city.display_name());
        observation.id = city.id.clone();
        observation.is_current_location = true;
        self.cities = vec![city];
        self.weather = vec![observation];
        self.alerts = alerts;
    }

    /// Track another city. The observation takes the city's id.
    pub fn add_city(&mut self, city: City, mut observation: Observation) -> Result<(), DashboardError> {
        if self.cities.iter().any(|c| c.id == city.id) {
            return Err(DashboardError::AlreadyAdded(city.name));
        }
        tracing::debug!("Adding city {} ({})", city.name, city.id);
        observation.id = city.id.clone();
        observation.is_current_location = false;
        self.cities.push(city);
        self.weather.push(observation);
        Ok(())
    }

    /// Stop tracking a city.
    pub fn remove_city(&mut self, id: &str) -> Result<City, DashboardError> {
        let index = self
            .cities
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))?;

        if self.weather[index].is_current_location {
            return Err(DashboardError::CurrentLocation);
        }

        self.weather.remove(index);
        let city = self.cities.remove(index);
        tracing::debug!("Removed city {}", city.name);
        Ok(city)
    }

    /// Swap in a fresh observation for an already tracked city.
    pub fn replace_observation(&mut self, mut observation: Observation) -> Result<(), DashboardError> {
        let slot = self
            .weather
            .iter_mut()
            .find(|w| w.id == observation.id)
            .ok_or_else(|| DashboardError::NotFound(observation.id.clone()))?;
        observation.is_current_location = slot.is_current_location;
        *slot = observation;
        Ok(())
    }

    /// Returns false when no alert has that id
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        before != self.alerts.len()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn observations(&self) -> &[Observation] {
        &self.weather
    }

    pub fn alerts(&self) -> &[WeatherAlert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn selected_city_names(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn relevant_alerts(&self) -> Vec<&WeatherAlert> {
        relevant_alerts(&self.alerts, &self.selected_city_names())
    }

    /// Advice across all tracked cities; `None` when nothing is tracked
    pub fn advice(&self) -> Option<Vec<Advisory>> {
        if self.weather.is_empty() {
            return None;
        }
        Some(derive_advice(&self.weather))
    }

    /// City comparison; `None` with fewer than two cities
    pub fn comparison(&self) -> Option<ComparisonTable> {
        ComparisonTable::build(&self.weather)
    }
}
