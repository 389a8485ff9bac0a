//! City search and reverse geocoding via the OpenWeatherMap geocoding API.

use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::provider::read_json;
use crate::types::{City, WeatherError};

const DIRECT_PATH: &str = "/geo/1.0/direct";
const REVERSE_PATH: &str = "/geo/1.0/reverse";

/// Upper bound the API accepts for `limit`
pub const MAX_RESULTS: u8 = 5;

#[derive(Debug, Deserialize)]
struct OwmPlace {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
    state: Option<String>,
}

impl OwmPlace {
    fn into_city(self, id: String, lat: f64, lon: f64) -> City {
        City {
            id,
            name: self.name,
            country: self.country,
            state: self.state,
            lat,
            lon,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl Geocoder {
    pub fn new(client: Arc<Client>, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)
    }

    /// Find cities by name. A blank query returns no results without a
    /// request.
    pub async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<City>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit.clamp(1, MAX_RESULTS);

        let response = self
            .client
            .get(self.url(DIRECT_PATH))
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", self.api_key()?.to_string()),
            ])
            .send()
            .await?;

        let places: Vec<OwmPlace> = read_json(response, query).await?;
        let cities: Vec<City> = places
            .into_iter()
            .map(|p| {
                let (lat, lon) = (p.lat, p.lon);
                p.into_city(City::located_id(lat, lon), lat, lon)
            })
            .collect();

        tracing::debug!("Search '{}' matched {} cities", query, cities.len());
        Ok(cities)
    }

    /// Name the place at a position.
    ///
    /// The returned city keeps the queried coordinates and is identified by
    /// them, so a located position always maps to the same id.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<City>, WeatherError> {
        let response = self
            .client
            .get(self.url(REVERSE_PATH))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key()?.to_string()),
            ])
            .send()
            .await?;

        let places: Vec<OwmPlace> = read_json(response, &format!("{}, {}", lat, lon)).await?;

        let city = places
            .into_iter()
            .next()
            .map(|p| p.into_city(City::located_id(lat, lon), lat, lon));

        match &city {
            Some(c) => tracing::info!("Reverse geocoded to: {}", c.display_name()),
            None => tracing::debug!("No place found at {}, {}", lat, lon),
        }
        Ok(city)
    }
}
