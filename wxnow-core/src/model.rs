use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InputError> {
        let coords = Self { latitude, longitude };
        coords.validate()?;
        Ok(coords)
    }

    /// NaN fails both range checks.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InputError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InputError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// What to look up: a city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    ByCity(String),
    ByCoordinates(Coordinates),
}

impl WeatherQuery {
    /// Trims the input; blank input is rejected with [`InputError::EmptyCity`].
    pub fn by_city(input: &str) -> Result<Self, InputError> {
        let name = input.trim();
        if name.is_empty() {
            return Err(InputError::EmptyCity);
        }
        Ok(Self::ByCity(name.to_string()))
    }

    pub fn by_coordinates(latitude: f64, longitude: f64) -> Result<Self, InputError> {
        Coordinates::new(latitude, longitude).map(Self::ByCoordinates)
    }

    /// Re-check a query that may have been built from its variants directly.
    pub fn validate(&self) -> Result<(), InputError> {
        match self {
            WeatherQuery::ByCity(name) if name.trim().is_empty() => Err(InputError::EmptyCity),
            WeatherQuery::ByCity(_) => Ok(()),
            WeatherQuery::ByCoordinates(coords) => coords.validate(),
        }
    }
}

/// Current conditions, in metric units as requested from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: Option<String>,
    pub condition: String,
    pub description: String,
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
}
