//! Core library for the `wxnow` CLI.
//!
//! This crate defines:
//! - The query/report model and the fetch error taxonomy
//! - The OpenWeatherMap current-weather client behind [`WeatherFetcher`]
//! - A presentation session that drives one display surface over a channel
//! - Configuration & credentials handling
//!
//! It is used by `wxnow-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::{FetchError, InputError};
pub use location::{FixedLocation, LocationError, LocationProvider};
pub use model::{Coordinates, WeatherQuery, WeatherReport};
pub use provider::{
    WeatherFetcher, client_from_config,
    openweather::{ClientSettings, OpenWeatherClient},
};
pub use session::{FetchState, PresentationEvent, WeatherSession};
