use crate::{
    Config, FetchError, WeatherQuery, WeatherReport,
    provider::openweather::{ClientSettings, OpenWeatherClient},
};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Turns a [`WeatherQuery`] into exactly one provider request.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError>;
}

#[async_trait]
impl<T: WeatherFetcher + ?Sized> WeatherFetcher for Box<T> {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError> {
        (**self).fetch(query).await
    }
}

/// Construct the OpenWeatherMap client from config (API key, base URL, timeout).
pub fn client_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherFetcher>> {
    let api_key = config.resolve_api_key()?;

    let mut settings = ClientSettings { timeout: config.timeout(), ..Default::default() };
    if let Some(base_url) = &config.base_url {
        settings.base_url = base_url.clone();
    }

    let client = OpenWeatherClient::with_settings(api_key, settings)
        .context("Failed to set up OpenWeather client")?;

    Ok(Box::new(client))
}
