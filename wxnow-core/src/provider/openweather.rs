use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::{FetchError, InputError},
    model::{WeatherQuery, WeatherReport},
};

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Connection settings for [`OpenWeatherClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Scheme and host, e.g. `https://api.openweathermap.org`.
    pub base_url: String,
    /// Upper bound for the whole request, including reading the body.
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

/// Current-weather client for OpenWeatherMap. One request per `fetch`, no retries.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoint: Url,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_settings(api_key, ClientSettings::default())
    }

    pub fn with_settings(
        api_key: impl Into<String>,
        settings: ClientSettings,
    ) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(InputError::EmptyApiKey.into());
        }

        let base = settings.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}{CURRENT_WEATHER_PATH}"))
            .map_err(|_| InputError::InvalidBaseUrl(settings.base_url.clone()))?;

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FetchError::NetworkFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { api_key, endpoint, timeout: settings.timeout, http })
    }

    /// Full request URL. Parameter order: location, `units`, `appid`.
    pub fn request_url(&self, query: &WeatherQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                WeatherQuery::ByCity(name) => {
                    pairs.append_pair("q", name);
                }
                WeatherQuery::ByCoordinates(coords) => {
                    pairs
                        .append_pair("lat", &coords.latitude.to_string())
                        .append_pair("lon", &coords.longitude.to_string());
                }
            }
            pairs.append_pair("units", "metric").append_pair("appid", &self.api_key);
        }
        url
    }

    fn transport_failure(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::NetworkFailure(format!("request timed out after {:?}", self.timeout));
        }

        // The URL carries the API key.
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        FetchError::NetworkFailure(message)
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError> {
        query.validate()?;

        let url = self.request_url(query);
        debug!(url = %redacted(&url), "requesting current weather");

        let res = self.http.get(url).send().await.map_err(|e| {
            let err = self.transport_failure(e);
            warn!(error = %err, "weather request failed");
            err
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_failure(e))?;

        if !status.is_success() {
            let message = http_failure_message(status, &body);
            warn!(status = status.as_u16(), %message, "weather provider rejected request");
            return Err(FetchError::HttpFailure { status: status.as_u16(), message });
        }

        parse_current(&body).inspect_err(|err| {
            warn!(error = %err, body = %truncate_body(&body), "unexpected weather payload");
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: Option<String>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

fn parse_current(body: &str) -> Result<WeatherReport, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MalformedResponse("weather: array is empty".to_string()))?;

    Ok(WeatherReport {
        location_name: parsed.name.filter(|name| !name.trim().is_empty()),
        condition: weather.main,
        description: weather.description,
        temperature_celsius: parsed.main.temp,
        feels_like_celsius: parsed.main.feels_like,
    })
}

/// Prefer OpenWeatherMap's `{"message": ...}`, then the reason phrase.
fn http_failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.as_str().to_string())
}

fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut out = url.clone();
    {
        let mut query = out.query_pairs_mut();
        query.clear();
        for (k, v) in &pairs {
            query.append_pair(k, v);
        }
    }
    out
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
