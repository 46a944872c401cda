use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use tracing::debug;
use wxnow_core::{
    Config, Coordinates, FetchState, FixedLocation, WeatherQuery, WeatherSession,
    client_from_config,
};

use crate::render::WeatherPanel;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxnow", version, about = "Current weather for a city or a location")]
pub struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and an optional fixed location.
    Configure,

    /// Show current weather.
    ///
    /// Without a city or coordinates, the configured location is used.
    Show {
        /// City name, e.g. "London".
        city: Option<String>,

        /// Latitude in decimal degrees.
        #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", conflicts_with = "city", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

#[derive(Debug)]
enum Target {
    City(String),
    Query(WeatherQuery),
    Here(FixedLocation),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon } => {
                let config = Config::load()?;
                let target = match (city, lat, lon) {
                    (Some(city), _, _) => Target::City(city),
                    (None, Some(lat), Some(lon)) => Target::Query(
                        WeatherQuery::by_coordinates(lat, lon).context("Invalid coordinates")?,
                    ),
                    _ => Target::Here(FixedLocation::new(config.location)),
                };
                show(&config, target).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.to_string());

    let pin_location = Confirm::new("Set a fixed location for `wxnow show` without a city?")
        .with_default(config.location.is_some())
        .prompt()?;

    if pin_location {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Enter a number in decimal degrees")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Enter a number in decimal degrees")
            .prompt()?;
        let coords = Coordinates::new(latitude, longitude).context("Invalid location")?;
        config.set_location(Some(coords));
    } else {
        config.set_location(None);
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(config: &Config, target: Target) -> anyhow::Result<()> {
    let fetcher = client_from_config(config)?;
    let (mut session, mut events) = WeatherSession::new(fetcher);

    debug!(?target, "starting weather lookup");
    let lookup = tokio::spawn(async move {
        match target {
            Target::City(city) => session.submit_city(&city).await,
            Target::Query(query) => session.submit(query).await,
            Target::Here(location) => session.submit_location(&location).await,
        }
    });

    // The panel is owned here; the lookup task only sends events.
    let mut panel = WeatherPanel::default();
    while let Some(event) = events.recv().await {
        let was_loading = panel.loading;
        panel.apply(event);
        if panel.loading && !was_loading {
            eprintln!("Loading...");
        }
    }

    let state = lookup.await.context("Weather lookup task failed")?;
    let panel = finish(state, panel)?;
    panel.write_to(&mut std::io::stdout().lock())?;
    Ok(())
}

/// A succeeded lookup is printed as is, even if some provider fields are blank.
fn finish(state: FetchState, panel: WeatherPanel) -> anyhow::Result<WeatherPanel> {
    if state == FetchState::Succeeded {
        return Ok(panel);
    }

    match panel.message {
        Some(message) => bail!(message),
        None => bail!("No weather data received"),
    }
}
