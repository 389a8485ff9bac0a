mod error_mapping;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use pocket_core::{AppError, Config, ConfigError};
use pocket_weather::{
    derive_advice, Advisory, City, ComparisonTable, Dashboard, DashboardError, Observation,
    ProviderSettings, WeatherAlert, WeatherProvider,
};

use error_mapping::{from_dashboard, from_provider};

#[derive(Parser, Debug)]
#[command(name = "pocket-weather", version, about = "Compare weather across cities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and show weather, alerts, comparison and advice
    Show {
        /// City names; defaults to `dashboard.default_cities`
        cities: Vec<String>,
        /// Include the configured home location as the current location
        #[arg(long)]
        here: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Search for cities by name
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: u8,
    },
    /// Derive advice and comparison from a JSON file of observations
    Advice {
        #[arg(long)]
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location and validate it
    Config,
}

/// Everything the dashboard shows, for `--json`
#[derive(Serialize)]
struct Report<'a> {
    observations: &'a [Observation],
    alerts: Vec<&'a WeatherAlert>,
    comparison: Option<ComparisonTable>,
    advice: Option<Vec<Advisory>>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = pocket_core::init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Show { cities, here, json } => {
            let (config, _) = Config::load_validated()?;
            let dashboard = build_dashboard(&config, cities, here).await?;
            print_dashboard(&dashboard, json)
        }
        Command::Search { query, limit } => {
            let (config, _) = Config::load_validated()?;
            let provider = provider(&config)?;
            let cities = provider
                .geocoder()
                .search_cities(&query, limit)
                .await
                .map_err(from_provider)?;
            if cities.is_empty() {
                println!("No cities match \"{}\"", query.trim());
            }
            for city in cities {
                println!("{:<40} {:>8.3} {:>9.3}", city.display_name(), city.lat, city.lon);
            }
            Ok(())
        }
        Command::Advice { file, json } => {
            let contents = std::fs::read_to_string(&file)?;
            let observations: Vec<Observation> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            print_views(&observations, Vec::new(), json)
        }
        Command::Config => {
            let path = Config::config_path()?;
            let config = Config::load()?;
            let validation = config.validate();
            println!("Config file: {}", path.display());
            for warning in &validation.warnings {
                println!("  warning: {}", warning);
            }
            for error in &validation.errors {
                println!("  error: {}", error);
            }
            if validation.is_valid() {
                println!("Configuration is valid");
                Ok(())
            } else {
                Err(ConfigError::Invalid(validation.error_summary()).into())
            }
        }
    }
}

fn provider(config: &Config) -> Result<WeatherProvider, AppError> {
    let settings = ProviderSettings {
        api_base_url: config.weather.api_base_url.clone(),
        geo_base_url: config.weather.geo_base_url.clone(),
        api_key: config.weather.resolved_api_key(),
        timeout: Duration::from_secs(config.weather.request_timeout_secs),
    };
    WeatherProvider::new(settings).map_err(from_provider)
}

/// Fetch everything sequentially: current location first, then each city
async fn build_dashboard(
    config: &Config,
    names: Vec<String>,
    here: bool,
) -> Result<Dashboard, AppError> {
    let provider = provider(config)?;
    let geocoder = provider.geocoder();
    let mut dashboard = Dashboard::new();

    let names = if names.is_empty() {
        config.dashboard.default_cities.clone()
    } else {
        names
    };

    let home = match (here, config.dashboard.home) {
        (true, None) => {
            return Err(ConfigError::MissingSetting("dashboard.home".into()).into());
        }
        (true, Some(home)) => Some(home),
        // With nothing else to show, fall back to home
        (false, home) if names.is_empty() => home,
        (false, _) => None,
    };

    if let Some(home) = home {
        let city = geocoder
            .reverse(home.latitude, home.longitude)
            .await
            .map_err(from_provider)?
            .unwrap_or_else(|| City {
                id: City::located_id(home.latitude, home.longitude),
                name: "Current Location".to_string(),
                country: String::new(),
                state: None,
                lat: home.latitude,
                lon: home.longitude,
            });
        let snapshot = provider.fetch_snapshot(&city).await.map_err(from_provider)?;
        dashboard.set_current_location(city, snapshot.observation, snapshot.alerts);
    }

    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let found = geocoder.search_cities(name, 1).await.map_err(from_provider)?;
        let Some(city) = found.into_iter().next() else {
            tracing::warn!("No city matches \"{}\", skipping", name);
            continue;
        };
        let observation = provider.fetch_observation(&city).await.map_err(from_provider)?;
        match dashboard.add_city(city, observation) {
            Err(DashboardError::AlreadyAdded(name)) => {
                tracing::warn!("{} is already on the dashboard", name);
            }
            other => other.map_err(from_dashboard)?,
        }
    }

    tracing::info!("Dashboard has {} cities", dashboard.len());
    Ok(dashboard)
}

fn print_dashboard(dashboard: &Dashboard, json: bool) -> Result<(), AppError> {
    if dashboard.is_empty() && !json {
        println!("No cities selected. Pass city names or set dashboard.default_cities.");
        return Ok(());
    }
    print_views(dashboard.observations(), dashboard.relevant_alerts(), json)
}

fn print_views(
    observations: &[Observation],
    alerts: Vec<&WeatherAlert>,
    json: bool,
) -> Result<(), AppError> {
    let advice = (!observations.is_empty()).then(|| derive_advice(observations));
    let comparison = ComparisonTable::build(observations);

    if json {
        let report = Report {
            observations,
            alerts,
            comparison,
            advice,
        };
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", render::cards(observations));
    if !alerts.is_empty() {
        println!("{}", render::alerts(&alerts));
    }
    if let Some(table) = &comparison {
        println!("{}", render::comparison(table));
    }
    if let Some(advice) = &advice {
        println!("{}", render::advice(advice));
    }
    Ok(())
}
