use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Select, Text};
use tracing::debug;
use weather_widget_core::{Config, FormValues, HttpWeatherClient, Unit, WeatherWidget};

use crate::page::{Output, TerminalPage};

const MAX_DAYS: u8 = 10;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Weather widget for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and render weather for a city.
    Show {
        /// City name.
        city: String,

        /// Temperature unit: °C, °F, C or F.
        #[arg(long, value_parser = parse_unit)]
        unit: Option<Unit>,

        /// Number of forecast days.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_DAYS as i64))]
        days: Option<u8>,

        #[command(flatten)]
        target: Target,
    },

    /// Fill in the form interactively, then fetch and render.
    Ask {
        #[command(flatten)]
        target: Target,
    },

    /// Set the endpoint and default form values.
    Configure,
}

/// Where the request goes and where the rendered HTML ends up.
#[derive(Debug, Args)]
pub struct Target {
    /// Endpoint URL, overriding the configured one.
    #[arg(long)]
    endpoint: Option<String>,

    /// Write the rendered HTML to this file instead of stdout.
    #[arg(long, short)]
    out: Option<PathBuf>,
}

fn parse_unit(value: &str) -> Result<Unit, String> {
    Unit::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show {
                city,
                unit,
                days,
                target,
            } => {
                let form = FormValues {
                    city,
                    unit: unit.unwrap_or(config.defaults.unit),
                    days: days.unwrap_or(config.defaults.days),
                };
                submit(&config, form, target).await
            }
            Command::Ask { target } => {
                let form = prompt_form(&config)?;
                submit(&config, form, target).await
            }
            Command::Configure => configure(config),
        }
    }
}

async fn submit(config: &Config, form: FormValues, target: Target) -> anyhow::Result<()> {
    let mut endpoint = config.endpoint.clone();
    if let Some(url) = target.endpoint {
        endpoint.url = url;
    }
    debug!(endpoint = %endpoint.url, ?form, "Submitting form");

    let client = HttpWeatherClient::new(endpoint)?;
    let page = TerminalPage::new(form, Output::from(target.out));

    WeatherWidget::new(client, &page).submit().await;
    page.flush().context("Failed to write widget output")
}

fn prompt_form(config: &Config) -> anyhow::Result<FormValues> {
    let city = Text::new("City:").prompt().context("City prompt aborted")?;
    let unit = prompt_unit(config.defaults.unit)?;
    let days = prompt_days(config.defaults.days)?;

    Ok(FormValues { city, unit, days })
}

fn prompt_unit(default: Unit) -> anyhow::Result<Unit> {
    let units = Unit::all().to_vec();
    let cursor = units.iter().position(|u| *u == default).unwrap_or(0);

    Select::new("Unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Unit prompt aborted")
}

fn prompt_days(default: u8) -> anyhow::Result<u8> {
    let days: Vec<u8> = (1..=MAX_DAYS).collect();
    let cursor = days.iter().position(|d| *d == default).unwrap_or(0);

    Select::new("Days:", days)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Days prompt aborted")
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let url = Text::new("Endpoint URL:")
        .with_initial_value(&config.endpoint.url)
        .prompt()
        .context("Endpoint prompt aborted")?;
    config.set_endpoint_url(url.trim());
    config.defaults.unit = prompt_unit(config.defaults.unit)?;
    config.defaults.days = prompt_days(config.defaults.days)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
