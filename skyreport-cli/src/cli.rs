use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use skyreport_core::{Aggregator, Config, Coordinate, config::parse_timezone};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyreport", version, about = "Weather, sun and moon report for a coordinate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve consolidated reports over HTTP.
    Serve {
        /// Listen address; overrides the configured `bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print one consolidated report as JSON.
    Show {
        /// Latitude, e.g. "-6.2".
        #[arg(allow_hyphen_values = true)]
        lat: String,

        /// Longitude, e.g. "106.8".
        #[arg(allow_hyphen_values = true)]
        lon: String,
    },

    /// Interactively set time zone, upstream timeout and listen address.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let config = Config::load()?.with_env_overrides()?;
                let bind = bind.unwrap_or_else(|| config.bind.clone());
                let aggregator = Aggregator::from_config(&config)?;
                server::run(aggregator, &bind).await?;
            }
            Command::Show { lat, lon } => {
                let config = Config::load()?.with_env_overrides()?;
                let aggregator = Aggregator::from_config(&config)?;
                let result = aggregator
                    .aggregate(&Coordinate::new(lat, lon))
                    .await
                    .context("Failed to build report")?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let timezone = Text::new("Time zone for sun times:")
        .with_default(&config.timezone)
        .with_help_message("IANA name, e.g. Asia/Jakarta")
        .prompt()?;
    parse_timezone(&timezone)?;

    let timeout = CustomType::<u64>::new("Upstream timeout (seconds):")
        .with_default(config.upstream_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    let bind = Text::new("Listen address:").with_default(&config.bind).prompt()?;

    config.timezone = timezone;
    config.upstream_timeout_secs = timeout;
    config.bind = bind;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
