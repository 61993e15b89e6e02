//! Core library for `skyreport`.
//!
//! This crate defines:
//! - Configuration handling (target time zone, upstream timeout, endpoints)
//! - Provider contracts and their Open-Meteo / sunrise-sunset.org clients
//! - The moon phase and hiking index calculators
//! - The aggregator that joins everything into one [`ConsolidatedResult`]
//!
//! It is used by `skyreport-cli`, which serves the result over HTTP.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod hiking;
pub mod model;
pub mod moon;
pub mod provider;

pub use aggregator::Aggregator;
pub use config::{Config, Endpoints};
pub use error::UpstreamError;
pub use model::{
    ConsolidatedResult, Coordinate, HikingAssessment, HikingTier, MoonPhase, PhaseName, SunTimes,
    WeatherReading,
};
pub use provider::{SunSource, Upstream, WeatherSource};
