use crate::{
    Config, Coordinate, SunTimes, UpstreamError, WeatherReading,
    provider::{open_meteo::OpenMeteoWeather, sunrise_sunset::SunriseSunset},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};

pub mod open_meteo;
pub mod sunrise_sunset;

/// An outbound data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Weather,
    AirQuality,
    Sun,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Weather => "weather",
            Upstream::AirQuality => "air-quality",
            Upstream::Sun => "sun",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions plus air quality for a coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, coord: &Coordinate) -> Result<WeatherReading, UpstreamError>;
}

/// Sunrise, sunset and golden-hour end for a coordinate.
#[async_trait]
pub trait SunSource: Send + Sync + Debug {
    async fn sun_times(&self, coord: &Coordinate) -> Result<SunTimes, UpstreamError>;
}

/// Construct the Open-Meteo weather client from config.
pub fn weather_source_from_config(config: &Config) -> anyhow::Result<OpenMeteoWeather> {
    let http = http_client(config.upstream_timeout())?;
    Ok(OpenMeteoWeather::new(http, config.upstream_timeout(), config.endpoints.clone()))
}

/// Construct the sunrise-sunset.org client from config.
pub fn sun_source_from_config(config: &Config) -> anyhow::Result<SunriseSunset> {
    let http = http_client(config.upstream_timeout())?;
    let tz = config.target_timezone()?;
    Ok(SunriseSunset::new(http, config.upstream_timeout(), config.endpoints.sun.clone(), tz))
}

pub(crate) fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(client)
}

/// GET `url` with `query`, require a success status and decode the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    http: &Client,
    upstream: Upstream,
    timeout: Duration,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, UpstreamError> {
    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| transport_error(upstream, timeout, e))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| transport_error(upstream, timeout, e))?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            upstream,
            status: status.to_string(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { upstream, source })
}

fn transport_error(upstream: Upstream, timeout: Duration, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout {
            upstream,
            after: timeout,
        }
    } else {
        UpstreamError::Transport {
            upstream,
            source: err,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
