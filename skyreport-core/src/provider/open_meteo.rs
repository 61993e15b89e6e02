use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    UpstreamError,
    config::Endpoints,
    model::{Coordinate, WeatherReading},
};

use super::{Upstream, WeatherSource, fetch_json};

const CURRENT_FIELDS: &str = "temperature_2m,precipitation,cloud_cover,uv_index";
const AQI_FIELD: &str = "european_aqi";

/// Open-Meteo forecast and air-quality APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    http: Client,
    timeout: Duration,
    endpoints: Endpoints,
}

impl OpenMeteoWeather {
    pub fn new(http: Client, timeout: Duration, endpoints: Endpoints) -> Self {
        Self {
            http,
            timeout,
            endpoints,
        }
    }

    #[instrument(skip(self, coord), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn fetch_conditions(&self, coord: &Coordinate) -> Result<OmCurrent, UpstreamError> {
        let parsed: OmForecastResponse = fetch_json(
            &self.http,
            Upstream::Weather,
            self.timeout,
            &self.endpoints.forecast,
            &[
                ("latitude", coord.lat.as_str()),
                ("longitude", coord.lon.as_str()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
            ],
        )
        .await?;

        Ok(parsed.current)
    }

    #[instrument(skip(self, coord), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn fetch_aqi(&self, coord: &Coordinate) -> Result<Option<i64>, UpstreamError> {
        let parsed: OmAirQualityResponse = fetch_json(
            &self.http,
            Upstream::AirQuality,
            self.timeout,
            &self.endpoints.air_quality,
            &[
                ("latitude", coord.lat.as_str()),
                ("longitude", coord.lon.as_str()),
                ("current", AQI_FIELD),
                ("hourly", AQI_FIELD),
                ("timezone", "auto"),
            ],
        )
        .await?;

        Ok(parsed.aqi_at(Utc::now()))
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoWeather {
    async fn current_weather(&self, coord: &Coordinate) -> Result<WeatherReading, UpstreamError> {
        // Air quality is a separate source; it is only ever allowed to degrade the reading.
        let (conditions, aqi) = tokio::join!(self.fetch_conditions(coord), self.fetch_aqi(coord));
        let conditions = conditions?;

        let aqi = match aqi {
            Ok(Some(value)) => value,
            Ok(None) => {
                warn!(
                    lat = %coord.lat,
                    lon = %coord.lon,
                    "air-quality response had no usable sample, using AQI 0"
                );
                0
            }
            Err(err) => {
                warn!(
                    lat = %coord.lat,
                    lon = %coord.lon,
                    error = %err,
                    "air-quality lookup failed, using AQI 0"
                );
                0
            }
        };

        debug!(temperature = conditions.temperature_2m, aqi, "weather reading assembled");

        Ok(WeatherReading {
            temperature: conditions.temperature_2m,
            precipitation: conditions.precipitation,
            cloud_cover: conditions.cloud_cover.round() as i64,
            uv_index: conditions.uv_index,
            aqi,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    precipitation: f64,
    cloud_cover: f64,
    uv_index: f64,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
}

#[derive(Debug, Default, Deserialize)]
struct OmAqCurrent {
    european_aqi: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OmAqHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    european_aqi: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmAirQualityResponse {
    #[serde(default)]
    utc_offset_seconds: i64,
    current: Option<OmAqCurrent>,
    hourly: Option<OmAqHourly>,
}

impl OmAirQualityResponse {
    /// A direct current value wins; otherwise pick from the hourly series.
    fn aqi_at(&self, now: DateTime<Utc>) -> Option<i64> {
        if let Some(value) = self.current.as_ref().and_then(|c| c.european_aqi) {
            return Some(value.round() as i64);
        }

        let hourly = self.hourly.as_ref()?;
        let local_now = now.naive_utc() + chrono::Duration::seconds(self.utc_offset_seconds);
        select_hourly(hourly, local_now).map(|value| value.round() as i64)
    }
}

/// Latest non-null sample whose hour has started, else the last non-null sample.
///
/// `hourly.time` holds local wall-clock strings (`2024-05-01T13:00`).
fn select_hourly(hourly: &OmAqHourly, local_now: NaiveDateTime) -> Option<f64> {
    let started = hourly
        .time
        .iter()
        .zip(&hourly.european_aqi)
        .filter_map(|(time, value)| {
            let value = (*value)?;
            let at = NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M").ok()?;
            (at <= local_now).then_some((at, value))
        })
        .max_by_key(|(at, _)| *at)
        .map(|(_, value)| value);

    started.or_else(|| hourly.european_aqi.iter().rev().find_map(|value| *value))
}
