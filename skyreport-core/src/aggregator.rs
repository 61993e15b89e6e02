use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

use crate::{
    Config, UpstreamError, hiking,
    model::{ConsolidatedResult, Coordinate},
    moon,
    provider::{SunSource, WeatherSource, sun_source_from_config, weather_source_from_config},
};

/// Fans one coordinate out to both providers and folds the answers into one result.
#[derive(Debug, Clone)]
pub struct Aggregator {
    weather: Arc<dyn WeatherSource>,
    sun: Arc<dyn SunSource>,
}

impl Aggregator {
    pub fn new(weather: Arc<dyn WeatherSource>, sun: Arc<dyn SunSource>) -> Self {
        Self { weather, sun }
    }

    /// Wire the Open-Meteo and sunrise-sunset.org clients.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let weather = weather_source_from_config(config)?;
        let sun = sun_source_from_config(config)?;
        Ok(Self::new(Arc::new(weather), Arc::new(sun)))
    }

    pub async fn aggregate(&self, coord: &Coordinate) -> Result<ConsolidatedResult, UpstreamError> {
        self.aggregate_at(coord, Utc::now()).await
    }

    /// Like [`Aggregator::aggregate`], with the moon computed for `now`.
    ///
    /// Both provider calls always run to completion. Any failure fails the
    /// whole result; when both fail the weather error is returned.
    pub async fn aggregate_at(
        &self,
        coord: &Coordinate,
        now: DateTime<Utc>,
    ) -> Result<ConsolidatedResult, UpstreamError> {
        let span = info_span!("aggregate", lat = %coord.lat, lon = %coord.lon);

        async {
            let (weather, sun) =
                tokio::join!(self.weather.current_weather(coord), self.sun.sun_times(coord));

            if let (Err(weather_err), Err(sun_err)) = (&weather, &sun) {
                warn!(%weather_err, %sun_err, "both providers failed");
            }

            let weather = weather?;
            let sun = sun?;

            let result = ConsolidatedResult {
                indices: hiking::assess(&weather),
                moon: moon::moon_phase_at(now),
                weather,
                sun,
            };

            info!(
                hiking_index = result.indices.hiking_index,
                moon = %result.moon.phase_name,
                "aggregation complete"
            );

            Ok(result)
        }
        .instrument(span)
        .await
    }
}
