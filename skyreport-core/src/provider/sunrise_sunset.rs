use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::{
    UpstreamError,
    model::{Coordinate, SunTimes},
};

use super::{SunSource, Upstream, fetch_json};

/// Local clock format for every sun event.
pub const TIME_FORMAT: &str = "%H:%M";

/// api.sunrise-sunset.org, asked for unformatted (ISO 8601) timestamps.
#[derive(Debug, Clone)]
pub struct SunriseSunset {
    http: Client,
    timeout: Duration,
    url: String,
    tz: Tz,
}

impl SunriseSunset {
    pub fn new(http: Client, timeout: Duration, url: String, tz: Tz) -> Self {
        Self {
            http,
            timeout,
            url,
            tz,
        }
    }

    #[instrument(skip(self, coord), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn fetch(&self, coord: &Coordinate) -> Result<SsResponse, UpstreamError> {
        let parsed: SsResponse = fetch_json(
            &self.http,
            Upstream::Sun,
            self.timeout,
            &self.url,
            &[("lat", coord.lat.as_str()), ("lng", coord.lon.as_str()), ("formatted", "0")],
        )
        .await?;

        match parsed.status.as_deref() {
            None | Some("OK") => Ok(parsed),
            Some(other) => Err(UpstreamError::Status {
                upstream: Upstream::Sun,
                status: other.to_string(),
                body: String::new(),
            }),
        }
    }
}

#[async_trait]
impl SunSource for SunriseSunset {
    async fn sun_times(&self, coord: &Coordinate) -> Result<SunTimes, UpstreamError> {
        let parsed = self.fetch(coord).await?;

        let sunrise = parse_timestamp("sunrise", &parsed.results.sunrise)?;
        let sunset = parse_timestamp("sunset", &parsed.results.sunset)?;

        Ok(sun_times_in(sunrise, sunset, self.tz))
    }
}

/// Render both events in `tz`; golden hour ends one hour after local sunrise.
pub fn sun_times_in(sunrise: DateTime<Utc>, sunset: DateTime<Utc>, tz: Tz) -> SunTimes {
    let sunrise_local = sunrise.with_timezone(&tz);
    let golden_hour_end = sunrise_local + ChronoDuration::hours(1);

    SunTimes {
        sunrise: sunrise_local.format(TIME_FORMAT).to_string(),
        sunset: sunset.with_timezone(&tz).format(TIME_FORMAT).to_string(),
        golden_hour_end: golden_hour_end.format(TIME_FORMAT).to_string(),
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, UpstreamError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| UpstreamError::TimeParse {
            upstream: Upstream::Sun,
            field,
            value: value.to_string(),
        })
}

#[derive(Debug, Deserialize)]
struct SsResults {
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Deserialize)]
struct SsResponse {
    results: SsResults,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http_client;
    use chrono::{NaiveTime, TimeZone};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn converts_to_target_zone() {
        let times = sun_times_in(
            utc("2024-05-01T22:41:12+00:00"),
            utc("2024-05-02T10:47:03+00:00"),
            chrono_tz::Asia::Jakarta,
        );

        assert_eq!(times.sunrise, "05:41");
        assert_eq!(times.sunset, "17:47");
        assert_eq!(times.golden_hour_end, "06:41");
    }

    #[test]
    fn golden_hour_wraps_past_midnight() {
        let times =
            sun_times_in(utc("2024-06-01T23:30:00Z"), utc("2024-06-01T12:00:00Z"), chrono_tz::UTC);
        assert_eq!(times.sunrise, "23:30");
        assert_eq!(times.golden_hour_end, "00:30");
    }

    #[test]
    fn local_time_roundtrips_to_the_minute() {
        let tz = chrono_tz::Asia::Jakarta;
        let sunrise = utc("2024-05-01T22:41:12+00:00");

        let shown = sun_times_in(sunrise, sunrise, tz).sunrise;
        let local_date = sunrise.with_timezone(&tz).date_naive();
        let clock = NaiveTime::parse_from_str(&shown, TIME_FORMAT).unwrap();
        let back = tz
            .from_local_datetime(&local_date.and_time(clock))
            .single()
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(back, Utc.with_ymd_and_hms(2024, 5, 1, 22, 41, 0).unwrap());
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("sunset", "7:27:02 PM").unwrap_err();
        assert!(matches!(err, UpstreamError::TimeParse { field: "sunset", .. }));
    }

    fn client_for(server: &MockServer, tz: Tz) -> SunriseSunset {
        let timeout = Duration::from_secs(2);
        let url = format!("{}/json", server.uri());
        SunriseSunset::new(http_client(timeout).unwrap(), timeout, url, tz)
    }

    #[tokio::test]
    async fn sun_times_from_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .and(query_param("lat", "-6.2"))
            .and(query_param("lng", "106.8"))
            .and(query_param("formatted", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": {
                    "sunrise": "2024-05-01T22:41:12+00:00",
                    "sunset": "2024-05-02T10:47:03+00:00",
                    "solar_noon": "2024-05-02T04:44:08+00:00",
                    "day_length": 43551
                },
                "status": "OK",
                "tzid": "UTC"
            })))
            .mount(&server)
            .await;

        let times = client_for(&server, chrono_tz::Asia::Jakarta)
            .sun_times(&Coordinate::new("-6.2", "106.8"))
            .await
            .unwrap();

        assert_eq!(
            times,
            SunTimes {
                sunrise: "05:41".into(),
                sunset: "17:47".into(),
                golden_hour_end: "06:41".into(),
            }
        );
    }

    #[tokio::test]
    async fn provider_status_field_is_checked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": {"sunrise": "", "sunset": ""},
                "status": "INVALID_REQUEST"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, chrono_tz::UTC)
            .sun_times(&Coordinate::new("", ""))
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { upstream, status, .. } => {
                assert_eq!(upstream, Upstream::Sun);
                assert_eq!(status, "INVALID_REQUEST");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_timestamp_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": {"sunrise": "5:41:12 AM", "sunset": "2024-05-02T10:47:03+00:00"},
                "status": "OK"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, chrono_tz::UTC)
            .sun_times(&Coordinate::new("-6.2", "106.8"))
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::TimeParse { field: "sunrise", .. }));
    }
}
