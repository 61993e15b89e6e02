//! Failures reaching or interpreting an upstream provider.

use std::time::Duration;

use thiserror::Error;

use crate::provider::Upstream;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{upstream} request failed: {source}")]
    Transport {
        upstream: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("{upstream} request timed out after {}s", .after.as_secs())]
    Timeout { upstream: Upstream, after: Duration },

    #[error("{upstream} responded with {status}: {body}")]
    Status {
        upstream: Upstream,
        status: String,
        body: String,
    },

    #[error("Failed to decode {upstream} response: {source}")]
    Decode {
        upstream: Upstream,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {field} timestamp from {upstream}: '{value}'")]
    TimeParse {
        upstream: Upstream,
        field: &'static str,
        value: String,
    },
}

impl UpstreamError {
    pub fn upstream(&self) -> Upstream {
        match self {
            Self::Transport { upstream, .. }
            | Self::Timeout { upstream, .. }
            | Self::Status { upstream, .. }
            | Self::Decode { upstream, .. }
            | Self::TimeParse { upstream, .. } => *upstream,
        }
    }

    /// Network-level failures, timeouts included.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Message suitable for the HTTP error body.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { upstream, .. } | Self::Timeout { upstream, .. } => {
                format!("Could not reach the {upstream} provider")
            }
            Self::Status { upstream, status, .. } => {
                format!("The {upstream} provider returned {status}")
            }
            Self::Decode { upstream, .. } => {
                format!("The {upstream} provider returned an unexpected response")
            }
            Self::TimeParse { upstream, field, .. } => {
                format!("The {upstream} provider returned an invalid {field} time")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_counts_as_transport() {
        let err = UpstreamError::Timeout {
            upstream: Upstream::Sun,
            after: Duration::from_secs(5),
        };
        assert!(err.is_transport());
        assert_eq!(err.upstream(), Upstream::Sun);
        assert!(err.to_string().contains("5s"));
    }

    #[test]
    fn status_and_time_parse_are_not_transport() {
        let status = UpstreamError::Status {
            upstream: Upstream::Weather,
            status: "503 Service Unavailable".into(),
            body: String::new(),
        };
        assert!(!status.is_transport());
        assert!(status.user_message().contains("503"));

        let parse = UpstreamError::TimeParse {
            upstream: Upstream::Sun,
            field: "sunrise",
            value: "yesterday".into(),
        };
        assert!(!parse.is_transport());
        assert!(parse.to_string().contains("'yesterday'"));
        assert!(parse.user_message().contains("sunrise"));
    }

    #[test]
    fn decode_error_names_upstream() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = UpstreamError::Decode {
            upstream: Upstream::AirQuality,
            source,
        };
        assert!(err.to_string().contains("air-quality"));
    }
}
