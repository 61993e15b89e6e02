use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Base URLs of the upstream providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub forecast: String,
    pub air_quality: String,
    pub sun: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            air_quality: "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
            sun: "https://api.sunrise-sunset.org/json".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timezone = "Asia/Jakarta"
/// upstream_timeout_secs = 5
/// bind = "0.0.0.0:8080"
///
/// [endpoints]
/// sun = "https://api.sunrise-sunset.org/json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA zone that sun times are reported in.
    pub timezone: String,

    /// Per-call limit for every upstream request.
    pub upstream_timeout_secs: u64,

    /// Listen address for `skyreport serve`.
    pub bind: String,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            upstream_timeout_secs: DEFAULT_TIMEOUT_SECS,
            bind: DEFAULT_BIND.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Parse the configured zone name.
    pub fn target_timezone(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyreport", "skyreport")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `SKYREPORT_TIMEZONE`, `SKYREPORT_BIND` and `SKYREPORT_TIMEOUT_SECS`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(tz) = lookup("SKYREPORT_TIMEZONE") {
            self.timezone = tz;
        }
        if let Some(bind) = lookup("SKYREPORT_BIND") {
            self.bind = bind;
        }
        if let Some(secs) = lookup("SKYREPORT_TIMEOUT_SECS") {
            self.upstream_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("SKYREPORT_TIMEOUT_SECS is not a number: '{secs}'"))?;
        }
        Ok(self)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| {
        anyhow!(
            "Unknown time zone '{name}'.\n\
             Hint: use an IANA name such as 'Asia/Jakarta' or 'Europe/Berlin'."
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_target_jakarta() {
        let cfg = Config::default();
        assert_eq!(
            cfg.target_timezone().expect("default zone parses"),
            chrono_tz::Asia::Jakarta
        );
        assert_eq!(cfg.upstream_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.bind, "0.0.0.0:8080");
    }

    #[test]
    fn unknown_timezone_errors() {
        let cfg = Config {
            timezone: "Mars/Olympus".into(),
            ..Config::default()
        };
        let err = cfg.target_timezone().unwrap_err();
        assert!(err.to_string().contains("Unknown time zone 'Mars/Olympus'"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            timezone = "Europe/Berlin"

            [endpoints]
            sun = "http://localhost:9000/json"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.timezone, "Europe/Berlin");
        assert_eq!(cfg.upstream_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.endpoints.sun, "http://localhost:9000/json");
        assert_eq!(cfg.endpoints.forecast, Endpoints::default().forecast);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config {
            upstream_timeout_secs: 3,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        assert_eq!(Config::from_toml(&text).expect("parse"), cfg);
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SKYREPORT_TIMEZONE", "UTC"),
            ("SKYREPORT_BIND", "0.0.0.0:9090"),
            ("SKYREPORT_TIMEOUT_SECS", " 2 "),
        ]);

        let cfg = Config::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .expect("overrides are valid");

        assert_eq!(cfg.timezone, "UTC");
        assert_eq!(cfg.bind, "0.0.0.0:9090");
        assert_eq!(cfg.upstream_timeout_secs, 2);
    }

    #[test]
    fn bad_timeout_override_errors() {
        let err = Config::default()
            .with_overrides(|key| (key == "SKYREPORT_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }
}
