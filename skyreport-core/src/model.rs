use serde::{Deserialize, Serialize};

/// Latitude/longitude as supplied by the caller. Passed through verbatim to providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: String,
    pub lon: String,
}

impl Coordinate {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }
}

/// Current conditions at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Millimetres.
    pub precipitation: f64,
    /// Percent, 0–100.
    pub cloud_cover: i64,
    pub uv_index: f64,
    /// European AQI; 0 when the air-quality source had nothing usable.
    pub aqi: i64,
}

/// Sun events as `HH:MM` in the configured target time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
    pub golden_hour_end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseName {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl PhaseName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }

    pub const fn all() -> &'static [PhaseName] {
        &[
            PhaseName::NewMoon,
            PhaseName::WaxingCrescent,
            PhaseName::FirstQuarter,
            PhaseName::WaxingGibbous,
            PhaseName::FullMoon,
            PhaseName::WaningGibbous,
            PhaseName::LastQuarter,
            PhaseName::WaningCrescent,
        ]
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    pub phase_name: PhaseName,
    /// Fraction lit, 0.0–1.0, two decimals.
    pub illumination: f64,
}

/// Recommendation band for a hiking score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HikingTier {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "fair, watch conditions")]
    Fair,
    #[serde(rename = "discouraged, non-ideal conditions")]
    Discouraged,
    #[serde(rename = "not recommended today")]
    NotRecommended,
}

impl HikingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            HikingTier::Excellent => "excellent",
            HikingTier::Fair => "fair, watch conditions",
            HikingTier::Discouraged => "discouraged, non-ideal conditions",
            HikingTier::NotRecommended => "not recommended today",
        }
    }
}

impl std::fmt::Display for HikingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HikingAssessment {
    /// 0.0–10.0, one decimal.
    pub hiking_index: f64,
    pub hiking_recommendation: HikingTier,
}

/// The single document returned for one coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedResult {
    pub weather: WeatherReading,
    pub sun: SunTimes,
    pub moon: MoonPhase,
    pub indices: HikingAssessment,
}
