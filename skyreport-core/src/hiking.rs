//! Hiking suitability on a 0–10 integer scale.

use crate::model::{HikingAssessment, HikingTier, WeatherReading};

const BASELINE: i32 = 10;

impl HikingTier {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 8 => HikingTier::Excellent,
            s if s >= 5 => HikingTier::Fair,
            s if s >= 3 => HikingTier::Discouraged,
            _ => HikingTier::NotRecommended,
        }
    }
}

/// Sum of independent penalties; each checks one field of the reading.
fn penalty(reading: &WeatherReading) -> i32 {
    let mut penalty = 0;

    if reading.temperature > 33.0 {
        penalty += 3;
    } else if reading.temperature < 18.0 {
        penalty += 2;
    }
    if reading.precipitation > 1.0 {
        penalty += 4;
    }
    if reading.uv_index > 8.0 {
        penalty += 2;
    }
    if reading.aqi > 100 {
        penalty += 3;
    }
    if reading.cloud_cover > 80 {
        penalty += 1;
    }

    penalty
}

pub fn assess(reading: &WeatherReading) -> HikingAssessment {
    let score = (BASELINE - penalty(reading)).clamp(0, 10);

    HikingAssessment {
        hiking_index: (f64::from(score) * 10.0).round() / 10.0,
        hiking_recommendation: HikingTier::from_score(score),
    }
}
