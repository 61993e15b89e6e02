//! Moon phase from wall-clock time alone.
//!
//! The phase is global: observer location is ignored, so every coordinate
//! gets the same answer for the same instant.

use chrono::{DateTime, Duration, Utc};

use crate::model::{MoonPhase, PhaseName};

/// Mean length of a lunation, in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

/// Unix time of a known new moon, 2000-01-06T18:14:00Z.
pub const REFERENCE_NEW_MOON_SECS: i64 = 947_182_440;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn reference_new_moon() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(REFERENCE_NEW_MOON_SECS)
}

/// Position in the lunar cycle, in `[0, 1)`. 0 is new moon, 0.5 full moon.
pub fn cycle_position(at: DateTime<Utc>) -> f64 {
    let elapsed_ms = at.timestamp_millis() - REFERENCE_NEW_MOON_SECS * 1000;
    let days = elapsed_ms as f64 / MILLIS_PER_DAY;
    let position = days.rem_euclid(SYNODIC_MONTH_DAYS) / SYNODIC_MONTH_DAYS;
    // rem_euclid can land exactly on the modulus for tiny negative inputs
    if position >= 1.0 { 0.0 } else { position }
}

impl PhaseName {
    /// Band a cycle position into one of the eight named phases.
    pub fn from_cycle_position(position: f64) -> Self {
        match position {
            p if !(0.03..=0.97).contains(&p) => PhaseName::NewMoon,
            p if p < 0.25 => PhaseName::WaxingCrescent,
            p if p < 0.27 => PhaseName::FirstQuarter,
            p if p < 0.50 => PhaseName::WaxingGibbous,
            p if p < 0.53 => PhaseName::FullMoon,
            p if p < 0.75 => PhaseName::WaningGibbous,
            p if p < 0.77 => PhaseName::LastQuarter,
            _ => PhaseName::WaningCrescent,
        }
    }
}

/// Triangular wave: 0 at new moon, 1 at full moon, two decimals.
pub fn illumination(position: f64) -> f64 {
    let folded = if position > 0.5 { 1.0 - position } else { position };
    let lit = (folded * 2.0).clamp(0.0, 1.0);
    (lit * 100.0).round() / 100.0
}

pub fn moon_phase_at(at: DateTime<Utc>) -> MoonPhase {
    let position = cycle_position(at);
    MoonPhase {
        phase_name: PhaseName::from_cycle_position(position),
        illumination: illumination(position),
    }
}
