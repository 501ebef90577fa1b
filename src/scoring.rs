//! Footprint scoring.
//!
//! base    = consumption / 1000                       (direct figure)
//!         | production * wine_water_ratio / 1000     (estimate)
//! score   = base * reuse_multiplier * discharge_multiplier, rounded to 4 dp
//!
//! Result is in cubic meters per month.

use serde::Serialize;
use std::fmt;

use crate::classify::{ClassificationResult, DischargeMethod, ReuseLevel};
use crate::config::ScoringConfig;

pub const LITERS_PER_CUBIC_METER: f64 = 1000.0;

/// Rounded, non-negative footprint in cubic meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FootprintScore(f64);

impl FootprintScore {
    /// Round to 4 decimal places. `None` for negative input or a non-finite
    /// rounded value (rounding overflows near `f64::MAX`).
    pub fn new(cubic_meters: f64) -> Option<Self> {
        let rounded = round4(cubic_meters);
        (cubic_meters >= 0.0 && rounded.is_finite()).then_some(Self(rounded))
    }

    pub fn cubic_meters(self) -> f64 {
        self.0
    }
}

impl From<FootprintScore> for f64 {
    fn from(s: FootprintScore) -> f64 {
        s.0
    }
}

impl fmt::Display for FootprintScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} m³", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    /// Reported water consumption.
    Consumption,
    /// Estimated from reported wine production.
    Production,
}

/// How a score was put together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub basis: ScoreBasis,
    pub base_cubic_meters: f64,
    pub reuse_multiplier: f64,
    pub discharge_multiplier: f64,
    pub score: FootprintScore,
}

pub fn reuse_multiplier(level: ReuseLevel, cfg: &ScoringConfig) -> f64 {
    match level {
        ReuseLevel::Full => 1.0 - cfg.full_reuse_reduction,
        ReuseLevel::Partial => 1.0 - cfg.partial_reuse_reduction,
        ReuseLevel::None => 1.0,
    }
}

pub fn discharge_multiplier(method: Option<DischargeMethod>, cfg: &ScoringConfig) -> f64 {
    match method {
        Some(DischargeMethod::SurfaceWater) => cfg.surface_discharge_factor,
        Some(DischargeMethod::Other) | None => 1.0,
    }
}

/// Full breakdown, or `None` when neither numeric signal was found.
pub fn breakdown(c: &ClassificationResult, cfg: &ScoringConfig) -> Option<ScoreBreakdown> {
    let (basis, base) = match (c.water_consumption_liters, c.wine_production_liters) {
        (Some(water), _) => (ScoreBasis::Consumption, water / LITERS_PER_CUBIC_METER),
        (None, Some(wine)) => (
            ScoreBasis::Production,
            wine * cfg.wine_water_ratio / LITERS_PER_CUBIC_METER,
        ),
        (None, None) => return None,
    };

    let reuse = reuse_multiplier(c.water_reuse, cfg);
    let discharge = discharge_multiplier(c.discharge, cfg);
    let score = FootprintScore::new(base * reuse * discharge)?;

    Some(ScoreBreakdown {
        basis,
        base_cubic_meters: base,
        reuse_multiplier: reuse,
        discharge_multiplier: discharge,
        score,
    })
}

pub fn score(c: &ClassificationResult, cfg: &ScoringConfig) -> Option<FootprintScore> {
    breakdown(c, cfg).map(|b| b.score)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumption(liters: f64) -> ClassificationResult {
        ClassificationResult {
            water_consumption_liters: Some(liters),
            ..Default::default()
        }
    }

    #[test]
    fn no_signal_no_score() {
        let c = ClassificationResult {
            water_reuse: ReuseLevel::Full,
            discharge: Some(DischargeMethod::SurfaceWater),
            ..Default::default()
        };
        assert_eq!(score(&c, &ScoringConfig::default()), None);
    }

    #[test]
    fn consumption_beats_production() {
        let c = ClassificationResult {
            water_consumption_liters: Some(10_000.0),
            wine_production_liters: Some(500.0),
            ..Default::default()
        };
        let b = breakdown(&c, &ScoringConfig::default()).unwrap();
        assert_eq!(b.basis, ScoreBasis::Consumption);
        assert_eq!(b.score.cubic_meters(), 10.0);
    }

    #[test]
    fn production_estimate_uses_ratio() {
        let c = ClassificationResult {
            wine_production_liters: Some(500.0),
            ..Default::default()
        };
        let b = breakdown(&c, &ScoringConfig::default()).unwrap();
        assert_eq!(b.basis, ScoreBasis::Production);
        assert_eq!(b.score.cubic_meters(), 0.75);
    }

    #[test]
    fn multipliers_compose() {
        let c = ClassificationResult {
            water_reuse: ReuseLevel::Partial,
            discharge: Some(DischargeMethod::SurfaceWater),
            ..consumption(10_000.0)
        };
        // 10 * 0.8 * 1.1
        assert_eq!(score(&c, &ScoringConfig::default()).unwrap().cubic_meters(), 8.8);
    }

    #[test]
    fn other_discharge_is_neutral() {
        let c = ClassificationResult {
            discharge: Some(DischargeMethod::Other),
            ..consumption(10_000.0)
        };
        assert_eq!(score(&c, &ScoringConfig::default()).unwrap().cubic_meters(), 10.0);
    }

    #[test]
    fn rounds_to_four_places() {
        let c = consumption(1234.56789);
        assert_eq!(score(&c, &ScoringConfig::default()).unwrap().cubic_meters(), 1.2346);

        let c = ClassificationResult {
            wine_production_liters: Some(333.0),
            water_reuse: ReuseLevel::Partial,
            discharge: Some(DischargeMethod::SurfaceWater),
            ..Default::default()
        };
        // 0.4995 * 0.8 * 1.1 = 0.43956
        assert_eq!(score(&c, &ScoringConfig::default()).unwrap().cubic_meters(), 0.4396);
    }

    #[test]
    fn score_rejects_negative_or_nan() {
        assert_eq!(FootprintScore::new(-1.0), None);
        assert_eq!(FootprintScore::new(f64::NAN), None);
        assert_eq!(FootprintScore::new(0.0).map(f64::from), Some(0.0));
    }

    #[test]
    fn huge_finite_input_overflowing_on_rounding_is_rejected() {
        assert_eq!(FootprintScore::new(1e305), None);
        assert_eq!(FootprintScore::new(f64::MAX), None);
        assert_eq!(score(&consumption(1e308), &ScoringConfig::default()), None);
        assert!(FootprintScore::new(1e300).is_some());
    }

    #[test]
    fn custom_factors() {
        let cfg = ScoringConfig {
            full_reuse_reduction: 0.5,
            surface_discharge_factor: 1.2,
            ..ScoringConfig::default()
        };
        let c = ClassificationResult {
            water_reuse: ReuseLevel::Full,
            discharge: Some(DischargeMethod::SurfaceWater),
            ..consumption(10_000.0)
        };
        assert_eq!(score(&c, &cfg).unwrap().cubic_meters(), 6.0);
    }
}
