//! Score → tier mapping. Benchmarks are monthly cubic meters for small to
//! medium wine producers; bounds are lower-inclusive.

use serde::Serialize;
use std::fmt;

use crate::config::InterpretationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintTier {
    Low,
    Moderate,
    Average,
    High,
    VeryHigh,
}

impl FootprintTier {
    const ASCENDING: [FootprintTier; 5] = [
        FootprintTier::Low,
        FootprintTier::Moderate,
        FootprintTier::Average,
        FootprintTier::High,
        FootprintTier::VeryHigh,
    ];

    pub fn message(self) -> &'static str {
        match self {
            FootprintTier::Low => "Low water footprint - Excellent water management",
            FootprintTier::Moderate => "Moderate water footprint - Good water management",
            FootprintTier::Average => "Average water footprint - Room for improvement",
            FootprintTier::High => "High water footprint - Significant improvement needed",
            FootprintTier::VeryHigh => "Very high water footprint - Urgent action required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub tier: FootprintTier,
    pub message: &'static str,
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Number of bounds the score reaches picks the tier. NaN reaches none.
pub fn interpret(score: impl Into<f64>, cfg: &InterpretationConfig) -> Interpretation {
    let s = score.into();
    let reached = cfg.bounds().iter().filter(|b| s >= **b).count();
    let tier = FootprintTier::ASCENDING[reached];
    Interpretation {
        tier,
        message: tier.message(),
    }
}
