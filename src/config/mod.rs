// src/config/mod.rs
//! Tunables for the footprint pipeline.
//!
//! Every magic number and marker phrase lives here so new locales or
//! calibrations are configuration, not code. All fields default, so a config
//! file only needs the values it overrides:
//!
//! ```toml
//! [classification]
//! water_consumption_threshold = 1000.0
//! full_reuse_markers = ["totalmente", "completely", "fully"]
//!
//! [scoring]
//! wine_water_ratio = 1.5
//! ```
//!
//! Lookup order for [`FootprintConfig::load_default`]:
//! 1) `$FOOTPRINT_CONFIG_PATH` (must exist)
//! 2) `config/footprint.toml`
//! 3) `config/footprint.json`
//! 4) built-in defaults
//!
//! `$FOOTPRINT_WATER_THRESHOLD` then overrides the consumption threshold.

pub mod hot;

use anyhow::{anyhow, bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use hot::HotReloadCalculator;

// --- env defaults & names ---
pub const DEFAULT_FOOTPRINT_CONFIG_PATH: &str = "config/footprint.toml";
pub const FALLBACK_FOOTPRINT_CONFIG_JSON: &str = "config/footprint.json";

pub const ENV_FOOTPRINT_CONFIG_PATH: &str = "FOOTPRINT_CONFIG_PATH";
pub const ENV_FOOTPRINT_WATER_THRESHOLD: &str = "FOOTPRINT_WATER_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    pub classification: ClassificationConfig,
    pub scoring: ScoringConfig,
    pub interpretation: InterpretationConfig,
    pub recommendations: RecommendationConfig,
}

/// How raw answers are recognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Numbers at or above this (liters) read as water consumption, positive
    /// numbers below it as wine production.
    pub water_consumption_threshold: f64,
    pub full_reuse_markers: Vec<String>,
    pub partial_reuse_markers: Vec<String>,
    pub surface_discharge_markers: Vec<String>,
    pub other_discharge_markers: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            water_consumption_threshold: 1000.0,
            full_reuse_markers: strings(&["totalmente", "completely", "fully"]),
            partial_reuse_markers: strings(&["parcialmente", "partially"]),
            surface_discharge_markers: strings(&["superficial", "surface water"]),
            other_discharge_markers: strings(&[
                "drenaje",
                "alcantarillado",
                "fosa",
                "sewer",
                "septic",
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Liters of water per liter of wine when only production is known.
    pub wine_water_ratio: f64,
    pub full_reuse_reduction: f64,
    pub partial_reuse_reduction: f64,
    pub surface_discharge_factor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            wine_water_ratio: 1.5,
            full_reuse_reduction: 0.4,
            partial_reuse_reduction: 0.2,
            surface_discharge_factor: 1.1,
        }
    }
}

/// Lower bounds (inclusive, cubic meters) of the upper four tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationConfig {
    pub moderate_from: f64,
    pub average_from: f64,
    pub high_from: f64,
    pub very_high_from: f64,
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        Self {
            moderate_from: 5.0,
            average_from: 15.0,
            high_from: 30.0,
            very_high_from: 50.0,
        }
    }
}

impl InterpretationConfig {
    pub fn bounds(&self) -> [f64; 4] {
        [
            self.moderate_from,
            self.average_from,
            self.high_from,
            self.very_high_from,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Bare affirmatives that count as reuse evidence on top of the
    /// full/partial reuse markers.
    pub affirmative_markers: Vec<String>,
    /// Scores strictly above this get the efficiency recommendations.
    pub efficiency_above: f64,
    /// Scores strictly above this also get the deeper interventions.
    pub intervention_above: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            affirmative_markers: strings(&["sí", "yes"]),
            efficiency_above: 15.0,
            intervention_above: 30.0,
        }
    }
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

// parse optional float env; only positive finite values are accepted
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

impl FootprintConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: FootprintConfig = toml::from_str(s).context("parsing footprint TOML config")?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: FootprintConfig =
            serde_json::from_str(s).context("parsing footprint JSON config")?;
        Ok(cfg)
    }

    /// Load from an explicit path. The extension picks the format; unknown
    /// extensions try TOML first, then JSON. The result is validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading footprint config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = match ext.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)
                .or_else(|_| Self::from_json_str(&content))
                .with_context(|| format!("{} is neither TOML nor JSON", path.display()))?,
        };
        cfg.validate()
            .with_context(|| format!("invalid footprint config in {}", path.display()))?;
        Ok(cfg)
    }

    /// Env var + fallbacks, then the threshold override.
    pub fn load_default() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_FOOTPRINT_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{} points to non-existent path {}",
                        ENV_FOOTPRINT_CONFIG_PATH,
                        pb.display()
                    ));
                }
                Self::load_from(&pb)?
            }
            Err(_) => Self::load_fallbacks()?,
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_FOOTPRINT_WATER_THRESHOLD).ok()) {
            cfg.classification.water_consumption_threshold = t;
        }
        Ok(cfg)
    }

    fn load_fallbacks() -> Result<Self> {
        for p in [DEFAULT_FOOTPRINT_CONFIG_PATH, FALLBACK_FOOTPRINT_CONFIG_JSON] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.classification;
        ensure!(
            c.water_consumption_threshold.is_finite() && c.water_consumption_threshold > 0.0,
            "classification.water_consumption_threshold must be a positive number, got {}",
            c.water_consumption_threshold
        );

        let s = &self.scoring;
        ensure!(
            s.wine_water_ratio.is_finite() && s.wine_water_ratio > 0.0,
            "scoring.wine_water_ratio must be a positive number, got {}",
            s.wine_water_ratio
        );
        for (name, v) in [
            ("full_reuse_reduction", s.full_reuse_reduction),
            ("partial_reuse_reduction", s.partial_reuse_reduction),
        ] {
            ensure!(
                (0.0..1.0).contains(&v),
                "scoring.{name} must be in [0, 1), got {v}"
            );
        }
        ensure!(
            s.surface_discharge_factor.is_finite() && s.surface_discharge_factor > 0.0,
            "scoring.surface_discharge_factor must be a positive number, got {}",
            s.surface_discharge_factor
        );

        let bounds = self.interpretation.bounds();
        if bounds.iter().any(|b| !b.is_finite()) {
            bail!("interpretation bounds must be finite, got {bounds:?}");
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            bail!("interpretation bounds must be strictly ascending, got {bounds:?}");
        }

        let r = &self.recommendations;
        ensure!(
            r.efficiency_above.is_finite() && r.intervention_above.is_finite(),
            "recommendation thresholds must be finite"
        );
        ensure!(
            r.efficiency_above <= r.intervention_above,
            "recommendations.efficiency_above ({}) must not exceed intervention_above ({})",
            r.efficiency_above,
            r.intervention_above
        );
        Ok(())
    }
}
