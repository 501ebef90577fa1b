//! Answer classification: which answers carry the footprint signals.
//!
//! The questionnaire does not tag its questions, so the classifier works from
//! the answers alone:
//! - numbers at or above the consumption threshold read as monthly water
//!   consumption, smaller positive numbers as monthly wine production;
//! - text is scanned for reuse and discharge marker phrases.
//!
//! The magnitude split is a known-imprecise heuristic (a small producer's
//! consumption can fall under the threshold, a large producer's production
//! above it). It is kept as-is.
//!
//! Answers are visited in question order, so "first qualifying value" per
//! bucket is independent of how the response was assembled.

use serde::Serialize;

use crate::answers::{AnswerValue, SurveyResponse};
use crate::config::ClassificationConfig;
use crate::markers::{normalize, MarkerSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseLevel {
    #[default]
    None,
    Partial,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeMethod {
    SurfaceWater,
    /// Recognized non-surface destination (sewer, septic tank, ...).
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub water_consumption_liters: Option<f64>,
    pub wine_production_liters: Option<f64>,
    pub water_reuse: ReuseLevel,
    pub discharge: Option<DischargeMethod>,
}

impl ClassificationResult {
    pub fn has_numeric_signal(&self) -> bool {
        self.water_consumption_liters.is_some() || self.wine_production_liters.is_some()
    }
}

/// Classifier with pre-normalized marker tables.
#[derive(Debug, Clone)]
pub struct Classifier {
    threshold: f64,
    full_reuse: MarkerSet,
    partial_reuse: MarkerSet,
    surface_discharge: MarkerSet,
    other_discharge: MarkerSet,
}

impl Classifier {
    pub fn new(cfg: &ClassificationConfig) -> Self {
        Self {
            threshold: cfg.water_consumption_threshold,
            full_reuse: MarkerSet::new(&cfg.full_reuse_markers),
            partial_reuse: MarkerSet::new(&cfg.partial_reuse_markers),
            surface_discharge: MarkerSet::new(&cfg.surface_discharge_markers),
            other_discharge: MarkerSet::new(&cfg.other_discharge_markers),
        }
    }

    pub fn full_reuse(&self) -> &MarkerSet {
        &self.full_reuse
    }

    pub fn partial_reuse(&self) -> &MarkerSet {
        &self.partial_reuse
    }

    pub fn classify(&self, answers: &SurveyResponse) -> ClassificationResult {
        let mut out = ClassificationResult::default();
        for answer in answers.values() {
            match answer.as_number() {
                Some(n) => self.take_number(&mut out, n),
                None => {
                    if let AnswerValue::Text(t) = answer {
                        self.take_text(&mut out, t);
                    }
                }
            }
        }
        out
    }

    fn take_number(&self, out: &mut ClassificationResult, n: f64) {
        if out.water_consumption_liters.is_none() && n >= self.threshold {
            out.water_consumption_liters = Some(n);
        } else if out.wine_production_liters.is_none() && n > 0.0 && n < self.threshold {
            out.wine_production_liters = Some(n);
        }
    }

    fn take_text(&self, out: &mut ClassificationResult, raw: &str) {
        let text = normalize(raw);

        if self.full_reuse.matches_normalized(&text) {
            out.water_reuse = ReuseLevel::Full;
        } else if out.water_reuse == ReuseLevel::None && self.partial_reuse.matches_normalized(&text)
        {
            out.water_reuse = ReuseLevel::Partial;
        }

        if self.surface_discharge.matches_normalized(&text) {
            out.discharge = Some(DischargeMethod::SurfaceWater);
        } else if out.discharge.is_none() && self.other_discharge.matches_normalized(&text) {
            out.discharge = Some(DischargeMethod::Other);
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default())
    }
}
