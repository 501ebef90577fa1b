//! Recommendations for a producer, from the score and the raw answers.
//!
//! Reuse evidence is a deliberately looser scan than classification: any
//! affirmative answer anywhere (plus the full/partial reuse phrases) counts.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::answers::SurveyResponse;
use crate::config::RecommendationConfig;
use crate::markers::MarkerSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    ImplementReuse,
    EfficientEquipment,
    MonitorProcesses,
    WaterAudit,
    ClosedLoop,
    ContinueMonitoring,
}

impl Recommendation {
    pub fn text(self) -> &'static str {
        match self {
            Recommendation::ImplementReuse => {
                "Implement water reuse systems to reduce fresh water consumption"
            }
            Recommendation::EfficientEquipment => {
                "Consider installing water-efficient cleaning equipment"
            }
            Recommendation::MonitorProcesses => {
                "Monitor and reduce water usage in bottling and cleaning processes"
            }
            Recommendation::WaterAudit => {
                "Conduct a comprehensive water audit to identify major consumption points"
            }
            Recommendation::ClosedLoop => "Invest in closed-loop water systems for temperature control",
            Recommendation::ContinueMonitoring => {
                "Continue monitoring water usage to track improvements over time"
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

/// Ordered recommendations; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecommendationSet(Vec<Recommendation>);

impl RecommendationSet {
    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Recommendation> {
        self.0.first().copied()
    }

    pub fn contains(&self, r: Recommendation) -> bool {
        self.0.contains(&r)
    }

    pub fn texts(&self) -> Vec<&'static str> {
        self.0.iter().map(|r| r.text()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Recommender {
    reuse_evidence: MarkerSet,
    efficiency_above: f64,
    intervention_above: f64,
}

impl Recommender {
    /// `full_reuse` and `partial_reuse` are the classifier's tables; they are
    /// folded into the evidence scan next to the bare affirmatives.
    pub fn new(cfg: &RecommendationConfig, full_reuse: &MarkerSet, partial_reuse: &MarkerSet) -> Self {
        Self {
            reuse_evidence: MarkerSet::new(&cfg.affirmative_markers)
                .union(full_reuse)
                .union(partial_reuse),
            efficiency_above: cfg.efficiency_above,
            intervention_above: cfg.intervention_above,
        }
    }

    pub fn has_reuse_evidence(&self, answers: &SurveyResponse) -> bool {
        answers.texts().any(|t| self.reuse_evidence.matches(t))
    }

    pub fn recommend(&self, score: impl Into<f64>, answers: &SurveyResponse) -> RecommendationSet {
        let score = score.into();
        let mut out = Vec::with_capacity(6);

        if !self.has_reuse_evidence(answers) {
            out.push(Recommendation::ImplementReuse);
        }
        if score > self.efficiency_above {
            out.push(Recommendation::EfficientEquipment);
            out.push(Recommendation::MonitorProcesses);
        }
        if score > self.intervention_above {
            out.push(Recommendation::WaterAudit);
            out.push(Recommendation::ClosedLoop);
        }
        out.push(Recommendation::ContinueMonitoring);

        RecommendationSet(out)
    }
}
