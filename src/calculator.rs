//! # Footprint Calculator
//! Classification → scoring → reporting over one survey submission.
//!
//! All steps are pure; the calculator is immutable after construction and can
//! be shared across threads. `calculate_water_footprint` and `report` are the
//! guarded entry points: any internal fault is caught, logged and turned into
//! "no score" so the surrounding application never crashes on a submission.

use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info};

use crate::answers::SurveyResponse;
use crate::classify::{ClassificationResult, Classifier};
use crate::config::FootprintConfig;
use crate::interpret::{interpret, Interpretation};
use crate::recommend::{RecommendationSet, Recommender};
use crate::scoring::{self, FootprintScore, ScoreBreakdown};
use crate::telemetry::{record_outcome, response_id, Outcome, LOG_TARGET};

/// Everything the embedding application needs to persist and render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintReport {
    #[serde(rename = "calculated_footprint")]
    pub score: FootprintScore,
    pub interpretation: Interpretation,
    pub recommendations: RecommendationSet,
    pub breakdown: ScoreBreakdown,
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone)]
pub struct FootprintCalculator {
    config: FootprintConfig,
    classifier: Classifier,
    recommender: Recommender,
}

impl FootprintCalculator {
    /// Validate `config` and build the marker tables.
    pub fn new(config: FootprintConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Config from env/files (see [`FootprintConfig::load_default`]).
    pub fn from_default_config() -> anyhow::Result<Self> {
        Self::new(FootprintConfig::load_default()?)
    }

    fn build(config: FootprintConfig) -> Self {
        let classifier = Classifier::new(&config.classification);
        let recommender = Recommender::new(
            &config.recommendations,
            classifier.full_reuse(),
            classifier.partial_reuse(),
        );
        Self {
            config,
            classifier,
            recommender,
        }
    }

    pub fn config(&self) -> &FootprintConfig {
        &self.config
    }

    pub fn classify(&self, answers: &SurveyResponse) -> ClassificationResult {
        self.classifier.classify(answers)
    }

    pub fn breakdown(&self, c: &ClassificationResult) -> Option<ScoreBreakdown> {
        scoring::breakdown(c, &self.config.scoring)
    }

    pub fn score(&self, c: &ClassificationResult) -> Option<FootprintScore> {
        scoring::score(c, &self.config.scoring)
    }

    pub fn interpret(&self, score: impl Into<f64>) -> Interpretation {
        interpret(score, &self.config.interpretation)
    }

    pub fn recommend(&self, score: impl Into<f64>, answers: &SurveyResponse) -> RecommendationSet {
        self.recommender.recommend(score, answers)
    }

    /// Footprint in cubic meters, or `None` when the answers carry no usable
    /// quantity (or the computation failed). "No score" is not zero.
    pub fn calculate_water_footprint(&self, answers: &SurveyResponse) -> Option<FootprintScore> {
        self.evaluate(answers).map(|(_, b)| b.score)
    }

    /// Score plus interpretation and recommendations.
    pub fn report(&self, answers: &SurveyResponse) -> Option<FootprintReport> {
        let (classification, breakdown) = self.evaluate(answers)?;
        let score = breakdown.score;
        Some(FootprintReport {
            score,
            interpretation: self.interpret(score),
            recommendations: self.recommend(score, answers),
            breakdown,
            classification,
        })
    }

    fn evaluate(&self, answers: &SurveyResponse) -> Option<(ClassificationResult, ScoreBreakdown)> {
        let id = response_id(answers);

        let run = guarded(&id, || {
            let c = self.classify(answers);
            let b = self.breakdown(&c);
            (c, b)
        })?;

        match run {
            (c, Some(b)) => {
                info!(
                    target: LOG_TARGET,
                    %id,
                    water_consumption = ?c.water_consumption_liters,
                    wine_production = ?c.wine_production_liters,
                    water_reuse = ?c.water_reuse,
                    discharge = ?c.discharge,
                    footprint = b.score.cubic_meters(),
                    "calculated water footprint"
                );
                record_outcome(Outcome::Scored, Some(b.score.cubic_meters()));
                Some((c, b))
            }
            (c, None) => {
                info!(target: LOG_TARGET, %id, answers = answers.len(), "insufficient data for footprint");
                debug!(target: LOG_TARGET, %id, classification = ?c);
                record_outcome(Outcome::Insufficient, None);
                None
            }
        }
    }
}

/// Run `f`, turning a panic into a logged, counted `None`.
fn guarded<T>(id: &str, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Some(v),
        Err(payload) => {
            let msg = panic_message(&*payload);
            error!(target: LOG_TARGET, %id, error = %msg, "error calculating footprint");
            record_outcome(Outcome::Failed, None);
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl Default for FootprintCalculator {
    fn default() -> Self {
        Self::build(FootprintConfig::default())
    }
}
