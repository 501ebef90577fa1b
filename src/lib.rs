// src/lib.rs
//! Water footprint calculator for wine-production survey responses.
//!
//! Pipeline: [`classify`] the raw answers → [`scoring`] into cubic meters →
//! [`interpret`] the score and [`recommend`] next steps. Everything is pure
//! and driven by [`config::FootprintConfig`].
//!
//! ```
//! use water_footprint::{FootprintCalculator, SurveyResponse};
//!
//! let answers: SurveyResponse = [(1, "Producer"), (2, "10000"), (3, "Sí, totalmente")]
//!     .into_iter()
//!     .collect();
//! let calc = FootprintCalculator::default();
//! let score = calc.calculate_water_footprint(&answers).unwrap();
//! assert_eq!(score.cubic_meters(), 6.0);
//! ```

pub mod answers;
pub mod calculator;
pub mod classify;
pub mod config;
pub mod interpret;
pub mod markers;
pub mod recommend;
pub mod scoring;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::answers::{AnswerValue, QuestionKey, SurveyResponse};
pub use crate::calculator::{FootprintCalculator, FootprintReport};
pub use crate::classify::{ClassificationResult, DischargeMethod, ReuseLevel};
pub use crate::config::{FootprintConfig, HotReloadCalculator};
pub use crate::interpret::{FootprintTier, Interpretation};
pub use crate::recommend::{Recommendation, RecommendationSet};
pub use crate::scoring::{FootprintScore, ScoreBasis, ScoreBreakdown};

use once_cell::sync::Lazy;

/// Built-in defaults, for callers that don't carry their own calculator.
static DEFAULT_CALCULATOR: Lazy<FootprintCalculator> = Lazy::new(FootprintCalculator::default);

pub fn default_calculator() -> &'static FootprintCalculator {
    &DEFAULT_CALCULATOR
}

/// [`FootprintCalculator::calculate_water_footprint`] with built-in defaults.
pub fn calculate_water_footprint(answers: &SurveyResponse) -> Option<FootprintScore> {
    DEFAULT_CALCULATOR.calculate_water_footprint(answers)
}

pub fn footprint_interpretation(score: impl Into<f64>) -> Interpretation {
    DEFAULT_CALCULATOR.interpret(score)
}

pub fn recommendations(score: impl Into<f64>, answers: &SurveyResponse) -> RecommendationSet {
    DEFAULT_CALCULATOR.recommend(score, answers)
}
