//! Logging and metrics helpers.
//!
//! Submissions carry producer names, so raw answers never reach the logs;
//! events are keyed by a short SHA-256 prefix of the response instead.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use crate::answers::{AnswerValue, SurveyResponse};

pub const LOG_TARGET: &str = "footprint";

pub const METRIC_CALCULATIONS: &str = "footprint_calculations_total";
pub const METRIC_SCORE: &str = "footprint_score_m3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Scored,
    Insufficient,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Scored => "scored",
            Outcome::Insufficient => "insufficient",
            Outcome::Failed => "failed",
        }
    }
}

/// Register metric descriptions once per process.
pub fn describe_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            METRIC_CALCULATIONS,
            "Footprint calculations by outcome (scored, insufficient, failed)."
        );
        describe_histogram!(METRIC_SCORE, "Computed water footprint in cubic meters.");
    });
}

pub fn record_outcome(outcome: Outcome, score: Option<f64>) {
    describe_metrics();
    counter!(METRIC_CALCULATIONS, "outcome" => outcome.as_str()).increment(1);
    if let Some(s) = score {
        histogram!(METRIC_SCORE).record(s);
    }
}

/// 12 hex chars of SHA-256 over the response in question order.
pub fn response_id(answers: &SurveyResponse) -> String {
    let mut hasher = Sha256::new();
    for (k, v) in answers.iter() {
        hasher.update(k.as_str().as_bytes());
        hasher.update([0x1fu8]);
        match v {
            AnswerValue::Numeric(n) => hasher.update(n.to_bits().to_le_bytes()),
            AnswerValue::Text(t) => hasher.update(t.as_bytes()),
        }
        hasher.update([0x1eu8]);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_id_is_stable_and_order_free() {
        let a: SurveyResponse = [(1, "Producer"), (2, "10000")].into_iter().collect();
        let b: SurveyResponse = [(2, "10000"), (1, "Producer")].into_iter().collect();
        assert_eq!(response_id(&a), response_id(&b));
        assert_eq!(response_id(&a).len(), 12);
        assert!(!response_id(&a).contains("Producer"));
    }

    #[test]
    fn describing_twice_is_harmless() {
        describe_metrics();
        describe_metrics();
        record_outcome(Outcome::Scored, Some(1.5));
    }

    #[test]
    fn response_id_differs_per_content() {
        let a: SurveyResponse = [(1, "Producer A")].into_iter().collect();
        let b: SurveyResponse = [(1, "Producer B")].into_iter().collect();
        assert_ne!(response_id(&a), response_id(&b));
    }
}
