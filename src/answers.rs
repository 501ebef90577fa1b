//! Survey answers as handed over by the embedding application.
//!
//! A [`SurveyResponse`] maps question keys to raw answer values. Values are
//! either numbers or free text; anything else (booleans, nulls, nested
//! structures) is dropped at the boundary instead of failing the submission.
//!
//! Keys iterate in question order: keys that look like unsigned integers sort
//! numerically and come first, everything else follows lexicographically. The
//! classifier relies on this so that "first qualifying answer" never depends on
//! the order in which the caller happened to insert answers.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a survey question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionKey(String);

impl QuestionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn ordinal(&self) -> Option<u64> {
        self.0.trim().parse::<u64>().ok()
    }
}

impl Ord for QuestionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.ordinal(), other.ordinal()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for QuestionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QuestionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

macro_rules! key_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for QuestionKey {
            fn from(n: $t) -> Self {
                Self(n.to_string())
            }
        })*
    };
}

key_from_int!(i32, i64, u32, u64, usize);

/// One raw answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Numeric(f64),
    Text(String),
}

impl AnswerValue {
    /// Numeric reading of the answer: numbers as-is, text when its trimmed
    /// content is a finite decimal literal. Non-finite values never count.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Numeric(n) => n.is_finite().then_some(*n),
            AnswerValue::Text(s) => parse_numeric(s),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s.as_str()),
            AnswerValue::Numeric(_) => None,
        }
    }

    /// Convert a JSON value; returns `None` for shapes that are not answers.
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|x| x.is_finite())
                .map(AnswerValue::Numeric),
            serde_json::Value::String(s) => Some(AnswerValue::Text(s.clone())),
            _ => None,
        }
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    // f64::from_str also accepts "inf"/"NaN"; those are text, not quantities.
    t.parse::<f64>().ok().filter(|x| x.is_finite())
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

macro_rules! answer_from_num {
    ($($t:ty),*) => {
        $(impl From<$t> for AnswerValue {
            fn from(n: $t) -> Self {
                AnswerValue::Numeric(n as f64)
            }
        })*
    };
}

answer_from_num!(f64, f32, i32, i64, u32, u64);

/// All answers of one survey submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SurveyResponse {
    answers: BTreeMap<QuestionKey, AnswerValue>,
}

impl SurveyResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the answer for `key`, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<QuestionKey>,
        value: impl Into<AnswerValue>,
    ) -> Option<AnswerValue> {
        self.answers.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<QuestionKey>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &QuestionKey) -> Option<&AnswerValue> {
        self.answers.get(key)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Answers in question order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionKey, &AnswerValue)> {
        self.answers.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &AnswerValue> {
        self.answers.values()
    }

    /// Text answers only, in question order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.answers.values().filter_map(AnswerValue::as_text)
    }

    /// Build from a JSON object. Unsupported value shapes are skipped.
    pub fn from_json(v: &serde_json::Value) -> Result<Self> {
        let obj = v
            .as_object()
            .ok_or_else(|| anyhow!("survey response must be a JSON object keyed by question"))?;
        Ok(obj
            .iter()
            .filter_map(|(k, v)| AnswerValue::from_json(v).map(|a| (QuestionKey::new(k.as_str()), a)))
            .collect())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let v: serde_json::Value =
            serde_json::from_str(s).context("parsing survey response JSON")?;
        Self::from_json(&v)
    }
}

impl<K, V> FromIterator<(K, V)> for SurveyResponse
where
    K: Into<QuestionKey>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = SurveyResponse::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

/// Lenient element used while deserializing: anything that is not a number or
/// a string is swallowed and dropped.
#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum LooseAnswer {
    Numeric(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for SurveyResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, LooseAnswer>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| match v {
                LooseAnswer::Numeric(n) if n.is_finite() => Some((k, AnswerValue::Numeric(n))),
                LooseAnswer::Text(s) => Some((k, AnswerValue::Text(s))),
                _ => None,
            })
            .collect())
    }
}
