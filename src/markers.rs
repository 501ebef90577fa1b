//! Marker phrase tables for survey text.
//!
//! Matching is a plain substring test over normalized text: lowercase
//! (Unicode aware, so "SÍ" and "sí" agree) with whitespace runs condensed to a
//! single space. Phrases are normalized once when the table is built.

/// A set of normalized marker phrases. Empty phrases are dropped so a blank
/// config entry can never match every answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSet {
    phrases: Vec<String>,
}

impl MarkerSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for p in phrases {
            let n = normalize(p.as_ref());
            if !n.is_empty() && !out.contains(&n) {
                out.push(n);
            }
        }
        Self { phrases: out }
    }

    /// Union of two tables, preserving first-seen order.
    pub fn union(&self, other: &MarkerSet) -> MarkerSet {
        MarkerSet::new(self.phrases.iter().chain(other.phrases.iter()))
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// `text` must already be normalized (see [`normalize`]).
    pub fn matches_normalized(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.matches_normalized(&normalize(raw))
    }
}

/// Lowercase + condensed spaces, trimmed.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_insensitive() {
        let m = MarkerSet::new(["Surface  Water"]);
        assert!(m.matches("Discharged to SURFACE\twater nearby"));
        assert!(!m.matches("surfacewater"));
    }

    #[test]
    fn unicode_case_folding() {
        let m = MarkerSet::new(["sí"]);
        assert!(m.matches("SÍ, TOTALMENTE"));
        assert!(m.matches("Sí"));
    }

    #[test]
    fn blank_phrases_are_ignored() {
        let m = MarkerSet::new(["", "   ", "parcialmente", "PARCIALMENTE"]);
        assert_eq!(m.phrases(), &["parcialmente".to_string()]);
        assert!(!m.matches("anything else"));
        assert!(!MarkerSet::default().matches("text"));
    }

    #[test]
    fn union_dedups() {
        let a = MarkerSet::new(["sí", "yes"]);
        let b = MarkerSet::new(["yes", "totalmente"]);
        assert_eq!(a.union(&b).phrases().len(), 3);
    }
}
