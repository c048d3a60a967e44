//! Sentiment normalization
//!
//! Maps a classifier's raw `{label, score}` onto the canonical [-1, 1] score.
//! The label a classifier reports is only used to pick the sign; the final
//! label is re-derived from the normalized score.

use crate::error::InferenceError;
use common::{RawClassification, SentimentLabel};

/// Normalize a raw classifier output into a signed score in [-1, 1].
///
/// Label matching is a case-insensitive substring test, checked in the order
/// positive, negative, neutral. Any other vocabulary (e.g. `LABEL_1`) is
/// treated as a class-1 probability and remapped linearly.
pub fn normalize_score(label: &str, score: f64) -> f64 {
    let label = label.to_lowercase();

    if label.contains("positive") {
        score
    } else if label.contains("negative") {
        -score
    } else if label.contains("neutral") {
        0.0
    } else {
        (score - 0.5) * 2.0
    }
}

/// Check a raw classification is usable, then normalize it.
pub fn normalize(raw: &RawClassification) -> Result<(f64, SentimentLabel), InferenceError> {
    if !raw.score.is_finite() || !(0.0..=1.0).contains(&raw.score) {
        return Err(InferenceError::invalid_output(format!(
            "classifier score {} for label {:?} is outside [0, 1]",
            raw.score, raw.label
        )));
    }

    let score = normalize_score(&raw.label, raw.score);
    Ok((score, SentimentLabel::from_score(score)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 6] = [0.0, 0.1, 0.25, 0.5, 0.92, 1.0];

    #[test]
    fn test_positive_keeps_score() {
        for s in SAMPLES {
            assert_eq!(normalize_score("positive", s), s);
            assert_eq!(normalize_score("POSITIVE", s), s);
        }
    }

    #[test]
    fn test_negative_flips_score() {
        for s in SAMPLES {
            assert_eq!(normalize_score("negative", s), -s);
            assert_eq!(normalize_score("Negative", s), -s);
        }
    }

    #[test]
    fn test_neutral_is_zero() {
        for s in SAMPLES {
            assert_eq!(normalize_score("neutral", s), 0.0);
            assert_eq!(normalize_score("NEUTRAL", s), 0.0);
        }
    }

    #[test]
    fn test_unrecognized_label_remaps_linearly() {
        assert_eq!(normalize_score("LABEL_1", 0.0), -1.0);
        assert_eq!(normalize_score("LABEL_1", 0.5), 0.0);
        assert_eq!(normalize_score("LABEL_1", 1.0), 1.0);
        assert_eq!(normalize_score("LABEL_0", 0.75), (0.75 - 0.5) * 2.0);

        let mut previous = f64::NEG_INFINITY;
        for s in SAMPLES {
            let score = normalize_score("LABEL_0", s);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_substring_match() {
        // Checked in order: "positive" wins over anything later in the label
        assert_eq!(normalize_score("very_positive", 0.7), 0.7);
        assert_eq!(normalize_score("label:negative", 0.7), -0.7);
    }

    #[test]
    fn test_label_is_rederived() {
        // The classifier says positive, but the strength is too weak
        let (score, label) = normalize(&RawClassification::new("positive", 0.08)).unwrap();
        assert_eq!(score, 0.08);
        assert_eq!(label, SentimentLabel::Neutral);

        let (score, label) = normalize(&RawClassification::new("negative", 0.6)).unwrap();
        assert_eq!(score, -0.6);
        assert_eq!(label, SentimentLabel::Negative);
    }

    #[test]
    fn test_rejects_out_of_range_scores() {
        assert!(normalize(&RawClassification::new("positive", 1.5)).is_err());
        assert!(normalize(&RawClassification::new("positive", -0.1)).is_err());
        assert!(normalize(&RawClassification::new("positive", f64::NAN)).is_err());
    }
}
