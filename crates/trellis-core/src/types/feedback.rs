//! Feedback records for the learning loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user judgment on a generated answer, with an optional correction
/// payload the graph updater can apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// The query the answer was generated for.
    pub query: String,
    /// The answer being judged.
    pub response: String,
    /// Whether the answer was correct. Only incorrect records trigger a
    /// graph update.
    pub correct: bool,
    /// Correction payload, e.g. `{"entity": "...", "properties": {...}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<serde_json::Value>,
    /// When the feedback was recorded.
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Create a feedback record marked correct.
    pub fn correct(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            correct: true,
            correction: None,
            created_at: Utc::now(),
        }
    }

    /// Create a feedback record marked incorrect, with a correction.
    pub fn incorrect(
        query: impl Into<String>,
        response: impl Into<String>,
        correction: serde_json::Value,
    ) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            correct: false,
            correction: Some(correction),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_constructors() {
        let good = FeedbackRecord::correct("q", "a");
        assert!(good.correct);
        assert!(good.correction.is_none());

        let bad = FeedbackRecord::incorrect(
            "q",
            "a",
            serde_json::json!({"entity": "Apple Inc.", "properties": {"founded": 1976}}),
        );
        assert!(!bad.correct);
        assert!(bad.correction.is_some());
    }

    #[test]
    fn test_feedback_serde_omits_empty_correction() {
        let good = FeedbackRecord::correct("q", "a");
        let json = serde_json::to_string(&good).unwrap();
        assert!(!json.contains("correction"));
    }
}
