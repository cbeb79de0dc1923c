//! Scoring result types.
//!
//! Both types are derived values, recomputed per scoring call and never
//! mutated in place. Only the scalar total is durably stored; the full
//! breakdown is recomputed from the message history on demand.

use serde::{Deserialize, Serialize};

/// Maximum achievable total score across all categories.
pub const MAX_POSSIBLE_SCORE: f64 = 100.0;

/// Score for a single category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category display name
    pub category: String,

    /// Awarded score, one of {0, 0.4·max, 0.7·max, max}
    pub score: f64,

    /// Maximum achievable score for this category
    pub max_score: f64,

    /// Matched keywords, lower-cased and deduplicated
    pub matched_keywords: Vec<String>,
}

/// Aggregate scoring result for one conversation.
///
/// `category_scores` follows catalog declaration order, and
/// `total_score` always equals the sum of the per-category scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Conversation this result was computed for
    pub conversation_id: String,

    /// Sum of category scores (0..100)
    pub total_score: f64,

    /// Always 100.0 for the five-category catalog
    pub max_possible_score: f64,

    /// Per-category breakdown in catalog order
    pub category_scores: Vec<CategoryScore>,

    /// Qualitative band plus suggested areas to explore
    pub evaluation_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_result_serde() {
        let result = ScoreResult {
            conversation_id: "conv-1".to_string(),
            total_score: 34.0,
            max_possible_score: MAX_POSSIBLE_SCORE,
            category_scores: vec![CategoryScore {
                category: "Hydration".to_string(),
                score: 14.0,
                max_score: 20.0,
                matched_keywords: vec!["water".to_string(), "hydration".to_string()],
            }],
            evaluation_summary: "Level: Basic (34.0/100)".to_string(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: ScoreResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_score, 34.0);
        assert_eq!(back.category_scores.len(), 1);
        assert_eq!(back.category_scores[0].matched_keywords.len(), 2);
    }
}
