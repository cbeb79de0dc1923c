//! Score aggregation: the per-category step function and the qualitative
//! evaluation summary.

use score_types::CategoryScore;

/// Convert a unique-match count into a bounded category score.
///
/// A deliberately coarse, saturating curve: breadth of topic coverage is
/// rewarded and capped at three distinct signals per category.
pub fn step_score(unique_matches: usize, max_score: f64) -> f64 {
    match unique_matches {
        0 => 0.0,
        1 => 0.4 * max_score,
        2 => 0.7 * max_score,
        _ => max_score,
    }
}

/// Qualitative band for a total score. Lower edges are inclusive.
fn band(total_score: f64) -> (&'static str, &'static str) {
    if total_score >= 80.0 {
        (
            "Excellent",
            "You have demonstrated comprehensive knowledge about healthy eating!",
        )
    } else if total_score >= 60.0 {
        (
            "Good",
            "You have a solid understanding of healthy eating principles.",
        )
    } else if total_score >= 40.0 {
        (
            "Fair",
            "You show some awareness of healthy eating, but there's room for improvement.",
        )
    } else if total_score >= 20.0 {
        (
            "Basic",
            "You have touched on a few aspects of healthy eating.",
        )
    } else {
        (
            "Needs Improvement",
            "Consider exploring more topics related to healthy eating.",
        )
    }
}

/// Build the evaluation summary for a scored conversation.
///
/// Lists every category scoring below half its maximum as an area to
/// explore, preserving catalog order.
pub fn evaluation_summary(category_scores: &[CategoryScore], total_score: f64) -> String {
    let (level, message) = band(total_score);

    let weak_categories: Vec<&str> = category_scores
        .iter()
        .filter(|cs| cs.score < cs.max_score * 0.5)
        .map(|cs| cs.category.as_str())
        .collect();

    let mut summary = format!("Level: {level} ({total_score:.1}/100)\n{message}");
    if !weak_categories.is_empty() {
        summary.push_str(&format!("\nAreas to explore: {}", weak_categories.join(", ")));
    }

    summary
}
