//! Category definitions and the healthy-eating catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum score per category.
pub const DEFAULT_MAX_SCORE: f64 = 20.0;

/// Errors from catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category '{0}' has an empty keyword list")]
    EmptyKeywords(String),

    #[error("category '{0}' has non-positive max_score {1}")]
    InvalidMaxScore(String, f64),

    #[error("catalog has no categories")]
    Empty,
}

/// A topic category: name, purpose, keyword variants, and score ceiling.
///
/// Keywords are case-insensitive variants and may mix languages. The list
/// order is preserved; matching treats it as an ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Display name (e.g., "Fruits & Vegetables")
    pub name: String,

    /// What knowledge this category assesses
    pub description: String,

    /// Keyword variants, matched case-insensitively
    pub keywords: Vec<String>,

    /// Maximum achievable score for this category
    pub max_score: f64,
}

impl Category {
    /// Create a validated category.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        keywords: Vec<String>,
        max_score: f64,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if keywords.is_empty() {
            return Err(CatalogError::EmptyKeywords(name));
        }
        if max_score <= 0.0 {
            return Err(CatalogError::InvalidMaxScore(name, max_score));
        }
        Ok(Self {
            name,
            description: description.into(),
            keywords,
            max_score,
        })
    }
}

/// Read-only, ordered collection of categories.
///
/// Identical across all conversations and all scoring calls within a
/// process; result ordering always follows declaration order here.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog from explicit categories.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { categories })
    }

    /// The fixed healthy-eating catalog: five categories, 20 points each.
    pub fn healthy_eating() -> Self {
        let categories = vec![
            fixed_category(
                "Fruits & Vegetables",
                "Daily intake, variety, and nutritional benefits",
                to_strings(&[
                    "fruit", "fruits", "vegetable", "vegetables", "meyve", "sebze",
                    "vitamin", "vitamins", "daily intake", "günlük tüketim",
                    "apple", "elma", "banana", "muz", "orange", "portakal",
                    "broccoli", "brokoli", "spinach", "ıspanak", "carrot", "havuç",
                    "salad", "salata", "greens", "yeşillik", "fiber", "lif",
                    "antioxidant", "antioksidan", "nutritional", "besin değeri",
                ]),
                DEFAULT_MAX_SCORE,
            ),
            fixed_category(
                "Hydration",
                "Importance of drinking enough water throughout the day",
                to_strings(&[
                    "water", "su", "hydration", "hidrasyon", "drink", "içmek",
                    "fluid", "sıvı", "daily water", "günlük su",
                    "8 glasses", "8 bardak", "dehydration", "susuzluk",
                    "thirst", "susama", "liquid", "sıvı tüketimi",
                    "hydrated", "water intake", "su tüketimi",
                ]),
                DEFAULT_MAX_SCORE,
            ),
            fixed_category(
                "Balanced Meals",
                "Combining proteins, carbs, and fats in proper proportions",
                to_strings(&[
                    "protein", "proteins", "carb", "carbs", "carbohydrate", "karbonhidrat",
                    "fat", "fats", "yağ", "balanced", "dengeli", "proportion", "oran",
                    "macros", "macronutrients", "makro besin", "meal plan", "öğün planı",
                    "portion", "porsiyon", "healthy fats", "sağlıklı yağlar",
                    "whole grains", "tam tahıl", "lean protein", "yağsız protein",
                    "omega", "complex carbs", "kompleks karbonhidrat",
                ]),
                DEFAULT_MAX_SCORE,
            ),
            fixed_category(
                "Processed Foods",
                "Awareness of additives, sugar, salt, and unhealthy fats",
                to_strings(&[
                    "processed", "işlenmiş", "additive", "katkı maddesi",
                    "sugar", "şeker", "salt", "tuz", "unhealthy fat", "sağlıksız yağ",
                    "junk food", "abur cubur", "fast food", "preservative", "koruyucu",
                    "artificial", "yapay", "refined", "rafine",
                    "trans fat", "trans yağ", "saturated", "doymuş yağ",
                    "packaged", "paketli", "label", "etiket", "ingredients", "içindekiler",
                ]),
                DEFAULT_MAX_SCORE,
            ),
            fixed_category(
                "Meal Timing",
                "Regular eating patterns and avoiding long gaps without food",
                to_strings(&[
                    "meal timing", "öğün zamanı", "breakfast", "kahvaltı",
                    "lunch", "öğle yemeği", "dinner", "akşam yemeği",
                    "snack", "ara öğün", "regular", "düzenli",
                    "schedule", "program", "interval", "aralık",
                    "skip meals", "öğün atlamak", "eating pattern", "yeme düzeni",
                    "metabolism", "metabolizma", "blood sugar", "kan şekeri",
                    "fasting", "açlık", "meal frequency", "öğün sıklığı",
                ]),
                DEFAULT_MAX_SCORE,
            ),
        ];

        Self { categories }
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog is empty (never true for built catalogs).
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Sum of per-category maximum scores.
    pub fn total_max_score(&self) -> f64 {
        self.categories.iter().map(|c| c.max_score).sum()
    }

    /// Every keyword across all categories, in catalog order.
    pub fn all_keywords(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.keywords.iter().map(|k| k.as_str()))
    }
}

fn to_strings(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}

// The fixed catalog is statically valid, so this skips Category::new.
fn fixed_category(
    name: &str,
    description: &str,
    keywords: Vec<String>,
    max_score: f64,
) -> Category {
    Category {
        name: name.to_string(),
        description: description.to_string(),
        keywords,
        max_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_eating_has_five_categories() {
        let catalog = Catalog::healthy_eating();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.total_max_score(), 100.0);
    }

    #[test]
    fn test_catalog_order_is_stable() {
        let catalog = Catalog::healthy_eating();
        let names: Vec<&str> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Fruits & Vegetables",
                "Hydration",
                "Balanced Meals",
                "Processed Foods",
                "Meal Timing",
            ]
        );
    }

    #[test]
    fn test_category_rejects_empty_keywords() {
        let err = Category::new("X", "desc", vec![], 20.0).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyKeywords(_)));
    }

    #[test]
    fn test_category_rejects_non_positive_max_score() {
        let err = Category::new("X", "desc", vec!["kw".to_string()], 0.0).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMaxScore(_, _)));
    }

    #[test]
    fn test_all_keywords_covers_every_category() {
        let catalog = Catalog::healthy_eating();
        let count = catalog.all_keywords().count();
        let sum: usize = catalog.categories().iter().map(|c| c.keywords.len()).sum();
        assert_eq!(count, sum);
        assert!(count > 100);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }
}
