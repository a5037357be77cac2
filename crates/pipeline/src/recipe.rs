//! Read-only inspection of the `recipe-json` block embedded in a draft.
//!
//! The chat UI, the save-to-library flow and the image generator all parse
//! this block themselves. The service only peeks at it to log what was
//! approved; a missing or unreadable block never affects the outcome.

use serde::Deserialize;

/// Opening fence of the structured recipe block.
pub const RECIPE_FENCE: &str = "```recipe-json";

/// Menu section a recipe belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeCategory {
    /// Starters and small plates.
    Appetizers,
    /// Soups, broths and stews served as soup.
    Soups,
    /// Composed and dressed salads.
    Salads,
    /// Main courses.
    MainDishes,
    /// Vegetables, grains and other accompaniments.
    SideDishes,
    /// Plated desserts, custards and confections.
    Desserts,
    /// Yeasted and quick breads.
    Breads,
    /// Laminated doughs, tarts and viennoiserie.
    Pastry,
}

impl RecipeCategory {
    /// Parses the label used in the recipe block (e.g. `"Main Dishes"`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Appetizers" => Some(Self::Appetizers),
            "Soups" => Some(Self::Soups),
            "Salads" => Some(Self::Salads),
            "Main Dishes" => Some(Self::MainDishes),
            "Side Dishes" => Some(Self::SideDishes),
            "Desserts" => Some(Self::Desserts),
            "Breads" => Some(Self::Breads),
            "Pastry" => Some(Self::Pastry),
            _ => None,
        }
    }

    /// The label used in the recipe block.
    pub fn label(self) -> &'static str {
        match self {
            Self::Appetizers => "Appetizers",
            Self::Soups => "Soups",
            Self::Salads => "Salads",
            Self::MainDishes => "Main Dishes",
            Self::SideDishes => "Side Dishes",
            Self::Desserts => "Desserts",
            Self::Breads => "Breads",
            Self::Pastry => "Pastry",
        }
    }
}

/// How demanding a recipe is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Suitable for a home cook's first attempt.
    Easy,
    /// Needs some practised technique.
    Medium,
    /// Demanding technique or timing.
    Hard,
}

impl Difficulty {
    /// The label used in the recipe block.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// The handful of recipe-block fields worth logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub title: String,
    pub category: Option<RecipeCategory>,
    pub servings: Option<u64>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Deserialize)]
struct RecipeWire {
    title: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    servings: Option<serde_json::Value>,
    #[serde(default)]
    difficulty: Option<serde_json::Value>,
}

/// Returns the body of the first `recipe-json` block, if it is closed.
pub fn extract_recipe_block(draft: &str) -> Option<&str> {
    let start = draft.find(RECIPE_FENCE)?;
    let after_fence = &draft[start + RECIPE_FENCE.len()..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Decodes the summary fields of a draft's recipe block.
///
/// Unknown categories and unexpected difficulty labels become `None` rather
/// than failing the decode; numeric strings are accepted for `servings`.
pub fn summarize(draft: &str) -> Option<RecipeSummary> {
    let block = extract_recipe_block(draft)?;
    let wire: RecipeWire = serde_json::from_str(block).ok()?;
    let title = wire.title.trim().to_string();
    if title.is_empty() {
        return None;
    }
    Some(RecipeSummary {
        title,
        category: wire.category.as_deref().and_then(RecipeCategory::from_label),
        servings: wire.servings.as_ref().and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        }),
        difficulty: wire
            .difficulty
            .and_then(|v| serde_json::from_value(v).ok()),
    })
}
