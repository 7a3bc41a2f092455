pub mod repo;
mod repo_types;

use async_trait::async_trait;
use uuid::Uuid;

use crate::planner::model::{DietTag, MealTimeTag, Profile, RecipeNutritionRecord};

pub use repo::PgRecipeCatalog;

/// Filter for one randomly sampled candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub tag: MealTimeTag,
    pub diet: Option<DietTag>,
    /// Lowercased ingredient names a recipe must not contain.
    pub excluded_ingredients: Vec<String>,
    pub sample_size: i64,
}

impl CandidateQuery {
    pub fn for_profile(tag: MealTimeTag, profile: &Profile, sample_size: i64) -> Self {
        let mut excluded: Vec<String> = profile
            .allergens
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        excluded.sort();
        excluded.dedup();
        Self {
            tag,
            diet: profile.dietary_pattern.diet_tag(),
            excluded_ingredients: excluded,
            sample_size,
        }
    }
}

/// Read side of the recipe catalog.
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Published recipes tagged with `query.tag` (and `query.diet` if set),
    /// free of excluded ingredients, in random order, at most `sample_size`.
    async fn fetch_candidates(
        &self,
        query: &CandidateQuery,
    ) -> anyhow::Result<Vec<RecipeNutritionRecord>>;

    async fn get_recipe(&self, id: Uuid) -> anyhow::Result<Option<RecipeNutritionRecord>>;
}
