use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::repo_types::RecipeRow;
use super::{CandidateQuery, RecipeCatalog};
use crate::planner::model::RecipeNutritionRecord;

#[derive(Clone)]
pub struct PgRecipeCatalog {
    db: PgPool,
}

impl PgRecipeCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeCatalog for PgRecipeCatalog {
    async fn fetch_candidates(
        &self,
        query: &CandidateQuery,
    ) -> anyhow::Result<Vec<RecipeNutritionRecord>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT r.id, r.name, r.image_url, r.ingredients,
                   r.calories, r.protein_g, r.carbs_g, r.fat_g, r.fiber_g, r.sugar_g
            FROM recipes r
            WHERE r.published
              AND EXISTS (SELECT 1 FROM unnest(r.tags) t WHERE lower(t) = $1)
              AND ($2::text IS NULL OR EXISTS (SELECT 1 FROM unnest(r.tags) t WHERE lower(t) = $2))
              AND NOT EXISTS (SELECT 1 FROM unnest(r.ingredients) i WHERE lower(i) = ANY($3))
            ORDER BY random()
            LIMIT $4
            "#,
        )
        .bind(query.tag.as_str())
        .bind(query.diet.map(|d| d.as_str()))
        .bind(query.excluded_ingredients.as_slice())
        .bind(query.sample_size)
        .fetch_all(&self.db)
        .await?;

        debug!(tag = %query.tag, count = rows.len(), "sampled candidates");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_recipe(&self, id: Uuid) -> anyhow::Result<Option<RecipeNutritionRecord>> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, name, image_url, ingredients,
                   calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g
            FROM recipes
            WHERE id = $1 AND published
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }
}
