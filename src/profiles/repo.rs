use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{GoalRow, ProfileRow};
use super::ProfileStore;
use crate::planner::model::{Goal, Profile};

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn load_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT weight_kg, height_cm, age, birth_date, sex, activity_level,
                   dietary_pattern, allergens, meal_slots
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn load_active_goal(&self, user_id: Uuid) -> anyhow::Result<Option<Goal>> {
        let row = sqlx::query_as::<_, GoalRow>(
            r#"
            SELECT id, target_weight_kg, weekly_rate_kg, daily_calories, status
            FROM goals
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Goal::try_from).transpose()
    }
}
