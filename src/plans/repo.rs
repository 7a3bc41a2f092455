use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::{DateRange, DayPlanRow, StoredDayPlan};
use super::PlanStore;
use crate::planner::model::DayPlan;

const RETURNING: &str = "RETURNING id, user_id, plan_date, goal_id, meals, total_calories, \
                         total_macros, target_calories, warnings, created_at, updated_at";

#[derive(Clone)]
pub struct PgPlanStore {
    db: PgPool,
}

impl PgPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn insert(
        &self,
        on_conflict: &str,
        user_id: Uuid,
        date: Date,
        goal_id: Option<Uuid>,
        plan: &DayPlan,
    ) -> anyhow::Result<StoredDayPlan> {
        let sql = format!(
            r#"
            INSERT INTO day_plans
                (user_id, plan_date, goal_id, meals, total_calories, total_macros,
                 target_calories, warnings)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            {on_conflict}
            {RETURNING}
            "#
        );
        let row = sqlx::query_as::<_, DayPlanRow>(&sql)
            .bind(user_id)
            .bind(date)
            .bind(goal_id)
            .bind(Json(&plan.meals))
            .bind(plan.total_calories)
            .bind(Json(&plan.total_macros))
            .bind(plan.target_calories)
            .bind(Json(&plan.warnings))
            .fetch_one(&self.db)
            .await?;
        Ok(row.into())
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn upsert_day_plan(
        &self,
        user_id: Uuid,
        date: Date,
        goal_id: Option<Uuid>,
        plan: &DayPlan,
    ) -> anyhow::Result<StoredDayPlan> {
        self.insert(
            r#"
            ON CONFLICT (user_id, plan_date, goal_based) DO UPDATE SET
                goal_id = EXCLUDED.goal_id,
                meals = EXCLUDED.meals,
                total_calories = EXCLUDED.total_calories,
                total_macros = EXCLUDED.total_macros,
                target_calories = EXCLUDED.target_calories,
                warnings = EXCLUDED.warnings,
                updated_at = now()
            "#,
            user_id,
            date,
            goal_id,
            plan,
        )
        .await
    }

    async fn create_day_plan(
        &self,
        user_id: Uuid,
        date: Date,
        goal_id: Option<Uuid>,
        plan: &DayPlan,
    ) -> anyhow::Result<StoredDayPlan> {
        self.insert("", user_id, date, goal_id, plan).await
    }

    async fn get_day_plan(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<StoredDayPlan>> {
        let row = sqlx::query_as::<_, DayPlanRow>(
            r#"
            SELECT id, user_id, plan_date, goal_id, meals, total_calories, total_macros,
                   target_calories, warnings, created_at, updated_at
            FROM day_plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_day_plans(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> anyhow::Result<Vec<StoredDayPlan>> {
        let rows = sqlx::query_as::<_, DayPlanRow>(
            r#"
            SELECT id, user_id, plan_date, goal_id, meals, total_calories, total_macros,
                   target_calories, warnings, created_at, updated_at
            FROM day_plans
            WHERE user_id = $1
              AND ($2::date IS NULL OR plan_date >= $2)
              AND ($3::date IS NULL OR plan_date <= $3)
            ORDER BY plan_date ASC, goal_based ASC
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_day_plan(
        &self,
        user_id: Uuid,
        id: Uuid,
        plan: &DayPlan,
    ) -> anyhow::Result<Option<StoredDayPlan>> {
        let sql = format!(
            r#"
            UPDATE day_plans SET
                meals = $3,
                total_calories = $4,
                total_macros = $5,
                target_calories = $6,
                warnings = $7,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            {RETURNING}
            "#
        );
        let row = sqlx::query_as::<_, DayPlanRow>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(Json(&plan.meals))
            .bind(plan.total_calories)
            .bind(Json(&plan.total_macros))
            .bind(plan.target_calories)
            .bind(Json(&plan.warnings))
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn delete_day_plan(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM day_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_all_day_plans(&self, user_id: Uuid, range: DateRange) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM day_plans
            WHERE user_id = $1
              AND ($2::date IS NULL OR plan_date >= $2)
              AND ($3::date IS NULL OR plan_date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete_goal_day_plans(&self, user_id: Uuid, goal_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM day_plans WHERE user_id = $1 AND goal_id = $2")
            .bind(user_id)
            .bind(goal_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
