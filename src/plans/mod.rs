mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use async_trait::async_trait;
use axum::Router;
use time::Date;
use uuid::Uuid;

use crate::planner::model::DayPlan;
use crate::state::AppState;

pub use repo::PgPlanStore;
pub use repo_types::{DateRange, StoredDayPlan};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::generate_routes())
        .merge(handlers::manage_routes())
}

/// Persistence boundary for generated days. All lookups are scoped to the
/// owning user.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Insert or replace the plan keyed by (user, date, goal presence).
    /// Concurrent writers converge on one row; the last one wins.
    async fn upsert_day_plan(
        &self,
        user_id: Uuid,
        date: Date,
        goal_id: Option<Uuid>,
        plan: &DayPlan,
    ) -> anyhow::Result<StoredDayPlan>;

    /// Plain insert; fails if the (user, date, goal presence) key is taken.
    async fn create_day_plan(
        &self,
        user_id: Uuid,
        date: Date,
        goal_id: Option<Uuid>,
        plan: &DayPlan,
    ) -> anyhow::Result<StoredDayPlan>;

    async fn get_day_plan(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<StoredDayPlan>>;

    async fn list_day_plans(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> anyhow::Result<Vec<StoredDayPlan>>;

    async fn update_day_plan(
        &self,
        user_id: Uuid,
        id: Uuid,
        plan: &DayPlan,
    ) -> anyhow::Result<Option<StoredDayPlan>>;

    async fn delete_day_plan(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;

    async fn delete_all_day_plans(&self, user_id: Uuid, range: DateRange) -> anyhow::Result<u64>;

    async fn delete_goal_day_plans(&self, user_id: Uuid, goal_id: Uuid) -> anyhow::Result<u64>;
}
