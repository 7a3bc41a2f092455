use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::planner::model::{Macros, PlanWarning, PlannedMeal};
use crate::plans::repo_types::StoredDayPlan;

#[derive(Debug, Deserialize)]
pub struct GenerateDayRequest {
    pub date: Date,
    #[serde(default)]
    pub use_goal_calories: bool,
    pub goal_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateWeekRequest {
    pub start_date: Date,
    #[serde(default)]
    pub use_goal_calories: bool,
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ReplaceMealRequest {
    pub recipe_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Goal,
    Health,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayPlanResponse {
    pub id: Uuid,
    pub date: Date,
    pub kind: PlanKind,
    pub goal_id: Option<Uuid>,
    pub meals: Vec<PlannedMeal>,
    pub total_calories: f64,
    pub total_macros: Macros,
    pub target_calories: f64,
    pub over_target: bool,
    pub warnings: Vec<PlanWarning>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<StoredDayPlan> for DayPlanResponse {
    fn from(p: StoredDayPlan) -> Self {
        let over_target = p.plan.is_over_target();
        Self {
            id: p.id,
            date: p.plan_date,
            kind: if p.goal_id.is_some() { PlanKind::Goal } else { PlanKind::Health },
            goal_id: p.goal_id,
            meals: p.plan.meals,
            total_calories: p.plan.total_calories,
            total_macros: p.plan.total_macros,
            target_calories: p.plan.target_calories,
            over_target,
            warnings: p.plan.warnings,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}
