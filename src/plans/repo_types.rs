use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::planner::model::{DayPlan, Macros, PlanWarning, PlannedMeal};

/// A persisted day. `goal_id` splits plans into goal-based and health-based;
/// a user holds at most one of each per date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDayPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: Date,
    pub goal_id: Option<Uuid>,
    pub plan: DayPlan,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Inclusive date bounds; an absent bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    pub fn contains(&self, date: Date) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date <= t)
    }
}

#[derive(Debug, FromRow)]
pub struct DayPlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: Date,
    pub goal_id: Option<Uuid>,
    pub meals: Json<Vec<PlannedMeal>>,
    pub total_calories: f64,
    pub total_macros: Json<Macros>,
    pub target_calories: f64,
    pub warnings: Json<Vec<PlanWarning>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<DayPlanRow> for StoredDayPlan {
    fn from(r: DayPlanRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            plan_date: r.plan_date,
            goal_id: r.goal_id,
            plan: DayPlan {
                meals: r.meals.0,
                total_calories: r.total_calories,
                total_macros: r.total_macros.0,
                target_calories: r.target_calories,
                warnings: r.warnings.0,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
