use serde::de::DeserializeOwned;
use sqlx::FromRow;
use time::Date;
use tracing::warn;
use uuid::Uuid;

use crate::planner::model::{Goal, GoalStatus, Profile};

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub birth_date: Option<Date>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub dietary_pattern: Option<String>,
    pub allergens: Vec<String>,
    pub meal_slots: Vec<String>,
}

#[derive(Debug, FromRow)]
pub struct GoalRow {
    pub id: Uuid,
    pub target_weight_kg: f64,
    pub weekly_rate_kg: f64,
    pub daily_calories: Option<f64>,
    pub status: String,
}

/// Reads a stored lowercase label through the enum's serde names.
fn parse_label<T: DeserializeOwned>(column: &str, raw: &str) -> Option<T> {
    let value = serde_json::Value::String(raw.trim().to_lowercase());
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(column, value = raw, "unrecognized label");
            None
        }
    }
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Self {
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            age: r.age.and_then(|a| u32::try_from(a).ok()),
            birth_date: r.birth_date,
            sex: r.sex.as_deref().and_then(|s| parse_label("sex", s)),
            activity_level: r
                .activity_level
                .as_deref()
                .and_then(|s| parse_label("activity_level", s)),
            dietary_pattern: r
                .dietary_pattern
                .as_deref()
                .and_then(|s| parse_label("dietary_pattern", s))
                .unwrap_or_default(),
            allergens: r.allergens,
            meal_slots: r
                .meal_slots
                .iter()
                .filter_map(|s| parse_label("meal_slots", s))
                .collect(),
        }
    }
}

impl TryFrom<GoalRow> for Goal {
    type Error = anyhow::Error;

    fn try_from(r: GoalRow) -> Result<Self, Self::Error> {
        let status: GoalStatus = parse_label("status", &r.status)
            .ok_or_else(|| anyhow::anyhow!("goal {} has unknown status {:?}", r.id, r.status))?;
        Ok(Self {
            id: r.id,
            target_weight_kg: r.target_weight_kg,
            weekly_rate_kg: r.weekly_rate_kg,
            daily_calories: r.daily_calories,
            status,
        })
    }
}
