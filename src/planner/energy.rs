use time::Date;
use tracing::debug;

use crate::error::PlanError;
use crate::planner::model::{ActivityLevel, Goal, GoalStatus, Profile, Sex};

const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.20;

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + sex.bmr_constant()
}

pub fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    level.map_or(DEFAULT_ACTIVITY_MULTIPLIER, ActivityLevel::multiplier)
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: Date, today: Date) -> u32 {
    let mut years = today.year() - birth.year();
    let birthday_passed =
        (u8::from(today.month()), today.day()) >= (u8::from(birth.month()), birth.day());
    if !birthday_passed {
        years -= 1;
    }
    years.max(0) as u32
}

/// Daily calorie target. An active goal with a stored target wins; otherwise
/// BMR scaled by the activity multiplier, rounded to whole kcal.
pub fn compute_daily_calories(
    profile: &Profile,
    active_goal: Option<&Goal>,
    today: Date,
) -> Result<f64, PlanError> {
    if let Some(goal) = active_goal.filter(|g| g.status == GoalStatus::Active) {
        if let Some(target) = goal.daily_calories {
            debug!(goal_id = %goal.id, target, "using goal calorie target");
            return Ok(target);
        }
    }

    let mut missing = Vec::new();
    let weight = profile.weight_kg.filter(|w| *w > 0.0);
    if weight.is_none() {
        missing.push("weight_kg".to_string());
    }
    let height = profile.height_cm.filter(|h| *h > 0.0);
    if height.is_none() {
        missing.push("height_cm".to_string());
    }
    let age = profile
        .age
        .or_else(|| profile.birth_date.map(|b| age_on(b, today)));
    if age.is_none() {
        missing.push("age_or_birth_date".to_string());
    }
    if profile.sex.is_none() {
        missing.push("sex".to_string());
    }

    match (weight, height, age, profile.sex) {
        (Some(weight), Some(height), Some(age), Some(sex)) => {
            let bmr = mifflin_st_jeor(weight, height, age, sex);
            let daily = (bmr * activity_multiplier(profile.activity_level)).round();
            debug!(bmr, daily, "computed daily calories from profile");
            Ok(daily)
        }
        _ => Err(PlanError::Validation { fields: missing }),
    }
}
