use serde::Serialize;

use crate::error::PlanError;
use crate::planner::model::{MealSlot, MealTimeTag};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPlan {
    pub slot: MealSlot,
    pub tag: MealTimeTag,
    pub budget: f64,
}

/// Orders the chosen slots breakfast, lunch, snack, dinner and gives each an
/// equal share of the daily target.
pub fn plan_slots(preferences: &[MealSlot], daily_target: f64) -> Result<Vec<SlotPlan>, PlanError> {
    let mut slots = preferences.to_vec();
    slots.sort();
    slots.dedup();

    if slots.is_empty() {
        return Err(PlanError::invalid("meal_slots"));
    }

    let budget = (daily_target / slots.len() as f64).floor();
    Ok(slots
        .into_iter()
        .map(|slot| SlotPlan {
            slot,
            tag: slot.tag(),
            budget,
        })
        .collect())
}
