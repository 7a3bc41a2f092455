//! Bulk seven-day generation. Each slot gets one dish picked uniformly at
//! random from a pool fetched once per tag, avoiding recipes already used the
//! same day while any remain.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::PlanError;
use crate::planner::composer::SlotComposition;
use crate::planner::day::{assemble_day, rebalance};
use crate::planner::model::{
    DayPlan, MealTimeTag, PlanWarning, PlannedMeal, RecipeNutritionRecord,
};
use crate::planner::slots::SlotPlan;

pub const DAYS_PER_WEEK: usize = 7;
pub const MIN_WEEKLY_POOL: usize = 7;

pub type CandidatePools = HashMap<MealTimeTag, Vec<RecipeNutritionRecord>>;

/// Fails if any slot's tag pool is smaller than [`MIN_WEEKLY_POOL`].
pub fn check_pools(slots: &[SlotPlan], pools: &CandidatePools) -> Result<(), PlanError> {
    for slot in slots {
        let available = pools.get(&slot.tag).map_or(0, Vec::len);
        if available < MIN_WEEKLY_POOL {
            return Err(PlanError::InsufficientCandidates {
                tag: slot.tag,
                available,
                required: MIN_WEEKLY_POOL,
            });
        }
    }
    Ok(())
}

pub fn plan_week<R: Rng + ?Sized>(
    slots: &[SlotPlan],
    pools: &CandidatePools,
    target_calories: f64,
    rng: &mut R,
) -> Result<Vec<DayPlan>, PlanError> {
    check_pools(slots, pools)?;

    let mut days = Vec::with_capacity(DAYS_PER_WEEK);
    for _ in 0..DAYS_PER_WEEK {
        let mut used = HashSet::new();
        let mut compositions = Vec::with_capacity(slots.len());
        for slot in slots {
            let pool = pools.get(&slot.tag).map(Vec::as_slice).unwrap_or_default();
            let recipe = pick_for_slot(pool, &used, rng).ok_or(PlanError::NoCandidates {
                slot: slot.slot,
                tag: slot.tag,
            })?;
            used.insert(recipe.id);

            let warning = (recipe.calories > slot.budget).then_some(PlanWarning::SlotOverBudget {
                slot: slot.slot,
                budget: slot.budget,
                calories: recipe.calories,
            });
            compositions.push(SlotComposition {
                meals: vec![PlannedMeal::snapshot(slot.slot, recipe)],
                warning,
            });
        }
        days.push(rebalance(assemble_day(compositions, target_calories)));
    }
    Ok(days)
}

/// Uniform pick among recipes not yet used today, or among the whole pool
/// once every recipe has been used.
pub fn pick_for_slot<'a, R: Rng + ?Sized>(
    pool: &'a [RecipeNutritionRecord],
    used: &HashSet<Uuid>,
    rng: &mut R,
) -> Option<&'a RecipeNutritionRecord> {
    let fresh: Vec<&RecipeNutritionRecord> =
        pool.iter().filter(|r| !used.contains(&r.id)).collect();
    if fresh.is_empty() {
        pool.choose(rng)
    } else {
        fresh.choose(rng).copied()
    }
}
