//! Fills one meal slot with one or two dishes from a sampled candidate pool.
//!
//! The single best dish is the largest one that fits the budget. When the
//! budget is large enough, every unordered pair of fitting dishes is tried and
//! the largest pair sum that still fits replaces the single dish if it is
//! bigger. Pools are tens of items, so the quadratic pair scan is cheap. When
//! nothing fits, the cheapest dish is taken and the slot is flagged.

use tracing::{debug, warn};

use crate::error::PlanError;
use crate::planner::model::{PlanWarning, PlannedMeal, RecipeNutritionRecord};
use crate::planner::slots::SlotPlan;

/// Smallest slot budget for which a second dish is considered.
pub const TWO_DISH_MIN_BUDGET: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SlotComposition {
    pub meals: Vec<PlannedMeal>,
    pub warning: Option<PlanWarning>,
}

impl SlotComposition {
    pub fn calories(&self) -> f64 {
        self.meals.iter().map(|m| m.calories).sum()
    }
}

pub fn compose_slot(
    slot: &SlotPlan,
    candidates: &[RecipeNutritionRecord],
) -> Result<SlotComposition, PlanError> {
    let budget = slot.budget;
    let usable: Vec<&RecipeNutritionRecord> =
        candidates.iter().filter(|r| r.calories > 0.0).collect();
    if usable.is_empty() {
        return Err(PlanError::NoCandidates {
            slot: slot.slot,
            tag: slot.tag,
        });
    }

    let fits: Vec<&RecipeNutritionRecord> = usable
        .iter()
        .copied()
        .filter(|r| r.calories <= budget)
        .collect();

    if fits.is_empty() {
        let cheapest = usable
            .iter()
            .copied()
            .reduce(|best, r| if r.calories < best.calories { r } else { best })
            .ok_or(PlanError::NoCandidates {
                slot: slot.slot,
                tag: slot.tag,
            })?;
        warn!(
            slot = %slot.slot,
            budget,
            calories = cheapest.calories,
            recipe_id = %cheapest.id,
            "no dish fits slot budget; using cheapest"
        );
        return Ok(SlotComposition {
            meals: vec![PlannedMeal::snapshot(slot.slot, cheapest)],
            warning: Some(PlanWarning::SlotOverBudget {
                slot: slot.slot,
                budget,
                calories: cheapest.calories,
            }),
        });
    }

    let mut chosen = vec![best_single(&fits)];
    if budget >= TWO_DISH_MIN_BUDGET && fits.len() >= 2 {
        if let Some((a, b)) = best_pair(&fits, budget) {
            if a.calories + b.calories > chosen[0].calories {
                chosen = vec![a, b];
            }
        }
    }

    let composition = SlotComposition {
        meals: chosen
            .into_iter()
            .map(|r| PlannedMeal::snapshot(slot.slot, r))
            .collect(),
        warning: None,
    };
    debug!(
        slot = %slot.slot,
        budget,
        dishes = composition.meals.len(),
        calories = composition.calories(),
        "slot composed"
    );
    Ok(composition)
}

/// Highest-calorie dish; the first one seen wins ties.
fn best_single<'a>(fits: &[&'a RecipeNutritionRecord]) -> &'a RecipeNutritionRecord {
    let mut best = fits[0];
    for &r in &fits[1..] {
        if r.calories > best.calories {
            best = r;
        }
    }
    best
}

/// Largest pair sum not above `budget`; the first pair seen wins ties.
fn best_pair<'a>(
    fits: &[&'a RecipeNutritionRecord],
    budget: f64,
) -> Option<(&'a RecipeNutritionRecord, &'a RecipeNutritionRecord)> {
    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..fits.len() {
        for j in (i + 1)..fits.len() {
            let sum = fits[i].calories + fits[j].calories;
            if sum > budget {
                continue;
            }
            if best.map_or(true, |(s, _, _)| sum > s) {
                best = Some((sum, i, j));
            }
        }
    }
    best.map(|(_, i, j)| (fits[i], fits[j]))
}
