use tracing::{info, warn};

use crate::planner::composer::SlotComposition;
use crate::planner::model::{DayPlan, Macros, MealSlot, PlanWarning};

/// Flattens composed slots into one day and sums its nutrition.
pub fn assemble_day(slots: Vec<SlotComposition>, target_calories: f64) -> DayPlan {
    let mut plan = DayPlan {
        meals: Vec::new(),
        total_calories: 0.0,
        total_macros: Macros::default(),
        target_calories,
        warnings: Vec::new(),
    };
    for composition in slots {
        plan.meals.extend(composition.meals);
        plan.warnings.extend(composition.warning);
    }
    recompute_totals(&mut plan);
    plan
}

/// Re-sums totals from the meal snapshots.
pub fn recompute_totals(plan: &mut DayPlan) {
    let mut calories = 0.0;
    let mut macros = Macros::default();
    for meal in &plan.meals {
        calories += meal.calories;
        macros += meal.macros;
    }
    plan.total_calories = calories;
    plan.total_macros = macros;
}

/// Re-evaluates the over-target warning without touching the meals.
pub fn refresh_over_target(plan: &mut DayPlan) {
    plan.clear_over_target();
    if plan.total_calories > plan.target_calories {
        plan.warnings.push(PlanWarning::OverTarget {
            total_calories: plan.total_calories,
            target_calories: plan.target_calories,
        });
    }
}

/// Trims two-dish slots, in slot order, dropping the smaller dish until the
/// day fits its target. One-dish slots are never touched. If the day still
/// exceeds the target afterwards it is flagged, not rejected.
pub fn rebalance(mut plan: DayPlan) -> DayPlan {
    plan.clear_over_target();
    if plan.total_calories <= plan.target_calories {
        return plan;
    }

    let mut slot_order: Vec<MealSlot> = Vec::new();
    for meal in &plan.meals {
        if !slot_order.contains(&meal.slot) {
            slot_order.push(meal.slot);
        }
    }

    for slot in slot_order {
        if plan.total_calories <= plan.target_calories {
            break;
        }
        let positions: Vec<usize> = plan
            .meals
            .iter()
            .enumerate()
            .filter(|(_, m)| m.slot == slot)
            .map(|(i, _)| i)
            .collect();
        let &[first, second] = positions.as_slice() else {
            continue;
        };
        let drop = if plan.meals[second].calories <= plan.meals[first].calories {
            second
        } else {
            first
        };
        let removed = plan.meals.remove(drop);
        recompute_totals(&mut plan);
        info!(
            %slot,
            recipe_id = %removed.recipe_id,
            calories = removed.calories,
            total = plan.total_calories,
            "rebalance dropped dish"
        );
    }

    if plan.total_calories > plan.target_calories {
        warn!(
            total = plan.total_calories,
            target = plan.target_calories,
            "day still over target after rebalancing"
        );
        refresh_over_target(&mut plan);
    }
    plan
}
