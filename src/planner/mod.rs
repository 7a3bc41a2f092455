//! Calorie-budget meal assembly. Everything here is pure: callers fetch
//! profiles and candidate pools and hand them in.

pub mod composer;
pub mod day;
pub mod energy;
pub mod model;
pub mod slots;
pub mod week;

use crate::error::PlanError;
use crate::planner::model::DayPlan;
use crate::planner::slots::SlotPlan;
use crate::planner::week::CandidatePools;

/// Composes every slot from its tag's pool, assembles the day and rebalances it.
pub fn plan_day(
    slots: &[SlotPlan],
    pools: &CandidatePools,
    target_calories: f64,
) -> Result<DayPlan, PlanError> {
    let compositions = slots
        .iter()
        .map(|slot| {
            let pool = pools.get(&slot.tag).map(Vec::as_slice).unwrap_or_default();
            composer::compose_slot(slot, pool)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(day::rebalance(day::assemble_day(compositions, target_calories)))
}
