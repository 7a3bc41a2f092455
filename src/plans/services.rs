use rand::rngs::StdRng;
use rand::SeedableRng;
use time::{Date, Duration, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::catalog::CandidateQuery;
use crate::error::PlanError;
use crate::planner::{
    self,
    day::{recompute_totals, refresh_over_target},
    energy::compute_daily_calories,
    model::{Goal, PlannedMeal, Profile},
    slots::{plan_slots, SlotPlan},
    week::{plan_week, CandidatePools},
};
use crate::plans::dto::{GenerateDayRequest, GenerateWeekRequest};
use crate::plans::repo_types::StoredDayPlan;
use crate::state::AppState;

/// Loads the profile and, for goal-based requests, the active goal.
async fn load_inputs(
    state: &AppState,
    user_id: Uuid,
    use_goal_calories: bool,
    goal_id: Option<Uuid>,
) -> Result<(Profile, Option<Goal>), PlanError> {
    let profile = state
        .profiles
        .load_profile(user_id)
        .await?
        .ok_or_else(|| PlanError::invalid("profile"))?;

    if !use_goal_calories {
        // A goal id only makes sense for goal-based plans.
        if goal_id.is_some() {
            return Err(PlanError::invalid("goal_id"));
        }
        return Ok((profile, None));
    }

    let goal = state
        .profiles
        .load_active_goal(user_id)
        .await?
        .ok_or_else(|| PlanError::invalid("active_goal"))?;
    if goal_id.is_some_and(|id| id != goal.id) {
        return Err(PlanError::invalid("goal_id"));
    }
    Ok((profile, Some(goal)))
}

/// One pool per distinct slot tag.
async fn fetch_pools(
    state: &AppState,
    profile: &Profile,
    slots: &[SlotPlan],
    sample_size: i64,
) -> Result<CandidatePools, PlanError> {
    let mut pools = CandidatePools::new();
    for slot in slots {
        if pools.contains_key(&slot.tag) {
            continue;
        }
        let query = CandidateQuery::for_profile(slot.tag, profile, sample_size);
        let candidates = state.catalog.fetch_candidates(&query).await?;
        pools.insert(slot.tag, candidates);
    }
    Ok(pools)
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[instrument(skip(state, req), fields(date = %req.date, goal = req.use_goal_calories))]
pub async fn generate_day(
    state: &AppState,
    user_id: Uuid,
    req: GenerateDayRequest,
) -> Result<StoredDayPlan, PlanError> {
    let (profile, goal) = load_inputs(state, user_id, req.use_goal_calories, req.goal_id).await?;
    let target = compute_daily_calories(&profile, goal.as_ref(), today())?;
    let slots = plan_slots(&profile.meal_slots, target)?;
    let pools = fetch_pools(state, &profile, &slots, state.config.planner.sample_size).await?;

    let plan = planner::plan_day(&slots, &pools, target)?;
    if plan.is_over_target() {
        warn!(%user_id, total = plan.total_calories, target, "day plan stored over target");
    }

    let stored = state
        .plans
        .upsert_day_plan(user_id, req.date, goal.as_ref().map(|g| g.id), &plan)
        .await?;
    info!(%user_id, plan_id = %stored.id, meals = stored.plan.meals.len(), "day plan generated");
    Ok(stored)
}

/// Seven days from `start_date`. Days are written one by one; a failed
/// write stops the run and leaves the earlier days in place.
#[instrument(skip(state, req), fields(start = %req.start_date, goal = req.use_goal_calories))]
pub async fn generate_week(
    state: &AppState,
    user_id: Uuid,
    req: GenerateWeekRequest,
) -> Result<Vec<StoredDayPlan>, PlanError> {
    let (profile, goal) = load_inputs(state, user_id, req.use_goal_calories, None).await?;
    let goal_id = goal.as_ref().map(|g| g.id);
    let target = compute_daily_calories(&profile, goal.as_ref(), today())?;
    let slots = plan_slots(&profile.meal_slots, target)?;
    let pools = fetch_pools(state, &profile, &slots, state.config.planner.weekly_pool_size).await?;

    let days = {
        let mut rng = StdRng::from_entropy();
        plan_week(&slots, &pools, target, &mut rng)?
    };

    let mut stored = Vec::with_capacity(days.len());
    for (offset, plan) in days.iter().enumerate() {
        let date = req
            .start_date
            .checked_add(Duration::days(offset as i64))
            .ok_or_else(|| PlanError::invalid("start_date"))?;
        let saved = if req.overwrite {
            state.plans.upsert_day_plan(user_id, date, goal_id, plan).await?
        } else {
            state.plans.create_day_plan(user_id, date, goal_id, plan).await?
        };
        stored.push(saved);
    }
    info!(%user_id, days = stored.len(), "week plan generated");
    Ok(stored)
}

/// Swaps the dish at `index` of the plan's meal list for another recipe,
/// keeping its slot. Totals are re-summed; composition is not re-run.
#[instrument(skip(state))]
pub async fn replace_meal(
    state: &AppState,
    user_id: Uuid,
    plan_id: Uuid,
    index: usize,
    recipe_id: Uuid,
) -> Result<StoredDayPlan, PlanError> {
    let mut stored = state
        .plans
        .get_day_plan(user_id, plan_id)
        .await?
        .ok_or(PlanError::NotFound("day plan"))?;
    let slot = stored
        .plan
        .meals
        .get(index)
        .map(|m| m.slot)
        .ok_or_else(|| PlanError::invalid("meal_index"))?;
    let recipe = state
        .catalog
        .get_recipe(recipe_id)
        .await?
        .ok_or(PlanError::NotFound("recipe"))?;

    stored.plan.meals[index] = PlannedMeal::snapshot(slot, &recipe);
    recompute_totals(&mut stored.plan);
    refresh_over_target(&mut stored.plan);

    let updated = state
        .plans
        .update_day_plan(user_id, plan_id, &stored.plan)
        .await?
        .ok_or(PlanError::NotFound("day plan"))?;
    info!(%user_id, %plan_id, index, %recipe_id, "meal replaced");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::composer::tests::recipe;
    use crate::planner::model::{ActivityLevel, GoalStatus, MealSlot, MealTimeTag, Sex};
    use crate::plans::repo_types::DateRange;
    use crate::testing::{MemoryCatalog, TestStores};
    use time::macros::date;

    fn profile(slots: Vec<MealSlot>) -> Profile {
        Profile {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age: Some(30),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
            meal_slots: slots,
            ..Profile::default()
        }
    }

    fn goal(calories: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            target_weight_kg: 68.0,
            weekly_rate_kg: -0.25,
            daily_calories: Some(calories),
            status: GoalStatus::Active,
        }
    }

    fn day_req(date: Date) -> GenerateDayRequest {
        GenerateDayRequest {
            date,
            use_goal_calories: false,
            goal_id: None,
        }
    }

    fn seeded_catalog(per_tag: usize) -> MemoryCatalog {
        let catalog = MemoryCatalog::default();
        for tag in [
            MealTimeTag::Morning,
            MealTimeTag::Midday,
            MealTimeTag::Afternoon,
            MealTimeTag::Evening,
        ] {
            for i in 0..per_tag {
                catalog.add(tag, recipe(&format!("{tag}-{i}"), 250.0 + 10.0 * i as f64));
            }
        }
        catalog
    }

    #[tokio::test]
    async fn day_plan_is_generated_and_upserted() {
        let stores = TestStores::new(seeded_catalog(5));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Breakfast, MealSlot::Dinner]));
        let state = stores.state();

        let first = generate_day(&state, user, day_req(date!(2024 - 05 - 01))).await.unwrap();
        assert_eq!(first.plan.target_calories, 2556.0);
        assert!(first.plan.total_calories <= 2556.0);
        assert!(first.goal_id.is_none());

        let again = generate_day(&state, user, day_req(date!(2024 - 05 - 01))).await.unwrap();
        assert_eq!(again.id, first.id);
        let all = state.plans.list_day_plans(user, DateRange::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn goal_and_health_plans_coexist_on_one_date() {
        let stores = TestStores::new(seeded_catalog(5));
        let user = Uuid::new_v4();
        let g = goal(1800.0);
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch, MealSlot::Dinner]));
        stores.profiles.put_goal(user, g.clone());
        let state = stores.state();

        let health = generate_day(&state, user, day_req(date!(2024 - 05 - 02))).await.unwrap();
        let goal_plan = generate_day(
            &state,
            user,
            GenerateDayRequest {
                date: date!(2024 - 05 - 02),
                use_goal_calories: true,
                goal_id: Some(g.id),
            },
        )
        .await
        .unwrap();

        assert_ne!(health.id, goal_plan.id);
        assert_eq!(goal_plan.goal_id, Some(g.id));
        assert_eq!(goal_plan.plan.target_calories, 1800.0);
        assert_eq!(health.plan.target_calories, 2556.0);

        let deleted = state.plans.delete_goal_day_plans(user, g.id).await.unwrap();
        assert_eq!(deleted, 1);
        let left = state.plans.list_day_plans(user, DateRange::default()).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, health.id);
    }

    #[tokio::test]
    async fn goal_request_without_active_goal_is_rejected() {
        let stores = TestStores::new(seeded_catalog(5));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        let state = stores.state();
        let err = generate_day(
            &state,
            user,
            GenerateDayRequest {
                date: date!(2024 - 05 - 02),
                use_goal_calories: true,
                goal_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::Validation { fields } if fields == vec!["active_goal"]));
    }

    #[tokio::test]
    async fn mismatched_goal_id_is_rejected() {
        let stores = TestStores::new(seeded_catalog(5));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        stores.profiles.put_goal(user, goal(1800.0));
        let state = stores.state();
        let err = generate_day(
            &state,
            user,
            GenerateDayRequest {
                date: date!(2024 - 05 - 02),
                use_goal_calories: true,
                goal_id: Some(Uuid::new_v4()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::Validation { fields } if fields == vec!["goal_id"]));
    }

    #[tokio::test]
    async fn goal_id_without_goal_calories_is_rejected() {
        let stores = TestStores::new(seeded_catalog(5));
        let user = Uuid::new_v4();
        let g = goal(1800.0);
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        stores.profiles.put_goal(user, g.clone());
        let state = stores.state();
        let err = generate_day(
            &state,
            user,
            GenerateDayRequest {
                date: date!(2024 - 05 - 02),
                use_goal_calories: false,
                goal_id: Some(g.id),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::Validation { fields } if fields == vec!["goal_id"]));
        let stored = state.plans.list_day_plans(user, DateRange::default()).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn missing_profile_and_empty_slots_are_validation_errors() {
        let stores = TestStores::new(seeded_catalog(5));
        let user = Uuid::new_v4();
        let state = stores.state();
        let err = generate_day(&state, user, day_req(date!(2024 - 05 - 02))).await.unwrap_err();
        assert!(matches!(err, PlanError::Validation { fields } if fields == vec!["profile"]));

        stores.profiles.put_profile(user, profile(vec![]));
        let err = generate_day(&state, user, day_req(date!(2024 - 05 - 02))).await.unwrap_err();
        assert!(matches!(err, PlanError::Validation { fields } if fields == vec!["meal_slots"]));
    }

    #[tokio::test]
    async fn empty_tag_names_the_slot() {
        let catalog = MemoryCatalog::default();
        catalog.add(MealTimeTag::Morning, recipe("eggs", 300.0));
        let stores = TestStores::new(catalog);
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Breakfast, MealSlot::Snack]));
        let state = stores.state();

        let err = generate_day(&state, user, day_req(date!(2024 - 05 - 02))).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::NoCandidates { slot: MealSlot::Snack, tag: MealTimeTag::Afternoon }
        ));
        let all = state.plans.list_day_plans(user, DateRange::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn allergens_are_excluded_from_candidates() {
        let catalog = MemoryCatalog::default();
        let mut nutty = recipe("satay", 400.0);
        nutty.ingredients = vec!["Peanut".into(), "chicken".into()];
        catalog.add(MealTimeTag::Evening, nutty);
        catalog.add(MealTimeTag::Evening, recipe("stew", 380.0));
        let stores = TestStores::new(catalog);
        let user = Uuid::new_v4();
        let mut p = profile(vec![MealSlot::Dinner]);
        p.allergens = vec!["peanut".into()];
        stores.profiles.put_profile(user, p);
        let state = stores.state();

        let plan = generate_day(&state, user, day_req(date!(2024 - 05 - 03))).await.unwrap();
        assert_eq!(plan.plan.meals.len(), 1);
        assert_eq!(plan.plan.meals[0].name, "stew");
    }

    #[tokio::test]
    async fn week_creates_seven_consecutive_days() {
        let stores = TestStores::new(seeded_catalog(8));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(
            user,
            profile(vec![MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner]),
        );
        let state = stores.state();

        let days = generate_week(
            &state,
            user,
            GenerateWeekRequest {
                start_date: date!(2024 - 12 - 28),
                use_goal_calories: false,
                overwrite: true,
            },
        )
        .await
        .unwrap();
        let dates: Vec<_> = days.iter().map(|d| d.plan_date).collect();
        assert_eq!(dates.first(), Some(&date!(2024 - 12 - 28)));
        assert_eq!(dates.last(), Some(&date!(2025 - 01 - 03)));
        assert!(days.iter().all(|d| d.plan.meals.len() == 3));
    }

    #[tokio::test]
    async fn week_with_small_pool_writes_nothing() {
        let stores = TestStores::new(seeded_catalog(6));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        let state = stores.state();

        let err = generate_week(
            &state,
            user,
            GenerateWeekRequest {
                start_date: date!(2024 - 06 - 01),
                use_goal_calories: false,
                overwrite: true,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::InsufficientCandidates { available: 6, .. }));
        assert!(state.plans.list_day_plans(user, DateRange::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn week_without_overwrite_keeps_days_before_a_conflict() {
        let stores = TestStores::new(seeded_catalog(8));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        let state = stores.state();
        generate_day(&state, user, day_req(date!(2024 - 06 - 04))).await.unwrap();

        let err = generate_week(
            &state,
            user,
            GenerateWeekRequest {
                start_date: date!(2024 - 06 - 01),
                use_goal_calories: false,
                overwrite: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::Store(_)));
        // June 1-3 written, June 4 pre-existing.
        let all = state.plans.list_day_plans(user, DateRange::default()).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn replace_meal_resnapshots_and_retotals() {
        let catalog = seeded_catalog(3);
        let big = recipe("feast", 3000.0);
        catalog.add(MealTimeTag::Evening, big.clone());
        let stores = TestStores::new(catalog);
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        let state = stores.state();

        let plan = generate_day(&state, user, day_req(date!(2024 - 06 - 10))).await.unwrap();
        let last = plan.plan.meals.len() - 1;
        let updated = replace_meal(&state, user, plan.id, last, big.id).await.unwrap();

        assert_eq!(updated.plan.meals[last].recipe_id, big.id);
        assert_eq!(updated.plan.meals[last].slot, MealSlot::Lunch);
        let sum: f64 = updated.plan.meals.iter().map(|m| m.calories).sum();
        assert_eq!(updated.plan.total_calories, sum);
        assert!(updated.plan.is_over_target());
    }

    #[tokio::test]
    async fn replace_meal_rejects_bad_index_and_unknown_recipe() {
        let stores = TestStores::new(seeded_catalog(3));
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Lunch]));
        let state = stores.state();
        let plan = generate_day(&state, user, day_req(date!(2024 - 06 - 10))).await.unwrap();

        let err = replace_meal(&state, user, plan.id, 9, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PlanError::Validation { .. }));
        let err = replace_meal(&state, user, plan.id, 0, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound("recipe")));
        let err = replace_meal(&state, Uuid::new_v4(), plan.id, 0, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::NotFound("day plan")));
    }

    #[tokio::test]
    async fn stored_plan_is_isolated_from_catalog_edits() {
        let catalog = MemoryCatalog::default();
        let dish = recipe("porridge", 400.0);
        catalog.add(MealTimeTag::Morning, dish.clone());
        let stores = TestStores::new(catalog);
        let user = Uuid::new_v4();
        stores.profiles.put_profile(user, profile(vec![MealSlot::Breakfast]));
        let state = stores.state();

        let plan = generate_day(&state, user, day_req(date!(2024 - 06 - 11))).await.unwrap();
        stores.catalog.set_calories(dish.id, 999.0);

        let reloaded = state.plans.get_day_plan(user, plan.id).await.unwrap().unwrap();
        assert_eq!(reloaded.plan.total_calories, 400.0);
        assert_eq!(reloaded.plan.meals[0].calories, 400.0);
    }
}
