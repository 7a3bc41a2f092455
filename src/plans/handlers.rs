use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::PlanError, state::AppState};

use super::dto::{
    DayPlanResponse, DeletedResponse, GenerateDayRequest, GenerateWeekRequest, ReplaceMealRequest,
};
use super::repo_types::DateRange;
use super::services;

pub fn generate_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/day", post(generate_day))
        .route("/plans/week", post(generate_week))
        .route("/plans/:id/meals/:index", put(replace_meal))
}

pub fn manage_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).delete(delete_plans))
        .route("/plans/:id", get(get_plan).delete(delete_plan))
        .route("/plans/goal/:goal_id", delete(delete_goal_plans))
}

#[instrument(skip(state, body))]
pub async fn generate_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GenerateDayRequest>,
) -> Result<(StatusCode, Json<DayPlanResponse>), PlanError> {
    let plan = services::generate_day(&state, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

#[instrument(skip(state, body))]
pub async fn generate_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GenerateWeekRequest>,
) -> Result<(StatusCode, Json<Vec<DayPlanResponse>>), PlanError> {
    let days = services::generate_week(&state, user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(days.into_iter().map(Into::into).collect()),
    ))
}

#[instrument(skip(state, body))]
pub async fn replace_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(body): Json<ReplaceMealRequest>,
) -> Result<Json<DayPlanResponse>, PlanError> {
    let plan = services::replace_meal(&state, user_id, id, index, body.recipe_id).await?;
    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<DayPlanResponse>>, PlanError> {
    let plans = state.plans.list_day_plans(user_id, range).await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DayPlanResponse>, PlanError> {
    let plan = state
        .plans
        .get_day_plan(user_id, id)
        .await?
        .ok_or(PlanError::NotFound("day plan"))?;
    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, PlanError> {
    if !state.plans.delete_day_plan(user_id, id).await? {
        return Err(PlanError::NotFound("day plan"));
    }
    info!(%user_id, %id, "day plan deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(range): Query<DateRange>,
) -> Result<Json<DeletedResponse>, PlanError> {
    let deleted = state.plans.delete_all_day_plans(user_id, range).await?;
    info!(%user_id, deleted, "day plans deleted");
    Ok(Json(DeletedResponse { deleted }))
}

#[instrument(skip(state))]
pub async fn delete_goal_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, PlanError> {
    let deleted = state.plans.delete_goal_day_plans(user_id, goal_id).await?;
    info!(%user_id, %goal_id, deleted, "goal day plans deleted");
    Ok(Json(DeletedResponse { deleted }))
}
