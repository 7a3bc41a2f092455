use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::planner::model::{MealSlot, MealTimeTag};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("missing or invalid fields: {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("no eligible recipes for {slot} (tag `{tag}`)")]
    NoCandidates { slot: MealSlot, tag: MealTimeTag },

    #[error("only {available} recipes tagged `{tag}`, at least {required} required")]
    InsufficientCandidates {
        tag: MealTimeTag,
        available: usize,
        required: usize,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl PlanError {
    pub fn invalid(field: impl Into<String>) -> Self {
        PlanError::Validation {
            fields: vec![field.into()],
        }
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlanError::Validation { .. } | PlanError::NoCandidates { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PlanError::InsufficientCandidates { .. } => StatusCode::CONFLICT,
            PlanError::NotFound(_) => StatusCode::NOT_FOUND,
            PlanError::Store(e) => {
                error!(error = %e, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            PlanError::Validation { fields } => {
                json!({ "error": self.to_string(), "fields": fields })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
