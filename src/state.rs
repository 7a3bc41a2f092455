use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::{PgRecipeCatalog, RecipeCatalog};
use crate::config::AppConfig;
use crate::plans::{PgPlanStore, PlanStore};
use crate::profiles::{PgProfileStore, ProfileStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn RecipeCatalog>,
    pub profiles: Arc<dyn ProfileStore>,
    pub plans: Arc<dyn PlanStore>,
}

impl AppState {
    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgRecipeCatalog::new(db.clone())),
            Arc::new(PgProfileStore::new(db.clone())),
            Arc::new(PgPlanStore::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        catalog: Arc<dyn RecipeCatalog>,
        profiles: Arc<dyn ProfileStore>,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            profiles,
            plans,
        }
    }
}
