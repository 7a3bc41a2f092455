pub mod repo;
mod repo_types;

use async_trait::async_trait;
use uuid::Uuid;

use crate::planner::model::{Goal, Profile};

pub use repo::PgProfileStore;

/// Read accessors into the externally owned profile and goal stores.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;

    /// The user's single active goal, if any.
    async fn load_active_goal(&self, user_id: Uuid) -> anyhow::Result<Option<Goal>>;
}
