use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Candidates sampled per slot for single-day generation.
    pub sample_size: i64,
    /// Candidates sampled per meal-time tag for weekly generation.
    pub weekly_pool_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub planner: PlannerConfig,
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealmind".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealmind-users".into()),
        };
        let planner = PlannerConfig {
            sample_size: env_i64("PLANNER_SAMPLE_SIZE", 20),
            weekly_pool_size: env_i64("PLANNER_WEEKLY_POOL_SIZE", 40),
        };
        Ok(Self {
            database_url,
            jwt,
            planner,
        })
    }
}
