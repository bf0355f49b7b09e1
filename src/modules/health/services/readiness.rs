use std::time::Duration;

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::error::AppError;

const DATABASE_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// A dependency that must answer before the service takes traffic
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> Result<(), AppError>;
}

pub struct DatabaseProbe {
    pool: MySqlPool,
}

impl DatabaseProbe {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessProbe for DatabaseProbe {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), AppError> {
        tokio::time::timeout(
            DATABASE_PROBE_TIMEOUT,
            sqlx::query("SELECT 1").fetch_one(&self.pool),
        )
        .await
        .map_err(|_| AppError::internal("database did not answer in time"))??;
        Ok(())
    }
}
