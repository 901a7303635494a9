//! PostgreSQL 连接管理

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use taproom_errors::{AppError, AppResult};
use tracing::info;

use crate::PostgresConfig;

/// 创建 PostgreSQL 连接池
pub async fn create_pool(config: &PostgresConfig) -> AppResult<PgPool> {
    let mut options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::database(format!("Invalid database url: {}", e)))?;

    if let Some(ref name) = config.application_name {
        options = options.application_name(name);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max)
        .min_connections(config.pool_min)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(options)
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))?;

    info!(max_connections = config.pool_max, "PostgreSQL pool created");
    Ok(pool)
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    Ok(())
}
