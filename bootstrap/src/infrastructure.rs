//! 基础设施资源管理
//!
//! 按配置创建服务共享的基础设施资源

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use taproom_adapter_postgres::{PostgresConfig, create_pool};
use taproom_auth_core::TokenService;
use taproom_common::{RetryConfig, with_retry};
use taproom_config::{AppConfig, AuthConfig, StorageBackend};
use taproom_errors::{AppError, AppResult};
use tracing::info;

/// 基础设施资源容器
///
/// PostgreSQL 连接池只在存储后端为 postgres 时创建；
/// TokenService 只在启用认证时创建
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池
    postgres_pool: Option<PgPool>,
    /// Token 服务
    token_service: Option<Arc<TokenService>>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let postgres_pool = match config.storage.backend {
            StorageBackend::Postgres => {
                let database = config.database.as_ref().ok_or_else(|| {
                    AppError::internal("database configuration required for postgres storage")
                })?;

                let pg_config = PostgresConfig::new(database.url.expose_secret())
                    .with_max_connections(database.max_connections)
                    .with_application_name(&config.app_name);

                let pool = with_retry(&RetryConfig::default(), "PostgreSQL connection", || {
                    let cfg = pg_config.clone();
                    async move { create_pool(&cfg).await }
                })
                .await?;
                Some(pool)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage, PostgreSQL not configured");
                None
            }
        };

        let token_service = Self::build_token_service(&config.auth)?;

        Ok(Self {
            config,
            postgres_pool,
            token_service,
        })
    }

    /// 只持有配置，不创建任何外部资源（测试用）
    pub fn in_memory(config: AppConfig) -> AppResult<Self> {
        let token_service = Self::build_token_service(&config.auth)?;
        Ok(Self {
            config,
            postgres_pool: None,
            token_service,
        })
    }

    fn build_token_service(auth: &AuthConfig) -> AppResult<Option<Arc<TokenService>>> {
        if !auth.enabled {
            info!("Authentication disabled");
            return Ok(None);
        }

        let secret = auth
            .jwt_secret
            .as_ref()
            .ok_or_else(|| AppError::internal("auth.jwt_secret required when auth is enabled"))?;

        info!(issuer = %auth.issuer, "Authentication enabled");
        Ok(Some(Arc::new(TokenService::new(
            secret.expose_secret(),
            auth.expires_in,
            auth.issuer.clone(),
            auth.audience.clone(),
        ))))
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池（如果可用）
    pub fn postgres_pool(&self) -> Option<PgPool> {
        self.postgres_pool.clone()
    }

    /// 获取 Token 服务（如果启用认证）
    pub fn token_service(&self) -> Option<Arc<TokenService>> {
        self.token_service.clone()
    }

    /// 获取服务器配置
    pub fn server_config(&self) -> &taproom_config::ServerConfig {
        &self.config.server
    }
}
