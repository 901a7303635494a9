//! 路由共享状态与装配

use std::sync::Arc;

use taproom_auth_core::TokenService;
use taproom_bootstrap::Infrastructure;
use taproom_config::StorageBackend;
use taproom_errors::{AppError, AppResult};
use taproom_ports::RecordStore;
use tracing::info;

use crate::application::{BeerService, CustomerService};
use crate::domain::{Beer, Customer, seed};
use crate::infrastructure::persistence::{
    InMemoryRecordStore, PostgresBeerStore, PostgresCustomerStore, run_migrations,
};

/// 认证设置
#[derive(Clone)]
pub struct AuthSettings {
    pub tokens: Arc<TokenService>,
    /// 查询啤酒列表所需的角色
    pub list_beers_role: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub beers: Arc<BeerService>,
    pub customers: Arc<CustomerService>,
    pub auth: Option<AuthSettings>,
}

impl AppState {
    pub fn new(
        beer_store: Arc<dyn RecordStore<Beer>>,
        customer_store: Arc<dyn RecordStore<Customer>>,
    ) -> Self {
        Self {
            beers: Arc::new(BeerService::new(beer_store)),
            customers: Arc::new(CustomerService::new(customer_store)),
            auth: None,
        }
    }

    /// 内存存储，`seed` 为真时写入示例数据
    pub async fn in_memory(seed: bool) -> AppResult<Self> {
        let (beers, customers) = if seed {
            (seed::sample_beers(), seed::sample_customers())
        } else {
            (Vec::new(), Vec::new())
        };

        let beer_store = InMemoryRecordStore::<Beer>::with_records(beers).await?;
        let customer_store = InMemoryRecordStore::<Customer>::with_records(customers).await?;
        Ok(Self::new(Arc::new(beer_store), Arc::new(customer_store)))
    }

    pub fn with_auth(mut self, auth: AuthSettings) -> Self {
        self.auth = Some(auth);
        self
    }

    /// 按配置选择存储后端并装配服务
    pub async fn from_infrastructure(infra: &Infrastructure) -> AppResult<Self> {
        let config = infra.config();

        let state = match config.storage.backend {
            StorageBackend::Memory => {
                info!(seed = config.storage.seed_sample_data, "Using in-memory stores");
                Self::in_memory(config.storage.seed_sample_data).await?
            }
            StorageBackend::Postgres => {
                let pool = infra
                    .postgres_pool()
                    .ok_or_else(|| AppError::internal("PostgreSQL pool not initialized"))?;

                if config.database.as_ref().is_some_and(|db| db.run_migrations) {
                    run_migrations(&pool).await?;
                }

                info!("Using PostgreSQL stores");
                Self::new(
                    Arc::new(PostgresBeerStore::new(pool.clone())),
                    Arc::new(PostgresCustomerStore::new(pool)),
                )
            }
        };

        Ok(match infra.token_service() {
            Some(tokens) => state.with_auth(AuthSettings {
                tokens,
                list_beers_role: config.auth.list_beers_role.clone(),
            }),
            None => state,
        })
    }
}
