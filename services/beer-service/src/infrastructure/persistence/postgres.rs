//! PostgreSQL repository implementation
//!
//! replace / merge 在事务中先 `SELECT ... FOR UPDATE` 锁行，
//! 在内存中执行领域操作后再写回，保证同一条记录的读-改-写串行。

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use taproom_adapter_postgres::{contains_pattern, map_sqlx_error};
use taproom_common::{PagedResult, Pagination};
use taproom_domain_core::{Entity, Record};
use taproom_errors::{AppError, AppResult};
use taproom_ports::RecordStore;
use tracing::info;

use crate::domain::{
    Beer, BeerDraft, BeerFilter, BeerId, BeerPatch, Customer, CustomerDraft, CustomerFilter,
    CustomerId, CustomerPatch,
};

use super::rows::{BeerRow, CustomerRow};

/// 执行数据库迁移
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("数据库迁移失败: {}", e)))?;
    info!("Database migrations applied");
    Ok(())
}

/// 与 TIMESTAMPTZ 精度（微秒）对齐的当前时间
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn limit_offset(pagination: &Pagination) -> (i64, i64) {
    let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
    (pagination.page_size as i64, offset)
}

fn version_conflict(id: impl std::fmt::Display, expected: i32, actual: i32) -> AppError {
    AppError::conflict(format!(
        "记录 {} 版本不一致: 期望 {}, 实际 {}",
        id, expected, actual
    ))
}

// ============================================================================
// Beer
// ============================================================================

const BEER_COLUMNS: &str = "id, version, beer_name, beer_style, upc, quantity_on_hand, price, created_at, updated_at";

pub struct PostgresBeerStore {
    pool: PgPool,
}

impl PostgresBeerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BeerFilter) {
        let mut separator = " WHERE ";
        if let Some(name) = filter.name() {
            builder
                .push(separator)
                .push("beer_name ILIKE ")
                .push_bind(contains_pattern(name))
                .push(" ESCAPE '\\'");
            separator = " AND ";
        }
        if let Some(style) = filter.style() {
            builder
                .push(separator)
                .push("beer_style = ")
                .push_bind(style.as_str());
        }
    }

    async fn lock(conn: &mut PgConnection, id: &BeerId) -> AppResult<Option<Beer>> {
        let row = sqlx::query_as::<_, BeerRow>(&format!(
            "SELECT {} FROM beers WHERE id = $1 FOR UPDATE",
            BEER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(conn)
        .await
        .map_err(|e| map_sqlx_error("查询啤酒失败", e))?;

        row.map(Beer::try_from).transpose()
    }

    async fn write_back(conn: &mut PgConnection, beer: &Beer) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE beers
            SET beer_name = $2, beer_style = $3, upc = $4, quantity_on_hand = $5,
                price = $6, version = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(beer.id().0)
        .bind(beer.beer_name())
        .bind(beer.beer_style().as_str())
        .bind(beer.upc())
        .bind(beer.quantity_on_hand())
        .bind(beer.price())
        .bind(beer.version())
        .bind(beer.updated_at())
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("更新啤酒失败", e))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore<Beer> for PostgresBeerStore {
    async fn create(&self, draft: BeerDraft) -> AppResult<Beer> {
        let beer = Beer::create(BeerId::new(), draft, now());

        sqlx::query(
            r#"
            INSERT INTO beers (id, version, beer_name, beer_style, upc, quantity_on_hand,
                               price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(beer.id().0)
        .bind(beer.version())
        .bind(beer.beer_name())
        .bind(beer.beer_style().as_str())
        .bind(beer.upc())
        .bind(beer.quantity_on_hand())
        .bind(beer.price())
        .bind(beer.created_at())
        .bind(beer.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("创建啤酒失败", e))?;

        Ok(beer)
    }

    async fn find_by_id(&self, id: &BeerId) -> AppResult<Option<Beer>> {
        let row = sqlx::query_as::<_, BeerRow>(&format!(
            "SELECT {} FROM beers WHERE id = $1",
            BEER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("查询啤酒失败", e))?;

        row.map(Beer::try_from).transpose()
    }

    async fn list(&self, filter: &BeerFilter, pagination: &Pagination) -> AppResult<PagedResult<Beer>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM beers");
        Self::push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("统计啤酒失败", e))?;

        let (limit, offset) = limit_offset(pagination);
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM beers", BEER_COLUMNS));
        Self::push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at, id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<BeerRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("查询啤酒列表失败", e))?;

        let items = rows
            .into_iter()
            .map(Beer::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PagedResult::new(items, total.max(0) as u64, pagination))
    }

    async fn replace(
        &self,
        id: &BeerId,
        draft: BeerDraft,
        expected_version: Option<i32>,
    ) -> AppResult<Option<Beer>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("开启事务失败", e))?;

        let Some(mut beer) = Self::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        if let Some(expected) = expected_version {
            if beer.version() != expected {
                return Err(version_conflict(id, expected, beer.version()));
            }
        }

        beer.replace(draft, now());
        Self::write_back(&mut *tx, &beer).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("提交事务失败", e))?;
        Ok(Some(beer))
    }

    async fn merge(&self, id: &BeerId, patch: BeerPatch) -> AppResult<Option<Beer>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("开启事务失败", e))?;

        let Some(mut beer) = Self::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        beer.merge(patch, now());
        Self::write_back(&mut *tx, &beer).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("提交事务失败", e))?;
        Ok(Some(beer))
    }

    async fn delete(&self, id: &BeerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("删除啤酒失败", e))?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Customer
// ============================================================================

const CUSTOMER_COLUMNS: &str = "id, version, name, email, created_at, updated_at";

pub struct PostgresCustomerStore {
    pool: PgPool,
}

impl PostgresCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CustomerFilter) {
        if let Some(name) = filter.name() {
            builder
                .push(" WHERE name ILIKE ")
                .push_bind(contains_pattern(name))
                .push(" ESCAPE '\\'");
        }
    }

    async fn lock(conn: &mut PgConnection, id: &CustomerId) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1 FOR UPDATE",
            CUSTOMER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(conn)
        .await
        .map_err(|e| map_sqlx_error("查询客户失败", e))?;

        Ok(row.map(Customer::from))
    }

    async fn write_back(conn: &mut PgConnection, customer: &Customer) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, email = $3, version = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(customer.id().0)
        .bind(customer.name())
        .bind(customer.email())
        .bind(customer.version())
        .bind(customer.updated_at())
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("更新客户失败", e))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore<Customer> for PostgresCustomerStore {
    async fn create(&self, draft: CustomerDraft) -> AppResult<Customer> {
        let customer = Customer::create(CustomerId::new(), draft, now());

        sqlx::query(
            r#"
            INSERT INTO customers (id, version, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(customer.id().0)
        .bind(customer.version())
        .bind(customer.name())
        .bind(customer.email())
        .bind(customer.created_at())
        .bind(customer.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("创建客户失败", e))?;

        Ok(customer)
    }

    async fn find_by_id(&self, id: &CustomerId) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("查询客户失败", e))?;

        Ok(row.map(Customer::from))
    }

    async fn list(
        &self,
        filter: &CustomerFilter,
        pagination: &Pagination,
    ) -> AppResult<PagedResult<Customer>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM customers");
        Self::push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("统计客户失败", e))?;

        let (limit, offset) = limit_offset(pagination);
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM customers", CUSTOMER_COLUMNS));
        Self::push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at, id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<CustomerRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("查询客户列表失败", e))?;

        let items = rows.into_iter().map(Customer::from).collect();
        Ok(PagedResult::new(items, total.max(0) as u64, pagination))
    }

    async fn replace(
        &self,
        id: &CustomerId,
        draft: CustomerDraft,
        expected_version: Option<i32>,
    ) -> AppResult<Option<Customer>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("开启事务失败", e))?;

        let Some(mut customer) = Self::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        if let Some(expected) = expected_version {
            if customer.version() != expected {
                return Err(version_conflict(id, expected, customer.version()));
            }
        }

        customer.replace(draft, now());
        Self::write_back(&mut *tx, &customer).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("提交事务失败", e))?;
        Ok(Some(customer))
    }

    async fn merge(&self, id: &CustomerId, patch: CustomerPatch) -> AppResult<Option<Customer>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("开启事务失败", e))?;

        let Some(mut customer) = Self::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        customer.merge(patch, now());
        Self::write_back(&mut *tx, &customer).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("提交事务失败", e))?;
        Ok(Some(customer))
    }

    async fn delete(&self, id: &CustomerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("删除客户失败", e))?;

        Ok(result.rows_affected() > 0)
    }
}
