//! 内存记录仓储
//!
//! 一把 `RwLock` 保护整张表：读操作共享，写操作独占，
//! 因此同一条记录上的读-改-写天然串行。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use taproom_common::{PagedResult, Pagination};
use taproom_domain_core::{Entity, Record};
use taproom_errors::{AppError, AppResult};
use taproom_ports::RecordStore;
use tokio::sync::RwLock;
use tracing::debug;

/// 按插入顺序保存的记录表
struct Table<R: Record> {
    next_seq: u64,
    rows: BTreeMap<u64, R>,
    index: HashMap<R::Id, u64>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            rows: BTreeMap::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    fn get_mut(&mut self, id: &R::Id) -> Option<&mut R> {
        let seq = self.index.get(id)?;
        self.rows.get_mut(seq)
    }
}

/// 内存实现的 [`RecordStore`]
pub struct InMemoryRecordStore<R: Record> {
    table: RwLock<Table<R>>,
}

impl<R: Record> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }

    /// 创建并写入初始数据
    pub async fn with_records(drafts: impl IntoIterator<Item = R::Draft>) -> AppResult<Self> {
        let store = Self::new();
        for draft in drafts {
            store.create(draft).await?;
        }
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn create(&self, draft: R::Draft) -> AppResult<R> {
        let mut table = self.table.write().await;

        let mut id = R::new_id();
        while table.index.contains_key(&id) {
            id = R::new_id();
        }

        let record = R::create(id.clone(), draft, Utc::now());
        let seq = table.next_seq;
        table.next_seq += 1;
        table.index.insert(id, seq);
        table.rows.insert(seq, record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, id: &R::Id) -> AppResult<Option<R>> {
        let table = self.table.read().await;
        Ok(table
            .index
            .get(id)
            .and_then(|seq| table.rows.get(seq))
            .cloned())
    }

    async fn list(&self, filter: &R::Filter, pagination: &Pagination) -> AppResult<PagedResult<R>> {
        let table = self.table.read().await;

        let matched: Vec<&R> = table.rows.values().filter(|r| r.matches(filter)).collect();
        let total = matched.len();
        let items = matched[pagination.window(total)]
            .iter()
            .map(|r| (*r).clone())
            .collect();

        debug!(total, page = pagination.page, "In-memory list");
        Ok(PagedResult::new(items, total as u64, pagination))
    }

    async fn replace(
        &self,
        id: &R::Id,
        draft: R::Draft,
        expected_version: Option<i32>,
    ) -> AppResult<Option<R>> {
        let mut table = self.table.write().await;
        let Some(record) = table.get_mut(id) else {
            return Ok(None);
        };

        if let Some(expected) = expected_version {
            if record.version() != expected {
                return Err(AppError::conflict(format!(
                    "记录 {} 版本不一致: 期望 {}, 实际 {}",
                    record.id(),
                    expected,
                    record.version()
                )));
            }
        }

        record.replace(draft, Utc::now());
        Ok(Some(record.clone()))
    }

    async fn merge(&self, id: &R::Id, patch: R::Patch) -> AppResult<Option<R>> {
        let mut table = self.table.write().await;
        let Some(record) = table.get_mut(id) else {
            return Ok(None);
        };

        record.merge(patch, Utc::now());
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &R::Id) -> AppResult<bool> {
        let mut table = self.table.write().await;
        match table.index.remove(id) {
            Some(seq) => {
                table.rows.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
