//! 啤酒业务逻辑

use std::sync::Arc;

use taproom_common::{PagedResult, Pagination};
use taproom_domain_core::Entity;
use taproom_errors::AppResult;
use taproom_ports::RecordStore;
use tracing::{debug, info};

use crate::domain::{Beer, BeerDraft, BeerFilter, BeerId, BeerPatch};

use super::queries::ListBeersQuery;

pub struct BeerService {
    store: Arc<dyn RecordStore<Beer>>,
}

impl BeerService {
    pub fn new(store: Arc<dyn RecordStore<Beer>>) -> Self {
        Self { store }
    }

    /// 创建啤酒
    pub async fn create_beer(&self, draft: BeerDraft) -> AppResult<Beer> {
        let beer = self.store.create(draft).await?;
        info!(beer_id = %beer.id(), beer_name = %beer.beer_name(), "Beer created");
        Ok(beer)
    }

    pub async fn get_beer(&self, id: &BeerId) -> AppResult<Option<Beer>> {
        self.store.find_by_id(id).await
    }

    /// 查询啤酒列表
    ///
    /// 1. 名称子串 + 款式过滤
    /// 2. 规整分页参数
    /// 3. `show_inventory == Some(false)` 时隐藏库存
    pub async fn list_beers(&self, query: ListBeersQuery) -> AppResult<PagedResult<Beer>> {
        let filter = BeerFilter::new(query.beer_name, query.beer_style);
        let pagination = Pagination::from_request(query.page_number, query.page_size);

        let page = self.store.list(&filter, &pagination).await?;
        debug!(
            total = page.total,
            returned = page.items.len(),
            "Beers listed"
        );

        if query.show_inventory == Some(false) {
            return Ok(page.map(Beer::without_inventory));
        }
        Ok(page)
    }

    /// 整体替换
    pub async fn update_beer(
        &self,
        id: &BeerId,
        draft: BeerDraft,
        expected_version: Option<i32>,
    ) -> AppResult<Option<Beer>> {
        let updated = self.store.replace(id, draft, expected_version).await?;
        if updated.is_some() {
            debug!(beer_id = %id, "Beer replaced");
        }
        Ok(updated)
    }

    /// 部分更新
    pub async fn patch_beer(&self, id: &BeerId, patch: BeerPatch) -> AppResult<Option<Beer>> {
        let patched = self.store.merge(id, patch).await?;
        if patched.is_some() {
            debug!(beer_id = %id, "Beer patched");
        }
        Ok(patched)
    }

    pub async fn delete_beer(&self, id: &BeerId) -> AppResult<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(beer_id = %id, "Beer deleted");
        }
        Ok(deleted)
    }
}
