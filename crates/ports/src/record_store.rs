//! RecordStore trait 定义

use async_trait::async_trait;
use taproom_common::{PagedResult, Pagination};
use taproom_domain_core::Record;
use taproom_errors::AppResult;

/// 记录仓储
///
/// "不存在" 通过 `Option` / `bool` 返回，不作为错误；
/// `Err` 只表示后端故障或版本冲突。
///
/// 每个操作对自身是原子的：同一条记录上的并发 `merge`
/// 不会交错执行各自的读-改-写。
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// 新建记录，忽略输入中的任何标识
    async fn create(&self, draft: R::Draft) -> AppResult<R>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: &R::Id) -> AppResult<Option<R>>;

    /// 按过滤条件分页查询，顺序稳定
    async fn list(&self, filter: &R::Filter, pagination: &Pagination)
    -> AppResult<PagedResult<R>>;

    /// 整体替换；`expected_version` 不一致时返回 `Conflict`
    async fn replace(
        &self,
        id: &R::Id,
        draft: R::Draft,
        expected_version: Option<i32>,
    ) -> AppResult<Option<R>>;

    /// 部分更新
    async fn merge(&self, id: &R::Id, patch: R::Patch) -> AppResult<Option<R>>;

    /// 删除，返回记录是否存在
    async fn delete(&self, id: &R::Id) -> AppResult<bool>;
}
