//! 实体基础 trait

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};


/// 实体 trait
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 由记录仓储托管生命周期的实体
///
/// 标识和创建时间只在 [`Record::create`] 中赋值；
/// `replace` 和 `merge` 都会刷新更新时间并递增版本号。
pub trait Record:
    Entity<Id: Clone + Eq + Hash + Display + Debug + Send + Sync + 'static>
    + Clone
    + Debug
    + Send
    + Sync
    + 'static
{
    /// 创建/整体替换时的输入（全部可变字段）
    type Draft: Send + 'static;
    /// 部分更新输入
    type Patch: Send + 'static;
    /// 列表过滤条件
    type Filter: Send + Sync + 'static;

    /// 生成新的标识
    fn new_id() -> Self::Id;

    /// 以服务端分配的标识和时间创建记录
    fn create(id: Self::Id, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// 覆盖全部可变字段
    fn replace(&mut self, draft: Self::Draft, now: DateTime<Utc>);

    /// 只覆盖 patch 中提供的字段，更新时间无条件刷新
    fn merge(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn version(&self) -> i32;

    fn matches(&self, filter: &Self::Filter) -> bool;
}
