//! 客户实体

use chrono::{DateTime, Utc};
use taproom_common::{AuditInfo, has_text};
use taproom_domain_core::{Entity, Patch, Record, merge_optional_text, merge_text};

use crate::domain::CustomerId;

/// 创建或整体替换客户时的全部可变字段
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: Option<String>,
}

/// 客户部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Patch<String>,
    pub email: Patch<String>,
}

/// 客户列表过滤条件：名称子串，大小写不敏感
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    name: Option<String>,
}

impl CustomerFilter {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name: name.filter(|n| has_text(n)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// 客户
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    version: i32,
    name: String,
    email: Option<String>,
    audit: AuditInfo,
}

impl Customer {
    /// 从持久化数据重建
    pub fn restore(id: CustomerId, version: i32, draft: CustomerDraft, audit: AuditInfo) -> Self {
        Self {
            id,
            version,
            name: draft.name,
            email: draft.email,
            audit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.audit.updated_at
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Customer {
    type Draft = CustomerDraft;
    type Patch = CustomerPatch;
    type Filter = CustomerFilter;

    fn new_id() -> CustomerId {
        CustomerId::new()
    }

    fn create(id: CustomerId, draft: CustomerDraft, now: DateTime<Utc>) -> Self {
        Self::restore(id, 0, draft, AuditInfo::new(now))
    }

    fn replace(&mut self, draft: CustomerDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.email = draft.email;
        self.version += 1;
        self.audit.touch(now);
    }

    fn merge(&mut self, patch: CustomerPatch, now: DateTime<Utc>) {
        merge_text(&mut self.name, patch.name);
        merge_optional_text(&mut self.email, patch.email);
        self.version += 1;
        self.audit.touch(now);
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn matches(&self, filter: &CustomerFilter) -> bool {
        filter
            .name()
            .is_none_or(|name| self.name.to_lowercase().contains(&name.to_lowercase()))
    }
}
