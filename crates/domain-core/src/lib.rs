//! domain-core - 跨实体共享的领域核心类型
//!
//! 记录生命周期 trait 与部分更新（patch）的合并规则

mod entity;
mod patch;

pub use entity::*;
pub use patch::*;

// Re-export common types
pub use taproom_common::AuditInfo;
