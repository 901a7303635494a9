//! beer-service - 啤酒与客户库存服务
//!
//! 领域实体、记录仓储（内存 / PostgreSQL）与 REST API

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
