//! ports - 抽象 trait 层
//!
//! 定义存储后端的抽象接口，具体实现由服务在组装时选择

mod record_store;

pub use record_store::*;
