//! 通用工具函数

use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 字符串是否包含非空白字符
pub fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}
