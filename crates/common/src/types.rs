//! 通用类型定义

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 审计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditInfo {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// 刷新更新时间，不会早于上一次的更新时间
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// 每页条数上限
pub const MAX_PAGE_SIZE: u32 = 1000;

/// 分页参数
///
/// `page` 从 1 开始计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// 从请求参数构建分页
    ///
    /// - 页码缺失或小于 1 时取第一页
    /// - 每页条数缺失或小于 1 时取默认值
    /// - 每页条数超过上限时截断到上限
    pub fn from_request(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page_number {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        };

        let page_size = match page_size {
            Some(size) if size > MAX_PAGE_SIZE as i64 => {
                warn!(requested = size, max = MAX_PAGE_SIZE, "Page size too large, clamping");
                MAX_PAGE_SIZE
            }
            Some(size) if size > 0 => size as u32,
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.page_size as u64
    }

    /// 计算当前页在 `total` 条记录中的下标范围
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(total);
        let end = start.saturating_add(self.page_size as usize).min(total);
        start..end
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size as u64) as u32
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::from_request(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 25);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_page_below_one_is_first_page() {
        assert_eq!(Pagination::from_request(Some(0), Some(10)).page, 1);
        assert_eq!(Pagination::from_request(Some(-3), Some(10)).page, 1);
    }

    #[test]
    fn test_pagination_clamps_page_size() {
        let p = Pagination::from_request(Some(1), Some(5000));
        assert_eq!(p.page_size, MAX_PAGE_SIZE);

        let p = Pagination::from_request(Some(1), Some(1000));
        assert_eq!(p.page_size, 1000);
    }

    #[test]
    fn test_pagination_non_positive_size_uses_default() {
        assert_eq!(Pagination::from_request(None, Some(0)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::from_request(None, Some(-1)).page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_pagination_window() {
        let p = Pagination::from_request(Some(2), Some(10));
        assert_eq!(p.offset(), 10);
        assert_eq!(p.window(50), 10..20);
        assert_eq!(p.window(15), 10..15);
        assert_eq!(p.window(5), 5..5);
    }

    #[test]
    fn test_paged_result_total_pages() {
        let p = Pagination::new(1, 10);
        assert_eq!(PagedResult::<u8>::new(vec![], 0, &p).total_pages(), 0);
        assert_eq!(PagedResult::<u8>::new(vec![], 10, &p).total_pages(), 1);
        assert_eq!(PagedResult::<u8>::new(vec![], 11, &p).total_pages(), 2);
    }

    #[test]
    fn test_paged_result_map_keeps_metadata() {
        let p = Pagination::new(3, 2);
        let page = PagedResult::new(vec![1, 2], 6, &p).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 6);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 2);
    }

    #[test]
    fn test_audit_touch_never_goes_backwards() {
        let now = Utc::now();
        let mut audit = AuditInfo::new(now);

        audit.touch(now - Duration::seconds(5));
        assert_eq!(audit.updated_at, now);

        let later = now + Duration::seconds(1);
        audit.touch(later);
        assert_eq!(audit.updated_at, later);
        assert_eq!(audit.created_at, now);
    }
}
