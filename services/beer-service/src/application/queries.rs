//! 列表查询参数

use crate::domain::BeerStyle;

/// 啤酒列表查询
#[derive(Debug, Clone, Default)]
pub struct ListBeersQuery {
    pub beer_name: Option<String>,
    pub beer_style: Option<BeerStyle>,
    /// 显式为 `false` 时隐藏库存数量
    pub show_inventory: Option<bool>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// 客户列表查询
#[derive(Debug, Clone, Default)]
pub struct ListCustomersQuery {
    pub name: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}
