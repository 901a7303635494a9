//! HTTP 请求/响应结构
//!
//! 字段名使用 camelCase；请求中的 `id`、`createdDate` 等服务端字段被忽略

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taproom_common::{PagedResult, has_text};
use taproom_domain_core::{Entity, Patch, Record};
use taproom_errors::{AppError, AppResult};
use uuid::Uuid;

use crate::application::{ListBeersQuery, ListCustomersQuery};
use crate::domain::{
    Beer, BeerDraft, BeerPatch, BeerStyle, Customer, CustomerDraft, CustomerPatch,
};

pub const BEER_NAME_MAX_LEN: usize = 30;
pub const UPC_MAX_LEN: usize = 255;
pub const CUSTOMER_NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 255;

/// `price` 列为 `NUMERIC(10,2)`
pub const PRICE_MAX_SCALE: u32 = 2;
pub const PRICE_MAX_INTEGER_DIGITS: u32 = 8;

/// 收集字段校验错误，一次性返回全部违规字段
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn add(&mut self, field: &str, message: &str) {
        self.0.push(format!("{}: {}", field, message));
    }

    /// 必填且非空白，长度不超过 `max`
    fn required_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        match value {
            None => self.add(field, "must not be null"),
            Some(v) if !has_text(v) => self.add(field, "must not be blank"),
            Some(v) => self.max_len(field, v, max),
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, &format!("size must be at most {}", max));
        }
    }

    fn required<T>(&mut self, field: &str, value: &Option<T>) {
        if value.is_none() {
            self.add(field, "must not be null");
        }
    }

    /// 价格小数位不超过 2 位，整数部分不超过 8 位
    fn price(&mut self, field: &str, value: &Decimal) {
        if value.scale() > PRICE_MAX_SCALE {
            self.add(
                field,
                &format!("must have at most {} decimal places", PRICE_MAX_SCALE),
            );
        }
        if value.abs() >= Decimal::from(10_i64.pow(PRICE_MAX_INTEGER_DIGITS)) {
            self.add(
                field,
                &format!("must have at most {} integer digits", PRICE_MAX_INTEGER_DIGITS),
            );
        }
    }

    fn into_result(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0.join("; ")))
        }
    }
}

// ============================================================================
// Beer
// ============================================================================

/// 创建/整体替换啤酒
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerRequest {
    /// 整体替换时的期望版本
    pub version: Option<i32>,
    pub beer_name: Option<String>,
    pub beer_style: Option<BeerStyle>,
    pub upc: Option<String>,
    pub quantity_on_hand: Option<i32>,
    pub price: Option<Decimal>,
}

impl BeerRequest {
    /// 校验后转换为领域输入，返回期望版本
    pub fn into_draft(self) -> AppResult<(BeerDraft, Option<i32>)> {
        let mut violations = Violations::default();
        violations.required_text("beerName", self.beer_name.as_deref(), BEER_NAME_MAX_LEN);
        violations.required("beerStyle", &self.beer_style);
        violations.required_text("upc", self.upc.as_deref(), UPC_MAX_LEN);
        match &self.price {
            Some(price) => violations.price("price", price),
            None => violations.required("price", &self.price),
        }
        violations.into_result()?;

        match (self.beer_name, self.beer_style, self.upc, self.price) {
            (Some(beer_name), Some(beer_style), Some(upc), Some(price)) => Ok((
                BeerDraft {
                    beer_name,
                    beer_style,
                    upc,
                    quantity_on_hand: self.quantity_on_hand,
                    price,
                },
                self.version,
            )),
            _ => Err(AppError::validation("missing required beer fields")),
        }
    }
}

/// 部分更新啤酒
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeerPatchRequest {
    pub beer_name: Patch<String>,
    pub beer_style: Patch<BeerStyle>,
    pub upc: Patch<String>,
    pub quantity_on_hand: Patch<i32>,
    pub price: Patch<Decimal>,
}

impl BeerPatchRequest {
    /// 只校验提供了的字符串字段的长度
    pub fn into_patch(self) -> AppResult<BeerPatch> {
        let mut violations = Violations::default();
        if let Patch::Set(name) = self.beer_name.as_ref() {
            violations.max_len("beerName", name, BEER_NAME_MAX_LEN);
        }
        if let Patch::Set(upc) = self.upc.as_ref() {
            violations.max_len("upc", upc, UPC_MAX_LEN);
        }
        if let Patch::Set(price) = self.price.as_ref() {
            violations.price("price", price);
        }
        violations.into_result()?;

        Ok(BeerPatch {
            beer_name: self.beer_name,
            beer_style: self.beer_style,
            upc: self.upc,
            quantity_on_hand: self.quantity_on_hand,
            price: self.price,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerResponse {
    pub id: Uuid,
    pub version: i32,
    pub beer_name: String,
    pub beer_style: BeerStyle,
    pub upc: String,
    pub quantity_on_hand: Option<i32>,
    pub price: Decimal,
    pub created_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl From<Beer> for BeerResponse {
    fn from(beer: Beer) -> Self {
        Self {
            id: beer.id().0,
            version: beer.version(),
            beer_name: beer.beer_name().to_string(),
            beer_style: beer.beer_style(),
            upc: beer.upc().to_string(),
            quantity_on_hand: beer.quantity_on_hand(),
            price: beer.price(),
            created_date: beer.created_at(),
            update_date: beer.updated_at(),
        }
    }
}

/// 啤酒列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerListParams {
    pub beer_name: Option<String>,
    pub beer_style: Option<BeerStyle>,
    pub show_inventory: Option<bool>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl From<BeerListParams> for ListBeersQuery {
    fn from(params: BeerListParams) -> Self {
        Self {
            beer_name: params.beer_name,
            beer_style: params.beer_style,
            show_inventory: params.show_inventory,
            page_number: params.page_number,
            page_size: params.page_size,
        }
    }
}

// ============================================================================
// Customer
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub version: Option<i32>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CustomerRequest {
    pub fn into_draft(self) -> AppResult<(CustomerDraft, Option<i32>)> {
        let mut violations = Violations::default();
        violations.required_text("name", self.name.as_deref(), CUSTOMER_NAME_MAX_LEN);
        if let Some(email) = self.email.as_deref() {
            violations.max_len("email", email, EMAIL_MAX_LEN);
        }
        violations.into_result()?;

        let name = self
            .name
            .ok_or_else(|| AppError::validation("name: must not be null"))?;
        Ok((
            CustomerDraft {
                name,
                email: self.email,
            },
            self.version,
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatchRequest {
    pub name: Patch<String>,
    pub email: Patch<String>,
}

impl CustomerPatchRequest {
    pub fn into_patch(self) -> AppResult<CustomerPatch> {
        let mut violations = Violations::default();
        if let Patch::Set(name) = self.name.as_ref() {
            violations.max_len("name", name, CUSTOMER_NAME_MAX_LEN);
        }
        if let Patch::Set(email) = self.email.as_ref() {
            violations.max_len("email", email, EMAIL_MAX_LEN);
        }
        violations.into_result()?;

        Ok(CustomerPatch {
            name: self.name,
            email: self.email,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub version: i32,
    pub name: String,
    pub email: Option<String>,
    pub created_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id().0,
            version: customer.version(),
            name: customer.name().to_string(),
            email: customer.email().map(str::to_string),
            created_date: customer.created_at(),
            update_date: customer.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListParams {
    pub name: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl From<CustomerListParams> for ListCustomersQuery {
    fn from(params: CustomerListParams) -> Self {
        Self {
            name: params.name,
            page_number: params.page_number,
            page_size: params.page_size,
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    pub fn from_page<R>(page: PagedResult<R>) -> Self
    where
        T: From<R>,
    {
        let total_pages = page.total_pages();
        let page = page.map(T::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}
