//! 数据库行映射结构

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use taproom_common::AuditInfo;
use taproom_errors::AppError;
use uuid::Uuid;

use crate::domain::{Beer, BeerDraft, BeerId, BeerStyle, Customer, CustomerDraft, CustomerId};

/// 啤酒数据库行
#[derive(Debug, FromRow)]
pub struct BeerRow {
    pub id: Uuid,
    pub version: i32,
    pub beer_name: String,
    pub beer_style: String,
    pub upc: String,
    pub quantity_on_hand: Option<i32>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BeerRow> for Beer {
    type Error = AppError;

    fn try_from(row: BeerRow) -> Result<Self, Self::Error> {
        let beer_style: BeerStyle = row
            .beer_style
            .parse()
            .map_err(|e| AppError::database(format!("啤酒 {} 数据损坏: {}", row.id, e)))?;

        Ok(Beer::restore(
            BeerId::from_uuid(row.id),
            row.version,
            BeerDraft {
                beer_name: row.beer_name,
                beer_style,
                upc: row.upc,
                quantity_on_hand: row.quantity_on_hand,
                price: row.price,
            },
            AuditInfo {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        ))
    }
}

/// 客户数据库行
#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub version: i32,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer::restore(
            CustomerId::from_uuid(row.id),
            row.version,
            CustomerDraft {
                name: row.name,
                email: row.email,
            },
            AuditInfo {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        )
    }
}
