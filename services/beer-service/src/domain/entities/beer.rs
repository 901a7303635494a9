//! 啤酒实体

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taproom_common::{AuditInfo, has_text};
use taproom_domain_core::{Entity, Patch, Record, merge_optional, merge_text, merge_value};

use crate::domain::BeerId;

/// 啤酒款式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
    Lager,
    Pilsner,
    Stout,
    Gose,
    Porter,
    Ale,
    Wheat,
    Ipa,
    PaleAle,
    Saison,
}

impl BeerStyle {
    pub const ALL: [BeerStyle; 10] = [
        BeerStyle::Lager,
        BeerStyle::Pilsner,
        BeerStyle::Stout,
        BeerStyle::Gose,
        BeerStyle::Porter,
        BeerStyle::Ale,
        BeerStyle::Wheat,
        BeerStyle::Ipa,
        BeerStyle::PaleAle,
        BeerStyle::Saison,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeerStyle::Lager => "LAGER",
            BeerStyle::Pilsner => "PILSNER",
            BeerStyle::Stout => "STOUT",
            BeerStyle::Gose => "GOSE",
            BeerStyle::Porter => "PORTER",
            BeerStyle::Ale => "ALE",
            BeerStyle::Wheat => "WHEAT",
            BeerStyle::Ipa => "IPA",
            BeerStyle::PaleAle => "PALE_ALE",
            BeerStyle::Saison => "SAISON",
        }
    }
}

impl fmt::Display for BeerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知的啤酒款式
#[derive(Debug, Display, Error)]
#[display("unknown beer style: {value}")]
pub struct UnknownBeerStyle {
    pub value: String,
}

impl FromStr for BeerStyle {
    type Err = UnknownBeerStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeerStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownBeerStyle {
                value: s.to_string(),
            })
    }
}

/// 创建或整体替换啤酒时的全部可变字段
#[derive(Debug, Clone, PartialEq)]
pub struct BeerDraft {
    pub beer_name: String,
    pub beer_style: BeerStyle,
    pub upc: String,
    pub quantity_on_hand: Option<i32>,
    pub price: Decimal,
}

/// 啤酒部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeerPatch {
    pub beer_name: Patch<String>,
    pub beer_style: Patch<BeerStyle>,
    pub upc: Patch<String>,
    pub quantity_on_hand: Patch<i32>,
    pub price: Patch<Decimal>,
}

/// 啤酒列表过滤条件
///
/// 名称为大小写不敏感的子串匹配，款式为精确匹配，两者同时给出时取交集
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeerFilter {
    name: Option<String>,
    style: Option<BeerStyle>,
}

impl BeerFilter {
    /// 空白名称视为不过滤
    pub fn new(name: Option<String>, style: Option<BeerStyle>) -> Self {
        Self {
            name: name.filter(|n| has_text(n)),
            style,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn style(&self) -> Option<BeerStyle> {
        self.style
    }
}

/// 啤酒
#[derive(Debug, Clone, PartialEq)]
pub struct Beer {
    id: BeerId,
    version: i32,
    beer_name: String,
    beer_style: BeerStyle,
    upc: String,
    quantity_on_hand: Option<i32>,
    price: Decimal,
    audit: AuditInfo,
}

impl Beer {
    /// 从持久化数据重建
    pub fn restore(id: BeerId, version: i32, draft: BeerDraft, audit: AuditInfo) -> Self {
        Self {
            id,
            version,
            beer_name: draft.beer_name,
            beer_style: draft.beer_style,
            upc: draft.upc,
            quantity_on_hand: draft.quantity_on_hand,
            price: draft.price,
            audit,
        }
    }

    pub fn beer_name(&self) -> &str {
        &self.beer_name
    }

    pub fn beer_style(&self) -> BeerStyle {
        self.beer_style
    }

    pub fn upc(&self) -> &str {
        &self.upc
    }

    pub fn quantity_on_hand(&self) -> Option<i32> {
        self.quantity_on_hand
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.audit.updated_at
    }

    /// 隐藏库存数量（只影响返回给调用方的副本）
    pub fn without_inventory(mut self) -> Self {
        self.quantity_on_hand = None;
        self
    }
}

impl Entity for Beer {
    type Id = BeerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Beer {
    type Draft = BeerDraft;
    type Patch = BeerPatch;
    type Filter = BeerFilter;

    fn new_id() -> BeerId {
        BeerId::new()
    }

    fn create(id: BeerId, draft: BeerDraft, now: DateTime<Utc>) -> Self {
        Self::restore(id, 0, draft, AuditInfo::new(now))
    }

    fn replace(&mut self, draft: BeerDraft, now: DateTime<Utc>) {
        self.beer_name = draft.beer_name;
        self.beer_style = draft.beer_style;
        self.upc = draft.upc;
        self.quantity_on_hand = draft.quantity_on_hand;
        self.price = draft.price;
        self.version += 1;
        self.audit.touch(now);
    }

    fn merge(&mut self, patch: BeerPatch, now: DateTime<Utc>) {
        merge_text(&mut self.beer_name, patch.beer_name);
        merge_value(&mut self.beer_style, patch.beer_style);
        merge_text(&mut self.upc, patch.upc);
        merge_optional(&mut self.quantity_on_hand, patch.quantity_on_hand);
        merge_value(&mut self.price, patch.price);
        // 空 patch 同样刷新更新时间和版本
        self.version += 1;
        self.audit.touch(now);
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn matches(&self, filter: &BeerFilter) -> bool {
        let name_matches = filter.name().is_none_or(|name| {
            self.beer_name
                .to_lowercase()
                .contains(&name.to_lowercase())
        });
        let style_matches = filter.style().is_none_or(|style| self.beer_style == style);
        name_matches && style_matches
    }
}
