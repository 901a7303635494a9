//! 部分更新字段
//!
//! JSON 请求里一个字段有三种状态：缺失、显式 `null`、有值。
//! [`Patch`] 把三者区分开，但合并规则目前只认 `Set`：
//! `null` 和空白字符串都视为"未提供"，不会清空已有值。

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use taproom_common::has_text;

/// 单个字段的部分更新值
///
/// 反序列化时需配合 `#[serde(default)]`，缺失字段得到 `Unset`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// 请求中没有该字段
    #[default]
    Unset,
    /// 请求中该字段为 null
    Null,
    /// 请求提供了值
    Set(T),
}

impl<T> Patch<T> {
    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Set(v) => Patch::Set(v),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Set(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

/// 合并字符串字段：只有包含非空白字符的值才会覆盖
///
/// 返回是否发生了覆盖
pub fn merge_text(target: &mut String, patch: Patch<String>) -> bool {
    match patch {
        Patch::Set(value) if has_text(&value) => {
            *target = value;
            true
        }
        _ => false,
    }
}

/// 合并标量字段：只有 `Set` 会覆盖
pub fn merge_value<T>(target: &mut T, patch: Patch<T>) -> bool {
    match patch {
        Patch::Set(value) => {
            *target = value;
            true
        }
        _ => false,
    }
}

/// 合并可空字段：只有 `Set` 会覆盖，`Null` 不清空
pub fn merge_optional<T>(target: &mut Option<T>, patch: Patch<T>) -> bool {
    match patch {
        Patch::Set(value) => {
            *target = Some(value);
            true
        }
        _ => false,
    }
}

/// 合并可空字符串字段：只有包含非空白字符的值才会覆盖
pub fn merge_optional_text(target: &mut Option<String>, patch: Patch<String>) -> bool {
    match patch {
        Patch::Set(value) if has_text(&value) => {
            *target = Some(value);
            true
        }
        _ => false,
    }
}
