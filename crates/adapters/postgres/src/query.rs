//! 查询构造辅助

/// 转义 LIKE/ILIKE 模式中的通配符，配合 `ESCAPE '\'` 使用
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 构造子串匹配模式：`%value%`
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}
