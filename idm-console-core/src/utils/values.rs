//! 字段值渲染辅助

use serde_json::Value;

/// 以人类可读形式渲染一个保存值（字符串不带引号，其余按 JSON）
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// 逗号拼接一组保存值
pub(crate) fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(value_text)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_render_unquoted() {
        assert_eq!(value_text(&json!("mail@example.test")), "mail@example.test");
        assert_eq!(value_text(&json!(3600)), "3600");
        assert_eq!(value_text(&json!(true)), "true");
    }

    #[test]
    fn join_uses_comma() {
        assert_eq!(join_values(&[json!("a"), json!("b")]), "a,b");
        assert_eq!(join_values(&[]), "");
    }
}
