// ==========================================
// 生产追踪系统 - 表格单元格宽松解码
// ==========================================
// 表格 API 返回的单元格可能是数字、数字字符串、空串或 null
// 数值字段: 无法解析 → 0；数量字段: 负数 → 0
// 文本字段: 数字 → 文本，null → 空串
// ==========================================

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// 将单元格值转为 f64（无法解析时为 0）
pub fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 将单元格值转为文本
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

/// 非负整数数量（四舍五入，负数归零）
pub fn quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let v = value_to_f64(&value);
    Ok(if v > 0.0 { v.round() as u64 } else { 0 })
}

pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let s = value_to_string(&value);
    Ok(if s.trim().is_empty() { None } else { Some(s) })
}

/// 可选数值（null/空串/缺失 → None）
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(value_to_f64(other)),
    })
}

/// 键 → 数值映射（值宽松解码）
pub fn f64_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|(k, v)| (k.clone(), value_to_f64(v)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_f64() {
        assert_eq!(value_to_f64(&json!(12.5)), 12.5);
        assert_eq!(value_to_f64(&json!(" 7 ")), 7.0);
        assert_eq!(value_to_f64(&json!("")), 0.0);
        assert_eq!(value_to_f64(&json!(null)), 0.0);
        assert_eq!(value_to_f64(&json!("abc")), 0.0);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(1234)), "1234");
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!("D-01")), "D-01");
    }
}
