//! Coercions for loosely typed provider JSON.
//!
//! Providers send the same field under several names and types, so payload
//! structs keep every spelling as a raw `Value` and pick the first usable one.

use serde_json::Value;

/// Non-negative integer from a number or a numeric string; fractions truncate
pub(crate) fn to_u32(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64().or_else(|| truncate(n.as_f64()?)),
        Value::String(s) => truncate(s.trim().parse().ok()?),
        _ => None,
    }?;
    u32::try_from(n).ok()
}

fn truncate(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

/// Non-empty string key; numeric ids are stringified
pub(crate) fn to_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-blank text
pub(crate) fn to_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "yes"),
        _ => false,
    }
}

/// First spelling that holds a usable integer
pub(crate) fn first_u32(values: &[&Option<Value>]) -> Option<u32> {
    values.iter().copied().flatten().find_map(to_u32)
}

/// First spelling that holds a usable key
pub(crate) fn first_key(values: &[&Option<Value>]) -> Option<String> {
    values.iter().copied().flatten().find_map(to_key)
}

/// First spelling that holds non-blank text
pub(crate) fn first_text(values: &[&Option<Value>]) -> Option<String> {
    values.iter().copied().flatten().find_map(to_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_u32() {
        assert_eq!(to_u32(&json!(12)), Some(12));
        assert_eq!(to_u32(&json!(12.9)), Some(12));
        assert_eq!(to_u32(&json!(" 2019 ")), Some(2019));
        assert_eq!(to_u32(&json!(-1)), None);
        assert_eq!(to_u32(&json!("twelve")), None);
        assert_eq!(to_u32(&json!(null)), None);
    }

    #[test]
    fn test_first_skips_unusable_spellings() {
        let bad = Some(json!("n/a"));
        let missing = None;
        let good = Some(json!(55));

        assert_eq!(first_u32(&[&bad, &missing, &good]), Some(55));
        assert_eq!(first_u32(&[&bad, &missing]), None);
    }

    #[test]
    fn test_first_text_and_key() {
        let blank = Some(json!("  "));
        let name = Some(json!("Frieren"));
        let id = Some(json!(991));

        assert_eq!(first_text(&[&blank, &name]).as_deref(), Some("Frieren"));
        assert_eq!(first_key(&[&blank, &id]).as_deref(), Some("991"));
    }

    #[test]
    fn test_to_flag() {
        assert!(to_flag(&json!(true)));
        assert!(to_flag(&json!(1)));
        assert!(to_flag(&json!("yes")));
        assert!(!to_flag(&json!(0)));
        assert!(!to_flag(&json!(null)));
    }
}
