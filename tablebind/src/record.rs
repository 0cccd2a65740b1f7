//! Records and column inference

use std::cmp::Ordering;
use std::collections::HashSet;

pub use serde_json::Value;

use crate::error::{Error, Result};

/// One element of a bound collection: field name to value, in insertion
/// order.
pub type Record = serde_json::Map<String, Value>;

/// Union of the keys of every record, in first-seen order.
pub fn infer_columns<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Split a JSON array of objects into records.
pub fn records_from_json(value: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(Error::NotACollection);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(Error::NotARecord { index }),
        })
        .collect()
}

/// Parse a JSON document holding an array of objects.
pub fn records_from_str(json: &str) -> Result<Vec<Record>> {
    records_from_json(serde_json::from_str(json)?)
}

/// Text shown for a field. Strings are unquoted and null is blank.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array <
/// object. Numbers compare numerically, arrays element by element, objects
/// by size.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(a, b)| compare_values(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(a), Value::Object(b)) => a.len().cmp(&b.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_infer_columns_first_seen_order() {
        let records = vec![
            record(json!({"b": 1, "a": 2})),
            record(json!({"a": 3, "c": 4})),
            record(json!({"d": 5, "b": 6})),
        ];
        assert_eq!(infer_columns(&records), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_infer_columns_empty() {
        assert!(infer_columns(&Vec::new()).is_empty());
    }

    #[test]
    fn test_records_from_json() {
        let records = records_from_json(json!([{"a": 1}, {"a": 2}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_records_from_json_rejects_non_array() {
        assert!(matches!(
            records_from_json(json!({"a": 1})),
            Err(Error::NotACollection)
        ));
        assert!(matches!(
            records_from_json(json!([{"a": 1}, 7])),
            Err(Error::NotARecord { index: 1 })
        ));
    }

    #[test]
    fn test_records_from_str_reports_syntax() {
        assert!(matches!(records_from_str("[{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!(null), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!("1"), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1, 2, 0])), Ordering::Less);
    }
}
