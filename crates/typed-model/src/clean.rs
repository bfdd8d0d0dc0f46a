// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic deep clean: any value to serialization-ready JSON.
//!
//! Models found anywhere inside plain containers are cleaned through their
//! own type. Everything else is copied: the output never shares storage with
//! the input.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::value::{float_to_json, format_date, Value};
use serde_json::{Map, Value as JsonValue};

/// Clean `value`, failing on the first error.
pub fn clean(value: &Value) -> Result<JsonValue> {
    clean_in(value, &mut Context::new())
}

/// Clean `value`, collecting errors.
pub fn clean_with(value: &Value, errors: &mut Vec<Error>) -> Result<JsonValue> {
    clean_in(value, &mut Context::collecting(errors))
}

pub fn clean_in(value: &Value, ctx: &mut Context<'_>) -> Result<JsonValue> {
    Ok(match value {
        Value::Null | Value::Function(_) => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(n) => JsonValue::from(*n),
        Value::Float(f) => float_to_json(*f),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Date(date) => JsonValue::String(format_date(date)),
        Value::Enum(e) => JsonValue::String(e.name().to_string()),
        Value::Model(model) => model.clean_in(ctx)?,
        Value::List(list) => list.clean_in(ctx)?,
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(clean_in(item, ctx)?);
            }
            JsonValue::Array(out)
        }
        Value::Object(record) => {
            let mut out = Map::new();
            for (key, item) in record.entries() {
                if key.starts_with('$') {
                    continue;
                }
                let cleaned = clean_in(&item, ctx)?;
                out.insert(key, cleaned);
            }
            JsonValue::Object(out)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Function, Record};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_plain_data_unchanged() {
        let input = json!({"a": 1, "b": [true, "x", null], "c": {"d": 2.5}});
        let out = clean(&Value::from(input.clone())).expect("clean");
        assert_eq!(out, input);
    }

    #[test]
    fn test_dates_become_iso_strings() {
        let date = Utc.with_ymd_and_hms(2016, 4, 13, 18, 0, 0).single().expect("date");
        let out = clean(&Value::Date(date)).expect("clean");
        assert_eq!(out, json!("2016-04-13T18:00:00.000Z"));
    }

    #[test]
    fn test_unrepresentable_values_become_null() {
        assert_eq!(clean(&Value::Float(f64::NAN)).expect("clean"), JsonValue::Null);
        let f = Function::new(|_| Ok(Value::Null));
        assert_eq!(clean(&Value::Function(f)).expect("clean"), JsonValue::Null);
    }

    #[test]
    fn test_output_is_a_copy() {
        let record = Record::new();
        record.insert("n", 1i64);
        let out = clean(&Value::Object(record.clone())).expect("clean");
        record.insert("n", 2i64);
        assert_eq!(out, json!({"n": 1}));
    }

    #[test]
    fn test_dollar_keys_skipped() {
        let record: Record = [("$meta", Value::Int(1)), ("a", Value::Int(2))].into_iter().collect();
        assert_eq!(clean(&Value::Object(record)).expect("clean"), json!({"a": 2}));
    }
}
