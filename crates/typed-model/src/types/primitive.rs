// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in leaf types.
//!
//! Primitives never produce a wrapper: coercion is the whole contract.

use crate::config::DatePolicy;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::types::ArrayType;
use crate::value::Value;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Leaf type adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Function,
    /// Opaque passthrough for any object-like value.
    Object,
    /// Untyped sequence.
    Array,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Self::String,
        Self::Number,
        Self::Integer,
        Self::Boolean,
        Self::Date,
        Self::Function,
        Self::Object,
        Self::Array,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Function => "function",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Primitives are abstract adapters.
    pub fn instantiate(self) -> Result<Value> {
        Err(Error::Instantiation {
            type_name: self.name().to_string(),
        })
    }

    pub fn coerce(self, value: impl Into<Value>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::new())
    }

    pub fn coerce_with(self, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::collecting(errors))
    }

    /// Coerce `value`; `Null` always passes through.
    pub fn coerce_in(self, value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        if value.is_null() {
            return Ok(Some(value));
        }
        match self {
            Self::String => Ok(Some(coerce_string(value))),
            Self::Number => coerce_number(value, ctx),
            Self::Integer => coerce_integer(value, ctx),
            Self::Boolean => Ok(Some(Value::Bool(truthy(&value)))),
            Self::Date => coerce_date(value, ctx),
            Self::Function => match value {
                Value::Function(_) => Ok(Some(value)),
                other => ctx.coercion_error(&other, None),
            },
            Self::Object => {
                if value.is_object_like() {
                    Ok(Some(value))
                } else {
                    ctx.coercion_error(&value, None)
                }
            }
            Self::Array => ArrayType::untyped().coerce_in(value, ctx),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primitive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

// ============================================================================
// Adapters
// ============================================================================

fn coerce_string(value: Value) -> Value {
    match value {
        Value::String(_) => value,
        other => Value::String(other.to_string()),
    }
}

/// Natural truthiness; only the exact string `"true"` is true among strings.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        Value::String(s) => s == "true",
        _ => true,
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Int(n));
    }
    match text {
        "Infinity" | "+Infinity" => return Some(Value::Float(f64::INFINITY)),
        "-Infinity" => return Some(Value::Float(f64::NEG_INFINITY)),
        _ => {}
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

fn coerce_number(value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
    let number = match &value {
        Value::Int(_) => Some(value.clone()),
        Value::Float(f) if !f.is_nan() => Some(value.clone()),
        _ if ctx.is_strict() => None,
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(Value::Int(i64::from(*b))),
        Value::Date(d) => Some(Value::Int(d.timestamp_millis())),
        _ => None,
    };
    match number {
        Some(n) => Ok(Some(n)),
        None => ctx.coercion_error(&value, None),
    }
}

fn coerce_integer(value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
    let Some(number) = coerce_number(value.clone(), ctx)? else {
        return Ok(None);
    };
    match number {
        Value::Float(f) => {
            let truncated = f.trunc();
            if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
                Ok(Some(Value::Int(truncated as i64)))
            } else {
                ctx.coercion_error(&value, None)
            }
        }
        other => Ok(Some(other)),
    }
}

fn coerce_date(value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
    match value {
        Value::Date(_) => Ok(Some(value)),
        Value::String(s) => Ok(Some(
            parse_iso(&s, ctx.policy()).map_or(Value::Null, Value::Date),
        )),
        Value::Int(ms) => match DateTime::<Utc>::from_timestamp_millis(ms) {
            Some(date) => Ok(Some(Value::Date(date))),
            None => ctx.coercion_error(&value, None),
        },
        Value::Float(ms) if ms.is_finite() => {
            match DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64) {
                Some(date) => Ok(Some(Value::Date(date))),
                None => ctx.coercion_error(&value, None),
            }
        }
        other => ctx.coercion_error(&other, None),
    }
}

fn iso_pattern() -> &'static Regex {
    static ISO: OnceLock<Regex> = OnceLock::new();
    ISO.get_or_init(|| {
        Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]+))?(Z)?$")
            .expect("ISO-8601 pattern")
    })
}

/// Field-by-field ISO-8601 parse. Strings without `Z` only parse under
/// [`DatePolicy::Local`].
pub(crate) fn parse_iso(text: &str, policy: DatePolicy) -> Option<DateTime<Utc>> {
    let caps = iso_pattern().captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let millis = match caps.get(7) {
        Some(m) => {
            let mut ms: String = m.as_str().chars().take(3).collect();
            while ms.len() < 3 {
                ms.push('0');
            }
            ms.parse().ok()?
        }
        None => 0,
    };
    let naive = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?
        .and_hms_milli_opt(field(4)?, field(5)?, field(6)?, millis)?;

    if caps.get(8).is_some() {
        return Some(Utc.from_utc_datetime(&naive));
    }
    match policy {
        DatePolicy::Utc => None,
        DatePolicy::Local => Local
            .from_local_datetime(&naive)
            .single()
            .map(|date| date.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Function, Record};

    fn coerce(p: Primitive, v: impl Into<Value>) -> Option<Value> {
        p.coerce(v).expect("coerce")
    }

    #[test]
    fn test_null_passes_through_everywhere() {
        for p in Primitive::ALL {
            assert_eq!(coerce(p, Value::Null), Some(Value::Null), "{}", p);
        }
    }

    #[test]
    fn test_string() {
        assert_eq!(coerce(Primitive::String, 42i64), Some(Value::from("42")));
        assert_eq!(coerce(Primitive::String, true), Some(Value::from("true")));
        assert_eq!(coerce(Primitive::String, 1.5), Some(Value::from("1.5")));
        assert_eq!(coerce(Primitive::String, 3.0), Some(Value::from("3")));
    }

    #[test]
    fn test_large_integral_float_to_string() {
        assert_eq!(
            coerce(Primitive::String, 1e20),
            Some(Value::from("100000000000000000000"))
        );
        assert_eq!(coerce(Primitive::String, -0.0), Some(Value::from("0")));
    }

    #[test]
    fn test_cyclic_record_reports_error() {
        let record = crate::value::Record::new();
        record.insert("self", Value::Object(record.clone()));
        let mut errors = Vec::new();
        let out = Primitive::Number
            .coerce_with(Value::Object(record), &mut errors)
            .expect("collect");
        assert!(out.is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_number() {
        assert_eq!(coerce(Primitive::Number, "30"), Some(Value::Int(30)));
        assert_eq!(coerce(Primitive::Number, " 2.5 "), Some(Value::Float(2.5)));
        assert_eq!(coerce(Primitive::Number, true), Some(Value::Int(1)));
        assert!(Primitive::Number.coerce("abc").is_err());
        assert!(Primitive::Number.coerce("").is_err());
        assert!(Primitive::Number.coerce(f64::NAN).is_err());
    }

    #[test]
    fn test_number_strict_rejects_strings() {
        let mut errors = Vec::new();
        let mut ctx = Context::collecting(&mut errors).strict(true);
        let out = Primitive::Number
            .coerce_in(Value::from("30"), &mut ctx)
            .expect("collecting");
        assert!(out.is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_integer_truncates() {
        assert_eq!(coerce(Primitive::Integer, 3.9), Some(Value::Int(3)));
        assert_eq!(coerce(Primitive::Integer, "-7.2"), Some(Value::Int(-7)));
        assert_eq!(coerce(Primitive::Integer, "42"), Some(Value::Int(42)));
        let err = Primitive::Integer.coerce("x").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value: x");
    }

    #[test]
    fn test_boolean() {
        assert_eq!(coerce(Primitive::Boolean, "true"), Some(Value::Bool(true)));
        assert_eq!(coerce(Primitive::Boolean, "TRUE"), Some(Value::Bool(false)));
        assert_eq!(coerce(Primitive::Boolean, "yes"), Some(Value::Bool(false)));
        assert_eq!(coerce(Primitive::Boolean, 1i64), Some(Value::Bool(true)));
        assert_eq!(coerce(Primitive::Boolean, 0i64), Some(Value::Bool(false)));
        assert_eq!(coerce(Primitive::Boolean, Record::new()), Some(Value::Bool(true)));
    }

    #[test]
    fn test_date_from_iso() {
        let date = coerce(Primitive::Date, "2016-04-13T18:00:00.000Z").expect("date");
        let date = date.as_date().expect("date value");
        assert_eq!(date.timestamp_millis(), 1_460_570_400_000);
    }

    #[test]
    fn test_date_fraction_padding() {
        let date = parse_iso("2016-04-13T18:00:00.5Z", DatePolicy::Utc).expect("parse");
        assert_eq!(date.timestamp_millis() % 1000, 500);
    }

    #[test]
    fn test_date_from_millis() {
        let date = coerce(Primitive::Date, 0i64).expect("date");
        assert_eq!(date.as_date().map(DateTime::timestamp_millis), Some(0));
    }

    #[test]
    fn test_unparseable_date_string_is_null() {
        assert_eq!(coerce(Primitive::Date, "yesterday"), Some(Value::Null));
        assert_eq!(coerce(Primitive::Date, "2016-13-45T18:00:00Z"), Some(Value::Null));
    }

    #[test]
    fn test_non_ascii_digits_in_date_are_null() {
        assert_eq!(
            coerce(Primitive::Date, "2016-04-13T18:00:00.\u{0660}\u{0660}Z"),
            Some(Value::Null)
        );
        assert_eq!(
            coerce(Primitive::Date, "\u{0662}016-04-13T18:00:00Z"),
            Some(Value::Null)
        );
    }

    #[test]
    fn test_date_without_zone_depends_on_policy() {
        assert!(parse_iso("2016-04-13T18:00:00", DatePolicy::Utc).is_none());
        assert!(parse_iso("2016-04-13T18:00:00", DatePolicy::Local).is_some());
    }

    #[test]
    fn test_date_rejects_other_kinds() {
        assert!(Primitive::Date.coerce(true).is_err());
    }

    #[test]
    fn test_function() {
        let f = Function::new(|_| Ok(Value::Null));
        assert!(coerce(Primitive::Function, f).is_some());
        assert!(Primitive::Function.coerce("f").is_err());
    }

    #[test]
    fn test_object_passthrough() {
        let record = Record::new();
        let out = coerce(Primitive::Object, record.clone()).expect("object");
        assert!(out.as_record().expect("record").ptr_eq(&record));
        assert!(Primitive::Object.coerce(1i64).is_err());
        assert!(Primitive::Object.coerce("a").is_err());
    }

    #[test]
    fn test_array_promotes_scalars() {
        assert_eq!(
            coerce(Primitive::Array, 1i64),
            Some(Value::Array(vec![Value::Int(1)]))
        );
    }

    #[test]
    fn test_primitives_are_not_constructable() {
        let err = Primitive::String.instantiate().unwrap_err();
        assert_eq!(err.to_string(), "Cannot instantiate type string");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Integer".parse::<Primitive>().expect("parse"), Primitive::Integer);
        assert!("widget".parse::<Primitive>().is_err());
    }
}
