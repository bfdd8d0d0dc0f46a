// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values: the raw data model and the wrapped views over it.

mod function;
mod record;

pub use function::Function;
pub use record::{Record, RecordId};

use crate::enumeration::EnumValue;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::types::List;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use std::fmt;

/// A value flowing through coercion.
///
/// `Null` is a present value; an absent one is `Option::None` at the API.
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    Function(Function),

    // Raw containers
    Array(Vec<Value>),
    Object(Record),

    // Wrapped views
    Model(Model),
    List(List),
    Enum(EnumValue),
}

impl Value {
    /// Kind label used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Function(_) => "function",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Model(_) => "model",
            Self::List(_) => "list",
            Self::Enum(_) => "enum",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Anything that is an object at runtime (containers, views, dates).
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Self::Array(_) | Self::Object(_) | Self::Model(_) | Self::List(_) | Self::Enum(_) | Self::Date(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view (floats with no fractional part included).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Model(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_model(self) -> Option<Model> {
        match self {
            Self::Model(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(v) => Some(v),
            _ => None,
        }
    }

    /// Parse a JSON document into raw values.
    pub fn parse_json(json: &str) -> Result<Self> {
        let parsed: JsonValue = serde_json::from_str(json)?;
        Ok(parsed.into())
    }

    /// Lossy untyped projection, used for display.
    ///
    /// Use [`crate::clean`] for the type-aware projection.
    pub(crate) fn to_plain_json(&self) -> JsonValue {
        self.plain_json(&mut Vec::new())
    }

    /// `path` holds the records currently being rendered; a record met
    /// again on its own path renders as `"[Circular]"`.
    fn plain_json(&self, path: &mut Vec<RecordId>) -> JsonValue {
        match self {
            Self::Null | Self::Function(_) => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Int(v) => JsonValue::from(*v),
            Self::Float(v) => float_to_json(*v),
            Self::String(v) => JsonValue::String(v.clone()),
            Self::Date(v) => JsonValue::String(format_date(v)),
            Self::Array(items) => JsonValue::Array(items.iter().map(|v| v.plain_json(path)).collect()),
            Self::Object(record) => {
                if path.contains(&record.id()) {
                    return JsonValue::String("[Circular]".to_string());
                }
                path.push(record.id());
                let out = record
                    .entries()
                    .into_iter()
                    .map(|(k, v)| (k, v.plain_json(path)))
                    .collect();
                path.pop();
                JsonValue::Object(out)
            }
            Self::Model(model) => model.data().plain_json(path),
            Self::List(list) => JsonValue::Array(list.iter().map(|v| v.plain_json(path)).collect()),
            Self::Enum(value) => JsonValue::String(value.name().to_string()),
        }
    }
}

/// Raw form of a value: models become their backing data, lists their raw
/// elements. Everything else is returned as-is.
pub fn unwrap(value: &Value) -> Value {
    match value {
        Value::Model(model) => model.data().clone(),
        Value::List(list) => Value::Array(list.to_raw()),
        other => other.clone(),
    }
}

/// ISO-8601 UTC with milliseconds (`2016-04-13T18:00:00.000Z`).
pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Non-finite floats have no JSON form and become `null`.
pub(crate) fn float_to_json(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
}

fn format_float(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        write!(f, "NaN")
    } else if value.is_infinite() {
        write!(f, "{}Infinity", if value < 0.0 { "-" } else { "" })
    } else if value == 0.0 {
        write!(f, "0")
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        write!(f, "{:.0}", value)
    } else {
        write!(f, "{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => format_float(*v, f),
            Self::String(v) => write!(f, "{}", v),
            Self::Date(v) => write!(f, "{}", format_date(v)),
            Self::Function(_) => write!(f, "[function]"),
            Self::Enum(v) => write!(f, "{}", v.name()),
            other => write!(f, "{}", other.to_plain_json()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Model(a), Self::Model(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let json = crate::clean::clean(self).map_err(serde::ser::Error::custom)?;
        serde::Serialize::serialize(&json, serializer)
    }
}

// ============================================================================
// Conversions into Value
// ============================================================================

macro_rules! impl_from_for_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v.into())
            }
        }
    };
}

impl_from_for_value!(bool, Bool);
impl_from_for_value!(i32, Int);
impl_from_for_value!(i64, Int);
impl_from_for_value!(u32, Int);
impl_from_for_value!(f32, Float);
impl_from_for_value!(f64, Float);
impl_from_for_value!(String, String);
impl_from_for_value!(&str, String);
impl_from_for_value!(DateTime<Utc>, Date);
impl_from_for_value!(Function, Function);
impl_from_for_value!(Record, Object);
impl_from_for_value!(Model, Model);
impl_from_for_value!(List, List);
impl_from_for_value!(EnumValue, Enum);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Into::into).collect()),
            JsonValue::Object(map) => Self::Object(map.into_iter().collect()),
        }
    }
}

// ============================================================================
// Typed reads
// ============================================================================

/// Conversion out of a [`Value`] for typed accessors (`model.get::<i64>("age")`).
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, got: &Value) -> Error {
    Error::TypeMismatch {
        expected,
        got: got.kind_name(),
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $name:expr, $accessor:ident) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                value.$accessor().ok_or_else(|| mismatch($name, value))
            }
        }
    };
}

impl_from_value!(bool, "boolean", as_bool);
impl_from_value!(i64, "integer", as_i64);
impl_from_value!(f64, "number", as_f64);

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_date().copied().ok_or_else(|| mismatch("date", value))
    }
}

impl FromValue for Record {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(record) => Ok(record.clone()),
            Value::Model(model) => model.record().cloned().ok_or_else(|| mismatch("object", value)),
            other => Err(mismatch("object", other)),
        }
    }
}

impl FromValue for Model {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_model().cloned().ok_or_else(|| mismatch("model", value))
    }
}

impl FromValue for EnumValue {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_enum().cloned().ok_or_else(|| mismatch("enum", value))
    }
}

impl FromValue for List {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_list().cloned().ok_or_else(|| mismatch("list", value))
    }
}

impl FromValue for Function {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_function().cloned().ok_or_else(|| mismatch("function", value))
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            Value::List(list) => list.iter().map(T::from_value).collect(),
            other => Err(mismatch("array", other)),
        }
    }
}
