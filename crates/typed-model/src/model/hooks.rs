// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Callback signatures accepted by the builders.

use crate::attribute::Attribute;
use crate::context::Context;
use crate::error::Result;
use crate::model::{Model, ModelType};
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Custom coercion run before wrapping. `Ok(None)` means "absent"
/// (normally after [`Context::coercion_error`] in collecting mode).
pub type CoerceFn = Arc<dyn Fn(Value, &mut Context<'_>) -> Result<Option<Value>> + Send + Sync>;

/// Custom wrap factory replacing construction.
pub type WrapFn = Arc<dyn Fn(Value, &mut Context<'_>) -> Result<Option<Value>> + Send + Sync>;

/// Custom clean; receives the raw backing data.
pub type CleanFn = Arc<dyn Fn(&Value, &mut Context<'_>) -> Result<JsonValue> + Send + Sync>;

/// Post-clean edit of the result, in place.
pub type AfterCleanFn = Arc<dyn Fn(&Value, &mut JsonValue) -> Result<()> + Send + Sync>;

/// Per-instance initializer.
pub type InitFn = Arc<dyn Fn(&Model, &mut Context<'_>) -> Result<()> + Send + Sync>;

/// Type-level initializer run once when a mixin is applied.
pub type InitTypeFn = Arc<dyn Fn(&ModelType) -> Result<()> + Send + Sync>;

/// Property change listener.
pub type OnSetFn = Arc<dyn Fn(&Model, &PropertyChange) + Send + Sync>;

/// Instance method.
pub type MethodFn = Arc<dyn Fn(&Model, &[Value]) -> Result<Value> + Send + Sync>;

/// Custom property getter.
pub type GetterFn = Arc<dyn Fn(&Model) -> Result<Option<Value>> + Send + Sync>;

/// Custom property setter; receives the coerced value and stores it.
pub type SetterFn = Arc<dyn Fn(&Model, Option<Value>, &mut Context<'_>) -> Result<()> + Send + Sync>;

/// Descriptor passed to [`OnSetFn`] listeners after a successful set.
#[derive(Debug, Clone)]
pub struct PropertyChange {
    pub property: String,
    pub attribute: Attribute,
}
