// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed handles over backing records.

use crate::attribute::Attribute;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::{ModelType, PropertyChange};
use crate::types::{ArrayType, Type};
use crate::value::{FromValue, Record, Value};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// A model instance: a [`ModelType`] paired with its backing data.
///
/// Reads and writes go straight to the backing [`Record`], so changes made
/// through one handle are visible through the raw record and every other
/// handle over it.
#[derive(Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

struct ModelInner {
    ty: ModelType,
    data: Value,
}

impl Model {
    pub(crate) fn new(ty: ModelType, data: Value) -> Self {
        Self {
            inner: Arc::new(ModelInner { ty, data }),
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.inner.ty
    }

    /// The backing data (a [`Value::Object`] for property-bearing types).
    pub fn data(&self) -> &Value {
        &self.inner.data
    }

    pub fn record(&self) -> Option<&Record> {
        self.inner.data.as_record()
    }

    pub fn is_instance_of(&self, ty: &ModelType) -> bool {
        self.inner.ty.is_compatible_with(ty)
    }

    /// Same type over the same backing data.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        if !self.inner.ty.ptr_eq(&other.inner.ty) {
            return false;
        }
        match (self.record(), other.record()) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => self.inner.data == other.inner.data,
            _ => false,
        }
    }

    fn lookup(&self, name: &str) -> Result<Attribute> {
        self.inner
            .ty
            .attribute(name)
            .cloned()
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    fn raw(&self, key: &str) -> Option<Value> {
        self.record().and_then(|record| record.get(key))
    }

    // ========================================================================
    // Get
    // ========================================================================

    /// Typed read of a property. `Ok(None)` when the value is absent.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        self.value(name)?
            .map(|value| T::from_value(&value))
            .transpose()
    }

    /// Read a property as callers see it (nested models and lists wrapped).
    pub fn value(&self, name: &str) -> Result<Option<Value>> {
        let attr = self.lookup(name)?;
        self.read(&attr)
    }

    pub(crate) fn read(&self, attr: &Attribute) -> Result<Option<Value>> {
        if let Some(getter) = attr.getter() {
            return getter(self);
        }
        let Some(raw) = self.raw(attr.key()) else {
            return Ok(None);
        };
        if raw.is_null() {
            return Ok(Some(raw));
        }

        let mut ctx = Context::new();
        match attr.ty() {
            Type::Model(ty) if ty.is_wrapped() && !ty.is_auto_unwrap() => {
                ty.wrap_one_in(raw, &mut ctx)
            }
            Type::Array(array) => match raw {
                Value::Array(items) => Ok(Some(Value::List(array.view_in(items, &mut ctx)?))),
                other => Ok(Some(other)),
            },
            _ => Ok(Some(raw)),
        }
    }

    /// Is a value stored for the property?
    pub fn has(&self, name: &str) -> bool {
        self.inner
            .ty
            .attribute(name)
            .is_some_and(|attr| self.raw(attr.key()).is_some())
    }

    // ========================================================================
    // Set
    // ========================================================================

    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_in(name, Some(value.into()), &mut Context::new())
    }

    pub fn set_with(&self, name: &str, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<()> {
        self.set_in(name, Some(value.into()), &mut Context::collecting(errors))
    }

    /// Remove the property's value.
    pub fn unset(&self, name: &str) -> Result<()> {
        self.set_in(name, None, &mut Context::new())
    }

    pub fn set_in(&self, name: &str, value: Option<Value>, ctx: &mut Context<'_>) -> Result<()> {
        let attr = self.lookup(name)?;
        self.assign_in(&attr, value, ctx)
    }

    /// The set protocol: coerce through the declared type, store (or hand to
    /// the custom setter), then notify listeners if the value was accepted.
    pub(crate) fn assign_in(&self, attr: &Attribute, value: Option<Value>, ctx: &mut Context<'_>) -> Result<()> {
        let Some(record) = self.record() else {
            return Err(Error::UnknownProperty(attr.name().to_string()));
        };
        let requested = value.is_some();
        let coerced = ctx.with_attribute(attr.name(), |ctx| match value {
            Some(value) => attr.ty().coerce_in(value, ctx),
            None => Ok(None),
        })?;
        let accepted = !requested || coerced.is_some();

        match attr.setter() {
            Some(setter) => ctx.with_attribute(attr.name(), |ctx| setter(self, coerced, ctx))?,
            None => match coerced {
                Some(value) => {
                    record.insert(attr.key(), value);
                }
                None => {
                    record.remove(attr.key());
                }
            },
        }

        if accepted {
            let hooks = self.inner.ty.on_set_hooks();
            if !hooks.is_empty() {
                let change = PropertyChange {
                    property: attr.name().to_string(),
                    attribute: attr.clone(),
                };
                for hook in hooks {
                    hook(self, &change);
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Array helpers
    // ========================================================================

    fn array_attribute(&self, name: &str) -> Result<(Attribute, ArrayType)> {
        let attr = self.lookup(name)?;
        match attr.ty() {
            Type::Array(array) => Ok((attr, array)),
            other => Err(Error::TypeMismatch {
                expected: "array",
                got: other.kind(),
            }),
        }
    }

    /// Elements of an array property, wrapped through the item type.
    pub fn items(&self, name: &str) -> Result<Vec<Value>> {
        let (attr, _) = self.array_attribute(name)?;
        match self.read(&attr)? {
            Some(Value::List(list)) => Ok(list.items().to_vec()),
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    pub fn item_at(&self, name: &str, index: usize) -> Result<Option<Value>> {
        Ok(self.items(name)?.into_iter().nth(index))
    }

    /// Coerce a single element and append it.
    pub fn add_item(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.add_item_in(name, value.into(), &mut Context::new())
    }

    pub fn add_item_with(&self, name: &str, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<()> {
        self.add_item_in(name, value.into(), &mut Context::collecting(errors))
    }

    pub fn add_item_in(&self, name: &str, value: Value, ctx: &mut Context<'_>) -> Result<()> {
        let (attr, array) = self.array_attribute(name)?;
        let item = ctx.with_attribute(attr.name(), |ctx| match array.item_type() {
            Some(item) => item.coerce_in(value, ctx),
            None => Ok(Some(value)),
        })?;
        let Some(item) = item else {
            return Ok(());
        };
        let mut items = match self.raw(attr.key()) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        items.push(item);
        self.assign_in(&attr, Some(Value::Array(items)), ctx)
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Invoke an instance method (declared, mixed in, or synthesized).
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let f = self
            .inner
            .ty
            .method(method)
            .ok_or_else(|| Error::UnknownMethod(method.to_string()))?;
        f(self, args)
    }

    // ========================================================================
    // Clean
    // ========================================================================

    pub fn clean(&self) -> Result<JsonValue> {
        self.clean_in(&mut Context::new())
    }

    pub fn clean_with(&self, errors: &mut Vec<Error>) -> Result<JsonValue> {
        self.clean_in(&mut Context::collecting(errors))
    }

    pub fn clean_in(&self, ctx: &mut Context<'_>) -> Result<JsonValue> {
        let ty = self.inner.ty.inner();
        let data = &self.inner.data;
        let mut out = match &ty.clean {
            Some(clean) => clean(data, ctx)?,
            None if ty.attributes.is_empty() => crate::clean::clean_in(data, ctx)?,
            None => self.clean_properties_in(ctx)?,
        };
        if let Some(after) = &ty.after_clean {
            after(data, &mut out)?;
        }
        Ok(out)
    }

    fn clean_properties_in(&self, ctx: &mut Context<'_>) -> Result<JsonValue> {
        let Some(record) = self.record() else {
            return crate::clean::clean_in(&self.inner.data, ctx);
        };
        let ty = &self.inner.ty;
        let mut out = serde_json::Map::new();

        for attr in ty.attributes() {
            if !attr.is_persisted() {
                continue;
            }
            let value = match attr.getter() {
                Some(getter) => getter(self)?,
                None => record.get(attr.key()),
            };
            let Some(value) = value else {
                continue;
            };
            let cleaned = ctx.with_attribute(attr.name(), |ctx| attr.ty().clean_in(&value, ctx))?;
            out.insert(attr.key().to_string(), cleaned);
        }

        for (key, value) in record.entries() {
            if key.starts_with('$') || ty.attribute_by_key(&key).is_some() {
                continue;
            }
            if ty.additional_properties() {
                let cleaned = crate::clean::clean_in(&value, ctx)?;
                out.insert(key, cleaned);
            } else if ctx.is_collecting() {
                ctx.report(Error::UnrecognizedAttribute { key })?;
            }
        }
        Ok(JsonValue::Object(out))
    }

    /// Clean, then serialize to a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.clean()?)?)
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("type", &self.inner.ty.name())
            .field("data", &self.inner.data)
            .finish()
    }
}

impl serde::Serialize for Model {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let json = self.clean().map_err(serde::ser::Error::custom)?;
        serde::Serialize::serialize(&json, serializer)
    }
}
