// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Homogeneous sequences with optional per-item typing.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::registry::TypeInfo;
use crate::types::{Type, TypeSlot};
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Array adapter.
///
/// Each `ArrayType` is its own identity: a [`List`] produced by one adapter
/// passes back through the same adapter untouched.
#[derive(Clone)]
pub struct ArrayType {
    inner: Arc<ArrayTypeInner>,
}

struct ArrayTypeInner {
    item: Option<TypeSlot>,
}

impl ArrayType {
    /// Array of `item`.
    pub fn of(item: impl Into<Type>) -> Self {
        Self::from_slot(Some(TypeSlot::Type(item.into())))
    }

    /// Array with no item type (elements are shallow-copied).
    pub fn untyped() -> Self {
        Self::from_slot(None)
    }

    pub(crate) fn from_slot(item: Option<TypeSlot>) -> Self {
        Self {
            inner: Arc::new(ArrayTypeInner { item }),
        }
    }

    pub fn item_type(&self) -> Option<Type> {
        self.inner.item.as_ref().map(TypeSlot::resolve)
    }

    pub(crate) fn item_slot(&self) -> Option<&TypeSlot> {
        self.inner.item.as_ref()
    }

    pub fn name(&self) -> String {
        match &self.inner.item {
            Some(TypeSlot::Recursive(_)) => "self[]".to_string(),
            Some(slot) => format!("{}[]", slot.resolve()),
            None => "array".to_string(),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn coerce(&self, value: impl Into<Value>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::new())
    }

    pub fn coerce_with(&self, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::collecting(errors))
    }

    /// Coerce to a raw `Value::Array`, element order preserved.
    ///
    /// Elements that fail to coerce (collecting mode) are stored as `Null`.
    pub fn coerce_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        let items = match value {
            Value::Null => return Ok(Some(Value::Null)),
            Value::List(list) if list.array_type().ptr_eq(self) => {
                return Ok(Some(Value::Array(list.to_raw())));
            }
            Value::List(list) => list.items().to_vec(),
            Value::Array(items) => items,
            other if ctx.is_strict() => return ctx.coercion_error(&other, None),
            other => vec![other],
        };

        let Some(item) = self.item_type() else {
            return Ok(Some(Value::Array(items)));
        };
        let mut out = Vec::with_capacity(items.len());
        for element in items {
            out.push(item.coerce_in(element, ctx)?.unwrap_or(Value::Null));
        }
        Ok(Some(Value::Array(out)))
    }

    pub fn wrap(&self, value: impl Into<Value>) -> Result<Option<List>> {
        self.wrap_in(value.into(), &mut Context::new())
    }

    pub fn wrap_with(&self, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<List>> {
        self.wrap_in(value.into(), &mut Context::collecting(errors))
    }

    /// Coerce then present the elements through their item type.
    ///
    /// `Null` wraps to `None`.
    pub fn wrap_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<List>> {
        if let Value::List(list) = &value {
            if list.array_type().ptr_eq(self) {
                return Ok(Some(list.clone()));
            }
        }
        match self.coerce_in(value, ctx)? {
            Some(Value::Array(raw)) => self.view_in(raw, ctx).map(Some),
            _ => Ok(None),
        }
    }

    /// Present already-coerced raw elements.
    pub(crate) fn view_in(&self, raw: Vec<Value>, ctx: &mut Context<'_>) -> Result<List> {
        let items = match self.item_type() {
            Some(item) if item.is_wrapped() => {
                let mut wrapped = Vec::with_capacity(raw.len());
                for element in raw {
                    wrapped.push(item.wrap_in(element, ctx)?.unwrap_or(Value::Null));
                }
                wrapped
            }
            _ => raw,
        };
        Ok(List::new(self.clone(), items))
    }

    pub fn clean(&self, value: &Value) -> Result<JsonValue> {
        self.clean_in(value, &mut Context::new())
    }

    pub fn clean_with(&self, value: &Value, errors: &mut Vec<Error>) -> Result<JsonValue> {
        self.clean_in(value, &mut Context::collecting(errors))
    }

    /// Clean each element through the item type (or generically).
    pub fn clean_in(&self, value: &Value, ctx: &mut Context<'_>) -> Result<JsonValue> {
        let items = match value {
            Value::Array(items) => items.as_slice(),
            Value::List(list) => list.items(),
            other => return crate::clean::clean_in(other, ctx),
        };
        let item = self.item_type();
        let mut out = Vec::with_capacity(items.len());
        for element in items {
            out.push(match &item {
                Some(ty) => ty.clean_in(element, ctx)?,
                None => crate::clean::clean_in(element, ctx)?,
            });
        }
        Ok(JsonValue::Array(out))
    }

    pub fn describe(&self) -> TypeInfo {
        TypeInfo::array(self)
    }
}

impl fmt::Debug for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayType").field("item", &self.inner.item).finish()
    }
}

/// The wrapped view of an array: elements as callers see them (models,
/// enum singletons) tagged with the adapter that produced them.
#[derive(Clone)]
pub struct List {
    inner: Arc<ListInner>,
}

struct ListInner {
    ty: ArrayType,
    items: Vec<Value>,
}

impl List {
    pub(crate) fn new(ty: ArrayType, items: Vec<Value>) -> Self {
        Self {
            inner: Arc::new(ListInner { ty, items }),
        }
    }

    pub fn array_type(&self) -> &ArrayType {
        &self.inner.ty
    }

    pub fn len(&self) -> usize {
        self.inner.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.inner.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.inner.items.iter()
    }

    pub fn items(&self) -> &[Value] {
        &self.inner.items
    }

    /// Raw storage form of every element.
    pub fn to_raw(&self) -> Vec<Value> {
        self.inner.items.iter().map(crate::unwrap).collect()
    }

    pub fn clean_in(&self, ctx: &mut Context<'_>) -> Result<JsonValue> {
        self.inner.ty.clean_in(&Value::List(self.clone()), ctx)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.ty.ptr_eq(&other.inner.ty) && self.inner.items == other.inner.items)
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("type", &self.inner.ty.name())
            .field("items", &self.inner.items)
            .finish()
    }
}
