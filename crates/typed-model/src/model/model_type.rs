// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled model type descriptors.

use crate::attribute::Attribute;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::hooks::{AfterCleanFn, CleanFn, CoerceFn, InitFn, MethodFn, OnSetFn, WrapFn};
use crate::model::{Model, ModelBuilder};
use crate::registry::TypeInfo;
use crate::value::{Record, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// A compiled model type.
///
/// Cheap to clone; clones are the same type. Compatibility follows the
/// single-parent chain: a derived type is compatible with all its ancestors.
#[derive(Clone)]
pub struct ModelType {
    inner: Arc<ModelTypeInner>,
}

pub(crate) struct ModelTypeInner {
    pub(crate) name: String,
    pub(crate) type_name: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) parent: Option<ModelType>,
    /// Flattened attribute table, keyed by name.
    pub(crate) attributes: IndexMap<String, Attribute>,
    /// Storage key -> attribute name.
    pub(crate) keys: HashMap<String, String>,
    pub(crate) wrapped: bool,
    pub(crate) wrap_factory: Option<WrapFn>,
    pub(crate) auto_unwrap: bool,
    pub(crate) constructable: bool,
    pub(crate) additional_properties: bool,
    pub(crate) coerce: Option<CoerceFn>,
    pub(crate) clean: Option<CleanFn>,
    pub(crate) after_clean: Option<AfterCleanFn>,
    /// Ancestor first.
    pub(crate) inits: Vec<InitFn>,
    pub(crate) on_set: Vec<OnSetFn>,
    pub(crate) methods: IndexMap<String, MethodFn>,
    pub(crate) statics: RwLock<IndexMap<String, Value>>,
}

impl ModelTypeInner {
    fn root() -> Self {
        Self {
            name: "Model".to_string(),
            type_name: None,
            title: None,
            description: None,
            parent: None,
            attributes: IndexMap::new(),
            keys: HashMap::new(),
            wrapped: true,
            wrap_factory: None,
            auto_unwrap: false,
            constructable: true,
            additional_properties: false,
            coerce: None,
            clean: None,
            after_clean: None,
            inits: Vec::new(),
            on_set: Vec::new(),
            methods: IndexMap::new(),
            statics: RwLock::new(IndexMap::new()),
        }
    }
}

static ROOT: OnceLock<ModelType> = OnceLock::new();

impl ModelType {
    /// The base of every model type chain.
    pub fn root() -> Self {
        ROOT.get_or_init(|| Self::from_inner(Arc::new(ModelTypeInner::root())))
            .clone()
    }

    /// Start a new type extending the root model type.
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        Self::root().extend(name)
    }

    /// Start a new type extending this one.
    pub fn extend(&self, name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name, self.clone())
    }

    pub(crate) fn from_inner(inner: Arc<ModelTypeInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ModelTypeInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn inner(&self) -> &ModelTypeInner {
        &self.inner
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.inner.type_name.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.inner.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn parent(&self) -> Option<&ModelType> {
        self.inner.parent.as_ref()
    }

    pub fn is_wrapped(&self) -> bool {
        self.inner.wrapped
    }

    pub fn is_auto_unwrap(&self) -> bool {
        self.inner.auto_unwrap
    }

    pub fn is_constructable(&self) -> bool {
        self.inner.constructable
    }

    pub fn additional_properties(&self) -> bool {
        self.inner.additional_properties
    }

    /// No declared (own or inherited) properties.
    pub fn is_propertyless(&self) -> bool {
        self.inner.attributes.is_empty()
    }

    /// Attributes in declaration order, ancestors first.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.inner.attributes.values()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.inner.attributes.get(name)
    }

    pub fn attribute_by_key(&self, key: &str) -> Option<&Attribute> {
        self.inner
            .keys
            .get(key)
            .and_then(|name| self.inner.attributes.get(name))
    }

    pub fn method_names(&self) -> Vec<String> {
        self.inner.methods.keys().cloned().collect()
    }

    pub(crate) fn method(&self, name: &str) -> Option<&MethodFn> {
        self.inner.methods.get(name)
    }

    pub(crate) fn on_set_hooks(&self) -> &[OnSetFn] {
        &self.inner.on_set
    }

    /// Static member, looked up along the parent chain.
    pub fn static_value(&self, name: &str) -> Option<Value> {
        let mut current = Some(self);
        while let Some(ty) = current {
            if let Some(value) = ty.inner.statics.read().get(name) {
                return Some(value.clone());
            }
            current = ty.parent();
        }
        None
    }

    /// Set a static member on this type.
    pub fn set_static(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner.statics.write().insert(name.into(), value.into());
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// True if `other` is this type or one of its ancestors.
    pub fn is_compatible_with(&self, other: &ModelType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.ptr_eq(other) {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    pub fn describe(&self) -> TypeInfo {
        TypeInfo::model(self)
    }

    // ========================================================================
    // Wrap
    // ========================================================================

    /// Wrap raw data. Arrays map element-wise.
    pub fn wrap(&self, data: impl Into<Value>) -> Result<Value> {
        Ok(self
            .wrap_in(data.into(), &mut Context::new())?
            .unwrap_or(Value::Null))
    }

    pub fn wrap_with(&self, data: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<Value>> {
        self.wrap_in(data.into(), &mut Context::collecting(errors))
    }

    pub fn wrap_in(&self, data: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        match data {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.wrap_one_in(item, ctx)?.unwrap_or(Value::Null));
                }
                Ok(Some(Value::Array(out)))
            }
            other => self.wrap_one_in(other, ctx),
        }
    }

    /// Wrap a single value that must produce a [`Model`].
    pub fn create(&self, data: impl Into<Value>) -> Result<Model> {
        match self.wrap_one_in(data.into(), &mut Context::new())? {
            Some(Value::Model(model)) => Ok(model),
            other => Err(Error::TypeMismatch {
                expected: "model",
                got: other.as_ref().map_or("null", Value::kind_name),
            }),
        }
    }

    /// Collecting form of [`ModelType::create`]; `None` when the input was
    /// rejected.
    pub fn create_with(&self, data: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<Model>> {
        let wrapped = self.wrap_one_in(data.into(), &mut Context::collecting(errors))?;
        Ok(wrapped.and_then(Value::into_model))
    }

    pub(crate) fn wrap_one_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        let value = match value {
            Value::Null => return Ok(Some(Value::Null)),
            Value::Model(model) if model.model_type().is_compatible_with(self) => {
                return Ok(Some(Value::Model(model)));
            }
            Value::Model(model) => model.data().clone(),
            other => other,
        };

        let value = match &self.inner.coerce {
            Some(coerce) => match coerce(value, ctx)? {
                Some(value) => value,
                None => return Ok(None),
            },
            None => value,
        };
        if value.is_null() || !self.inner.wrapped {
            return Ok(Some(value));
        }
        if let Some(factory) = &self.inner.wrap_factory {
            return factory(value, ctx);
        }

        match value {
            Value::Model(model) if model.model_type().is_compatible_with(self) => {
                Ok(Some(Value::Model(model)))
            }
            Value::Array(_) | Value::List(_) => {
                ctx.report(Error::ArrayWrap {
                    type_name: self.name().to_string(),
                })?;
                Ok(None)
            }
            Value::Object(record) => {
                if let Some(bound) = record.bound_type() {
                    if bound.is_compatible_with(self) {
                        return Ok(Some(Value::Model(Model::new(bound, Value::Object(record)))));
                    }
                }
                self.construct_in(Value::Object(record), ctx)
                    .map(|model| Some(Value::Model(model)))
            }
            other if self.is_propertyless() => self
                .construct_in(other, ctx)
                .map(|model| Some(Value::Model(model))),
            other => ctx.coercion_error(&other, None),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Construct a new instance over `data` (`Null` means a fresh record).
    pub fn new_instance(&self, data: impl Into<Value>) -> Result<Model> {
        self.construct_in(data.into(), &mut Context::new())
    }

    pub fn new_instance_with(&self, data: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Model> {
        self.construct_in(data.into(), &mut Context::collecting(errors))
    }

    pub fn new_instance_in(&self, data: Value, ctx: &mut Context<'_>) -> Result<Model> {
        self.construct_in(data, ctx)
    }

    /// Construct an instance over an empty record.
    pub fn empty(&self) -> Result<Model> {
        self.new_instance(Value::Null)
    }

    fn construct_in(&self, data: Value, ctx: &mut Context<'_>) -> Result<Model> {
        if !self.inner.constructable {
            return Err(Error::Instantiation {
                type_name: self.name().to_string(),
            });
        }
        let data = match data {
            Value::Null => Value::Object(Record::new()),
            other => other,
        };

        if self.is_propertyless() {
            if let Value::Object(record) = &data {
                record.bind(self);
            }
            let model = Model::new(self.clone(), data);
            self.run_inits(&model, ctx)?;
            return Ok(model);
        }

        let record = match data {
            Value::Object(record) => record,
            other => {
                ctx.coercion_error::<()>(&other, None)?;
                Record::new()
            }
        };
        // Bind first: nested data pointing back at this record re-wraps to
        // this instance instead of recursing.
        record.bind(self);
        let model = Model::new(self.clone(), Value::Object(record.clone()));

        for (key, raw) in record.entries() {
            if key.starts_with('$') {
                continue;
            }
            if let Some(attr) = self.attribute_by_key(&key) {
                model.assign_in(attr, Some(raw), ctx)?;
            } else if let Some(attr) = self.attribute(&key) {
                record.remove(&key);
                model.assign_in(attr, Some(raw), ctx)?;
            } else if ctx.is_collecting() && !self.inner.additional_properties {
                ctx.report(Error::UnrecognizedAttribute { key })?;
            }
        }

        self.run_inits(&model, ctx)?;
        Ok(model)
    }

    fn run_inits(&self, model: &Model, ctx: &mut Context<'_>) -> Result<()> {
        for init in &self.inner.inits {
            init(model, ctx)?;
        }
        Ok(())
    }

    // ========================================================================
    // Coerce / unwrap / clean
    // ========================================================================

    pub fn coerce(&self, value: impl Into<Value>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::new())
    }

    pub fn coerce_with(&self, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::collecting(errors))
    }

    /// Coerce to the raw storage form: wrap (binding the record), then
    /// unwrap. Arrays are rejected like any direct wrap.
    pub fn coerce_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        Ok(self
            .wrap_one_in(value, ctx)?
            .map(|wrapped| crate::unwrap(&wrapped)))
    }

    /// Backing data of a wrapped value; raw values are returned as-is.
    pub fn unwrap(&self, value: &Value) -> Value {
        crate::unwrap(value)
    }

    /// Clean a value declared as this type.
    pub fn clean_value_in(&self, value: &Value, ctx: &mut Context<'_>) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Model(model) => model.clean_in(ctx),
            _ if self.inner.wrapped => match self.wrap_one_in(value.clone(), ctx)? {
                Some(Value::Model(model)) => model.clean_in(ctx),
                Some(other) => self.clean_raw_in(&other, ctx),
                None => Ok(JsonValue::Null),
            },
            _ => self.clean_raw_in(value, ctx),
        }
    }

    /// Clean without a model handle (unwrapped types).
    fn clean_raw_in(&self, value: &Value, ctx: &mut Context<'_>) -> Result<JsonValue> {
        let mut out = match &self.inner.clean {
            Some(clean) => clean(value, ctx)?,
            None => crate::clean::clean_in(value, ctx)?,
        };
        if let Some(after) = &self.inner.after_clean {
            after(value, &mut out)?;
        }
        Ok(out)
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(ModelType::name))
            .field("attributes", &self.inner.attributes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
