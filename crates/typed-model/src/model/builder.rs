// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder compiling a model type declaration.

use crate::attribute::{Attribute, Property};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::hooks::{
    AfterCleanFn, CleanFn, CoerceFn, InitFn, MethodFn, OnSetFn, PropertyChange, WrapFn,
};
use crate::model::{Mixin, Model, ModelType, ModelTypeInner};
use crate::types::TypeRef;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

enum WrapMode {
    Enabled(bool),
    Factory(WrapFn),
}

/// Builder for [`ModelType`]. Start with [`ModelType::builder`] or
/// [`ModelType::extend`].
///
/// Unset options inherit from the parent type, except `constructable`
/// which defaults to true on every type.
pub struct ModelBuilder {
    name: String,
    parent: ModelType,
    type_name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    properties: Vec<Property>,
    mixins: Vec<Mixin>,
    additional_properties: Option<bool>,
    wrap: Option<WrapMode>,
    auto_unwrap: Option<bool>,
    constructable: bool,
    coerce: Option<CoerceFn>,
    clean: Option<CleanFn>,
    after_clean: Option<AfterCleanFn>,
    inits: Vec<InitFn>,
    on_set: Vec<OnSetFn>,
    methods: Vec<(String, MethodFn)>,
    statics: Vec<(String, Value)>,
}

impl ModelBuilder {
    pub(crate) fn new(name: impl Into<String>, parent: ModelType) -> Self {
        Self {
            name: name.into(),
            parent,
            type_name: None,
            title: None,
            description: None,
            properties: Vec::new(),
            mixins: Vec::new(),
            additional_properties: None,
            wrap: None,
            auto_unwrap: None,
            constructable: true,
            coerce: None,
            clean: None,
            after_clean: None,
            inits: Vec::new(),
            on_set: Vec::new(),
            methods: Vec::new(),
            statics: Vec::new(),
        }
    }

    /// Declare a property with a bare type.
    pub fn property(self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.property_with(Property::new(name, ty))
    }

    /// Declare an array property (`[ItemType]`).
    pub fn array_property(self, name: impl Into<String>, item: impl Into<TypeRef>) -> Self {
        self.property_with(Property::new(name, TypeRef::list(item)))
    }

    /// Declare a property from a full config.
    pub fn property_with(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Keep unknown input keys through clean, without errors.
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// `false` makes the type validation-only: wrap returns the coerced raw
    /// value.
    pub fn wrap(mut self, wrapped: bool) -> Self {
        self.wrap = Some(WrapMode::Enabled(wrapped));
        self
    }

    /// Replace construction with a custom factory.
    pub fn wrap_with(
        mut self,
        factory: impl Fn(Value, &mut Context<'_>) -> Result<Option<Value>> + Send + Sync + 'static,
    ) -> Self {
        self.wrap = Some(WrapMode::Factory(Arc::new(factory)));
        self
    }

    /// Getters of properties typed as this type return raw data.
    pub fn auto_unwrap(mut self, auto_unwrap: bool) -> Self {
        self.auto_unwrap = Some(auto_unwrap);
        self
    }

    pub fn constructable(mut self, constructable: bool) -> Self {
        self.constructable = constructable;
        self
    }

    pub fn coerce(
        mut self,
        f: impl Fn(Value, &mut Context<'_>) -> Result<Option<Value>> + Send + Sync + 'static,
    ) -> Self {
        self.coerce = Some(Arc::new(f));
        self
    }

    /// Replace the default property-by-property clean.
    pub fn clean(
        mut self,
        f: impl Fn(&Value, &mut Context<'_>) -> Result<JsonValue> + Send + Sync + 'static,
    ) -> Self {
        self.clean = Some(Arc::new(f));
        self
    }

    pub fn after_clean(
        mut self,
        f: impl Fn(&Value, &mut JsonValue) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_clean = Some(Arc::new(f));
        self
    }

    /// Per-instance initializer, run after inherited and mixin initializers.
    pub fn init(mut self, f: impl Fn(&Model, &mut Context<'_>) -> Result<()> + Send + Sync + 'static) -> Self {
        self.inits.push(Arc::new(f));
        self
    }

    pub fn on_set(mut self, f: impl Fn(&Model, &PropertyChange) + Send + Sync + 'static) -> Self {
        self.on_set.push(Arc::new(f));
        self
    }

    pub fn mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Model, &[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.methods.push((name.into(), Arc::new(f)));
        self
    }

    pub fn static_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.push((name.into(), value.into()));
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Compile the type, then run mixin `init_type` hooks against it.
    pub fn build(self) -> Result<ModelType> {
        let inner = Arc::new_cyclic(|this| self.compile(this));
        let ty = ModelType::from_inner(inner);

        for mixin in &self.mixins {
            if let Some(init_type) = &mixin.init_type {
                if let Err(e) = init_type(&ty) {
                    log::warn!("[model] mixin {} rejected type {}: {}", mixin.name, ty.name(), e);
                    return Err(e);
                }
            }
        }

        log::debug!(
            "[model] compiled {} (parent={}, attributes={}, mixins={})",
            ty.name(),
            self.parent.name(),
            ty.attributes().count(),
            self.mixins.len()
        );
        Ok(ty)
    }

    fn compile(&self, this: &Weak<ModelTypeInner>) -> ModelTypeInner {
        let parent = self.parent.inner();

        let mut attributes = parent.attributes.clone();
        let declared = self
            .mixins
            .iter()
            .flat_map(|mixin| mixin.properties.iter())
            .chain(self.properties.iter());
        for property in declared {
            attributes.insert(property.name().to_string(), property.compile(this));
        }
        let keys: HashMap<String, String> = attributes
            .values()
            .map(|attr| (attr.key().to_string(), attr.name().to_string()))
            .collect();

        let mut methods = parent.methods.clone();
        for attr in attributes.values().filter(|attr| attr.is_array()) {
            for (name, f) in array_helpers(attr) {
                methods.insert(name, f);
            }
        }
        let declared_methods = self
            .mixins
            .iter()
            .flat_map(|mixin| mixin.methods.iter())
            .chain(self.methods.iter());
        for (name, f) in declared_methods {
            methods.insert(name.clone(), f.clone());
        }

        let mut inits = parent.inits.clone();
        inits.extend(self.mixins.iter().flat_map(|m| m.inits.iter().cloned()));
        inits.extend(self.inits.iter().cloned());

        let mut on_set = parent.on_set.clone();
        on_set.extend(self.mixins.iter().flat_map(|m| m.on_set.iter().cloned()));
        on_set.extend(self.on_set.iter().cloned());

        let statics: IndexMap<String, Value> = self
            .mixins
            .iter()
            .flat_map(|mixin| mixin.statics.iter())
            .chain(self.statics.iter())
            .cloned()
            .collect();

        let (wrapped, wrap_factory) = match &self.wrap {
            Some(WrapMode::Enabled(wrapped)) => (*wrapped, None),
            Some(WrapMode::Factory(factory)) => (true, Some(factory.clone())),
            None => (parent.wrapped, parent.wrap_factory.clone()),
        };

        ModelTypeInner {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            parent: Some(self.parent.clone()),
            attributes,
            keys,
            wrapped,
            wrap_factory,
            auto_unwrap: self.auto_unwrap.unwrap_or(parent.auto_unwrap),
            constructable: self.constructable,
            additional_properties: self
                .additional_properties
                .unwrap_or(parent.additional_properties),
            coerce: self.coerce.clone().or_else(|| parent.coerce.clone()),
            clean: self.clean.clone().or_else(|| parent.clean.clone()),
            after_clean: self.after_clean.clone().or_else(|| parent.after_clean.clone()),
            inits,
            on_set,
            methods,
            statics: RwLock::new(statics),
        }
    }
}

/// `add<Item>`, `forEach<Item>` and `get<Item>` for an array attribute.
fn array_helpers(attr: &Attribute) -> [(String, MethodFn); 3] {
    let (add_name, for_each_name, get_name) = attr.helper_names();

    let name = attr.name().to_string();
    let add: MethodFn = Arc::new(move |model: &Model, args: &[Value]| {
        model.add_item(&name, args.first().cloned().unwrap_or(Value::Null))?;
        Ok(Value::Null)
    });

    let name = attr.name().to_string();
    let for_each: MethodFn = Arc::new(move |model: &Model, args: &[Value]| {
        let callback = match args.first() {
            Some(Value::Function(f)) => f.clone(),
            other => {
                return Err(Error::TypeMismatch {
                    expected: "function",
                    got: other.map_or("null", Value::kind_name),
                })
            }
        };
        for (index, item) in model.items(&name)?.into_iter().enumerate() {
            callback.call(&[item, Value::Int(index as i64)])?;
        }
        Ok(Value::Null)
    });

    let name = attr.name().to_string();
    let get: MethodFn = Arc::new(move |model: &Model, args: &[Value]| {
        let index = args
            .first()
            .and_then(Value::as_i64)
            .and_then(|i| usize::try_from(i).ok());
        match index {
            Some(index) => Ok(model.item_at(&name, index)?.unwrap_or(Value::Null)),
            None => Ok(Value::Null),
        }
    });

    [(add_name, add), (for_each_name, for_each), (get_name, get)]
}
