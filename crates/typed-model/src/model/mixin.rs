// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reusable capability bundles merged into model types at build time.

use crate::attribute::Property;
use crate::context::Context;
use crate::error::Result;
use crate::model::hooks::{InitFn, InitTypeFn, MethodFn, OnSetFn, PropertyChange};
use crate::model::{Model, ModelType};
use crate::types::TypeRef;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A named bundle of properties, methods and hooks.
///
/// Mixins are applied in the order they are added to the builder. Their
/// properties override inherited ones and are overridden by the type's own.
#[derive(Clone, Default)]
pub struct Mixin {
    pub(crate) name: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) methods: Vec<(String, MethodFn)>,
    pub(crate) inits: Vec<InitFn>,
    pub(crate) on_set: Vec<OnSetFn>,
    pub(crate) init_type: Option<InitTypeFn>,
    pub(crate) statics: Vec<(String, Value)>,
}

impl Mixin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn property(self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.property_with(Property::new(name, ty))
    }

    #[must_use]
    pub fn property_with(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Model, &[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.methods.push((name.into(), Arc::new(f)));
        self
    }

    #[must_use]
    pub fn init(mut self, f: impl Fn(&Model, &mut Context<'_>) -> Result<()> + Send + Sync + 'static) -> Self {
        self.inits.push(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_set(mut self, f: impl Fn(&Model, &PropertyChange) + Send + Sync + 'static) -> Self {
        self.on_set.push(Arc::new(f));
        self
    }

    /// Run once against each type the mixin is applied to, after the type
    /// is compiled. An error aborts the build.
    #[must_use]
    pub fn init_type(mut self, f: impl Fn(&ModelType) -> Result<()> + Send + Sync + 'static) -> Self {
        self.init_type = Some(Arc::new(f));
        self
    }

    /// Static member installed on each type the mixin is applied to.
    #[must_use]
    pub fn static_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.push((name.into(), value.into()));
        self
    }
}

impl fmt::Debug for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixin")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field(
                "methods",
                &self.methods.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
