// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property declarations and their compiled metadata.

use crate::context::Context;
use crate::error::Result;
use crate::model::hooks::{GetterFn, SetterFn};
use crate::model::{Model, ModelTypeInner};
use crate::registry::AttributeInfo;
use crate::types::{Type, TypeRef, TypeSlot};
use crate::value::Value;
use convert_case::{Case, Casing};
use std::fmt;
use std::sync::{Arc, Weak};

/// Declarative property config handed to [`crate::ModelBuilder::property`].
///
/// ```ignore
/// Property::new("tags", TypeRef::list(Primitive::String)).key("tag_list").transient()
/// ```
#[derive(Clone)]
pub struct Property {
    name: String,
    ty: TypeRef,
    key: Option<String>,
    getter: Option<GetterFn>,
    setter: Option<SetterFn>,
    persisted: bool,
    singular: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            key: None,
            getter: None,
            setter: None,
            persisted: true,
            singular: None,
        }
    }

    /// Storage key in the backing record (defaults to the name).
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn get(mut self, getter: impl Fn(&Model) -> Result<Option<Value>> + Send + Sync + 'static) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    #[must_use]
    pub fn set(
        mut self,
        setter: impl Fn(&Model, Option<Value>, &mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// Include in clean output (default true).
    #[must_use]
    pub fn persist(mut self, persisted: bool) -> Self {
        self.persisted = persisted;
        self
    }

    /// Exclude from clean output.
    #[must_use]
    pub fn transient(self) -> Self {
        self.persist(false)
    }

    /// Singular noun for the synthesized array helpers (`addTag`...).
    #[must_use]
    pub fn singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = Some(singular.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn compile(&self, this: &Weak<ModelTypeInner>) -> Attribute {
        let key = self.key.clone().unwrap_or_else(|| self.name.clone());
        Attribute {
            inner: Arc::new(AttributeInner {
                name: self.name.clone(),
                key,
                ty: self.ty.resolve(this),
                getter: self.getter.clone(),
                setter: self.setter.clone(),
                persisted: self.persisted,
                singular: self.singular.clone(),
            }),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("key", &self.key)
            .field("persisted", &self.persisted)
            .finish_non_exhaustive()
    }
}

/// Compiled per-property metadata.
#[derive(Clone)]
pub struct Attribute {
    inner: Arc<AttributeInner>,
}

struct AttributeInner {
    name: String,
    key: String,
    ty: TypeSlot,
    getter: Option<GetterFn>,
    setter: Option<SetterFn>,
    persisted: bool,
    singular: Option<String>,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Key the value lives under in the backing record.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn ty(&self) -> Type {
        self.inner.ty.resolve()
    }

    /// Element type, for array-typed attributes.
    pub fn item_type(&self) -> Option<Type> {
        match &self.inner.ty {
            TypeSlot::Type(Type::Array(array)) => array.item_type(),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(&self.inner.ty, TypeSlot::Type(Type::Array(_)))
    }

    pub fn is_persisted(&self) -> bool {
        self.inner.persisted
    }

    pub fn getter(&self) -> Option<&GetterFn> {
        self.inner.getter.as_ref()
    }

    pub fn setter(&self) -> Option<&SetterFn> {
        self.inner.setter.as_ref()
    }

    /// Configured or derived singular noun.
    pub fn singular(&self) -> String {
        self.inner
            .singular
            .clone()
            .unwrap_or_else(|| singularize(&self.inner.name))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn describe(&self) -> AttributeInfo {
        let item_type = match &self.inner.ty {
            TypeSlot::Type(Type::Array(array)) => array.item_slot().map(TypeSlot::declared_name),
            _ => None,
        };
        AttributeInfo {
            name: self.inner.name.clone(),
            key: self.inner.key.clone(),
            type_name: self.inner.ty.declared_name(),
            item_type,
            persisted: self.inner.persisted,
        }
    }

    /// Synthesized array helper names: `(add, forEach, get)`.
    pub(crate) fn helper_names(&self) -> (String, String, String) {
        let singular = self.singular().to_case(Case::Pascal);
        (
            format!("add{}", singular),
            format!("forEach{}", singular),
            format!("get{}", singular),
        )
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.inner.name)
            .field("key", &self.inner.key)
            .field("ty", &self.inner.ty)
            .field("persisted", &self.inner.persisted)
            .finish_non_exhaustive()
    }
}

/// Plural property name to singular: `ies` → `y`, then a trailing
/// `List`, `Set` or `s` is dropped.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    for suffix in ["List", "Set", "s"] {
        if let Some(stem) = name.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    name.to_string()
}
