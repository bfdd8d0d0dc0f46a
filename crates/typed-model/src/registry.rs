// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named type lookup and serializable type metadata.
//!
//! [`TypeInfo`] is the stable, complete description of a compiled type that
//! schema generators consume; [`TypeRegistry`] resolves `typeName`
//! references back to types.

use crate::enumeration::EnumType;
use crate::error::{Error, Result};
use crate::model::ModelType;
use crate::types::{ArrayType, Primitive, Type, TypeRef, TypeSlot};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

/// Metadata of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    pub name: String,
    pub key: String,
    /// Declared type (`typeName` when set, else the display name).
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    pub persisted: bool,
}

/// Metadata snapshot of a compiled type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    /// `primitive`, `array`, `enum` or `model`.
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub wrapped: bool,
    pub constructable: bool,
    pub additional_properties: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Enum values in ordinal order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl TypeInfo {
    fn base(kind: &'static str, name: String) -> Self {
        Self {
            kind,
            name,
            type_name: None,
            title: None,
            description: None,
            parent: None,
            wrapped: false,
            constructable: false,
            additional_properties: false,
            attributes: Vec::new(),
            item_type: None,
            values: Vec::new(),
        }
    }

    pub(crate) fn primitive(p: Primitive) -> Self {
        Self {
            type_name: Some(p.name().to_string()),
            ..Self::base("primitive", p.name().to_string())
        }
    }

    pub(crate) fn array(array: &ArrayType) -> Self {
        let item_type = array.item_slot().map(TypeSlot::declared_name);
        Self {
            wrapped: true,
            constructable: true,
            item_type,
            ..Self::base("array", array.name())
        }
    }

    pub(crate) fn enumeration(e: &EnumType) -> Self {
        Self {
            type_name: e.type_name().map(str::to_string),
            title: e.title().map(str::to_string),
            description: e.description().map(str::to_string),
            values: e.values().iter().map(|v| v.name().to_string()).collect(),
            ..Self::base("enum", e.name().to_string())
        }
    }

    pub(crate) fn model(m: &ModelType) -> Self {
        Self {
            type_name: m.type_name().map(str::to_string),
            title: m.title().map(str::to_string),
            description: m.description().map(str::to_string),
            parent: m
                .parent()
                .map(|p| p.type_name().unwrap_or(p.name()).to_string()),
            wrapped: m.is_wrapped(),
            constructable: m.is_constructable(),
            additional_properties: m.additional_properties(),
            attributes: m.attributes().map(|a| a.describe()).collect(),
            ..Self::base("model", m.name().to_string())
        }
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Concurrent `typeName` -> [`Type`] map.
///
/// # Example
///
/// ```ignore
/// let registry = TypeRegistry::new();
/// registry.register(person.clone())?;
/// let people: TypeRef = registry.resolve("Person[]")?;
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<Arc<str>, Type>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its `typeName`, replacing any previous entry.
    pub fn register(&self, ty: impl Into<Type>) -> Result<()> {
        let ty = ty.into();
        let Some(name) = ty.type_name().map(str::to_string) else {
            return Err(Error::hook(format!(
                "Cannot register {} without a typeName",
                ty.name()
            )));
        };
        self.register_as(name, ty);
        Ok(())
    }

    /// Register a type under an explicit name.
    pub fn register_as(&self, name: impl Into<String>, ty: impl Into<Type>) {
        let name: Arc<str> = Arc::from(name.into());
        log::debug!("[registry] register {}", name);
        self.types.insert(name, ty.into());
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Type> {
        self.types.remove(name).map(|(_, ty)| ty)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|e| e.key().to_string()).collect();
        names.sort();
        names
    }

    /// Resolve a textual type reference: `self`, `self[]`, primitive names,
    /// registered names, each optionally suffixed with `[]`.
    pub fn resolve(&self, reference: &str) -> Result<TypeRef> {
        let reference = reference.trim();
        if let Some(item) = reference.strip_suffix("[]") {
            if item == "self" {
                return Ok(TypeRef::SelfList);
            }
            return Ok(TypeRef::list(self.resolve(item)?));
        }
        if let Some(ty) = self.get(reference) {
            return Ok(TypeRef::Type(ty));
        }
        reference.parse()
    }

    /// Metadata of every registered type, sorted by registered name.
    pub fn describe_all(&self) -> Vec<TypeInfo> {
        self.type_names()
            .iter()
            .filter_map(|name| self.get(name))
            .map(|ty| ty.describe())
            .collect()
    }
}
