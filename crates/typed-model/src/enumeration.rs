// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Closed sets of named singleton values.
//!
//! Every declared value becomes one [`EnumValue`], reachable by its declared
//! key, by its constant-cased name (`darkBlue` -> `DARK_BLUE`) and, for
//! simple enums, by its literal value. Lookups always return the same
//! singleton.
//!
//! # Example
//!
//! ```ignore
//! let color = EnumType::builder("Color").values(["red", "green", "blue"]).build()?;
//! let red = color.coerce("red")?.unwrap();
//! assert!(red.is(&color.get("RED").unwrap()));
//! assert!(red.test("isRed")?);
//! ```

use crate::context::Context;
use crate::error::{Error, Result};
use crate::registry::TypeInfo;
use crate::types::Type;
use crate::value::Value;
use convert_case::{Boundary, Case, Casing};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// How incoming strings are normalized before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Case-sensitive match.
    #[default]
    Exact,
    UpperCase,
    LowerCase,
}

impl Normalization {
    fn apply(self, s: &str) -> String {
        match self {
            Self::Exact => s.to_string(),
            Self::UpperCase => s.to_uppercase(),
            Self::LowerCase => s.to_lowercase(),
        }
    }
}

/// Value associated with an enum entry.
#[derive(Debug, Clone)]
pub enum Payload {
    Value(Value),
    /// "Enum of types": the entry stands for a declared type.
    Type(Type),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Type> for Payload {
    fn from(ty: Type) -> Self {
        Self::Type(ty)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

// ============================================================================
// EnumType
// ============================================================================

/// A sealed enum type. Cheap to clone.
#[derive(Clone)]
pub struct EnumType {
    inner: Arc<EnumTypeInner>,
}

struct EnumTypeInner {
    name: String,
    type_name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    values: Vec<EnumValue>,
    /// Lookup key -> ordinal.
    lookup: HashMap<String, usize>,
    /// `isRed` -> ordinal.
    tests: HashMap<String, usize>,
    normalization: Normalization,
}

impl EnumType {
    pub fn builder(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder::new(name)
    }

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

    pub fn normalization(&self) -> Normalization {
        self.inner.normalization
    }

    /// Singletons in declaration order.
    pub fn values(&self) -> &[EnumValue] {
        &self.inner.values
    }

    pub fn value_at(&self, ordinal: usize) -> Option<&EnumValue> {
        self.inner.values.get(ordinal)
    }

    /// Look up by declared key, constant name or literal value.
    pub fn get(&self, key: &str) -> Option<EnumValue> {
        self.inner
            .lookup
            .get(key)
            .or_else(|| {
                self.inner
                    .lookup
                    .get(&self.inner.normalization.apply(key))
            })
            .map(|&ordinal| self.inner.values[ordinal].clone())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Enum types are sealed once built.
    pub fn instantiate(&self) -> Result<EnumValue> {
        Err(Error::Instantiation {
            type_name: self.inner.name.clone(),
        })
    }

    pub fn coerce(&self, value: impl Into<Value>) -> Result<Option<EnumValue>> {
        self.coerce_in(value.into(), &mut Context::new())
    }

    pub fn coerce_with(&self, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<EnumValue>> {
        self.coerce_in(value.into(), &mut Context::collecting(errors))
    }

    /// Resolve `value` to a singleton. `Null` coerces to `None` (absent).
    pub fn coerce_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<EnumValue>> {
        let key = match &value {
            Value::Null => return Ok(None),
            Value::Enum(v) if v.belongs_to(self) => return Ok(Some(v.clone())),
            Value::Enum(v) => v.name().to_string(),
            Value::String(s) => s.clone(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => value.to_string(),
            _ => return ctx.invalid_enum_value(self.name(), &value),
        };
        match self.get(&key) {
            Some(found) => Ok(Some(found)),
            None => ctx.invalid_enum_value(self.name(), &value),
        }
    }

    /// Enums wrap to their singleton.
    pub fn wrap(&self, value: impl Into<Value>) -> Result<Option<EnumValue>> {
        self.coerce(value)
    }

    pub fn describe(&self) -> TypeInfo {
        TypeInfo::enumeration(self)
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.inner.name)
            .field(
                "values",
                &self.inner.values.iter().map(EnumValue::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// EnumValue
// ============================================================================

/// One enum singleton. Equality is identity.
#[derive(Clone)]
pub struct EnumValue {
    inner: Arc<EnumValueInner>,
}

struct EnumValueInner {
    name: String,
    constant: String,
    ordinal: usize,
    payload: Payload,
    owner: Weak<EnumTypeInner>,
}

impl EnumValue {
    /// Declared key, case preserved.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// `DARK_BLUE` for `darkBlue`.
    pub fn constant_name(&self) -> &str {
        &self.inner.constant
    }

    pub fn ordinal(&self) -> usize {
        self.inner.ordinal
    }

    pub fn payload(&self) -> &Payload {
        &self.inner.payload
    }

    pub fn enum_type(&self) -> Option<EnumType> {
        self.inner.owner.upgrade().map(|inner| EnumType { inner })
    }

    fn belongs_to(&self, ty: &EnumType) -> bool {
        std::ptr::eq(self.inner.owner.as_ptr(), Arc::as_ptr(&ty.inner))
    }

    /// Same singleton?
    pub fn is(&self, other: &EnumValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity test by accessor name: `red.test("isRed")`.
    pub fn test(&self, accessor: &str) -> Result<bool> {
        let owner = self
            .inner
            .owner
            .upgrade()
            .ok_or_else(|| Error::UnknownEnumTest(accessor.to_string()))?;
        owner
            .tests
            .get(accessor)
            .map(|&ordinal| ordinal == self.inner.ordinal)
            .ok_or_else(|| Error::UnknownEnumTest(accessor.to_string()))
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumValue({}#{})", self.inner.name, self.inner.ordinal)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`EnumType`].
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    type_name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    entries: Vec<(String, Payload)>,
    simple: bool,
    normalization: Normalization,
}

impl EnumBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            title: None,
            description: None,
            entries: Vec::new(),
            simple: true,
            normalization: Normalization::Exact,
        }
    }

    /// Simple enum: each payload is the key itself.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            let key = value.into();
            self.entries.push((key.clone(), Payload::Value(Value::String(key))));
        }
        self
    }

    /// Keyed enum with arbitrary payloads.
    pub fn entries<I, K, P>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Payload>,
    {
        self.simple = false;
        for (key, payload) in entries {
            self.entries.push((key.into(), payload.into()));
        }
        self
    }

    pub fn auto_upper_case(mut self) -> Self {
        self.normalization = Normalization::UpperCase;
        self
    }

    pub fn auto_lower_case(mut self) -> Self {
        self.normalization = Normalization::LowerCase;
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

    /// Create every singleton and seal the type.
    pub fn build(self) -> Result<EnumType> {
        let mut lookup = HashMap::new();
        let mut tests = HashMap::new();
        let mut constants = Vec::with_capacity(self.entries.len());

        // Declared keys win over derived aliases of other entries.
        for (ordinal, (key, _)) in self.entries.iter().enumerate() {
            if lookup.insert(key.clone(), ordinal).is_some() {
                return Err(Error::hook(format!(
                    "Duplicate enum key {} in {}",
                    key, self.name
                )));
            }
        }

        for (ordinal, (key, payload)) in self.entries.iter().enumerate() {
            let constant = constant_name(key);
            let test = format!(
                "is{}",
                constant.set_boundaries(&[Boundary::Underscore]).to_case(Case::Pascal)
            );

            let mut aliases = vec![constant.clone()];
            if self.normalization != Normalization::Exact {
                aliases.push(self.normalization.apply(key));
            } else if self.simple {
                if let Payload::Value(Value::String(literal)) = payload {
                    aliases.push(literal.clone());
                }
            }
            for alias in aliases {
                lookup.entry(alias).or_insert(ordinal);
            }
            tests.entry(test).or_insert(ordinal);
            constants.push(constant);
        }

        let name = self.name;
        let entries = self.entries;
        let inner = Arc::new_cyclic(|owner: &Weak<EnumTypeInner>| {
            let values = entries
                .into_iter()
                .zip(constants)
                .enumerate()
                .map(|(ordinal, ((key, payload), constant))| EnumValue {
                    inner: Arc::new(EnumValueInner {
                        name: key,
                        constant,
                        ordinal,
                        payload,
                        owner: owner.clone(),
                    }),
                })
                .collect();
            EnumTypeInner {
                name,
                type_name: self.type_name,
                title: self.title,
                description: self.description,
                values,
                lookup,
                tests,
                normalization: self.normalization,
            }
        });

        log::debug!(
            "[enum] compiled {} ({} values, {:?})",
            inner.name,
            inner.values.len(),
            inner.normalization
        );
        Ok(EnumType { inner })
    }
}

/// `darkBlue` to `DARK_BLUE`. Digits and acronyms stay inside their word.
fn constant_name(key: &str) -> String {
    key.set_boundaries(&[
        Boundary::LowerUpper,
        Boundary::Underscore,
        Boundary::Hyphen,
        Boundary::Space,
    ])
    .to_case(Case::Constant)
}
