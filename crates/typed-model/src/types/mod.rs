// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared types: the closed set of things a property can be typed as.
//!
//! Every [`Type`] answers the same three questions:
//!
//! - **coerce**: what raw value gets stored for this input?
//! - **wrap**: what typed view is handed back to callers?
//! - **clean**: what plain JSON does a stored value project to?

mod array;
mod primitive;

pub use array::{ArrayType, List};
pub use primitive::Primitive;

use crate::context::Context;
use crate::enumeration::EnumType;
use crate::error::{Error, Result};
use crate::model::{ModelType, ModelTypeInner};
use crate::registry::TypeInfo;
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use std::sync::Weak;

/// A declared property type.
#[derive(Debug, Clone)]
pub enum Type {
    Primitive(Primitive),
    Array(ArrayType),
    Enum(EnumType),
    Model(ModelType),
}

impl Type {
    /// Display name (`"integer"`, `"Person"`, `"Person[]"`).
    pub fn name(&self) -> String {
        match self {
            Self::Primitive(p) => p.name().to_string(),
            Self::Array(a) => a.name(),
            Self::Enum(e) => e.name().to_string(),
            Self::Model(m) => m.name().to_string(),
        }
    }

    /// Kind label: `"primitive"`, `"array"`, `"enum"` or `"model"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Array(_) => "array",
            Self::Enum(_) => "enum",
            Self::Model(_) => "model",
        }
    }

    /// Registry name, if the type was given one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Primitive(p) => Some(p.name()),
            Self::Array(_) => None,
            Self::Enum(e) => e.type_name(),
            Self::Model(m) => m.type_name(),
        }
    }

    /// Does wrapping produce a view distinct from the raw value?
    pub fn is_wrapped(&self) -> bool {
        match self {
            Self::Primitive(_) | Self::Enum(_) => false,
            Self::Array(_) => true,
            Self::Model(m) => m.is_wrapped(),
        }
    }

    pub fn as_model(&self) -> Option<&ModelType> {
        match self {
            Self::Model(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Identity comparison (primitives compare by kind).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            (Self::Enum(a), Self::Enum(b)) => a.ptr_eq(b),
            (Self::Model(a), Self::Model(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn coerce(&self, value: impl Into<Value>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::new())
    }

    pub fn coerce_with(&self, value: impl Into<Value>, errors: &mut Vec<Error>) -> Result<Option<Value>> {
        self.coerce_in(value.into(), &mut Context::collecting(errors))
    }

    /// Coerce to the raw storage form.
    ///
    /// Model values come back unwrapped (their backing data), arrays as raw
    /// `Value::Array`, enums as their singleton.
    pub fn coerce_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        match self {
            Self::Primitive(p) => p.coerce_in(value, ctx),
            Self::Array(a) => a.coerce_in(value, ctx),
            Self::Enum(_) if value.is_null() => Ok(Some(value)),
            Self::Enum(e) => Ok(e.coerce_in(value, ctx)?.map(Value::Enum)),
            Self::Model(m) => m.coerce_in(value, ctx),
        }
    }

    pub fn wrap(&self, value: impl Into<Value>) -> Result<Option<Value>> {
        self.wrap_in(value.into(), &mut Context::new())
    }

    /// Coerce to the typed view: models for model types, [`List`] for arrays.
    pub fn wrap_in(&self, value: Value, ctx: &mut Context<'_>) -> Result<Option<Value>> {
        match self {
            Self::Primitive(p) => p.coerce_in(value, ctx),
            Self::Array(a) => Ok(a.wrap_in(value, ctx)?.map(Value::List)),
            Self::Enum(_) if value.is_null() => Ok(Some(value)),
            Self::Enum(e) => Ok(e.coerce_in(value, ctx)?.map(Value::Enum)),
            Self::Model(m) => m.wrap_one_in(value, ctx),
        }
    }

    /// Project a stored value of this type to plain JSON.
    pub fn clean_in(&self, value: &Value, ctx: &mut Context<'_>) -> Result<JsonValue> {
        match self {
            Self::Primitive(_) | Self::Enum(_) => crate::clean::clean_in(value, ctx),
            Self::Array(a) => a.clean_in(value, ctx),
            Self::Model(m) => m.clean_value_in(value, ctx),
        }
    }

    /// Direct construction; only model and array types support it.
    pub fn new_instance(&self, data: impl Into<Value>) -> Result<Value> {
        match self {
            Self::Primitive(p) => p.instantiate(),
            Self::Enum(e) => e.instantiate().map(Value::Enum),
            Self::Array(a) => a.wrap(data).map(|list| list.map_or(Value::Null, Value::List)),
            Self::Model(m) => m.new_instance(data).map(Value::Model),
        }
    }

    /// Metadata snapshot for schema tooling.
    pub fn describe(&self) -> TypeInfo {
        match self {
            Self::Primitive(p) => TypeInfo::primitive(*p),
            Self::Array(a) => a.describe(),
            Self::Enum(e) => e.describe(),
            Self::Model(m) => m.describe(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl From<Primitive> for Type {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<ArrayType> for Type {
    fn from(a: ArrayType) -> Self {
        Self::Array(a)
    }
}

impl From<EnumType> for Type {
    fn from(e: EnumType) -> Self {
        Self::Enum(e)
    }
}

impl From<ModelType> for Type {
    fn from(m: ModelType) -> Self {
        Self::Model(m)
    }
}

// ============================================================================
// Type references (declaration side)
// ============================================================================

/// How a property declaration names its type.
///
/// `SelfType` / `SelfList` refer to the model type being built, for
/// recursive structures such as trees.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Type(Type),
    /// Array sugar: `[ItemType]`.
    List(Box<TypeRef>),
    SelfType,
    SelfList,
}

impl TypeRef {
    /// `[item]`
    pub fn list(item: impl Into<TypeRef>) -> Self {
        Self::List(Box::new(item.into()))
    }

    /// Resolve against the type under construction.
    pub(crate) fn resolve(&self, this: &Weak<ModelTypeInner>) -> TypeSlot {
        match self {
            Self::Type(ty) => TypeSlot::Type(ty.clone()),
            Self::SelfType => TypeSlot::Recursive(this.clone()),
            Self::List(item) => {
                TypeSlot::Type(Type::Array(ArrayType::from_slot(Some(item.resolve(this)))))
            }
            Self::SelfList => TypeSlot::Type(Type::Array(ArrayType::from_slot(Some(
                TypeSlot::Recursive(this.clone()),
            )))),
        }
    }
}

macro_rules! impl_from_for_type_ref {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TypeRef {
                fn from(ty: $ty) -> Self {
                    Self::Type(ty.into())
                }
            }
        )*
    };
}

impl_from_for_type_ref!(Type, Primitive, ArrayType, EnumType, ModelType);

impl FromStr for TypeRef {
    type Err = Error;

    /// `"self"`, `"self[]"`, a primitive name, or `"<primitive>[]"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "self" => return Ok(Self::SelfType),
            "self[]" => return Ok(Self::SelfList),
            _ => {}
        }
        match s.strip_suffix("[]") {
            Some(item) => Ok(Self::list(item.parse::<TypeRef>()?)),
            None => Ok(Self::Type(Type::Primitive(s.parse()?))),
        }
    }
}

/// A resolved property type. Self references stay weak so that a model type
/// does not own itself.
#[derive(Clone)]
pub(crate) enum TypeSlot {
    Type(Type),
    Recursive(Weak<ModelTypeInner>),
}

impl TypeSlot {
    /// The slot's type. A self reference whose model type is gone degrades to
    /// the opaque object type.
    pub(crate) fn resolve(&self) -> Type {
        match self {
            Self::Type(ty) => ty.clone(),
            Self::Recursive(weak) => weak
                .upgrade()
                .map_or(Type::Primitive(Primitive::Object), |inner| {
                    Type::Model(ModelType::from_inner(inner))
                }),
        }
    }

    /// Name used in metadata: `typeName` when set, `self` for self references.
    pub(crate) fn declared_name(&self) -> String {
        match self {
            Self::Recursive(_) => "self".to_string(),
            Self::Type(ty) => ty.type_name().map_or_else(|| ty.name(), str::to_string),
        }
    }
}

impl fmt::Debug for TypeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => write!(f, "{}", ty),
            Self::Recursive(_) => write!(f, "self"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_parsing() {
        assert!(matches!("self".parse::<TypeRef>(), Ok(TypeRef::SelfType)));
        assert!(matches!("self[]".parse::<TypeRef>(), Ok(TypeRef::SelfList)));
        assert!(matches!(
            "integer".parse::<TypeRef>(),
            Ok(TypeRef::Type(Type::Primitive(Primitive::Integer)))
        ));
        match "string[]".parse::<TypeRef>() {
            Ok(TypeRef::List(item)) => assert!(matches!(
                *item,
                TypeRef::Type(Type::Primitive(Primitive::String))
            )),
            other => panic!("unexpected {:?}", other),
        }
        let err = "Widget".parse::<TypeRef>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown type: Widget");
    }

    #[test]
    fn test_primitive_type_identity() {
        let a = Type::from(Primitive::Number);
        assert_eq!(a, Type::Primitive(Primitive::Number));
        assert_ne!(a, Type::Primitive(Primitive::Integer));
        assert!(!a.is_wrapped());
    }

    #[test]
    fn test_dead_self_reference_degrades() {
        let slot = TypeSlot::Recursive(Weak::new());
        assert_eq!(slot.resolve(), Type::Primitive(Primitive::Object));
        assert_eq!(slot.declared_name(), "self");
    }

    #[test]
    fn test_primitive_new_instance_fails() {
        let err = Type::from(Primitive::Date).new_instance(Value::Null).unwrap_err();
        assert!(matches!(err, Error::Instantiation { .. }));
    }
}
