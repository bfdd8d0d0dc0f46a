// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typed-model - runtime-declared typed models over plain data
//!
//! Declare model types at runtime, wrap untyped JSON-like data in them, and
//! get typed, validated, coerced access back. Cleaning projects any wrapped
//! value to serialization-ready JSON again.
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_model::{ModelType, Primitive, Result};
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let person = ModelType::builder("Person")
//!         .property("name", Primitive::String)
//!         .property("age", Primitive::Integer)
//!         .build()?;
//!
//!     let john = person.create(json!({"name": "John", "age": "30"}))?;
//!     assert_eq!(john.get::<i64>("age")?, Some(30));
//!     assert_eq!(john.clean()?, json!({"name": "John", "age": 30}));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        Declaration Layer                            |
//! |   ModelBuilder | Property | Mixin | EnumBuilder | TypeRegistry      |
//! +---------------------------------------------------------------------+
//! |                           Type Layer                                |
//! |   Primitive | ArrayType | EnumType | ModelType   (coerce/wrap/clean)|
//! +---------------------------------------------------------------------+
//! |                           Data Layer                                |
//! |   Value | Record (shared, bound) | Model | List | EnumValue         |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Error Handling
//!
//! Most operations come in three forms:
//!
//! | Form | Example | On invalid input |
//! |------|---------|------------------|
//! | fail-fast | [`ModelType::wrap`] | returns the first [`Error`] |
//! | collecting | [`ModelType::wrap_with`] | appends to `&mut Vec<Error>`, value becomes absent |
//! | explicit | [`ModelType::wrap_in`] | per the [`Context`] passed in |
//!
//! ## Modules Overview
//!
//! - [`model`] - model types, instances, builders and mixins
//! - [`types`] - primitive and array adapters, type references
//! - [`enumeration`] - enum types and singletons
//! - [`registry`] - named type lookup and type metadata
//! - [`config`] - process-wide coercion defaults

pub mod attribute;
pub mod clean;
pub mod config;
pub mod context;
pub mod enumeration;
pub mod error;
pub mod model;
pub mod registry;
pub mod types;
pub mod value;

pub use attribute::{singularize, Attribute, Property};
pub use clean::{clean, clean_with};
pub use config::{DatePolicy, RuntimeConfig, Settings};
pub use context::Context;
pub use enumeration::{EnumBuilder, EnumType, EnumValue, Normalization, Payload};
pub use error::{Error, Result};
pub use model::{Mixin, Model, ModelBuilder, ModelType, PropertyChange};
pub use registry::{AttributeInfo, TypeInfo, TypeRegistry};
pub use types::{ArrayType, List, Primitive, Type, TypeRef};
pub use value::{unwrap, FromValue, Function, Record, RecordId, Value};
