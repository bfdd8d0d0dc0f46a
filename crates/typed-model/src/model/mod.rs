// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model types and instances.
//!
//! A [`ModelType`] is compiled once by a [`ModelBuilder`] and never changes
//! afterwards (apart from static members). A [`Model`] is a typed handle over
//! a shared [`crate::Record`]: the handle holds no state of its own, so two
//! handles over the same record and type are the same instance.
//!
//! # Example
//!
//! ```ignore
//! use typed_model::{ModelType, Primitive};
//!
//! let person = ModelType::builder("Person")
//!     .property("name", Primitive::String)
//!     .property("age", Primitive::Integer)
//!     .build()?;
//!
//! let john = person.create(json!({"name": "John", "age": "30"}))?;
//! assert_eq!(john.get::<i64>("age")?, Some(30));
//! ```

mod builder;
pub mod hooks;
mod instance;
mod mixin;
mod model_type;


pub use builder::ModelBuilder;
pub use hooks::PropertyChange;
pub use instance::Model;
pub use mixin::Mixin;
pub use model_type::ModelType;

pub(crate) use model_type::ModelTypeInner;
