// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by every coercion, construction and clean path.

use thiserror::Error as ThisError;

/// Errors raised (or accumulated) by model operations.
///
/// In collecting mode the coercion-class variants are appended to the
/// caller's accumulator instead of being returned; see [`crate::Context`].
#[derive(Debug, ThisError)]
pub enum Error {
    // ========================================================================
    // Coercion Errors
    // ========================================================================
    /// A value could not be converted to the declared type.
    #[error("{}", invalid_message(.attribute.as_deref(), .value, .message.as_deref()))]
    Coercion {
        /// Attribute being coerced, if any.
        attribute: Option<String>,
        /// Display form of the offending value.
        value: String,
        /// Custom message replacing `Invalid value: <value>`.
        message: Option<String>,
    },
    /// No declared enum value matched the input.
    #[error("{}", invalid_message(.attribute.as_deref(), .value, None))]
    InvalidEnumValue {
        /// Name of the enum type.
        enum_name: String,
        /// Attribute being coerced, if any.
        attribute: Option<String>,
        /// Display form of the offending value.
        value: String,
    },

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// Input data carried a key with no matching attribute.
    #[error("Unrecognized attribute: {key}")]
    UnrecognizedAttribute { key: String },
    /// The type cannot be instantiated directly.
    #[error("Cannot instantiate type {type_name}")]
    Instantiation { type_name: String },
    /// A raw array was wrapped as a non-array model type.
    #[error("Cannot wrap array as {type_name}")]
    ArrayWrap { type_name: String },

    // ========================================================================
    // Accessor Errors
    // ========================================================================
    /// Accessor named a property the type does not declare.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),
    /// `call` named a method the type does not provide.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    /// Identity test (`isRed`) not declared by the enum.
    #[error("Unknown enum test: {0}")]
    UnknownEnumTest(String),
    /// Type reference named no primitive or registered type.
    #[error("Unknown type: {0}")]
    UnknownType(String),
    /// Typed read found a value of another kind.
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// A user hook (`init`, `initType`, method) failed.
    #[error("{0}")]
    Hook(String),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a hook failure from any displayable message.
    pub fn hook(message: impl Into<String>) -> Self {
        Self::Hook(message.into())
    }

    /// True for [`Error::Coercion`] and its enum specialization.
    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Coercion { .. } | Self::InvalidEnumValue { .. })
    }

    /// Attribute context of a coercion error.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Coercion { attribute, .. } | Self::InvalidEnumValue { attribute, .. } => {
                attribute.as_deref()
            }
            _ => None,
        }
    }
}

fn invalid_message(attribute: Option<&str>, value: &str, message: Option<&str>) -> String {
    let body = match message {
        Some(message) => message.to_string(),
        None => format!("Invalid value: {}", value),
    };
    match attribute {
        Some(attribute) => format!("{}: {}", attribute, body),
        None => body,
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_message_with_attribute() {
        let err = Error::Coercion {
            attribute: Some("age".into()),
            value: "abc".into(),
            message: None,
        };
        assert_eq!(err.to_string(), "age: Invalid value: abc");
        assert!(err.is_coercion());
        assert_eq!(err.attribute(), Some("age"));
    }

    #[test]
    fn test_coercion_message_without_attribute() {
        let err = Error::Coercion {
            attribute: None,
            value: "abc".into(),
            message: None,
        };
        assert_eq!(err.to_string(), "Invalid value: abc");
    }

    #[test]
    fn test_custom_message_keeps_prefix() {
        let err = Error::Coercion {
            attribute: Some("email".into()),
            value: "x".into(),
            message: Some("Missing @".into()),
        };
        assert_eq!(err.to_string(), "email: Missing @");
    }

    #[test]
    fn test_enum_error_is_coercion() {
        let err = Error::InvalidEnumValue {
            enum_name: "Color".into(),
            attribute: None,
            value: "purple".into(),
        };
        assert!(err.is_coercion());
        assert_eq!(err.to_string(), "Invalid value: purple");
    }

    #[test]
    fn test_structural_messages() {
        let err = Error::UnrecognizedAttribute { key: "foo".into() };
        assert_eq!(err.to_string(), "Unrecognized attribute: foo");
        assert!(!err.is_coercion());
    }
}
