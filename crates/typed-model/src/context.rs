// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-call coercion context: the accumulate-or-fail switch.

use crate::config::{self, DatePolicy};
use crate::error::{Error, Result};
use crate::value::Value;

/// Carries the caller's error accumulator (if any) and coercion options
/// through one wrap/construct/clean traversal.
///
/// Without an accumulator the first failure is returned as `Err` and unwinds
/// the whole operation. With one, failures are appended in traversal order
/// and the offending value becomes absent (`Ok(None)`).
pub struct Context<'a> {
    errors: Option<&'a mut Vec<Error>>,
    attribute: Option<String>,
    strict: bool,
    date_policy: DatePolicy,
}

impl<'a> Context<'a> {
    /// Fail-fast context using the global settings.
    pub fn new() -> Self {
        let settings = config::global().settings();
        Self {
            errors: None,
            attribute: None,
            strict: settings.strict,
            date_policy: settings.date_policy,
        }
    }

    /// Collecting context appending to `errors`.
    pub fn collecting(errors: &'a mut Vec<Error>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new()
        }
    }

    /// Override strict coercion for this call.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Override date string interpretation for this call.
    #[must_use]
    pub fn date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn is_collecting(&self) -> bool {
        self.errors.is_some()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Attribute currently being coerced.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Number of errors collected so far (always 0 when failing fast).
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, |errors| errors.len())
    }

    /// Run `f` with `name` as the attribute context, restoring the previous one.
    pub fn with_attribute<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.attribute.replace(name.to_string());
        let out = f(self);
        self.attribute = previous;
        out
    }

    /// Run `f` without attribute context (top-level coercion).
    pub fn without_attribute<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.attribute.take();
        let out = f(self);
        self.attribute = previous;
        out
    }

    /// Record `error`, or return it when failing fast.
    pub fn report(&mut self, error: Error) -> Result<()> {
        match self.errors.as_mut() {
            Some(errors) => {
                log::trace!("[coerce] collected: {}", error);
                errors.push(error);
                Ok(())
            }
            None => Err(error),
        }
    }

    /// Report that `value` is invalid for the current attribute.
    ///
    /// Yields `Ok(None)` (the value becomes absent) when collecting.
    pub fn coercion_error<T>(&mut self, value: &Value, message: Option<&str>) -> Result<Option<T>> {
        let error = Error::Coercion {
            attribute: self.attribute.clone(),
            value: value.to_string(),
            message: message.map(str::to_string),
        };
        self.report(error).map(|()| None)
    }

    pub(crate) fn invalid_enum_value<T>(
        &mut self,
        enum_name: &str,
        value: &Value,
    ) -> Result<Option<T>> {
        let error = Error::InvalidEnumValue {
            enum_name: enum_name.to_string(),
            attribute: self.attribute.clone(),
            value: value.to_string(),
        };
        self.report(error).map(|()| None)
    }
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self::new()
    }
}
