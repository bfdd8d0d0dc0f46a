// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Callable values accepted by `function`-typed properties.

use crate::error::Result;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type FunctionImpl = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A shared callable. Equality is identity.
#[derive(Clone)]
pub struct Function {
    inner: Arc<FunctionImpl>,
}

impl Function {
    pub fn new(f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.inner)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({:p})", Arc::as_ptr(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_and_identity() {
        let double = Function::new(|args| {
            let n = args.first().and_then(Value::as_i64).unwrap_or(0);
            Ok(Value::Int(n * 2))
        });
        assert_eq!(double.call(&[Value::Int(21)]).expect("call"), Value::Int(42));
        assert!(double.ptr_eq(&double.clone()));
        assert!(!double.ptr_eq(&Function::new(|_| Ok(Value::Null))));
    }
}
