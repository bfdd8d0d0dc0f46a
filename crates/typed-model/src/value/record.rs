// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared raw key/value storage backing model instances.

use crate::model::{ModelType, ModelTypeInner};
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a record's backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        Self(NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A plain data object.
///
/// Cloning a `Record` shares the backing store: writes through one handle are
/// visible through every other handle and through every model wrapping it.
/// Keys keep insertion order.
#[derive(Clone)]
pub struct Record {
    inner: Arc<RecordInner>,
}

struct RecordInner {
    id: RecordId,
    fields: RwLock<IndexMap<String, Value>>,
    /// Model type that last wrapped this record.
    binding: RwLock<Option<Weak<ModelTypeInner>>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::from_map(IndexMap::new())
    }

    fn from_map(fields: IndexMap<String, Value>) -> Self {
        Self {
            inner: Arc::new(RecordInner {
                id: RecordId::next(),
                fields: RwLock::new(fields),
                binding: RwLock::new(None),
            }),
        }
    }

    pub fn id(&self) -> RecordId {
        self.inner.id
    }

    /// Same backing store?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read a value (cloned; nested records stay shared).
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.fields.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.fields.read().contains_key(key)
    }

    /// Insert or replace, keeping the key's original position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.fields.write().insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining keys.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.fields.write().shift_remove(key)
    }

    /// Snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.fields.read().keys().cloned().collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner
            .fields
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.read().is_empty()
    }

    /// Model type bound to this record by the last wrap, if still alive.
    pub fn bound_type(&self) -> Option<ModelType> {
        self.inner
            .binding
            .read()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(ModelType::from_inner)
    }

    pub(crate) fn bind(&self, ty: &ModelType) {
        *self.inner.binding.write() = Some(ty.downgrade());
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

thread_local! {
    /// Record pairs whose comparison is in progress on this thread.
    static COMPARING: RefCell<Vec<(RecordId, RecordId)>> = const { RefCell::new(Vec::new()) };
}

/// Pops its pair when the comparison finishes.
struct ComparingGuard;

impl Drop for ComparingGuard {
    fn drop(&mut self) {
        COMPARING.with(|pairs| {
            pairs.borrow_mut().pop();
        });
    }
}

impl PartialEq for Record {
    /// Structural equality. A pair met again while it is being compared
    /// counts as equal, so cyclic records terminate.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.id(), other.id());
        let revisited = COMPARING.with(|pairs| {
            let mut pairs = pairs.borrow_mut();
            if pairs.contains(&pair) {
                true
            } else {
                pairs.push(pair);
                false
            }
        });
        if revisited {
            return true;
        }
        let _guard = ComparingGuard;

        let left = self.entries();
        let right = other.entries();
        left.len() == right.len()
            && left
                .iter()
                .all(|(k, v)| right.iter().any(|(rk, rv)| rk == k && rv == v))
    }
}

// Keys only: records may be cyclic.
impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.inner.id.0)
            .field("keys", &self.keys())
            .finish()
    }
}
