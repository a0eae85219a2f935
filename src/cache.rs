//! Per-run memoization of index results.
//!
//! Every indexer operation is a pure function of the filesystem, and one
//! build asks the same questions many times (each project page wants the
//! full project list to find its neighbour). [`Memo`] answers repeated calls
//! with the *same* `Arc`, so callers may compare results by pointer.
//!
//! # Design
//!
//! ## Cache keys
//!
//! A key is the SHA-256 of the operation name plus the JSON encoding of its
//! arguments, so `list_photos(None)` and `list_photos(Some("all"))` are
//! distinct entries even when they produce equal values. The content root
//! is not part of the key: a `Memo` belongs to one repository, which owns
//! exactly one root.
//!
//! ## Lifetime
//!
//! Entries live until [`Memo::invalidate`] is called or the memo is dropped.
//! Nothing detects filesystem changes; a long-lived process that wants fresh
//! results must invalidate (or build a new repository) itself.
//!
//! Errors are never cached: a failed computation is retried on the next call.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

type Entry = Arc<dyn Any + Send + Sync>;

/// Memo table keyed by (operation, serialized arguments).
#[derive(Default)]
pub struct Memo {
    entries: Mutex<HashMap<String, Entry>>,
    stats: Mutex<CacheStats>,
}

impl fmt::Debug for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("entries", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized value for `(operation, args)`, computing it with
    /// `compute` on a miss.
    ///
    /// The table lock is not held while computing, so two threads missing on
    /// the same key may both compute; the first result stored wins and both
    /// callers receive it.
    pub fn get_or_try_insert<T, A, E, F>(
        &self,
        operation: &str,
        args: &A,
        compute: F,
    ) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        A: Serialize + ?Sized,
        F: FnOnce() -> Result<T, E>,
    {
        let key = cache_key(operation, args);

        if let Some(hit) = self.lookup::<T>(&key) {
            debug!(operation, "memo hit");
            self.record(CacheStats::hit);
            return Ok(hit);
        }

        debug!(operation, "memo miss");
        self.record(CacheStats::miss);
        let value = Arc::new(compute()?);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = entries
            .entry(key)
            .or_insert_with(|| value.clone() as Entry)
            .clone();
        Ok(stored.downcast::<T>().unwrap_or(value))
    }

    fn lookup<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()?.downcast::<T>().ok()
    }

    fn record(&self, update: fn(&mut CacheStats)) {
        update(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Drop every memoized result.
    pub fn invalidate(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of memoized results.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit/miss counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// SHA-256 of an operation name and its JSON-encoded arguments, as hex.
pub fn cache_key<A: Serialize + ?Sized>(operation: &str, args: &A) -> String {
    let mut hasher = Sha256::new();
    hasher.update(operation.as_bytes());
    hasher.update(b"\0");
    // Arguments are plain strings and options; encoding them cannot fail.
    let encoded = serde_json::to_vec(args).unwrap_or_default();
    hasher.update(&encoded);
    format!("{:x}", hasher.finalize())
}

/// Summary of memo performance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hits, {} misses", self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn repeated_call_returns_same_arc() {
        let memo = Memo::new();
        let first = memo
            .get_or_try_insert("list", &None::<String>, || Ok::<_, ()>(vec![1, 2, 3]))
            .unwrap();
        let second = memo
            .get_or_try_insert("list", &None::<String>, || Ok::<_, ()>(vec![9]))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, vec![1, 2, 3]);
    }

    #[test]
    fn different_args_are_different_entries() {
        let memo = Memo::new();
        let all = memo
            .get_or_try_insert("photos", &Some("all"), || Ok::<_, ()>(1))
            .unwrap();
        let none = memo
            .get_or_try_insert("photos", &None::<&str>, || Ok::<_, ()>(2))
            .unwrap();
        assert_eq!((*all, *none), (1, 2));
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn different_operations_are_different_entries() {
        let memo = Memo::new();
        let a = memo.get_or_try_insert("a", &(), || Ok::<_, ()>(1)).unwrap();
        let b = memo.get_or_try_insert("b", &(), || Ok::<_, ()>(2)).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn errors_are_not_cached() {
        let memo = Memo::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Err::<u32, _>("boom")
        };
        assert!(memo.get_or_try_insert("x", &(), compute).is_err());
        assert!(memo.get_or_try_insert("x", &(), compute).is_err());
        assert_eq!(calls.get(), 2);
        assert!(memo.is_empty());
    }

    #[test]
    fn invalidate_forces_recompute() {
        let memo = Memo::new();
        let first = memo.get_or_try_insert("x", &(), || Ok::<_, ()>(1)).unwrap();
        memo.invalidate();
        let second = memo.get_or_try_insert("x", &(), || Ok::<_, ()>(2)).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*second, 2);
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let memo = Memo::new();
        for _ in 0..3 {
            memo.get_or_try_insert("x", &(), || Ok::<_, ()>(1)).unwrap();
        }
        let stats = memo.stats();
        assert_eq!(stats, CacheStats { hits: 2, misses: 1 });
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.to_string(), "2 hits, 1 misses");
    }

    #[test]
    fn cache_key_is_stable_hex() {
        let a = cache_key("photos", &Some("nature"));
        let b = cache_key("photos", &Some("nature"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, cache_key("photos", &Some("travel")));
    }
}
