//! Thread-safe handle around a [`VectorStore`].
//!
//! Searches share a read lock and run concurrently; `add` and `add_batch`
//! take the write lock, so a search never observes a half-appended record
//! or a partly appended batch.

use crate::error::Result;
use crate::store::VectorStore;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Cloneable, lock-guarded store. Clones point at the same records.
#[derive(Debug)]
pub struct SharedStore<P = String> {
    inner: Arc<RwLock<VectorStore<P>>>,
}

impl<P> Clone for SharedStore<P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<P> Default for SharedStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> From<VectorStore<P>> for SharedStore<P> {
    fn from(store: VectorStore<P>) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }
}

impl<P> SharedStore<P> {
    pub fn new() -> Self {
        VectorStore::new().into()
    }

    pub fn add(&self, vector: Vec<f64>, payload: P) -> Result<()> {
        self.inner.write().add(vector, payload)
    }

    /// Appends a batch under one write lock. See [`VectorStore::add_batch`].
    pub fn add_batch<I>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (Vec<f64>, P)>,
    {
        self.inner.write().add_batch(entries)
    }

    /// Read access to the underlying store. Writers wait while the guard lives.
    pub fn read(&self) -> RwLockReadGuard<'_, VectorStore<P>> {
        self.inner.read()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.inner.read().dimension()
    }
}

impl<P: Clone> SharedStore<P> {
    /// Payloads of the `top_k` best matches, best first.
    pub fn search(&self, query: &[f64], top_k: usize) -> Result<Vec<P>> {
        self.inner.read().search(query, top_k)
    }

    /// Like [`search`](SharedStore::search) but keeps the scores.
    ///
    /// Payloads are cloned out so the read lock is released on return.
    pub fn search_scored_owned(&self, query: &[f64], top_k: usize) -> Result<Vec<(P, f64)>> {
        let store = self.inner.read();
        Ok(store
            .search_scored(query, top_k)?
            .into_iter()
            .map(|hit| (hit.payload.clone(), hit.score))
            .collect())
    }
}
