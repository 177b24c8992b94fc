//! The store module
//! Exact (brute-force) cosine-similarity search over an append-only record list

use crate::error::{Result, StoreError};
use crate::vector::{cosine_with_magnitudes, Magnitude};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One stored embedding together with its payload.
///
/// The insertion index only breaks ties between equal scores and is not
/// part of the public surface.
#[derive(Debug, Clone)]
pub struct Record<P> {
    vector: Vec<f64>,
    magnitude: Magnitude,
    payload: P,
    index: usize,
}

impl<P> Record<P> {
    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

/// A record's score against one query.
///
/// Ordering is rank order: `a < b` means `a` ranks ahead of `b`, i.e. it has
/// the higher score, or the same score and the earlier insertion index.
/// Sorting ascending therefore yields best-first results, and the top of a
/// `BinaryHeap<ScoredRecord>` is the worst-ranked entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoredRecord {
    pub(crate) score: f64,
    pub(crate) index: usize,
}

impl Ord for ScoredRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for ScoredRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScoredRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredRecord {}

/// A ranked search result borrowing its payload from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a, P> {
    pub payload: &'a P,
    pub score: f64,
}

/// In-memory vector store.
///
/// Vectors and payloads live together in one `Vec<Record>`, so they can
/// never fall out of step. The dimension is fixed by the first `add`.
#[derive(Debug, Clone)]
pub struct VectorStore<P = String> {
    records: Vec<Record<P>>,
    dimension: Option<usize>,
}

impl<P> Default for VectorStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> VectorStore<P> {
    /// Creates a new empty store.
    ///
    /// The store starts with no dimension constraint. The dimension is set
    /// by the first vector added.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragstore::VectorStore;
    ///
    /// let store: VectorStore = VectorStore::new();
    /// assert!(store.is_empty());
    /// assert_eq!(store.dimension(), None);
    /// ```
    pub fn new() -> Self {
        VectorStore { records: Vec::new(), dimension: None }
    }

    /// Creates an empty store with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        VectorStore { records: Vec::with_capacity(capacity), dimension: None }
    }

    /// Appends a vector and its payload.
    ///
    /// The first call fixes the store's dimension; later vectors must match it.
    /// A rejected call leaves the store unchanged.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - the vector is empty
    /// * `DimensionMismatch` - the vector length differs from the store's dimension
    ///
    /// # Examples
    ///
    /// ```
    /// use ragstore::{StoreError, VectorStore};
    ///
    /// let mut store = VectorStore::new();
    /// store.add(vec![1.0, 0.0], "doc A".to_string()).unwrap();
    ///
    /// let result = store.add(vec![1.0, 0.0, 0.0], "doc B".to_string());
    /// assert!(matches!(result, Err(StoreError::DimensionMismatch { expected: 2, actual: 3 })));
    /// assert_eq!(store.len(), 1);
    /// ```
    pub fn add(&mut self, vector: Vec<f64>, payload: P) -> Result<()> {
        check_vector(self.dimension, &vector)?;
        self.push(vector, payload);
        Ok(())
    }

    /// Appends several vectors and payloads as one unit.
    ///
    /// Every vector is checked before anything is stored, so either the whole
    /// batch is added or, on error, none of it. Returns the number added.
    ///
    /// # Errors
    ///
    /// Same as [`add`](VectorStore::add), for the first offending vector. Within
    /// a batch on an empty store, the first vector fixes the dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragstore::VectorStore;
    ///
    /// let mut store = VectorStore::new();
    /// let batch = vec![(vec![1.0, 0.0], "a".to_string()), (vec![1.0], "b".to_string())];
    /// assert!(store.add_batch(batch).is_err());
    /// assert!(store.is_empty());
    /// ```
    pub fn add_batch<I>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (Vec<f64>, P)>,
    {
        let entries: Vec<(Vec<f64>, P)> = entries.into_iter().collect();

        let mut dimension = self.dimension;
        for (vector, _) in &entries {
            check_vector(dimension, vector)?;
            dimension = Some(vector.len());
        }

        let added = entries.len();
        self.records.reserve(added);
        for (vector, payload) in entries {
            self.push(vector, payload);
        }

        Ok(added)
    }

    fn push(&mut self, vector: Vec<f64>, payload: P) {
        self.dimension = Some(vector.len());
        let magnitude = Magnitude::of(&vector);
        let index = self.records.len();
        self.records.push(Record { vector, magnitude, payload, index });
    }

    /// Searches for the `top_k` records most similar to `query`, with scores.
    ///
    /// Records are ranked by descending cosine similarity; equal scores keep
    /// insertion order. Returns exactly `min(top_k, len())` hits. An empty
    /// store returns no hits for any query.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - `top_k` is 0
    /// * `DimensionMismatch` - the store is non-empty and `query` has a different length
    pub fn search_scored(&self, query: &[f64], top_k: usize) -> Result<Vec<SearchHit<'_, P>>> {
        if top_k < 1 {
            return Err(StoreError::InvalidArgument("top_k must be at least 1".to_string()));
        }

        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };

        if query.len() != dimension {
            return Err(StoreError::DimensionMismatch { expected: dimension, actual: query.len() });
        }

        let ranked = self.rank(query, top_k.min(self.records.len()));

        Ok(ranked
            .into_iter()
            .map(|scored| SearchHit {
                payload: &self.records[scored.index].payload,
                score: scored.score,
            })
            .collect())
    }

    /// Keeps the best `k` candidates in a bounded heap whose top is the
    /// worst kept entry, then returns them best-first.
    fn rank(&self, query: &[f64], k: usize) -> Vec<ScoredRecord> {
        let query_magnitude = Magnitude::of(query);
        let mut heap: BinaryHeap<ScoredRecord> = BinaryHeap::with_capacity(k + 1);

        for record in &self.records {
            let candidate = ScoredRecord {
                score: cosine_with_magnitudes(query, &query_magnitude, &record.vector, &record.magnitude),
                index: record.index,
            };

            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec()
    }

    /// Returns all stored records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &Record<P>> {
        self.records.iter()
    }

    /// Returns the number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The dimension fixed by the first `add`, or `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

impl<P: Clone> VectorStore<P> {
    /// Searches for the `top_k` most similar records and returns their payloads,
    /// highest similarity first.
    ///
    /// See [`search_scored`](VectorStore::search_scored) for ranking and errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragstore::VectorStore;
    ///
    /// let mut store = VectorStore::new();
    /// store.add(vec![1.0, 0.0], "doc A".to_string()).unwrap();
    /// store.add(vec![0.0, 1.0], "doc B".to_string()).unwrap();
    /// store.add(vec![1.0, 0.0], "doc C".to_string()).unwrap();
    ///
    /// let results = store.search(&[1.0, 0.0], 2).unwrap();
    /// assert_eq!(results, vec!["doc A".to_string(), "doc C".to_string()]);
    /// ```
    pub fn search(&self, query: &[f64], top_k: usize) -> Result<Vec<P>> {
        Ok(self
            .search_scored(query, top_k)?
            .into_iter()
            .map(|hit| hit.payload.clone())
            .collect())
    }
}

/// Rejects an empty vector, or one whose length differs from `dimension`.
fn check_vector(dimension: Option<usize>, vector: &[f64]) -> Result<()> {
    if vector.is_empty() {
        return Err(StoreError::InvalidArgument("vector must not be empty".to_string()));
    }

    match dimension {
        Some(d) if d != vector.len() => {
            Err(StoreError::DimensionMismatch { expected: d, actual: vector.len() })
        }
        _ => Ok(()),
    }
}
