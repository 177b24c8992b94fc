//! Document question answering on top of one [`SharedStore`].
//!
//! Documents are embedded and stored once; each question is embedded, the
//! closest documents are retrieved, and a synthesizer turns them into an answer.
//! The REPL, `serve --docs` and the HTTP handlers all go through this type.

use crate::answer::{AnswerSynthesizer, ExtractiveSynthesizer, RetrievedContext};
use crate::embed::{Embedder, HashingEmbedder};
use crate::error::{Result, StoreError};
use crate::shared::SharedStore;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Number of passages retrieved per question unless the caller asks otherwise.
pub const DEFAULT_TOP_K: usize = 2;

/// The pipeline the binary and the HTTP server run.
pub type DefaultPipeline = RagPipeline<HashingEmbedder, ExtractiveSynthesizer>;

/// A synthesized answer and the context it was built from.
///
/// Serializes as `{"text": ..., "context": {"kind": ..., "passages": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub context: RetrievedContext,
}

#[derive(Debug, Clone)]
pub struct RagPipeline<E, S> {
    store: SharedStore<String>,
    embedder: E,
    synthesizer: S,
}

impl<E: Embedder, S: AnswerSynthesizer> RagPipeline<E, S> {
    pub fn new(embedder: E, synthesizer: S) -> Self {
        Self::with_store(SharedStore::new(), embedder, synthesizer)
    }

    /// Builds a pipeline over an existing store handle; clones of `store`
    /// see everything this pipeline ingests.
    pub fn with_store(store: SharedStore<String>, embedder: E, synthesizer: S) -> Self {
        Self { store, embedder, synthesizer }
    }

    /// Embeds and stores documents in input order, skipping blank ones.
    ///
    /// Returns how many documents were added. The batch is all or nothing:
    /// if the embedder misbehaves or the store rejects a vector, no document
    /// from this call is stored.
    ///
    /// # Errors
    ///
    /// * `Embedding` - the embedder failed, returned a different number of
    ///   vectors than documents, or a vector whose length is not its `dimension()`
    /// * `DimensionMismatch` - the store already holds vectors of another length
    pub fn ingest<I, T>(&self, documents: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let documents: Vec<String> = documents
            .into_iter()
            .map(|d| d.as_ref().trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = documents.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed(&texts)?;
        if vectors.len() != documents.len() {
            return Err(StoreError::Embedding(format!(
                "embedder returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }

        let added = self.store.add_batch(vectors.into_iter().zip(documents))?;

        info!(added, total = self.store.len(), "documents ingested");
        Ok(added)
    }

    /// Ingests a UTF-8 text file, one document per line.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        debug!(path = %path.display(), "reading documents");
        self.ingest(contents.lines())
    }

    /// Returns the `top_k` stored documents closest to `question`, best first.
    pub fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<String>> {
        let query = self.embedder.embed_one(question)?;
        self.check_dimension(&query)?;
        self.store.search(&query, top_k)
    }

    pub fn ask(&self, question: &str, top_k: usize) -> Result<Answer> {
        let context = RetrievedContext::from_results(self.retrieve(question, top_k)?);
        debug!(passages = context.passages().len(), "context retrieved");

        let text = self.synthesizer.synthesize(question, &context);
        Ok(Answer { text, context })
    }

    /// The store behind this pipeline, also used directly by callers that
    /// bring their own vectors.
    pub fn store(&self) -> &SharedStore<String> {
        &self.store
    }

    fn check_dimension(&self, vector: &[f64]) -> Result<()> {
        let dimension = self.embedder.dimension();
        if vector.len() != dimension {
            return Err(StoreError::Embedding(format!(
                "embedder declares dimension {} but produced a vector of length {}",
                dimension,
                vector.len()
            )));
        }
        Ok(())
    }
}
