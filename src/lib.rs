//! # ragstore - A Small Exact Vector Store
//!
//! ragstore keeps fixed-dimension embeddings together with their payloads and
//! answers top-k nearest-neighbor queries by cosine similarity, using an exact
//! linear scan. Equal scores are returned in insertion order, and zero vectors
//! score 0 instead of failing.
//!
//! Around the store sit the pieces of a small document question-answering
//! flow: an [`Embedder`] seam, an [`AnswerSynthesizer`] seam, a [`RagPipeline`]
//! tying them together and an HTTP [`server`].
//!
//! ## Example
//!
//! ```
//! use ragstore::VectorStore;
//!
//! let mut store = VectorStore::new();
//!
//! store.add(vec![1.0, 0.0], "doc A".to_string()).unwrap();
//! store.add(vec![0.0, 1.0], "doc B".to_string()).unwrap();
//! store.add(vec![1.0, 0.0], "doc C".to_string()).unwrap();
//!
//! // Both A and C score 1.0; insertion order breaks the tie
//! let results = store.search(&[1.0, 0.0], 2).unwrap();
//! assert_eq!(results, vec!["doc A".to_string(), "doc C".to_string()]);
//! ```

pub mod answer;
pub mod config;
pub mod embed;
pub mod error;
pub mod pipeline;
pub mod server;
pub mod shared;
pub mod store;
pub mod vector;

pub use answer::{AnswerSynthesizer, ExtractiveSynthesizer, RetrievedContext};
pub use config::Settings;
pub use embed::{Embedder, HashingEmbedder};
pub use error::{Result, StoreError};
pub use pipeline::{Answer, DefaultPipeline, RagPipeline, DEFAULT_TOP_K};
pub use shared::SharedStore;
pub use store::{Record, SearchHit, VectorStore};
