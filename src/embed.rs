//! Embedding producers.
//!
//! The store only needs vectors of one fixed length; anything that turns text
//! into such vectors can implement [`Embedder`]. [`HashingEmbedder`] is a
//! dependency-free producer good enough for keyword-level retrieval.

use crate::error::{Result, StoreError};
use crate::vector::l2_normalize;

pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Embeds each text, returning one vector per input in the same order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>>;

    /// Embeds a single text; anything but exactly one vector back is an error.
    fn embed_one(&self, text: &str) -> Result<Vec<f64>> {
        let vectors = self.embed(&[text])?;
        let count = vectors.len();
        match vectors.into_iter().next() {
            Some(vector) if count == 1 => Ok(vector),
            _ => Err(StoreError::Embedding(format!("embedder returned {count} vectors for 1 text"))),
        }
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Bag-of-words feature hashing.
///
/// Each lowercase alphanumeric token is hashed into one of `dimension`
/// buckets with a hash-derived sign, and the counts are L2-normalized.
/// Text without tokens maps to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(StoreError::InvalidArgument(
                "embedding dimension must be at least 1".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn embed_text(&self, text: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.dimension];

        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            counts[bucket] += sign;
        }

        l2_normalize(&counts).unwrap_or(counts)
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}
