// Embedder trait: the swap-ready abstraction over the sentence model.
//
// The classifier only needs texts in, equal-length vectors out. The default
// implementation runs all-MiniLM-L6-v2 locally through ONNX; tests plug in
// deterministic doubles.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for embedding text into fixed-length vectors where cosine similarity
/// approximates semantic similarity.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in the same order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}
