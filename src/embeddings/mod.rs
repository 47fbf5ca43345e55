// Sentence embeddings, the capability the anchor classifier consumes.

pub mod download;
pub mod onnx;
pub mod similarity;
pub mod traits;

pub use similarity::cosine_similarity;
pub use traits::Embedder;
