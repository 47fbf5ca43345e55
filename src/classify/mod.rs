// Anchor-based sentence classification.
//
// Each category is described by a handful of exemplar sentences (anchors).
// A sentence is classified by its nearest anchors in embedding space: the
// top-K anchors by cosine similarity, plus the gaps between consecutive
// ranks as a confidence signal.

pub mod anchors;
pub mod classifier;
pub mod extract;
pub mod split;

use thiserror::Error;

pub use anchors::{default_anchor_map, Anchor, AnchorCategory, AnchorSet, EmbeddedAnchors};
pub use classifier::{
    classify, rank_anchors, DocumentSentences, EmbeddedSentence, RankedAnchor,
    SentenceClassification,
};
pub use split::{SentenceSplitter, UnicodeSentenceSplitter};

/// Tunable parameters for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Anchors reported per sentence
    pub top_k: usize,
    /// Sentences with fewer characters than this are skipped
    pub min_sentence_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_sentence_chars: 5,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    #[error("anchor map has no categories")]
    EmptyAnchorMap,
    #[error("anchor category '{0}' has no sentences")]
    EmptyCategory(String),
    #[error("anchor category '{0}' contains an empty sentence")]
    EmptyAnchorText(String),
    #[error("top_k must be at least 1")]
    ZeroTopK,
    #[error("need at least {need} anchors to rank the top {need}, found {have}")]
    TooFewAnchors { have: usize, need: usize },
    #[error("embedder returned {got} vectors for {expected} texts")]
    EmbeddingCount { expected: usize, got: usize },
    #[error("embedding has {got} dimensions, anchors have {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}
