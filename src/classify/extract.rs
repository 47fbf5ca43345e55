// Corpus-level extraction: split each record's text, embed its sentences,
// and classify them against anchors embedded once up front.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::anchors::{AnchorSet, EmbeddedAnchors};
use super::classifier::{classify, DocumentSentences, EmbeddedSentence, RecordMeta};
use super::split::SentenceSplitter;
use super::{ClassifierConfig, ClassifyError, SentenceClassification};
use crate::corpus::Corpus;
use crate::embeddings::Embedder;

/// Counts from one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub records_seen: usize,
    /// Records whose field was absent or produced no sentences
    pub records_without_sentences: usize,
    pub sentences_seen: usize,
    pub sentences_too_short: usize,
    pub rows: usize,
}

/// Embed the anchor set once, then classify every sentence of `field` in the corpus.
pub async fn extract_with_anchors(
    corpus: &Corpus,
    field: &str,
    anchor_set: &AnchorSet,
    embedder: &dyn Embedder,
    splitter: &dyn SentenceSplitter,
    config: &ClassifierConfig,
) -> Result<(Vec<SentenceClassification>, ExtractionStats)> {
    let anchors = anchor_set.embed(embedder).await?;
    extract_with_embedded_anchors(corpus, field, &anchors, embedder, splitter, config).await
}

/// Classify every sentence of `field` against anchors that are already embedded.
pub async fn extract_with_embedded_anchors(
    corpus: &Corpus,
    field: &str,
    anchors: &EmbeddedAnchors,
    embedder: &dyn Embedder,
    splitter: &dyn SentenceSplitter,
    config: &ClassifierConfig,
) -> Result<(Vec<SentenceClassification>, ExtractionStats)> {
    let mut stats = ExtractionStats::default();
    let mut rows = Vec::new();

    for record in corpus {
        stats.records_seen += 1;

        let sentences = match record.field(field) {
            Some(text) => splitter.split(text),
            None => Vec::new(),
        };
        if sentences.is_empty() {
            stats.records_without_sentences += 1;
            continue;
        }

        stats.sentences_seen += sentences.len();
        let (sentences, too_short): (Vec<String>, Vec<String>) = sentences
            .into_iter()
            .partition(|s| s.chars().count() >= config.min_sentence_chars);
        stats.sentences_too_short += too_short.len();

        // Short sentences are never embedded
        if sentences.is_empty() {
            continue;
        }

        let vectors = embedder.embed_batch(&sentences).await?;
        if vectors.len() != sentences.len() {
            return Err(ClassifyError::EmbeddingCount {
                expected: sentences.len(),
                got: vectors.len(),
            }
            .into());
        }

        let document = DocumentSentences {
            meta: RecordMeta::from(record),
            sentences: sentences
                .into_iter()
                .zip(vectors)
                .map(|(text, embedding)| EmbeddedSentence { text, embedding })
                .collect(),
        };

        let classified = classify(anchors, &document, config)?;
        debug!(record = %record.id, rows = classified.len(), "Classified record");
        rows.extend(classified);
    }

    stats.rows = rows.len();
    info!(
        records = stats.records_seen,
        sentences = stats.sentences_seen,
        too_short = stats.sentences_too_short,
        rows = stats.rows,
        "Extraction complete"
    );

    Ok((rows, stats))
}
