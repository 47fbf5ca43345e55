// Nearest-anchor ranking with margins.
//
// Every sentence vector is scored against every anchor. The top K scores are
// kept in descending order; equal scores keep anchor insertion order because
// the sort is stable. Rounding to 4 decimals happens only on serialization.

use serde::{Deserialize, Serialize, Serializer};

use super::anchors::EmbeddedAnchors;
use super::{ClassifierConfig, ClassifyError};
use crate::corpus::Record;
use crate::embeddings::cosine_similarity;

/// Decimal places used when scores and margins are written out.
pub const SCORE_DECIMALS: i32 = 4;

/// One ranked anchor for a sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAnchor {
    pub category: String,
    pub anchor_text: String,
    #[serde(serialize_with = "serialize_rounded")]
    pub score: f64,
}

/// Classification of one sentence of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceClassification {
    pub record_id: String,
    /// Group label of the record (Tags)
    pub group: String,
    /// Category label of the record (Product)
    pub product: String,
    pub sentence: String,
    /// Best anchors first
    pub ranked: Vec<RankedAnchor>,
    /// `margins[i]` is `ranked[i].score - ranked[i + 1].score`
    #[serde(serialize_with = "serialize_rounded_vec")]
    pub margins: Vec<f64>,
}

impl SentenceClassification {
    pub fn top(&self) -> Option<&RankedAnchor> {
        self.ranked.first()
    }

    /// Gap between rank `rank` and rank `rank + 1` (1-based), unrounded.
    pub fn margin(&self, rank: usize) -> Option<f64> {
        rank.checked_sub(1).and_then(|i| self.margins.get(i).copied())
    }
}

/// Record metadata carried onto every output row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordMeta {
    pub id: String,
    pub group: String,
    pub product: String,
}

impl From<&Record> for RecordMeta {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            group: record.tags_label().to_string(),
            product: record.product_label().to_string(),
        }
    }
}

/// A sentence and its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedSentence {
    pub text: String,
    pub embedding: Vec<f64>,
}

/// All embedded sentences of one record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSentences {
    pub meta: RecordMeta,
    pub sentences: Vec<EmbeddedSentence>,
}

/// Rank the `k` anchors closest to `vector`.
pub fn rank_anchors(
    anchors: &EmbeddedAnchors,
    vector: &[f64],
    k: usize,
) -> Result<Vec<RankedAnchor>, ClassifyError> {
    if k == 0 {
        return Err(ClassifyError::ZeroTopK);
    }
    if anchors.len() < k {
        return Err(ClassifyError::TooFewAnchors {
            have: anchors.len(),
            need: k,
        });
    }
    if vector.len() != anchors.dimension() {
        return Err(ClassifyError::DimensionMismatch {
            expected: anchors.dimension(),
            got: vector.len(),
        });
    }

    let mut scored: Vec<(usize, f64)> = anchors
        .anchors()
        .iter()
        .enumerate()
        .map(|(i, a)| (i, cosine_similarity(vector, &a.embedding)))
        .collect();

    // Stable: equal scores stay in anchor insertion order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .take(k)
        .map(|(i, score)| {
            let anchor = &anchors.anchors()[i];
            RankedAnchor {
                category: anchor.category.clone(),
                anchor_text: anchor.text.clone(),
                score,
            }
        })
        .collect())
}

/// Classify every qualifying sentence of one document.
///
/// Sentences shorter than `min_sentence_chars` characters are skipped. A
/// document with no qualifying sentences yields an empty vector.
pub fn classify(
    anchors: &EmbeddedAnchors,
    document: &DocumentSentences,
    config: &ClassifierConfig,
) -> Result<Vec<SentenceClassification>, ClassifyError> {
    let mut rows = Vec::new();

    for sentence in &document.sentences {
        if sentence.text.chars().count() < config.min_sentence_chars {
            continue;
        }

        let ranked = rank_anchors(anchors, &sentence.embedding, config.top_k)?;
        let margins = ranked.windows(2).map(|w| w[0].score - w[1].score).collect();

        rows.push(SentenceClassification {
            record_id: document.meta.id.clone(),
            group: document.meta.group.clone(),
            product: document.meta.product.clone(),
            sentence: sentence.text.clone(),
            ranked,
            margins,
        });
    }

    Ok(rows)
}

/// Round to `SCORE_DECIMALS` places for presentation.
pub fn round_score(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (value * factor).round() / factor
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_score(*value))
}

fn serialize_rounded_vec<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| round_score(*v)))
}
