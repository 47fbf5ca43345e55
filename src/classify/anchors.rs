// Anchor categories and their exemplar sentences.
//
// An AnchorSet is the validated, ordered list of categories. Embedding it
// once produces EmbeddedAnchors, which every sentence is compared against.
// Anchor order is category order, then sentence order within a category;
// that order is the tie-break when two anchors score the same.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ClassifyError;
use crate::embeddings::Embedder;

/// A named category and its exemplar sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorCategory {
    pub category: String,
    pub anchors: Vec<String>,
}

impl AnchorCategory {
    pub fn new(category: impl Into<String>, anchors: &[&str]) -> Self {
        Self {
            category: category.into(),
            anchors: anchors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One exemplar sentence with its category and embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub category: String,
    pub text: String,
    pub embedding: Vec<f64>,
}

/// A validated, ordered anchor map that has not been embedded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    categories: Vec<AnchorCategory>,
}

impl AnchorSet {
    /// Validate an anchor map: at least one category, no empty category, no
    /// blank anchor sentence.
    pub fn new(categories: Vec<AnchorCategory>) -> Result<Self, ClassifyError> {
        if categories.is_empty() {
            return Err(ClassifyError::EmptyAnchorMap);
        }
        for c in &categories {
            if c.anchors.is_empty() {
                return Err(ClassifyError::EmptyCategory(c.category.clone()));
            }
            if c.anchors.iter().any(|a| a.trim().is_empty()) {
                return Err(ClassifyError::EmptyAnchorText(c.category.clone()));
            }
        }
        Ok(Self { categories })
    }

    /// Load an anchor map from a JSON file shaped like
    /// `[{"category": "...", "anchors": ["...", ...]}, ...]`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read anchor map {}", path.display()))?;
        let categories: Vec<AnchorCategory> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid anchor map JSON in {}", path.display()))?;
        Ok(Self::new(categories)?)
    }

    pub fn categories(&self) -> &[AnchorCategory] {
        &self.categories
    }

    /// Total number of anchor sentences across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.anchors.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Anchor sentences flattened in insertion order, paired with their category.
    pub fn flatten(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .flat_map(|c| {
                c.anchors
                    .iter()
                    .map(move |a| (c.category.as_str(), a.as_str()))
            })
            .collect()
    }

    /// Embed every anchor sentence in one batch.
    ///
    /// Called once per run; the result is shared read-only by every sentence
    /// comparison. Embedder failures propagate unchanged.
    pub async fn embed(&self, embedder: &dyn Embedder) -> Result<EmbeddedAnchors> {
        let flat = self.flatten();
        let texts: Vec<String> = flat.iter().map(|(_, text)| text.to_string()).collect();

        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(ClassifyError::EmbeddingCount {
                expected: texts.len(),
                got: vectors.len(),
            }
            .into());
        }

        let anchors = flat
            .into_iter()
            .zip(vectors)
            .map(|((category, text), embedding)| Anchor {
                category: category.to_string(),
                text: text.to_string(),
                embedding,
            })
            .collect();

        let embedded = EmbeddedAnchors::new(anchors)?;
        info!(
            anchors = embedded.len(),
            categories = self.categories.len(),
            dim = embedded.dimension(),
            "Embedded anchor sentences"
        );
        Ok(embedded)
    }
}

/// Anchors with their embeddings, all of the same dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedAnchors {
    anchors: Vec<Anchor>,
    dimension: usize,
}

impl EmbeddedAnchors {
    pub fn new(anchors: Vec<Anchor>) -> Result<Self, ClassifyError> {
        let dimension = match anchors.first() {
            Some(a) => a.embedding.len(),
            None => return Err(ClassifyError::EmptyAnchorMap),
        };
        if let Some(bad) = anchors.iter().find(|a| a.embedding.len() != dimension) {
            return Err(ClassifyError::DimensionMismatch {
                expected: dimension,
                got: bad.embedding.len(),
            });
        }
        Ok(Self { anchors, dimension })
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// The seven built-in categories used for AI-related complaint analysis.
pub fn default_anchor_map() -> Vec<AnchorCategory> {
    vec![
        AnchorCategory::new(
            "Agency",
            &[
                "I could not reach a human representative.",
                "There was no way to speak to a real person.",
                "I was unable to contact anyone directly.",
                "Everything was handled without human interaction.",
                "I was blocked from speaking with a person.",
            ],
        ),
        AnchorCategory::new(
            "Blame (Self-blame / Individual responsibility)",
            &[
                "I may have made a mistake.",
                "This could be my fault.",
                "I did something wrong when submitting my information.",
                "I may be responsible for what happened.",
                "This issue may have resulted from something I did.",
            ],
        ),
        AnchorCategory::new(
            "Blame (External (AI / system responsibility))",
            &[
                "AI made an error.",
                "The algorithmic process failed.",
                "AI incorrectly handled my information.",
                "The system made an error in how it used my data.",
                "The automated system did not work properly.",
            ],
        ),
        AnchorCategory::new(
            "Explanation / Transparency",
            &[
                "I was not told why this decision was made.",
                "There was no explanation for the outcome.",
                "I don't understand the reason for this decision.",
                "The decision was made without any explanation.",
                "The reasoning behind this decision was unclear.",
            ],
        ),
        AnchorCategory::new(
            "AI / Digital Literacy",
            &[
                "I am not familiar with how AI systems make decisions.",
                "I don't understand how algorithms are used to make decisions.",
                "I am not sure how machine-learning systems evaluate customer information.",
                "I am unfamiliar with how large amounts of data are used to make decisions.",
                "I do not understand the logic behind algorithmic decision-making.",
                "I don't know how my data is used in automated decisions.",
            ],
        ),
        AnchorCategory::new(
            "Morality (Fairness/legitimacy)",
            &[
                "This decision was unjust.",
                "I was treated improperly by the system.",
                "This outcome was not justified.",
                "I was wrongfully denied.",
                "The system handled my case in an inappropriate manner.",
                "This decision lacks legitimacy.",
            ],
        ),
        AnchorCategory::new(
            "Emotional Valence",
            &[
                "This was very frustrating.",
                "I am upset about how this was handled.",
                "I feel helpless dealing with this system.",
                "This process has caused me significant stress.",
                "I am disappointed with how this was resolved.",
                "I feel overwhelmed by this situation.",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_is_valid() {
        let set = AnchorSet::new(default_anchor_map()).unwrap();
        assert_eq!(set.categories().len(), 7);
        assert_eq!(set.len(), 38);
    }

    #[test]
    fn test_flatten_keeps_insertion_order() {
        let set = AnchorSet::new(vec![
            AnchorCategory::new("B", &["b1", "b2"]),
            AnchorCategory::new("A", &["a1"]),
        ])
        .unwrap();
        assert_eq!(set.flatten(), vec![("B", "b1"), ("B", "b2"), ("A", "a1")]);
    }

    #[test]
    fn test_empty_map_rejected() {
        assert_eq!(AnchorSet::new(vec![]), Err(ClassifyError::EmptyAnchorMap));
    }

    #[test]
    fn test_empty_category_rejected() {
        let err = AnchorSet::new(vec![AnchorCategory::new("Empty", &[])]).unwrap_err();
        assert_eq!(err, ClassifyError::EmptyCategory("Empty".to_string()));
    }

    #[test]
    fn test_blank_anchor_rejected() {
        let err = AnchorSet::new(vec![AnchorCategory::new("C", &["ok", "  "])]).unwrap_err();
        assert_eq!(err, ClassifyError::EmptyAnchorText("C".to_string()));
    }

    #[test]
    fn test_embedded_anchors_dimension_mismatch() {
        let anchors = vec![
            Anchor {
                category: "A".into(),
                text: "a".into(),
                embedding: vec![1.0, 0.0],
            },
            Anchor {
                category: "A".into(),
                text: "b".into(),
                embedding: vec![1.0],
            },
        ];
        assert_eq!(
            EmbeddedAnchors::new(anchors),
            Err(ClassifyError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_anchor_map_json_roundtrip_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anchors.json");
        std::fs::write(
            &path,
            r#"[{"category": "Zeta", "anchors": ["z"]}, {"category": "Alpha", "anchors": ["a"]}]"#,
        )
        .unwrap();
        let set = AnchorSet::from_json_file(&path).unwrap();
        assert_eq!(set.categories()[0].category, "Zeta");
        assert_eq!(set.categories()[1].category, "Alpha");
    }

    #[test]
    fn test_anchor_map_json_rejects_empty_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anchors.json");
        std::fs::write(&path, r#"[{"category": "Zeta", "anchors": []}]"#).unwrap();
        assert!(AnchorSet::from_json_file(&path).is_err());
    }
}
