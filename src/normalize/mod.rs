// Text normalization and boilerplate removal for complaint narratives.
//
// The cleaning pass runs in a fixed order because later steps depend on the
// normalization done by earlier ones: boilerplate is detected on text that
// is already stripped, collapsed, lowercased, and free of redaction marks.

pub mod boilerplate;
pub mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::corpus::{Corpus, Record};

pub use boilerplate::{detect_boilerplate, remove_phrases, BoilerplatePhrase};
use text::{collapse_whitespace, strip_punctuation, RedactionRemover};

/// Tunable parameters for a cleaning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    /// Words per boilerplate window
    pub ngram_size: usize,
    /// Minimum corpus-wide occurrences for a window to count as boilerplate
    pub boilerplate_threshold: usize,
    /// Character the source system uses to redact personal data
    pub redaction_marker: char,
    /// Records whose cleaned text has at most this many characters are dropped
    pub min_text_chars: usize,
    /// Sentinel for a missing Product label
    pub unknown_product: String,
    /// Sentinel for a missing Tags label
    pub default_tags: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            ngram_size: 10,
            boilerplate_threshold: 50,
            redaction_marker: 'x',
            min_text_chars: 3,
            unknown_product: "Unknown Product".to_string(),
            default_tags: "Standard".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("field '{0}' does not exist on any record")]
    MissingField(String),
    #[error("invalid redaction pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

/// What a cleaning pass removed, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub input_records: usize,
    /// Records dropped because the target field was absent, empty, or blank
    pub dropped_missing: usize,
    pub imputed_products: usize,
    pub imputed_tags: usize,
    /// Redaction runs removed across the corpus
    pub redactions_removed: usize,
    /// Detected boilerplate phrases, most frequent first
    pub boilerplate: Vec<BoilerplatePhrase>,
    /// Literal phrase occurrences removed across the corpus
    pub boilerplate_occurrences_removed: usize,
    /// Records that contained at least one boilerplate phrase
    pub records_with_boilerplate: usize,
    /// Records dropped because nothing meaningful was left after cleaning
    pub dropped_empty: usize,
    pub output_records: usize,
}

impl CleaningStats {
    pub fn total_dropped(&self) -> usize {
        self.dropped_missing + self.dropped_empty
    }

    /// Share of surviving records that carried templated legal language.
    pub fn boilerplate_share(&self) -> f64 {
        if self.output_records == 0 {
            0.0
        } else {
            self.records_with_boilerplate as f64 / self.output_records as f64
        }
    }
}

/// Runs the cleaning pass over a corpus.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
    redaction: RedactionRemover,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Result<Self, NormalizeError> {
        // Redaction runs are matched after lowercasing
        let marker = config.redaction_marker.to_lowercase().to_string();
        let redaction = RedactionRemover::new(&marker)?;
        Ok(Self { config, redaction })
    }

    /// Punctuation stripping, whitespace collapsing, and lowercasing for a
    /// single value. Redaction and boilerplate are corpus-level steps and are
    /// not applied here.
    pub fn normalize_text(&self, text: &str) -> String {
        collapse_whitespace(&strip_punctuation(text)).to_lowercase()
    }

    /// Clean `field` across the corpus.
    ///
    /// Consumes the corpus and returns the surviving records with the field
    /// rewritten, plus per-stage statistics. Fails without partial output if
    /// the field exists on no record.
    pub fn clean(
        &self,
        corpus: Corpus,
        field: &str,
    ) -> Result<(Corpus, CleaningStats), NormalizeError> {
        if !corpus.is_empty() && !corpus.iter().any(|r| r.has_field(field)) {
            return Err(NormalizeError::MissingField(field.to_string()));
        }

        let mut stats = CleaningStats {
            input_records: corpus.len(),
            ..Default::default()
        };

        // 1. Null filtering
        let (mut records, missing): (Vec<Record>, Vec<Record>) = corpus
            .into_records()
            .into_iter()
            .partition(|r| r.field(field).is_some_and(|v| !v.trim().is_empty()));
        stats.dropped_missing = missing.len();
        debug!(dropped = stats.dropped_missing, field, "Dropped records with no text");

        // 2. Categorical imputation
        for record in &mut records {
            if record.product.as_deref().is_none_or(|p| p.trim().is_empty()) {
                record.product = Some(self.config.unknown_product.clone());
                stats.imputed_products += 1;
            }
            if record.tags.as_deref().is_none_or(|t| t.trim().is_empty()) {
                record.tags = Some(self.config.default_tags.clone());
                stats.imputed_tags += 1;
            }
        }

        // 3-6. Punctuation, whitespace, case, redaction placeholders
        let mut texts: Vec<String> = Vec::with_capacity(records.len());
        for record in &records {
            let normalized = self.normalize_text(record.field(field).unwrap_or_default());
            let (cleaned, redactions) = self.redaction.remove(&normalized);
            stats.redactions_removed += redactions;
            texts.push(cleaned);
        }
        debug!(redactions = stats.redactions_removed, "Removed redaction placeholders");

        // 7. Boilerplate detection
        stats.boilerplate = detect_boilerplate(
            &texts,
            self.config.ngram_size,
            self.config.boilerplate_threshold,
        );

        // 8. Boilerplate removal
        if !stats.boilerplate.is_empty() {
            for text in &mut texts {
                let (stripped, removed) = remove_phrases(text, &stats.boilerplate);
                if removed > 0 {
                    stats.boilerplate_occurrences_removed += removed;
                    stats.records_with_boilerplate += 1;
                    *text = stripped;
                }
            }
        }

        // 9. Empty-result filtering
        let min_chars = self.config.min_text_chars;
        let mut kept = Vec::with_capacity(records.len());
        for (mut record, text) in records.into_iter().zip(texts) {
            if text.chars().count() <= min_chars {
                stats.dropped_empty += 1;
                continue;
            }
            record.set_field(field, text);
            kept.push(record);
        }
        stats.output_records = kept.len();

        info!(
            input = stats.input_records,
            dropped_missing = stats.dropped_missing,
            dropped_empty = stats.dropped_empty,
            redactions = stats.redactions_removed,
            boilerplate_phrases = stats.boilerplate.len(),
            boilerplate_removed = stats.boilerplate_occurrences_removed,
            output = stats.output_records,
            "Cleaned corpus"
        );

        Ok((Corpus::new(kept), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: &str = "narrative";

    fn normalizer() -> Normalizer {
        Normalizer::new(NormalizerConfig::default()).unwrap()
    }

    #[test]
    fn test_normalize_text_pipeline_order() {
        let n = normalizer();
        assert_eq!(
            n.normalize_text("  They CHARGED me, twice!!  Why?\n"),
            "they charged me twice why"
        );
    }

    #[test]
    fn test_clean_imputes_labels() {
        let corpus = Corpus::new(vec![Record::new("1").with_field(FIELD, "a real complaint")]);
        let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();
        let r = &cleaned.records()[0];
        assert_eq!(r.product.as_deref(), Some("Unknown Product"));
        assert_eq!(r.tags.as_deref(), Some("Standard"));
        assert_eq!(stats.imputed_products, 1);
        assert_eq!(stats.imputed_tags, 1);
    }

    #[test]
    fn test_clean_keeps_existing_labels() {
        let corpus = Corpus::new(vec![Record::new("1")
            .with_field(FIELD, "a real complaint")
            .with_product("Mortgage")
            .with_tags("Servicemember")]);
        let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();
        let r = &cleaned.records()[0];
        assert_eq!(r.product_label(), "Mortgage");
        assert_eq!(r.tags_label(), "Servicemember");
        assert_eq!(stats.imputed_products, 0);
    }

    #[test]
    fn test_clean_drops_punctuation_only_text_as_empty() {
        let corpus = Corpus::new(vec![
            Record::new("1").with_field(FIELD, "!!! ... ???"),
            Record::new("2").with_field(FIELD, "ok fine then"),
        ]);
        let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.dropped_missing, 0);
        assert_eq!(stats.dropped_empty, 1);
    }

    #[test]
    fn test_uppercase_marker_matches_lowercased_text() {
        let config = NormalizerConfig {
            redaction_marker: 'X',
            ..Default::default()
        };
        let corpus = Corpus::new(vec![Record::new("1").with_field(FIELD, "card XXXX was closed")]);
        let (cleaned, stats) = Normalizer::new(config).unwrap().clean(corpus, FIELD).unwrap();
        assert_eq!(cleaned.records()[0].field(FIELD), Some("card was closed"));
        assert_eq!(stats.redactions_removed, 1);
    }

    #[test]
    fn test_clean_empty_corpus() {
        let (cleaned, stats) = normalizer().clean(Corpus::default(), FIELD).unwrap();
        assert!(cleaned.is_empty());
        assert_eq!(stats, CleaningStats::default());
    }

    #[test]
    fn test_boilerplate_share() {
        let stats = CleaningStats {
            output_records: 4,
            records_with_boilerplate: 1,
            ..Default::default()
        };
        assert!((stats.boilerplate_share() - 0.25).abs() < f64::EPSILON);
        assert_eq!(CleaningStats::default().boilerplate_share(), 0.0);
    }
}
