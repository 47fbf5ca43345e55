use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::classify::ClassifierConfig;
use crate::corpus::load::RecordSchema;
use crate::normalize::NormalizerConfig;

/// Column cleaned and classified when GRIEVANCE_TEXT_FIELD is unset.
pub const DEFAULT_TEXT_FIELD: &str = "Consumer complaint narrative";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default except the input files, which can also be given on
/// the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Complaint exports to load and concatenate, in order
    pub input_paths: Vec<PathBuf>,
    /// Directory for reports and extracted rows
    pub output_dir: PathBuf,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Optional JSON anchor map replacing the built-in categories
    pub anchor_map_path: Option<PathBuf>,
    /// Free-text column to clean and classify
    pub text_field: String,
    pub schema: RecordSchema,
    pub normalizer: NormalizerConfig,
    pub classifier: ClassifierConfig,
    /// Minimum topic sizes to sweep in `grievance topics`
    pub topic_sizes: Vec<usize>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = NormalizerConfig::default();
        let normalizer = NormalizerConfig {
            ngram_size: parse_var("GRIEVANCE_NGRAM_SIZE", defaults.ngram_size)?,
            boilerplate_threshold: parse_var(
                "GRIEVANCE_BOILERPLATE_THRESHOLD",
                defaults.boilerplate_threshold,
            )?,
            ..defaults
        };

        let defaults = ClassifierConfig::default();
        let classifier = ClassifierConfig {
            top_k: parse_var("GRIEVANCE_TOP_K", defaults.top_k)?,
            min_sentence_chars: parse_var(
                "GRIEVANCE_MIN_SENTENCE_CHARS",
                defaults.min_sentence_chars,
            )?,
        };

        let topic_sizes = match env::var("GRIEVANCE_TOPIC_SIZES") {
            Ok(raw) => parse_list(&raw).context("Invalid GRIEVANCE_TOPIC_SIZES")?,
            Err(_) => vec![15, 30, 60],
        };

        let input_paths = env::var("GRIEVANCE_INPUT")
            .map(|raw| split_paths(&raw))
            .unwrap_or_default();

        Ok(Self {
            input_paths,
            output_dir: env::var("GRIEVANCE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./output")),
            model_dir: env::var("GRIEVANCE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| crate::embeddings::download::default_model_dir()),
            anchor_map_path: env::var("GRIEVANCE_ANCHOR_MAP").ok().map(PathBuf::from),
            text_field: env::var("GRIEVANCE_TEXT_FIELD")
                .unwrap_or_else(|_| DEFAULT_TEXT_FIELD.to_string()),
            schema: RecordSchema::default(),
            normalizer,
            classifier,
            topic_sizes,
        })
    }

    /// Check that at least one input file is configured.
    pub fn require_input(&self) -> Result<()> {
        if self.input_paths.is_empty() {
            anyhow::bail!(
                "No input files. Set GRIEVANCE_INPUT in your .env file \
                 or pass --input <file> (repeatable)."
            );
        }
        Ok(())
    }

    /// Check that the embedding model has been downloaded.
    pub fn require_embedder(&self) -> Result<()> {
        if !crate::embeddings::download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `grievance download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated list like "15,30,60".
pub fn parse_list(raw: &str) -> Result<Vec<usize>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("Not a number: {s:?}"))
        })
        .collect()
}

fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("15, 30,60").unwrap(), vec![15, 30, 60]);
        assert_eq!(parse_list("").unwrap(), Vec::<usize>::new());
        assert!(parse_list("15,abc").is_err());
    }

    #[test]
    fn test_split_paths() {
        assert_eq!(
            split_paths("a.json, b.jsonl,"),
            vec![PathBuf::from("a.json"), PathBuf::from("b.jsonl")]
        );
    }

    #[test]
    fn test_require_input_fails_when_empty() {
        let config = Config {
            input_paths: vec![],
            output_dir: PathBuf::from("out"),
            model_dir: PathBuf::from("models"),
            anchor_map_path: None,
            text_field: DEFAULT_TEXT_FIELD.to_string(),
            schema: RecordSchema::default(),
            normalizer: NormalizerConfig::default(),
            classifier: ClassifierConfig::default(),
            topic_sizes: vec![15],
        };
        assert!(config.require_input().is_err());
    }
}
