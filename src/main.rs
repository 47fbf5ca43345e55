use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use grievance::classify::extract::extract_with_anchors;
use grievance::classify::{default_anchor_map, AnchorSet, UnicodeSentenceSplitter};
use grievance::config::{self, Config};
use grievance::corpus::{load::load_corpus, Corpus};
use grievance::embeddings::download::{download_model, embedding_model_dir};
use grievance::embeddings::onnx::OnnxEmbedder;
use grievance::normalize::{CleaningStats, Normalizer};
use grievance::output::{self, terminal};
use grievance::topics::summary::{topics_per_class, TopicReport};
use grievance::topics::tfidf::TfIdfTopicModel;
use grievance::topics::TopicModel;

/// Topics shown in each sweep summary.
const TOP_TOPICS_SHOWN: usize = 3;

/// Topics kept in the per-class tables.
const TOP_N_TOPICS_PER_CLASS: usize = 10;

/// Grievance: consumer complaint narrative analysis.
///
/// Cleans complaint narratives, strips templated legal boilerplate, sweeps
/// topics, and classifies sentences against semantic anchor categories.
#[derive(Parser)]
#[command(name = "grievance", version, about)]
struct Cli {
    /// Complaint export to load (JSON array or JSON Lines). Repeat to concatenate files.
    #[arg(long, short, global = true)]
    input: Vec<PathBuf>,

    /// Text column to clean and analyze
    #[arg(long, global = true)]
    field: Option<String>,

    /// Words per boilerplate phrase
    #[arg(long, global = true)]
    ngram_size: Option<usize>,

    /// Minimum occurrences for a phrase to count as boilerplate
    #[arg(long, global = true)]
    threshold: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the corpus and report what was removed
    Clean {
        /// Where to write the cleaned records (JSON Lines)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Sweep topic models over several minimum topic sizes
    Topics {
        /// Comma-separated minimum topic sizes (default: 15,30,60)
        #[arg(long)]
        sizes: Option<String>,
    },

    /// Classify every sentence against the anchor categories
    Classify {
        /// JSON anchor map to use instead of the built-in categories
        #[arg(long)]
        anchors: Option<PathBuf>,

        /// Where to write the classified sentences (JSON Lines)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Anchors reported per sentence (default: 3)
        #[arg(long)]
        top_k: Option<usize>,

        /// Skip sentences shorter than this many characters (default: 5)
        #[arg(long)]
        min_sentence_chars: Option<usize>,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("grievance=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    apply_overrides(&mut config, &cli);

    match cli.command {
        Commands::Clean { output: out_path } => {
            let (corpus, stats) = load_and_clean(&config)?;

            let path =
                out_path.unwrap_or_else(|| config.output_dir.join("cleaned_records.jsonl"));
            output::write_jsonl(&path, corpus.records())?;
            output::write_json(&config.output_dir.join("cleaning_stats.json"), &stats)?;

            println!(
                "\n{}",
                format!("Cleaned records saved to: {}", path.display()).bold()
            );
        }

        Commands::Topics { sizes } => {
            if let Some(raw) = sizes {
                config.topic_sizes = config::parse_list(&raw)?;
            }
            if config.topic_sizes.is_empty() {
                anyhow::bail!("No topic sizes to sweep. Pass --sizes 15,30,60.");
            }

            let (corpus, _stats) = load_and_clean(&config)?;
            let docs = corpus.texts(&config.text_field);
            let products = corpus.products();
            let tags = corpus.tags();

            for &size in &config.topic_sizes {
                let model = TfIdfTopicModel::default().with_min_topic_size(size);
                let assignment = model.fit(&docs)?;

                let report = TopicReport::from_assignment(&assignment, size, TOP_TOPICS_SHOWN);
                terminal::display_topic_report(&report);

                let by_product = topics_per_class(&assignment, &products, TOP_N_TOPICS_PER_CLASS)?;
                let by_tag = topics_per_class(&assignment, &tags, TOP_N_TOPICS_PER_CLASS)?;
                terminal::display_class_topics("Topics by Product", &by_product);
                terminal::display_class_topics("Topics by Tag", &by_tag);

                output::write_json(
                    &config
                        .output_dir
                        .join(format!("topics_by_product_size_{size}.json")),
                    &by_product,
                )?;
                output::write_json(
                    &config.output_dir.join(format!("topics_by_tag_size_{size}.json")),
                    &by_tag,
                )?;
                output::write_json(
                    &config.output_dir.join(format!("topics_size_{size}.json")),
                    &assignment.topics,
                )?;
            }
        }

        Commands::Classify {
            anchors,
            output: out_path,
            top_k,
            min_sentence_chars,
        } => {
            if let Some(k) = top_k {
                config.classifier.top_k = k;
            }
            if let Some(n) = min_sentence_chars {
                config.classifier.min_sentence_chars = n;
            }
            config.require_embedder()?;

            let anchor_set = match anchors.or_else(|| config.anchor_map_path.clone()) {
                Some(path) => AnchorSet::from_json_file(&path)?,
                None => AnchorSet::new(default_anchor_map())?,
            };
            if anchor_set.len() < config.classifier.top_k {
                anyhow::bail!(
                    "Anchor map has {} sentences but top_k is {}",
                    anchor_set.len(),
                    config.classifier.top_k
                );
            }

            let (corpus, _stats) = load_and_clean(&config)?;

            info!("Loading sentence embedding model");
            let embedder = OnnxEmbedder::load(&embedding_model_dir(&config.model_dir))?;

            let (rows, stats) = extract_with_anchors(
                &corpus,
                &config.text_field,
                &anchor_set,
                &embedder,
                &UnicodeSentenceSplitter,
                &config.classifier,
            )
            .await?;

            terminal::display_extraction_summary(&rows, &stats);

            let path =
                out_path.unwrap_or_else(|| config.output_dir.join("extracted_narratives.jsonl"));
            output::write_jsonl(&path, &rows)?;

            println!(
                "\n{}",
                format!("Classified sentences saved to: {}", path.display()).bold()
            );
        }

        Commands::DownloadModel => {
            println!("Downloading sentence embedding model...");
            println!("  Destination: {}", config.model_dir.display());

            download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `grievance classify`.");
        }
    }

    Ok(())
}

/// Command-line flags win over the environment.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.input.is_empty() {
        config.input_paths = cli.input.clone();
    }
    if let Some(field) = &cli.field {
        config.text_field = field.clone();
    }
    if let Some(n) = cli.ngram_size {
        config.normalizer.ngram_size = n;
    }
    if let Some(t) = cli.threshold {
        config.normalizer.boilerplate_threshold = t;
    }
}

/// Load every input file and run the cleaning pass. The cleaning summary is
/// always printed so removals can be audited before anything else runs.
fn load_and_clean(config: &Config) -> Result<(Corpus, CleaningStats)> {
    config.require_input()?;

    let raw = load_corpus(&config.input_paths, &config.schema)?;
    println!("Loaded {} records from {} file(s)", raw.len(), config.input_paths.len());

    let normalizer = Normalizer::new(config.normalizer.clone())?;
    let (corpus, stats) = normalizer.clean(raw, &config.text_field)?;

    terminal::display_cleaning_stats(&stats);
    Ok((corpus, stats))
}
