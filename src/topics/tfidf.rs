// TF-IDF keyword topic model.
//
// Uses the `keyword_extraction` crate to rank keywords across the corpus
// (each complaint is one document for IDF), groups co-occurring keywords
// into topics, then assigns every document to the topic whose keywords it
// shares most. Documents that share no keyword, and topics smaller than
// `min_topic_size`, fall into the outlier topic.

use std::collections::HashSet;

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

use super::assignment::{topic_name, TopicAssignment, TopicSummary, OUTLIER_TOPIC};
use super::traits::TopicModel;

/// Keywords pulled into a topic besides its seed keyword.
const RELATED_KEYWORDS_PER_TOPIC: usize = 5;

/// TF-IDF based topic model. Runs locally with no model download.
#[derive(Debug, Clone)]
pub struct TfIdfTopicModel {
    /// How many top keywords to extract before clustering
    pub top_n_keywords: usize,
    /// Upper bound on keyword clusters before size filtering
    pub max_topics: usize,
    /// Topics with fewer documents than this become outliers
    pub min_topic_size: usize,
}

impl Default for TfIdfTopicModel {
    fn default() -> Self {
        Self {
            top_n_keywords: 120,
            max_topics: 20,
            min_topic_size: 15,
        }
    }
}

impl TfIdfTopicModel {
    pub fn with_min_topic_size(mut self, min_topic_size: usize) -> Self {
        self.min_topic_size = min_topic_size;
        self
    }
}

impl TopicModel for TfIdfTopicModel {
    fn fit(&self, documents: &[String]) -> Result<TopicAssignment> {
        if documents.is_empty() {
            anyhow::bail!("No documents to analyze, cannot fit topics");
        }

        let stop_words: Vec<String> = get(LANGUAGE::English);

        let params = TfIdfParams::UnprocessedDocuments(documents, &stop_words, None);
        let tfidf = TfIdf::new(params);

        let ranked: Vec<(String, f32)> = tfidf
            .get_ranked_word_scores(self.top_n_keywords)
            .into_iter()
            .map(|(w, s)| (w.to_lowercase(), s))
            .collect();

        if ranked.is_empty() {
            anyhow::bail!(
                "TF-IDF produced no keywords from {} documents; documents may be too short or uniform",
                documents.len()
            );
        }

        info!(
            keywords = ranked.len(),
            top_keyword = &ranked[0].0,
            top_score = ranked[0].1,
            "Extracted TF-IDF keywords"
        );

        let doc_tokens: Vec<HashSet<String>> = documents.iter().map(|d| token_set(d)).collect();
        let clusters = cluster_keywords(&ranked, &doc_tokens, self.max_topics);
        let raw = assign_documents(&clusters, &doc_tokens);

        Ok(finalize(&clusters, raw, self.min_topic_size))
    }
}

fn token_set(text: &str) -> HashSet<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Group keywords into clusters by co-occurrence in documents.
///
/// Greedy: start from the highest-scored unassigned keyword and pull in its
/// most co-occurring unassigned neighbors.
fn cluster_keywords(
    ranked: &[(String, f32)],
    doc_tokens: &[HashSet<String>],
    max_clusters: usize,
) -> Vec<Vec<String>> {
    let keywords: Vec<&str> = ranked.iter().map(|(w, _)| w.as_str()).collect();
    let n = keywords.len();

    let doc_keywords: Vec<Vec<usize>> = doc_tokens
        .iter()
        .map(|tokens| {
            keywords
                .iter()
                .enumerate()
                .filter(|(_, kw)| tokens.contains(**kw))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut cooccurrence = vec![vec![0u32; n]; n];
    for dk in &doc_keywords {
        for &i in dk {
            for &j in dk {
                if i != j {
                    cooccurrence[i][j] += 1;
                }
            }
        }
    }

    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();

    for seed in 0..n {
        if clusters.len() >= max_clusters {
            break;
        }
        if assigned[seed] {
            continue;
        }

        assigned[seed] = true;
        let mut members = vec![seed];

        let mut candidates: Vec<(usize, u32)> = (0..n)
            .filter(|&i| !assigned[i] && cooccurrence[seed][i] > 0)
            .map(|i| (i, cooccurrence[seed][i]))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        for (idx, _count) in candidates.into_iter().take(RELATED_KEYWORDS_PER_TOPIC) {
            assigned[idx] = true;
            members.push(idx);
        }

        clusters.push(members.iter().map(|&i| keywords[i].to_string()).collect());
    }

    clusters
}

/// Index of the cluster sharing the most keywords with each document, or
/// `None` when a document shares none. Ties go to the earlier cluster.
fn assign_documents(clusters: &[Vec<String>], doc_tokens: &[HashSet<String>]) -> Vec<Option<usize>> {
    doc_tokens
        .iter()
        .map(|tokens| {
            let mut best: Option<(usize, usize)> = None;
            for (ci, cluster) in clusters.iter().enumerate() {
                let hits = cluster.iter().filter(|kw| tokens.contains(*kw)).count();
                if hits > 0 && best.is_none_or(|(_, h)| hits > h) {
                    best = Some((ci, hits));
                }
            }
            best.map(|(ci, _)| ci)
        })
        .collect()
}

/// Drop undersized clusters, renumber survivors by size, and build summaries.
fn finalize(
    clusters: &[Vec<String>],
    raw: Vec<Option<usize>>,
    min_topic_size: usize,
) -> TopicAssignment {
    let mut sizes = vec![0usize; clusters.len()];
    for ci in raw.iter().flatten() {
        sizes[*ci] += 1;
    }

    // Surviving clusters, largest first; equal sizes keep cluster order
    let mut survivors: Vec<usize> = (0..clusters.len())
        .filter(|&ci| sizes[ci] > 0 && sizes[ci] >= min_topic_size)
        .collect();
    survivors.sort_by(|a, b| sizes[*b].cmp(&sizes[*a]));

    let mut new_id: Vec<Option<i64>> = vec![None; clusters.len()];
    for (rank, &ci) in survivors.iter().enumerate() {
        new_id[ci] = Some(rank as i64);
    }

    let assignments: Vec<i64> = raw
        .iter()
        .map(|ci| ci.and_then(|c| new_id[c]).unwrap_or(OUTLIER_TOPIC))
        .collect();

    let outliers = assignments.iter().filter(|&&t| t == OUTLIER_TOPIC).count();

    let mut topics = Vec::with_capacity(survivors.len() + 1);
    if outliers > 0 {
        topics.push(TopicSummary {
            id: OUTLIER_TOPIC,
            name: format!("{OUTLIER_TOPIC}_outliers"),
            keywords: Vec::new(),
            count: outliers,
        });
    }
    for (rank, &ci) in survivors.iter().enumerate() {
        let id = rank as i64;
        topics.push(TopicSummary {
            id,
            name: topic_name(id, &clusters[ci]),
            keywords: clusters[ci].clone(),
            count: sizes[ci],
        });
    }

    TopicAssignment {
        assignments,
        topics,
    }
}
