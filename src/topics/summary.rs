// Per-run topic summaries and per-class topic counts.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::assignment::{TopicAssignment, TopicSummary, OUTLIER_TOPIC};

/// Headline numbers for one topic model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    pub min_topic_size: usize,
    pub documents: usize,
    /// Topics found, excluding the outlier topic
    pub topic_count: usize,
    pub outlier_count: usize,
    /// Outlier documents as a percentage of all documents
    pub outlier_percent: f64,
    /// Largest real topics
    pub top_topics: Vec<TopicSummary>,
}

impl TopicReport {
    pub fn from_assignment(assignment: &TopicAssignment, min_topic_size: usize, top_n: usize) -> Self {
        let documents = assignment.assignments.len();
        let outlier_count = assignment.outlier_count();
        let outlier_percent = if documents == 0 {
            0.0
        } else {
            outlier_count as f64 / documents as f64 * 100.0
        };

        Self {
            min_topic_size,
            documents,
            topic_count: assignment.real_topics().count(),
            outlier_count,
            outlier_percent,
            top_topics: assignment.real_topics().take(top_n).cloned().collect(),
        }
    }
}

/// Documents of one class (e.g. a Product) assigned to one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTopicCount {
    pub class: String,
    pub topic: i64,
    pub topic_name: String,
    pub count: usize,
}

/// Count documents per (class, topic), restricted to the `top_n_topics`
/// largest real topics. `classes` holds one label per document.
///
/// Rows are ordered by topic id, then class name.
pub fn topics_per_class(
    assignment: &TopicAssignment,
    classes: &[String],
    top_n_topics: usize,
) -> Result<Vec<ClassTopicCount>> {
    if classes.len() != assignment.assignments.len() {
        anyhow::bail!(
            "Got {} class labels for {} documents",
            classes.len(),
            assignment.assignments.len()
        );
    }

    let kept: BTreeMap<i64, &str> = assignment
        .real_topics()
        .take(top_n_topics)
        .map(|t| (t.id, t.name.as_str()))
        .collect();

    let mut counts: BTreeMap<(i64, &str), usize> = BTreeMap::new();
    for (&topic, class) in assignment.assignments.iter().zip(classes) {
        if topic == OUTLIER_TOPIC || !kept.contains_key(&topic) {
            continue;
        }
        *counts.entry((topic, class.as_str())).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((topic, class), count)| ClassTopicCount {
            class: class.to_string(),
            topic,
            topic_name: kept.get(&topic).copied().unwrap_or_default().to_string(),
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64, count: usize) -> TopicSummary {
        TopicSummary {
            id,
            name: format!("{id}_kw"),
            keywords: vec!["kw".into()],
            count,
        }
    }

    fn sample() -> TopicAssignment {
        TopicAssignment {
            assignments: vec![0, 0, 1, -1, 2, 0],
            topics: vec![summary(-1, 1), summary(0, 3), summary(1, 1), summary(2, 1)],
        }
    }

    #[test]
    fn test_report_counts() {
        let report = TopicReport::from_assignment(&sample(), 15, 2);
        assert_eq!(report.documents, 6);
        assert_eq!(report.topic_count, 3);
        assert_eq!(report.outlier_count, 1);
        assert!((report.outlier_percent - 100.0 / 6.0).abs() < 1e-9);
        let ids: Vec<i64> = report.top_topics.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_report_empty() {
        let report = TopicReport::from_assignment(
            &TopicAssignment {
                assignments: vec![],
                topics: vec![],
            },
            15,
            3,
        );
        assert_eq!(report.outlier_percent, 0.0);
        assert_eq!(report.topic_count, 0);
    }

    #[test]
    fn test_topics_per_class() {
        let classes: Vec<String> = ["Mortgage", "Card", "Card", "Card", "Loan", "Mortgage"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = topics_per_class(&sample(), &classes, 2).unwrap();

        // topic 2 is outside the top 2, the outlier is never counted
        assert_eq!(
            rows,
            vec![
                ClassTopicCount {
                    class: "Card".into(),
                    topic: 0,
                    topic_name: "0_kw".into(),
                    count: 1
                },
                ClassTopicCount {
                    class: "Mortgage".into(),
                    topic: 0,
                    topic_name: "0_kw".into(),
                    count: 2
                },
                ClassTopicCount {
                    class: "Card".into(),
                    topic: 1,
                    topic_name: "1_kw".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_topics_per_class_length_mismatch() {
        assert!(topics_per_class(&sample(), &["a".to_string()], 10).is_err());
    }
}
