// The output of a topic model run: one topic id per document and one
// summary per topic.

use serde::{Deserialize, Serialize};

/// Topic id for documents that fit no topic.
pub const OUTLIER_TOPIC: i64 = -1;

/// Topic assignment for a document collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment {
    /// Topic id per document, in input order
    pub assignments: Vec<i64>,
    /// Topic summaries, largest first; the outlier topic (if any) comes first
    pub topics: Vec<TopicSummary>,
}

/// A single topic: id, display name, keywords, and document count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: i64,
    pub name: String,
    pub keywords: Vec<String>,
    pub count: usize,
}

impl TopicSummary {
    pub fn is_outlier(&self) -> bool {
        self.id == OUTLIER_TOPIC
    }
}

impl TopicAssignment {
    /// Topics excluding the outlier topic.
    pub fn real_topics(&self) -> impl Iterator<Item = &TopicSummary> {
        self.topics.iter().filter(|t| !t.is_outlier())
    }

    pub fn outlier_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|&&t| t == OUTLIER_TOPIC)
            .count()
    }

    pub fn topic(&self, id: i64) -> Option<&TopicSummary> {
        self.topics.iter().find(|t| t.id == id)
    }
}

/// Display name in the "<id>_<kw>_<kw>_<kw>_<kw>" form.
pub fn topic_name(id: i64, keywords: &[String]) -> String {
    let mut parts = vec![id.to_string()];
    parts.extend(keywords.iter().take(4).cloned());
    parts.join("_")
}
