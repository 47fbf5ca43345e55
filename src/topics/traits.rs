// Topic model trait: the swap-ready abstraction over topic engines.
//
// The default implementation clusters TF-IDF keywords locally. Anything that
// maps documents to topic ids plus per-topic keyword summaries can replace it.

use anyhow::Result;

use super::assignment::TopicAssignment;

/// Trait for fitting topics to a document collection.
pub trait TopicModel {
    /// Assign every document a topic id (or `OUTLIER_TOPIC`) and summarize each topic.
    fn fit(&self, documents: &[String]) -> Result<TopicAssignment>;
}
