// Topic detection: a swappable topic engine plus per-run summaries.

pub mod assignment;
pub mod summary;
pub mod tfidf;
pub mod traits;

pub use assignment::{TopicAssignment, TopicSummary, OUTLIER_TOPIC};
pub use traits::TopicModel;
