// Sentence splitting seam. The default uses Unicode sentence boundaries
// (UAX#29).

use unicode_segmentation::UnicodeSegmentation;

/// Splits a text into an ordered sequence of sentences.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Vec<String>;
}

/// UAX#29 sentence boundaries, trimmed, with empty pieces dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSplitter;

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
