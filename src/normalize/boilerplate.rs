// Boilerplate detection by word n-gram frequency.
//
// The cleaned texts are read as one flat word stream (windows may span the
// boundary between two records). Every distinct N-word window that occurs at
// least `threshold` times is a boilerplate phrase. Removal deletes every
// exact substring occurrence from the already-normalized text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::text::collapse_whitespace;

/// A repeated fixed-length word sequence and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoilerplatePhrase {
    pub phrase: String,
    pub frequency: usize,
}

/// Find every `ngram_size`-word window occurring at least `threshold` times.
///
/// Phrases come back ordered by frequency (highest first), then
/// alphabetically, so the result is stable across runs. A threshold of 0 is
/// treated as 1.
pub fn detect_boilerplate<S: AsRef<str>>(
    texts: &[S],
    ngram_size: usize,
    threshold: usize,
) -> Vec<BoilerplatePhrase> {
    if ngram_size == 0 {
        return Vec::new();
    }
    let threshold = threshold.max(1);

    let words: Vec<&str> = texts
        .iter()
        .flat_map(|t| t.as_ref().split_whitespace())
        .collect();

    let mut counts: HashMap<&[&str], usize> = HashMap::new();
    for window in words.windows(ngram_size) {
        *counts.entry(window).or_insert(0) += 1;
    }

    let mut phrases: Vec<BoilerplatePhrase> = counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(window, count)| BoilerplatePhrase {
            phrase: window.join(" "),
            frequency: count,
        })
        .collect();

    phrases.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });

    phrases
}

/// Remove every literal occurrence of every phrase from `text`.
///
/// Occurrences are located on the text as given, so phrases that overlap
/// (consecutive windows of a template longer than N words) are all removed.
/// Returns the new text (whitespace collapsed) and the number of
/// occurrences found.
pub fn remove_phrases(text: &str, phrases: &[BoilerplatePhrase]) -> (String, usize) {
    let mut spans: Vec<(usize, usize)> = phrases
        .iter()
        .filter(|p| !p.phrase.is_empty())
        .flat_map(|p| occurrences(text, &p.phrase).map(move |start| (start, start + p.phrase.len())))
        .collect();

    if spans.is_empty() {
        return (text.to_string(), 0);
    }
    let removed = spans.len();
    spans.sort_unstable();

    // Merge overlapping spans while copying the text between them
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in spans {
        if start > cursor {
            out.push_str(&text[cursor..start]);
        }
        cursor = cursor.max(end);
    }
    out.push_str(&text[cursor..]);

    (collapse_whitespace(&out), removed)
}

/// Byte offsets of every occurrence of `needle`, overlapping ones included.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        let start = from + haystack.get(from..)?.find(needle)?;
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
        Some(start)
    })
}
