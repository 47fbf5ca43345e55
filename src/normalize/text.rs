// Per-string normalization steps: punctuation stripping, whitespace
// collapsing, and redaction-placeholder removal.

use regex_lite::Regex;

/// Remove every character that is neither alphanumeric nor whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes runs of two or more redaction marker characters ("xx", "xxxx", ...).
///
/// Matches are substrings, not whole words: "xxxx1234" loses its "xxxx".
/// A single marker character is never touched, so words like "tax" survive.
#[derive(Debug, Clone)]
pub struct RedactionRemover {
    pattern: Regex,
}

impl RedactionRemover {
    /// `marker` is usually one character; it is matched literally.
    pub fn new(marker: &str) -> Result<Self, regex_lite::Error> {
        let escaped = regex_lite::escape(marker);
        let pattern = Regex::new(&format!("(?:{escaped}){{2,}}"))?;
        Ok(Self { pattern })
    }

    /// Number of placeholder runs in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }

    /// Remove every placeholder run, returning the new text and how many runs
    /// were removed. Whitespace is collapsed afterwards.
    pub fn remove(&self, text: &str) -> (String, usize) {
        let matches = self.count(text);
        if matches == 0 {
            return (text.to_string(), 0);
        }
        let replaced = self.pattern.replace_all(text, "");
        (collapse_whitespace(&replaced), matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_punctuation_keeps_alnum_and_space() {
        assert_eq!(
            strip_punctuation("I paid $1,200.00 on 03/04!"),
            "I paid 120000 on 0304"
        );
    }

    #[test]
    fn test_strip_punctuation_keeps_unicode_letters() {
        assert_eq!(strip_punctuation("café—résumé"), "caférésumé");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_redaction_removes_runs() {
        let remover = RedactionRemover::new("x").unwrap();
        let (text, n) = remover.remove("call xxx about xxxx charge");
        assert_eq!(text, "call about charge");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_redaction_leaves_single_marker() {
        let remover = RedactionRemover::new("x").unwrap();
        let (text, n) = remover.remove("tax box fix");
        assert_eq!(text, "tax box fix");
        assert_eq!(n, 0);
    }

    #[test]
    fn test_redaction_is_substring_match() {
        let remover = RedactionRemover::new("x").unwrap();
        let (text, n) = remover.remove("account xxxx1234 dated xxxxxxxx2019");
        assert_eq!(text, "account 1234 dated 2019");
        assert_eq!(n, 2);
    }
}
