//! Recursive character text splitting.
//!
//! Splits text on the coarsest separator that yields pieces within the
//! chunk-size budget, recursing into oversized pieces with the next
//! separator, then greedily merges adjacent pieces back up to the budget
//! with a fixed overlap carried between chunks.

use trellis_core::config::SplitterConfig;

/// Recursive character splitter with fixed size, overlap, and fallback
/// separators.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter from explicit parameters.
    pub fn new(chunk_size: usize, chunk_overlap: usize, separators: Vec<String>) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
            separators,
        }
    }

    /// Create a splitter from configuration.
    pub fn from_config(config: &SplitterConfig) -> Self {
        Self::new(
            config.chunk_size,
            config.chunk_overlap,
            config.separators.clone(),
        )
    }

    /// Split text into chunks.
    ///
    /// Whitespace-only input yields exactly one empty chunk, so every
    /// document produces at least one chunk downstream stages can see.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![String::new()];
        }
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let sep = match separators.first() {
            Some(sep) if !sep.is_empty() => sep,
            _ => return self.hard_split(text),
        };

        let mut pieces = Vec::new();
        for part in text.split(sep.as_str()) {
            if char_len(part) > self.chunk_size {
                pieces.extend(self.split_with(part, &separators[1..]));
            } else {
                pieces.push(part.to_string());
            }
        }
        self.merge(pieces, sep)
    }

    /// Merge adjacent pieces up to the budget, carrying `chunk_overlap`
    /// characters of the previous chunk into the next.
    fn merge(&self, pieces: Vec<String>, sep: &str) -> Vec<String> {
        let sep_len = char_len(sep);
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            if !current.is_empty()
                && char_len(&current) + sep_len + char_len(&piece) > self.chunk_size
            {
                let tail = overlap_tail(&current, self.chunk_overlap);
                chunks.push(std::mem::take(&mut current));
                current = tail;
            }
            if !current.is_empty() {
                current.push_str(sep);
            }
            current.push_str(&piece);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Character windows of `chunk_size` advancing by size minus overlap.
    /// Used when the separator list is exhausted.
    fn hard_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self
            .chunk_size
            .saturating_sub(self.chunk_overlap)
            .max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::from_config(&SplitterConfig::default())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn overlap_tail(s: &str, overlap: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(overlap);
    chars[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_splitter() -> RecursiveSplitter {
        RecursiveSplitter::new(
            20,
            5,
            vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        )
    }

    #[test]
    fn test_empty_input_yields_one_empty_chunk() {
        let splitter = RecursiveSplitter::default();
        assert_eq!(splitter.split_text(""), vec![String::new()]);
        assert_eq!(splitter.split_text("   \n  "), vec![String::new()]);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveSplitter::default();
        let chunks = splitter.split_text("Apple Inc. makes the iPhone.");
        assert_eq!(chunks, vec!["Apple Inc. makes the iPhone.".to_string()]);
    }

    #[test]
    fn test_paragraph_separator_preferred() {
        let splitter = small_splitter();
        let chunks = splitter.split_text("first paragraph\n\nsecond paragraph");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "first paragraph");
        assert!(chunks[1].contains("second paragraph"));
    }

    #[test]
    fn test_falls_back_to_word_splitting() {
        let splitter = small_splitter();
        let chunks = splitter.split_text("one two three four five six seven eight nine");
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // budget plus overlap carryover plus one separator
            assert!(chunk.chars().count() <= 20 + 5 + 1, "oversized: {:?}", chunk);
        }
    }

    #[test]
    fn test_overlap_carried_between_chunks() {
        let splitter = small_splitter();
        let chunks = splitter.split_text("aaaa bbbb cccc dddd eeee ffff gggg");
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail = overlap_tail(&pair[0], 5);
            assert!(
                pair[1].starts_with(tail.trim_start_matches(' ')) || pair[1].contains(tail.trim()),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_hard_split_on_unbroken_text() {
        let splitter = small_splitter();
        let chunks = splitter.split_text(&"x".repeat(100));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20);
        }
        // windows advance by size - overlap
        assert_eq!(chunks[0].chars().count(), 20);
    }

    #[test]
    fn test_all_text_retained() {
        let splitter = small_splitter();
        let text = "alpha beta gamma delta epsilon zeta";
        let joined = splitter.split_text(text).join(" ");
        for word in text.split(' ') {
            assert!(joined.contains(word));
        }
    }
}
