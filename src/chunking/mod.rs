#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How far back from a window boundary to look for a sentence terminator.
pub const SENTENCE_SCAN_WINDOW: usize = 200;

/// Configuration for splitting entity content into indexable chunks.
///
/// Sizes are measured in characters (Unicode scalar values), not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Maximum size of each chunk
    pub chunk_size: usize,
    /// Overlap carried from the end of one chunk into the next
    pub overlap: usize,
}

impl Default for SplitterConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 100,
        }
    }
}

/// Split text into bounded, overlapping, sentence-aligned chunks.
///
/// Text that fits within `chunk_size` is returned unchanged as a single
/// chunk. Otherwise the text is scanned in `chunk_size` windows; when a
/// window boundary falls mid-text, the split point moves back up to
/// [`SENTENCE_SCAN_WINDOW`] characters to the nearest sentence terminator
/// (`.`, `?`, `!`) followed by whitespace or end of text. The next window
/// starts `overlap` characters before the previous cut, unless that would
/// not advance, in which case it starts at the cut so the scan always
/// makes progress.
#[inline]
pub fn split_text(text: &str, config: &SplitterConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();

    if chars.len() <= config.chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = usize::min(start + config.chunk_size, chars.len());

        // Prefer cutting just after a sentence terminator near the boundary.
        if end < chars.len() {
            let floor = start.max(end.saturating_sub(SENTENCE_SCAN_WINDOW));
            for i in (floor + 1..=end).rev() {
                if matches!(chars[i - 1], '.' | '?' | '!')
                    && (i == chars.len() || chars[i].is_whitespace())
                {
                    end = i;
                    break;
                }
            }
        }

        chunks.push(chars[start..end].iter().collect());

        // Overlap must not prevent forward progress.
        start = if end.saturating_sub(config.overlap) > start {
            end - config.overlap
        } else {
            end
        };
    }

    debug!(
        "Split {} characters into {} chunks",
        chars.len(),
        chunks.len()
    );

    chunks
}
